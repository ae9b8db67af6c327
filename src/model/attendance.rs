use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One row per employee per org-local day. Created on first check-in, mutated
/// once on check-out, never reopened. Statuses and hours are stored at write
/// time; they are the source of truth for every downstream consumer.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "date": "2026-03-10",
        "check_in_time": "2026-03-10T04:55:00Z",
        "check_out_time": "2026-03-10T13:02:00Z",
        "check_in_status": "ontime",
        "check_out_status": "overtime",
        "total_hours": 8.12,
        "overtime_hours": 0.03
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    /// Org-local calendar day the record belongs to
    #[schema(example = "2026-03-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "2026-03-10T04:55:00Z", value_type = String, format = "date-time", nullable = true)]
    pub check_in_time: Option<DateTime<Utc>>,

    #[schema(example = "2026-03-10T13:02:00Z", value_type = String, format = "date-time", nullable = true)]
    pub check_out_time: Option<DateTime<Utc>>,

    #[schema(example = "ontime", nullable = true)]
    pub check_in_status: Option<String>,

    #[schema(example = "overtime", nullable = true)]
    pub check_out_status: Option<String>,

    #[schema(example = 8.12, nullable = true)]
    pub total_hours: Option<f64>,

    #[schema(example = 0.03, nullable = true)]
    pub overtime_hours: Option<f64>,
}
