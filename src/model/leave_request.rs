use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Durable leave request. `status` moves exactly once from `pending` to a
/// terminal state; terminal rows are immutable.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "leave_type": "annual",
        "start_date": "2026-04-01",
        "end_date": "2026-04-03",
        "day_type": "full",
        "total_days": 3.0,
        "reason": "family visit",
        "status": "pending",
        "approved_by": null,
        "approved_at": null,
        "rejection_reason": null,
        "created_at": "2026-03-20T09:00:00Z"
    })
)]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "annual")]
    pub leave_type: String,

    #[schema(example = "2026-04-01", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    #[schema(example = "2026-04-03", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "full")]
    pub day_type: String,

    /// Resolved from the date range and day_type at submission
    #[schema(example = 3.0)]
    pub total_days: f64,

    #[schema(example = "family visit", nullable = true)]
    pub reason: Option<String>,

    #[schema(example = "pending")]
    pub status: String,

    /// User id of the processor, for both approvals and rejections
    #[schema(example = 2, nullable = true)]
    pub approved_by: Option<u64>,

    #[schema(example = "2026-03-21T10:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub approved_at: Option<DateTime<Utc>>,

    #[schema(example = "no cover available", nullable = true)]
    pub rejection_reason: Option<String>,

    #[schema(example = "2026-03-20T09:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}
