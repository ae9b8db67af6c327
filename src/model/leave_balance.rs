use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Per-employee, per-leave-type, per-year ledger row.
/// Invariants: `balance == allocated - used` and `balance >= 0`, both upheld
/// by the single conditional debit statement in the approval path.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_id": 1000,
        "leave_type": "annual",
        "year": 2026,
        "allocated": 20.0,
        "used": 2.0,
        "balance": 18.0
    })
)]
pub struct LeaveBalance {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "annual")]
    pub leave_type: String,

    #[schema(example = 2026)]
    pub year: i32,

    #[schema(example = 20.0)]
    pub allocated: f64,

    #[schema(example = 2.0)]
    pub used: f64,

    #[schema(example = 18.0)]
    pub balance: f64,
}
