use crate::auth::auth::AuthUser;
use crate::domain::leave::{LEAVE_CATALOG, LeaveType, policy_for};
use crate::domain::ledger::LedgerEntry;
use crate::error::ApiError;
use crate::model::leave_balance::LeaveBalance;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct BalanceQuery {
    #[schema(example = 1000)]
    /// Employee to read (HR admin only; employees always read their own)
    pub employee_id: Option<u64>,
    #[schema(example = "annual")]
    /// Restrict to one leave type; omit for the full catalog
    pub leave_type: Option<LeaveType>,
    #[schema(example = 2026)]
    /// Benefit year; defaults to the current org-local year
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct BalanceView {
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

#[derive(Serialize, ToSchema)]
pub struct BalanceListResponse {
    pub data: Vec<BalanceView>,
    #[schema(example = 2026)]
    pub year: i32,
}

/// Materializes the read view under the lazy allocation policy: a missing row
/// means the full annual quota is still untouched, and quota-free types read
/// as zeros. Reading never writes.
fn materialize(
    employee_id: u64,
    leave_type: LeaveType,
    year: i32,
    row: Option<LeaveBalance>,
) -> BalanceView {
    let entry = match row {
        Some(b) => LedgerEntry {
            allocated: b.allocated,
            used: b.used,
            balance: b.balance,
        },
        None => match policy_for(leave_type).annual_quota {
            Some(quota) => LedgerEntry::allocate(quota),
            None => LedgerEntry::empty(),
        },
    };
    BalanceView {
        employee_id,
        leave_type: leave_type.to_string(),
        year,
        allocated: entry.allocated,
        used: entry.used,
        balance: entry.balance,
    }
}

async fn fetch_balance_row(
    pool: &MySqlPool,
    employee_id: u64,
    leave_type: LeaveType,
    year: i32,
) -> Result<Option<LeaveBalance>, sqlx::Error> {
    sqlx::query_as::<_, LeaveBalance>(
        r#"
        SELECT id, employee_id, leave_type, year, allocated, used, balance
        FROM leave_balances
        WHERE employee_id = ? AND leave_type = ? AND year = ?
        "#,
    )
    .bind(employee_id)
    .bind(leave_type.to_string())
    .bind(year)
    .fetch_optional(pool)
    .await
}

/// Leave balance read endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/balance",
    params(BalanceQuery),
    responses(
        (status = 200, description = "Balances for the requested year", body = BalanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_balance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<BalanceQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match (auth.is_hr_admin(), query.employee_id) {
        (true, Some(id)) => id,
        _ => auth.employee_id()?,
    };

    let year = query.year.unwrap_or_else(|| Utc::now().year());

    let types: Vec<LeaveType> = match query.leave_type {
        Some(t) => vec![t],
        None => LEAVE_CATALOG.iter().map(|p| p.leave_type).collect(),
    };

    let mut data = Vec::with_capacity(types.len());
    for leave_type in types {
        let row = fetch_balance_row(pool.get_ref(), employee_id, leave_type, year)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, %leave_type, year, "Failed to fetch leave balance");
                ApiError::Internal
            })?;
        data.push(materialize(employee_id, leave_type, year, row));
    }

    Ok(HttpResponse::Ok().json(BalanceListResponse { data, year }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_row_reads_as_full_quota() {
        let view = materialize(7, LeaveType::Annual, 2026, None);
        assert_eq!(view.allocated, 20.0);
        assert_eq!(view.used, 0.0);
        assert_eq!(view.balance, 20.0);
    }

    #[test]
    fn quota_free_type_reads_as_zeros() {
        let view = materialize(7, LeaveType::Unpaid, 2026, None);
        assert_eq!(view.allocated, 0.0);
        assert_eq!(view.balance, 0.0);
    }

    #[test]
    fn existing_row_wins_over_catalog() {
        let row = LeaveBalance {
            id: 1,
            employee_id: 7,
            leave_type: "annual".into(),
            year: 2026,
            allocated: 12.0,
            used: 10.0,
            balance: 2.0,
        };
        let view = materialize(7, LeaveType::Annual, 2026, Some(row));
        assert_eq!(view.allocated, 12.0);
        assert_eq!(view.used, 10.0);
        assert_eq!(view.balance, 2.0);
    }
}
