use crate::auth::auth::AuthUser;
use crate::domain::leave::{DayType, LeaveSpan, LeaveStatus, LeaveType, policy_for};
use crate::error::ApiError;
use crate::model::leave_request::LeaveRequest;
use crate::notify::{NotificationEvent, NotificationSink, emit_best_effort};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

const LEAVE_COLUMNS: &str = "id, employee_id, leave_type, start_date, end_date, day_type, \
     total_days, reason, status, approved_by, approved_at, rejection_reason, created_at";

async fn fetch_leave(pool: &MySqlPool, leave_id: u64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(leave_id)
        .fetch_optional(pool)
        .await
}

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "annual")]
    pub leave_type: LeaveType, // enum ensures Swagger dropdown
    #[schema(example = "2026-04-01", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-04-03", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "full")]
    pub day_type: DayType,
    #[schema(example = "family visit", nullable = true)]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct RejectLeave {
    #[schema(example = "no cover available")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID (HR admin only; employees always see their own)
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<String>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

#[derive(serde::Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid date range or day type", body = Object, example = json!({
            "message": "start_date cannot be after end_date",
            "error": "validation"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;

    // Validation happens before any write; submission never touches the ledger
    // (debit-on-approval policy).
    let span = LeaveSpan::new(payload.start_date, payload.end_date, payload.day_type)?;

    let reason = payload
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type, start_date, end_date, day_type, total_days, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?, 'pending')
        "#,
    )
    .bind(employee_id)
    .bind(payload.leave_type.to_string())
    .bind(span.start_date)
    .bind(span.end_date)
    .bind(span.day_type.to_string())
    .bind(span.total_days)
    .bind(reason)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Failed to create leave request");
        ApiError::Internal
    })?;

    let leave = fetch_leave(pool.get_ref(), result.last_insert_id())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch created leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    tracing::info!(
        employee_id,
        leave_id = leave.id,
        leave_type = %leave.leave_type,
        total_days = leave.total_days,
        "leave request submitted"
    );
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Approve leave (HR admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed, or balance too low", body = Object, example = json!({
            "message": "Leave request already processed",
            "error": "already_processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    sink: web::Data<dyn NotificationSink>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_admin()?;

    let leave_id = path.into_inner();

    let request = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("leave request"))?;

    let leave_type: LeaveType = request.leave_type.parse().map_err(|_| {
        tracing::error!(leave_id, leave_type = %request.leave_type, "Unknown leave type on stored request");
        ApiError::Internal
    })?;

    // Status flip and ledger debit share one transaction: they commit together
    // or not at all. Notification is emitted only after the commit.
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Failed to open transaction");
        ApiError::Internal
    })?;

    let flipped = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'approved', approved_by = ?, approved_at = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .bind(Utc::now())
    .bind(leave_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Approve leave failed");
        ApiError::Internal
    })?;

    if flipped.rows_affected() == 0 {
        // Another approver, a rejection, or a cancellation won the race.
        return Err(ApiError::AlreadyProcessed.into());
    }

    if let Some(quota) = policy_for(leave_type).annual_quota {
        let year = request.start_date.year();

        // Lazy allocation: seed the benefit-year row with the catalog quota
        // if this is its first debit.
        sqlx::query(
            r#"
            INSERT IGNORE INTO leave_balances
                (employee_id, leave_type, year, allocated, used, balance)
            VALUES (?, ?, ?, ?, 0, ?)
            "#,
        )
        .bind(request.employee_id)
        .bind(&request.leave_type)
        .bind(year)
        .bind(quota)
        .bind(quota)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to seed leave balance");
            ApiError::Internal
        })?;

        let debited = sqlx::query(
            r#"
            UPDATE leave_balances
            SET used = used + ?, balance = balance - ?
            WHERE employee_id = ? AND leave_type = ? AND year = ?
            AND balance >= ?
            "#,
        )
        .bind(request.total_days)
        .bind(request.total_days)
        .bind(request.employee_id)
        .bind(&request.leave_type)
        .bind(year)
        .bind(request.total_days)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Leave balance debit failed");
            ApiError::Internal
        })?;

        if debited.rows_affected() == 0 {
            // Balance would go negative: roll the status flip back too.
            tx.rollback().await.map_err(|e| {
                tracing::error!(error = %e, leave_id, "Rollback failed");
                ApiError::Internal
            })?;

            let available =
                sqlx::query_scalar::<_, f64>(
                    "SELECT balance FROM leave_balances WHERE employee_id = ? AND leave_type = ? AND year = ?",
                )
                .bind(request.employee_id)
                .bind(&request.leave_type)
                .bind(year)
                .fetch_optional(pool.get_ref())
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, leave_id, "Failed to read leave balance");
                    ApiError::Internal
                })?
                .unwrap_or(quota);

            return Err(ApiError::InsufficientBalance {
                requested: request.total_days,
                available,
            }
            .into());
        }
    }

    tx.commit().await.map_err(|e| {
        tracing::error!(error = %e, leave_id, "Commit failed");
        ApiError::Internal
    })?;

    tracing::info!(
        leave_id,
        employee_id = request.employee_id,
        approved_by = auth.user_id,
        total_days = request.total_days,
        "leave approved"
    );

    emit_best_effort(
        sink.get_ref(),
        NotificationEvent::leave_approved(
            request.employee_id,
            request.start_date,
            request.end_date,
            request.total_days,
        ),
    );

    let leave = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch approved leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Reject leave (HR admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body = RejectLeave,
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 400, description = "Empty rejection reason", body = Object, example = json!({
            "message": "rejection reason must not be empty",
            "error": "empty_reason"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    sink: web::Data<dyn NotificationSink>,
    path: web::Path<u64>,
    payload: web::Json<RejectLeave>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_admin()?;

    let leave_id = path.into_inner();

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::EmptyReason.into());
    }

    let request = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("leave request"))?;

    // Rejection never touches the ledger; nothing was reserved at submission.
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'rejected', approved_by = ?, approved_at = ?, rejection_reason = ?
        WHERE id = ?
        AND status = 'pending'
        "#,
    )
    .bind(auth.user_id)
    .bind(Utc::now())
    .bind(reason)
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Reject leave failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::AlreadyProcessed.into());
    }

    tracing::info!(
        leave_id,
        employee_id = request.employee_id,
        rejected_by = auth.user_id,
        "leave rejected"
    );

    emit_best_effort(
        sink.get_ref(),
        NotificationEvent::leave_rejected(
            request.employee_id,
            request.start_date,
            request.end_date,
            reason,
        ),
    );

    let leave = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch rejected leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Cancel leave (requester)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the requester", body = Object, example = json!({
            "message": "Only the requester may cancel this leave request",
            "error": "not_owner"
        })),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let leave_id = path.into_inner();

    let request = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("leave request"))?;

    if request.employee_id != employee_id {
        return Err(ApiError::NotOwner.into());
    }

    // Ownership repeated in the predicate so the guard survives the race with
    // a concurrent approval or rejection.
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = 'cancelled'
        WHERE id = ?
        AND employee_id = ?
        AND status = 'pending'
        "#,
    )
    .bind(leave_id)
    .bind(employee_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Cancel leave failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::AlreadyProcessed.into());
    }

    tracing::info!(leave_id, employee_id, "leave cancelled");

    let leave = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch cancelled leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    Ok(HttpResponse::Ok().json(leave))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "leave request not found",
            "error": "not_found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let leave = fetch_leave(pool.get_ref(), leave_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, leave_id, "Failed to fetch leave request");
            ApiError::Internal
        })?
        .ok_or(ApiError::NotFound("leave request"))?;

    // Employees may only read their own requests
    if !auth.is_hr_admin() && Some(leave.employee_id) != auth.employee_id {
        return Err(ApiError::Forbidden("Not your leave request").into());
    }

    Ok(HttpResponse::Ok().json(leave))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    // Employees only ever see their own requests
    let scope_employee_id = if auth.is_hr_admin() {
        query.employee_id
    } else {
        Some(auth.employee_id()?)
    };

    // -------------------------
    // Pagination
    // -------------------------
    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = scope_employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        status
            .parse::<LeaveStatus>()
            .map_err(|_| ApiError::Validation(format!("unknown leave status: {status}")))?;
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count leave requests");
        ApiError::Internal
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "SELECT {LEAVE_COLUMNS} FROM leave_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let leaves = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch leave list");
            ApiError::Internal
        })?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data: leaves,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
