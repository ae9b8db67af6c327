use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::domain::shift::ShiftWindow;
use crate::domain::status::{overtime_hours, resolve_check_in, resolve_check_out, worked_hours};
use crate::error::ApiError;
use crate::model::attendance::AttendanceRecord;
use actix_web::{HttpResponse, Responder, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

const RECORD_COLUMNS: &str = "id, employee_id, date, check_in_time, check_out_time, \
     check_in_status, check_out_status, total_hours, overtime_hours";

async fn fetch_record_for_day(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    let sql = format!("SELECT {RECORD_COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");
    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceRecord),
        (status = 400, description = "Invalid shift configuration"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today",
            "error": "already_checked_in"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let hours = auth.shift_hours()?;

    let now = Utc::now();
    let window = ShiftWindow::resolve(hours, now, config.org_offset());
    let status = resolve_check_in(now, &window);

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, check_in_time, check_in_status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(window.date)
    .bind(now)
    .bind(status.to_string())
    .execute(pool.get_ref())
    .await;

    if let Err(e) = result {
        // Unique (employee_id, date) key: a second check-in loses here,
        // including the concurrent case.
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.code().as_deref() == Some("23000") {
                return Err(ApiError::AlreadyCheckedIn.into());
            }
        }
        tracing::error!(error = %e, employee_id, "Check-in failed");
        return Err(ApiError::Internal.into());
    }

    let record = fetch_record_for_day(pool.get_ref(), employee_id, window.date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch attendance after check-in");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    tracing::info!(employee_id, date = %window.date, status = %status, "checked in");
    Ok(HttpResponse::Ok().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "No open record, or already checked out", body = Object, example = json!({
            "message": "No active check-in found for today",
            "error": "not_checked_in"
        })),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let hours = auth.shift_hours()?;

    let now = Utc::now();
    let window = ShiftWindow::resolve(hours, now, config.org_offset());

    // Pre-read only gathers the immutable check_in_time and improves the error;
    // the conditional update below is what guarantees at-most-one checkout.
    let record = fetch_record_for_day(pool.get_ref(), employee_id, window.date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch attendance for check-out");
            ApiError::Internal
        })?;

    let record = match record {
        Some(r) => r,
        None => return Err(ApiError::NotCheckedIn.into()),
    };
    if record.check_out_time.is_some() {
        return Err(ApiError::AlreadyCheckedOut.into());
    }
    let check_in_time = record.check_in_time.ok_or(ApiError::NotCheckedIn)?;

    let status = resolve_check_out(now, &window);
    let total = worked_hours(check_in_time, now);
    let overtime = overtime_hours(status, now, &window);

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?, check_out_status = ?, total_hours = ?, overtime_hours = ?
        WHERE id = ? AND check_out_time IS NULL
        "#,
    )
    .bind(now)
    .bind(status.to_string())
    .bind(total)
    .bind(overtime)
    .bind(record.id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        ApiError::Internal
    })?;

    if result.rows_affected() == 0 {
        // A concurrent checkout won the conditional update.
        return Err(ApiError::AlreadyCheckedOut.into());
    }

    let record = fetch_record_for_day(pool.get_ref(), employee_id, window.date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch attendance after check-out");
            ApiError::Internal
        })?
        .ok_or(ApiError::Internal)?;

    tracing::info!(employee_id, date = %window.date, status = %status, "checked out");
    Ok(HttpResponse::Ok().json(record))
}

/// Today's attendance record for the caller
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's record", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No record for today", body = Object, example = json!({
            "message": "attendance record not found",
            "error": "not_found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let date = Utc::now().with_timezone(&config.org_offset()).date_naive();

    let record = fetch_record_for_day(pool.get_ref(), employee_id, date)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to fetch today's attendance");
            ApiError::Internal
        })?;

    match record {
        Some(r) => Ok(HttpResponse::Ok().json(r)),
        None => Err(ApiError::NotFound("attendance record").into()),
    }
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    #[schema(example = 1000)]
    /// Filter by employee ID (HR admin only; employees always see their own)
    pub employee_id: Option<u64>,
    #[schema(example = "2026-03-01")]
    /// Earliest date, inclusive
    pub from: Option<NaiveDate>,
    #[schema(example = "2026-03-31")]
    /// Latest date, inclusive
    pub to: Option<NaiveDate>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Date(NaiveDate),
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<AttendanceRecord>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Attendance history, paginated
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> actix_web::Result<impl Responder> {
    // Employees only ever see their own history
    let scope_employee_id = if auth.is_hr_admin() {
        query.employee_id
    } else {
        Some(auth.employee_id()?)
    };

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);
    let offset = (page - 1) * per_page;

    let mut where_sql = String::from(" WHERE 1=1");
    let mut args: Vec<FilterValue> = Vec::new();

    if let Some(emp_id) = scope_employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }
    if let Some(from) = query.from {
        where_sql.push_str(" AND date >= ?");
        args.push(FilterValue::Date(from));
    }
    if let Some(to) = query.to {
        where_sql.push_str(" AND date <= ?");
        args.push(FilterValue::Date(to));
    }

    let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Date(d) => count_q.bind(*d),
        };
    }

    let total = count_q.fetch_one(pool.get_ref()).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count attendance records");
        ApiError::Internal
    })?;

    let data_sql = format!(
        "SELECT {RECORD_COLUMNS} FROM attendance{} ORDER BY date DESC LIMIT ? OFFSET ?",
        where_sql
    );

    let mut data_q = sqlx::query_as::<_, AttendanceRecord>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Date(d) => data_q.bind(d),
        };
    }

    let records = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch attendance list");
            ApiError::Internal
        })?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data: records,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
