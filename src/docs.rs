use crate::api::attendance::{AttendanceFilter, AttendanceListResponse};
use crate::api::leave_balance::{BalanceListResponse, BalanceQuery, BalanceView};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse, RejectLeave};
use crate::domain::leave::{DayType, LeaveStatus, LeaveType};
use crate::domain::status::{CheckInStatus, CheckOutStatus};
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::LeaveRequest;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance & Leave Lifecycle API",
        version = "1.0.0",
        description = r#"
## Attendance & Leave Lifecycle Engine

This API derives daily attendance from shift windows and wall-clock events,
and runs the leave-request approval workflow over a per-year balance ledger.

### 🔹 Key Features
- **Attendance**
  - Daily check-in / check-out with on-time, late, left-early and overtime
    statuses derived at write time
- **Leave Management**
  - Submit, approve, reject and cancel leave requests
  - Per-type annual balance ledger, debited exactly once on approval
- **Notifications**
  - Approval and rejection events are emitted best-effort after commit

### 🔐 Security
All endpoints are protected using **JWT Bearer authentication** issued by the
identity service. Approvals and rejections require the **HR admin** role.

### 📦 Response Format
- JSON-based RESTful responses
- Pagination supported for list endpoints
- Errors carry a stable machine-readable `error` kind next to the message

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::leave_balance::get_balance,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::attendance_list
    ),
    components(
        schemas(
            LeaveType,
            DayType,
            LeaveStatus,
            CheckInStatus,
            CheckOutStatus,
            CreateLeave,
            RejectLeave,
            LeaveFilter,
            LeaveRequest,
            LeaveListResponse,
            BalanceQuery,
            BalanceView,
            BalanceListResponse,
            LeaveBalance,
            AttendanceRecord,
            AttendanceFilter,
            AttendanceListResponse
        )
    ),
    tags(
        (name = "Leave", description = "Leave lifecycle and balance APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
