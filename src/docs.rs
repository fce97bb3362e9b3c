use crate::api::attendance::{CheckInBody, RangeQuery, SummaryQuery};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::leave_request::{CreateLeave, DecisionBody, LeaveFilter, LeaveListResponse};
use crate::api::notification::{CreateNotification, RecentQuery};
use crate::domain::anomaly::AnomalyResult;
use crate::domain::summary::MonthlySummary;
use crate::model::attendance::{AttendanceRecord, AttendanceType};
use crate::model::department::Department;
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::{Notification, NotificationStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS API",
        version = "1.0.0",
        description = r#"
## Human Resource Management System

Core HR operations for one organization: employee records, daily attendance
with anomaly detection, leave requests, and outbound notifications.

### Key features
- **Employee Management** — create, update, list, and view employee profiles
- **Attendance** — daily check-in/check-out, range queries, and monthly
  summaries with late/absence/overtime counts
- **Leave Management** — apply, approve/reject with a comment, cancel, and
  overlap protection
- **Notifications** — an outbox drained by a background dispatcher, with
  per-row retry bookkeeping

### Security
Most endpoints are protected with **JWT Bearer authentication**; sensitive
operations require the **Admin** or **HR** role.

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

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::list_range,
        crate::api::attendance::monthly_summary,
        crate::api::attendance::record_anomalies,
        crate::api::attendance::delete_record,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,
        crate::api::employee::list_departments,

        crate::api::notification::create_notification,
        crate::api::notification::recent_notifications,
        crate::api::notification::get_notification,
        crate::api::notification::retry_notification
    ),
    components(
        schemas(
            LeaveFilter,
            LeaveListResponse,
            CreateLeave,
            DecisionBody,
            LeaveRequest,
            LeaveType,
            LeaveStatus,
            CreateEmployee,
            EmployeeQuery,
            Employee,
            Department,
            EmployeeListResponse,
            AttendanceRecord,
            AttendanceType,
            CheckInBody,
            RangeQuery,
            SummaryQuery,
            MonthlySummary,
            AnomalyResult,
            Notification,
            NotificationStatus,
            CreateNotification,
            RecentQuery
        )
    ),
    tags(
        (name = "Leave", description = "Leave management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Notification", description = "Notification outbox APIs"),
    )
)]
pub struct ApiDoc;
