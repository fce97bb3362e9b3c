use crate::auth::extractor::AuthUser;
use crate::domain::anomaly::AnomalyResult;
use crate::domain::events::DomainEvent;
use crate::domain::lifecycle::{self, CheckInOutcome};
use crate::domain::summary::{self, MonthlySummary, month_bounds};
use crate::error::HrmsError;
use crate::model::attendance::{AttendanceRecord, AttendanceType};
use crate::state::AppState;
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CheckInBody {
    /// Defaults to a normal office day.
    #[schema(example = "remote")]
    pub attendance_type: Option<AttendanceType>,
    #[schema(example = "on-site at client", nullable = true)]
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RangeQuery {
    #[schema(example = 1000)]
    /// Filter by employee ID (defaults to the caller's profile)
    pub employee_id: Option<u64>,
    #[schema(example = "2026-01-01", value_type = String, format = "date")]
    pub from: NaiveDate,
    #[schema(example = "2026-01-31", value_type = String, format = "date")]
    pub to: NaiveDate,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct SummaryQuery {
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 1)]
    pub month: u32,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body(content = CheckInBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Checked in successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
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
    state: web::Data<AppState>,
    body: web::Json<CheckInBody>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let now = Local::now().naive_local();

    let existing = state
        .attendance
        .find_by_employee_and_date(employee_id, now.date())
        .await?;

    let body = body.into_inner();
    let outcome = lifecycle::check_in(
        existing.as_ref(),
        employee_id,
        body.attendance_type.unwrap_or(AttendanceType::Normal),
        now,
        body.note,
    );

    match outcome {
        CheckInOutcome::Created(mut record) => {
            record.id = state.attendance.insert(&record).await?;

            let _ = state
                .events
                .publish(
                    "hr.attendance",
                    DomainEvent::AttendanceCheckedIn {
                        employee_id,
                        work_date: record.work_date,
                    },
                )
                .await;

            Ok(HttpResponse::Ok().json(record))
        }
        CheckInOutcome::AlreadyCheckedIn => Ok(HttpResponse::Conflict().json(serde_json::json!({
            "message": "Already checked in today"
        }))),
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    responses(
        (status = 200, description = "Checked out successfully", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "No open check-in for today", body = Object, example = json!({
            "message": "no check-in recorded for this day"
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
    state: web::Data<AppState>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let now = Local::now().naive_local();

    let mut record = state
        .attendance
        .find_by_employee_and_date(employee_id, now.date())
        .await?
        .ok_or(HrmsError::InvalidTransition(
            "no check-in recorded for this day".into(),
        ))?;

    lifecycle::check_out(&mut record, now)?;
    state.attendance.update(&record).await?;

    Ok(HttpResponse::Ok().json(record))
}

/// List attendance records for an employee over a date range
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(RangeQuery),
    responses(
        (status = 200, description = "Attendance records", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_range(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RangeQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(id) => id,
        None => auth.employee_id()?,
    };
    auth.require_self_or_hr(employee_id)?;

    if query.from > query.to {
        return Err(HrmsError::Validation("'from' cannot be after 'to'".into()).into());
    }

    let records = state
        .attendance
        .list_by_employee_in_range(employee_id, query.from, query.to)
        .await?;

    Ok(HttpResponse::Ok().json(records))
}

/// Monthly attendance summary with anomaly counts
#[utoipa::path(
    get,
    path = "/api/v1/attendance/summary/{employee_id}",
    params(
        ("employee_id" = u64, Path, description = "Employee ID"),
        SummaryQuery
    ),
    responses(
        (status = 200, description = "Monthly summary", body = MonthlySummary),
        (status = 400, description = "Invalid year/month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn monthly_summary(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
    query: web::Query<SummaryQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = path.into_inner();
    auth.require_self_or_hr(employee_id)?;

    let (first, last) = month_bounds(query.year, query.month)
        .ok_or(HrmsError::Validation("invalid year/month".into()))?;

    let records = state
        .attendance
        .list_by_employee_in_range(employee_id, first, last)
        .await?;
    let leaves = state
        .leaves
        .list_overlapping(employee_id, first, last)
        .await?;

    let today = Local::now().date_naive();
    let summary = summary::summarize_month(
        &state.policy,
        employee_id,
        query.year,
        query.month,
        records,
        &leaves,
        today,
    )
    .ok_or(HrmsError::Validation("invalid year/month".into()))?;

    Ok(HttpResponse::Ok().json(summary))
}

/// Delete an attendance record (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/attendance/{attendance_id}",
    params(
        ("attendance_id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Successfully deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn delete_record(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let deleted = state.attendance.delete(path.into_inner()).await?;
    if !deleted {
        return Err(HrmsError::NotFound("attendance record").into());
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Successfully deleted"
    })))
}

/// Anomaly classification for a completed attendance day
#[utoipa::path(
    get,
    path = "/api/v1/attendance/{attendance_id}/anomalies",
    params(
        ("attendance_id" = u64, Path, description = "Attendance record ID")
    ),
    responses(
        (status = 200, description = "Anomaly classification", body = AnomalyResult),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Attendance record not found"),
        (status = 409, description = "Day is not complete yet")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn record_anomalies(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let record = state
        .attendance
        .find_by_id(path.into_inner())
        .await?
        .ok_or(HrmsError::NotFound("attendance record"))?;

    auth.require_self_or_hr(record.employee_id)?;

    let (check_in, check_out) = match (record.check_in, record.check_out) {
        (Some(check_in), Some(check_out)) => (check_in, check_out),
        _ => {
            return Err(HrmsError::InvalidTransition(
                "day has no completed check-in/check-out pair".into(),
            )
            .into());
        }
    };

    Ok(HttpResponse::Ok().json(state.policy.evaluate(check_in, check_out)))
}
