use crate::auth::extractor::AuthUser;
use crate::domain::events::DomainEvent;
use crate::domain::lifecycle;
use crate::error::HrmsError;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::Notification;
use crate::state::AppState;
use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-02-02", format = "date", value_type = String)]
    pub start_date: chrono::NaiveDate,
    #[schema(example = "2026-02-06", format = "date", value_type = String)]
    pub end_date: chrono::NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "family trip")]
    pub reason: String,
}

#[derive(Deserialize, ToSchema)]
pub struct DecisionBody {
    #[schema(example = "enjoy", nullable = true)]
    pub comment: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    #[schema(example = 123)]
    /// Filter by employee ID
    pub employee_id: Option<u64>,
    #[schema(example = "pending")]
    /// Filter by leave status
    pub status: Option<LeaveStatus>,
    #[schema(example = 1)]
    /// Pagination page number (start with 1)
    pub page: Option<u64>,
    #[schema(example = 10)]
    /// Pagination per page number
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: u64,
}

/// Queue the decision email for the affected employee. Failure to enqueue is
/// logged, never surfaced: the decision itself already committed.
async fn enqueue_decision_notice(
    state: &AppState,
    pool: &MySqlPool,
    request: &LeaveRequest,
    approved: bool,
) {
    let recipient = sqlx::query_as::<_, (String, String)>(
        "SELECT email, first_name FROM employees WHERE id = ?",
    )
    .bind(request.employee_id)
    .fetch_optional(pool)
    .await;

    let (email, name) = match recipient {
        Ok(Some(row)) => row,
        Ok(None) => {
            tracing::warn!(employee_id = request.employee_id, "No employee row for decision notice");
            return;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up notice recipient");
            return;
        }
    };

    let verdict = if approved { "approved" } else { "rejected" };
    let notification = Notification::new(
        email,
        name,
        "leave_decision",
        format!("Your leave request was {verdict}"),
        format!(
            "{} leave {}..{} was {}.",
            request.leave_type, request.start_date, request.end_date, verdict
        ),
    );

    match state.notifications.insert(&notification).await {
        Ok(id) => {
            let _ = state
                .events
                .publish("hr.notification", DomainEvent::NotificationQueued { notification_id: id })
                .await;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to enqueue decision notice");
        }
    }
}

/// Create leave request
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
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Overlaps an existing request")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateLeave>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.employee_id()?;
    let payload = payload.into_inner();

    let mut request = lifecycle::submit_leave(
        employee_id,
        payload.leave_type,
        payload.start_date,
        payload.end_date,
        payload.reason,
    )?;

    let existing = state
        .leaves
        .list_overlapping(employee_id, request.start_date, request.end_date)
        .await?;
    lifecycle::ensure_no_overlap(request.start_date, request.end_date, &existing)?;

    request.id = state.leaves.insert(&request).await?;

    let _ = state
        .events
        .publish(
            "hr.leave",
            DomainEvent::LeaveSubmitted {
                leave_id: request.id,
                employee_id,
            },
        )
        .await;

    Ok(HttpResponse::Ok().json(request))
}

async fn decide(
    auth: AuthUser,
    state: web::Data<AppState>,
    pool: web::Data<MySqlPool>,
    leave_id: u64,
    comment: Option<String>,
    approved: bool,
) -> actix_web::Result<HttpResponse> {
    auth.require_hr_or_admin()?;

    let mut request = state
        .leaves
        .find_by_id(leave_id)
        .await?
        .ok_or(HrmsError::NotFound("leave request"))?;

    let now = Utc::now();
    if approved {
        lifecycle::approve(&mut request, auth.user_id, now, comment)?;
    } else {
        lifecycle::reject(&mut request, auth.user_id, now, comment)?;
    }

    state.leaves.update(&request).await?;

    let _ = state
        .events
        .publish(
            "hr.leave",
            DomainEvent::LeaveDecided {
                leave_id: request.id,
                employee_id: request.employee_id,
                approved,
            },
        )
        .await;

    enqueue_decision_notice(&state, pool.get_ref(), &request, approved).await;

    Ok(HttpResponse::Ok().json(request))
}

/// Approve leave (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    request_body(content = DecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<DecisionBody>,
) -> actix_web::Result<impl Responder> {
    decide(auth, state, pool, path.into_inner(), body.into_inner().comment, true).await
}

/// Reject leave (HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    request_body(content = DecisionBody, content_type = "application/json"),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already processed")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<DecisionBody>,
) -> actix_web::Result<impl Responder> {
    decide(auth, state, pool, path.into_inner(), body.into_inner().comment, false).await
}

/// Cancel leave (owner, or HR/Admin)
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/cancel",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to cancel")
    ),
    responses(
        (status = 200, description = "Leave cancelled", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request cannot be cancelled")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn cancel_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave_id = path.into_inner();

    let mut request = state
        .leaves
        .find_by_id(leave_id)
        .await?
        .ok_or(HrmsError::NotFound("leave request"))?;

    auth.require_self_or_hr(request.employee_id)?;

    lifecycle::cancel(&mut request)?;
    state.leaves.update(&request).await?;

    Ok(HttpResponse::Ok().json(request))
}

/// Get a leave application's details
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
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let request = state
        .leaves
        .find_by_id(path.into_inner())
        .await?
        .ok_or(HrmsError::NotFound("leave request"))?;

    auth.require_self_or_hr(request.employee_id)?;

    Ok(HttpResponse::Ok().json(request))
}

/// List leave applications
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
    state: web::Data<AppState>,
    query: web::Query<LeaveFilter>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let per_page = query.per_page.unwrap_or(10).min(100);
    let page = query.page.unwrap_or(1).max(1);

    let mut requests = match (query.employee_id, query.status) {
        (Some(employee_id), _) => state.leaves.list_by_employee(employee_id).await?,
        (None, Some(status)) => state.leaves.list_by_status(status).await?,
        (None, None) => state.leaves.list_all().await?,
    };
    if let Some(status) = query.status {
        requests.retain(|r| r.status == status);
    }

    let total = requests.len() as u64;
    let offset = ((page - 1) * per_page) as usize;
    let data: Vec<LeaveRequest> = requests
        .into_iter()
        .skip(offset)
        .take(per_page as usize)
        .collect();

    let response = LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    };

    Ok(HttpResponse::Ok().json(response))
}
