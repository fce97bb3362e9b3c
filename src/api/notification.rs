use crate::auth::extractor::AuthUser;
use crate::domain::events::DomainEvent;
use crate::error::HrmsError;
use crate::model::notification::Notification;
use crate::state::AppState;
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateNotification {
    #[schema(example = "jane@company.com", format = "email")]
    pub recipient_email: String,
    #[schema(example = "Jane Doe")]
    pub recipient_name: String,
    #[schema(example = "announcement")]
    pub notification_type: String,
    #[schema(example = "Office closed Friday")]
    pub subject: String,
    #[schema(example = "The office is closed this Friday for maintenance.")]
    pub message: String,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RecentQuery {
    #[schema(example = 20)]
    pub limit: Option<u32>,
}

/// Queue a notification for delivery
#[utoipa::path(
    post,
    path = "/api/v1/notification",
    request_body = CreateNotification,
    responses(
        (status = 201, description = "Notification queued", body = Notification),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn create_notification(
    auth: AuthUser,
    state: web::Data<AppState>,
    payload: web::Json<CreateNotification>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let payload = payload.into_inner();
    if payload.recipient_email.trim().is_empty() || payload.subject.trim().is_empty() {
        return Err(
            HrmsError::Validation("recipient_email and subject are required".into()).into(),
        );
    }

    let mut notification = Notification::new(
        payload.recipient_email,
        payload.recipient_name,
        payload.notification_type,
        payload.subject,
        payload.message,
    );
    notification.id = state.notifications.insert(&notification).await?;

    let _ = state
        .events
        .publish(
            "hr.notification",
            DomainEvent::NotificationQueued {
                notification_id: notification.id,
            },
        )
        .await;

    Ok(HttpResponse::Created().json(notification))
}

/// Most recent notifications, newest first
#[utoipa::path(
    get,
    path = "/api/v1/notification",
    params(RecentQuery),
    responses(
        (status = 200, description = "Recent notifications", body = [Notification]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn recent_notifications(
    auth: AuthUser,
    state: web::Data<AppState>,
    query: web::Query<RecentQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let limit = query.limit.unwrap_or(20).min(100);
    let rows = state.notifications.list_recent(limit).await?;

    Ok(HttpResponse::Ok().json(rows))
}

/// Get a notification by ID
#[utoipa::path(
    get,
    path = "/api/v1/notification/{notification_id}",
    params(
        ("notification_id" = u64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification found", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notification not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn get_notification(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let notification = state
        .notifications
        .find_by_id(path.into_inner())
        .await?
        .ok_or(HrmsError::NotFound("notification"))?;

    Ok(HttpResponse::Ok().json(notification))
}

/// Reset a failed notification so the dispatcher retries it
#[utoipa::path(
    post,
    path = "/api/v1/notification/{notification_id}/retry",
    params(
        ("notification_id" = u64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification re-queued", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Notification not found"),
        (status = 409, description = "Notification is not in Failed state")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Notification"
)]
pub async fn retry_notification(
    auth: AuthUser,
    state: web::Data<AppState>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let mut notification = state
        .notifications
        .find_by_id(path.into_inner())
        .await?
        .ok_or(HrmsError::NotFound("notification"))?;

    if !notification.reset_for_retry() {
        return Err(HrmsError::InvalidTransition(format!(
            "only failed notifications can be retried (status: {})",
            notification.status
        ))
        .into());
    }

    state.notifications.update(&notification).await?;

    Ok(HttpResponse::Ok().json(notification))
}
