use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// An outbox row: created by domain events, drained by the dispatch loop.
///
/// Only the dispatch loop moves a row to Sent/Failed; the one mutation exposed
/// to API consumers besides creation is `reset_for_retry`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "recipient_email": "jane@company.com",
    "recipient_name": "Jane Doe",
    "notification_type": "leave_decision",
    "subject": "Your leave request was approved",
    "message": "Paid leave 2026-02-02..2026-02-06 approved.",
    "status": "pending",
    "error": null,
    "retry_count": 0,
    "created_at": "2026-01-21T09:12:05Z",
    "sent_at": null
}))]
pub struct Notification {
    #[schema(example = 3)]
    pub id: u64,

    #[schema(example = "jane@company.com")]
    pub recipient_email: String,

    #[schema(example = "Jane Doe")]
    pub recipient_name: String,

    /// Free-form tag describing the triggering event.
    #[schema(example = "leave_decision")]
    pub notification_type: String,

    #[schema(example = "Your leave request was approved")]
    pub subject: String,

    #[schema(example = "Paid leave 2026-02-02..2026-02-06 approved.")]
    pub message: String,

    #[schema(example = "pending")]
    pub status: NotificationStatus,

    #[schema(example = "connection refused", nullable = true)]
    pub error: Option<String>,

    #[schema(example = 0)]
    pub retry_count: u32,

    #[schema(example = "2026-01-21T09:12:05Z", value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,

    #[schema(example = "2026-01-21T09:12:15Z", value_type = String, format = "date-time", nullable = true)]
    pub sent_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(
        recipient_email: impl Into<String>,
        recipient_name: impl Into<String>,
        notification_type: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: 0,
            recipient_email: recipient_email.into(),
            recipient_name: recipient_name.into(),
            notification_type: notification_type.into(),
            subject: subject.into(),
            message: message.into(),
            status: NotificationStatus::Pending,
            error: None,
            retry_count: 0,
            created_at: Utc::now(),
            sent_at: None,
        }
    }

    pub fn mark_sent(&mut self, at: DateTime<Utc>) {
        self.status = NotificationStatus::Sent;
        self.sent_at = Some(at);
        self.error = None;
    }

    /// A failed row stays Failed until an operator resets it; it is not
    /// re-queued automatically.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = NotificationStatus::Failed;
        self.error = Some(error.into());
        self.retry_count += 1;
    }

    /// Flip a Failed row back to Pending for another dispatch pass.
    pub fn reset_for_retry(&mut self) -> bool {
        if self.status != NotificationStatus::Failed {
            return false;
        }
        self.status = NotificationStatus::Pending;
        self.error = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_increments_retry_count_and_keeps_error() {
        let mut n = Notification::new("a@b.c", "A", "test", "s", "m");
        n.mark_failed("smtp timeout");
        assert_eq!(n.status, NotificationStatus::Failed);
        assert_eq!(n.retry_count, 1);
        assert_eq!(n.error.as_deref(), Some("smtp timeout"));

        assert!(n.reset_for_retry());
        assert_eq!(n.status, NotificationStatus::Pending);
        assert_eq!(n.error, None);
        // history is kept
        assert_eq!(n.retry_count, 1);
    }

    #[test]
    fn only_failed_rows_can_be_reset() {
        let mut n = Notification::new("a@b.c", "A", "test", "s", "m");
        assert!(!n.reset_for_retry());

        n.mark_sent(Utc::now());
        assert!(!n.reset_for_retry());
        assert_eq!(n.status, NotificationStatus::Sent);
    }
}
