//! Notification delivery: the sender seam and the background dispatch loop.

pub mod dispatch;

use crate::error::HrmsResult;
use async_trait::async_trait;

/// Delivery abstraction the dispatch loop sends through. An SMTP or gateway
/// client implements this in production; tests script it.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> HrmsResult<()>;
}

/// Development sender: writes the message to the log and reports success.
pub struct LogSender;

#[async_trait]
impl NotificationSender for LogSender {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> HrmsResult<()> {
        tracing::info!(recipient, subject, body_len = body.len(), "Delivering notification");
        Ok(())
    }
}
