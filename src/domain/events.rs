//! Fire-and-forget domain events.
//!
//! Handlers publish onto a named channel; nothing in the core assumes a
//! delivery guarantee. The in-process implementation fans out over a tokio
//! broadcast channel so interested tasks (currently the event log) can
//! subscribe.

use crate::error::HrmsResult;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::broadcast;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    EmployeeCreated {
        employee_id: u64,
        email: String,
    },
    AttendanceCheckedIn {
        employee_id: u64,
        work_date: NaiveDate,
    },
    LeaveSubmitted {
        leave_id: u64,
        employee_id: u64,
    },
    LeaveDecided {
        leave_id: u64,
        employee_id: u64,
        approved: bool,
    },
    NotificationQueued {
        notification_id: u64,
    },
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish an event on a named channel. Best effort: implementations
    /// must not fail the caller when nobody is listening.
    async fn publish(&self, channel: &str, event: DomainEvent) -> HrmsResult<()>;
}

/// In-process publisher over a tokio broadcast channel.
pub struct BroadcastPublisher {
    tx: broadcast::Sender<(String, DomainEvent)>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<(String, DomainEvent)> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, channel: &str, event: DomainEvent) -> HrmsResult<()> {
        // SendError just means no receiver is currently subscribed.
        let _ = self.tx.send((channel.to_string(), event));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_without_subscribers_is_not_an_error() {
        let publisher = BroadcastPublisher::new(8);
        publisher
            .publish(
                "hr.employee",
                DomainEvent::EmployeeCreated {
                    employee_id: 1,
                    email: "a@b.c".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let publisher = BroadcastPublisher::new(8);
        let mut rx = publisher.subscribe();
        publisher
            .publish(
                "hr.leave",
                DomainEvent::LeaveDecided {
                    leave_id: 5,
                    employee_id: 9,
                    approved: true,
                },
            )
            .await
            .unwrap();

        let (channel, event) = rx.recv().await.unwrap();
        assert_eq!(channel, "hr.leave");
        assert!(matches!(
            event,
            DomainEvent::LeaveDecided { leave_id: 5, approved: true, .. }
        ));
    }
}
