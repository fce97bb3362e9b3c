//! Background dispatch loop for the notification outbox.
//!
//! One long-lived task per service instance. Each pass drains the Pending
//! rows oldest-first through the injected sender; a failing row is marked
//! Failed (with the error text and a bumped retry count) and the pass moves
//! on. Failed rows are not re-queued automatically — `reset_for_retry` on
//! the API is the operator's path back to Pending.

use crate::notifier::NotificationSender;
use crate::repo::NotificationRepository;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub struct NotificationDispatcher {
    repo: Arc<dyn NotificationRepository>,
    sender: Arc<dyn NotificationSender>,
    interval: Duration,
}

#[derive(Debug, Default, PartialEq)]
pub struct DispatchStats {
    pub sent: usize,
    pub failed: usize,
}

impl NotificationDispatcher {
    pub fn new(
        repo: Arc<dyn NotificationRepository>,
        sender: Arc<dyn NotificationSender>,
        interval: Duration,
    ) -> Self {
        Self {
            repo,
            sender,
            interval,
        }
    }

    /// Run until the shutdown signal flips. The sleep between passes is part
    /// of the select, so shutdown is prompt. Pass-level errors are logged
    /// and swallowed; the loop itself never gives up.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Notification dispatcher started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(stats) if stats.sent + stats.failed > 0 => {
                            tracing::info!(sent = stats.sent, failed = stats.failed, "Dispatch pass finished");
                        }
                        Ok(_) => {}
                        Err(e) => {
                            tracing::error!(error = %e, "Dispatch pass failed");
                        }
                    }
                }
                changed = shutdown.changed() => {
                    // a dropped sender also means shutdown
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Notification dispatcher stopped");
    }

    /// One pass over the Pending rows. A failure on one row never aborts
    /// the rest of the batch.
    pub async fn run_once(&self) -> anyhow::Result<DispatchStats> {
        let pending = self.repo.list_pending().await?;
        let mut stats = DispatchStats::default();

        for mut notification in pending {
            let outcome = self
                .sender
                .send(
                    &notification.recipient_email,
                    &notification.subject,
                    &notification.message,
                )
                .await;

            match outcome {
                Ok(()) => {
                    notification.mark_sent(Utc::now());
                    stats.sent += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        notification_id = notification.id,
                        recipient = %notification.recipient_email,
                        error = %e,
                        "Notification delivery failed"
                    );
                    notification.mark_failed(e.to_string());
                    stats.failed += 1;
                }
            }

            if let Err(e) = self.repo.update(&notification).await {
                tracing::error!(
                    notification_id = notification.id,
                    error = %e,
                    "Failed to persist notification status"
                );
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HrmsError;
    use crate::model::notification::{Notification, NotificationStatus};
    use crate::notifier::NotificationSender;
    use crate::repo::memory::InMemoryStore;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;

    /// Fails for subjects listed at construction, succeeds otherwise.
    struct ScriptedSender {
        fail_subjects: Vec<&'static str>,
    }

    #[async_trait]
    impl NotificationSender for ScriptedSender {
        async fn send(&self, _recipient: &str, subject: &str, _body: &str) -> Result<(), HrmsError> {
            if self.fail_subjects.contains(&subject) {
                Err(HrmsError::Delivery("smtp connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    async fn seed(store: &InMemoryStore, subjects: &[&str]) {
        let base = Utc::now();
        for (i, subject) in subjects.iter().enumerate() {
            let mut n = Notification::new("user@company.com", "User", "test", *subject, "body");
            n.created_at = base + ChronoDuration::seconds(i as i64);
            NotificationRepository::insert(store, &n).await.unwrap();
        }
    }

    #[tokio::test]
    async fn one_failure_does_not_abort_the_batch() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, &["n1", "n2", "n3"]).await;

        let dispatcher = NotificationDispatcher::new(
            store.clone(),
            Arc::new(ScriptedSender { fail_subjects: vec!["n2"] }),
            Duration::from_secs(10),
        );

        let stats = dispatcher.run_once().await.unwrap();
        assert_eq!(stats, DispatchStats { sent: 2, failed: 1 });

        let all = NotificationRepository::list_all(store.as_ref()).await.unwrap();
        let by_subject = |s: &str| all.iter().find(|n| n.subject == s).unwrap();

        assert_eq!(by_subject("n1").status, NotificationStatus::Sent);
        assert!(by_subject("n1").sent_at.is_some());
        assert_eq!(by_subject("n3").status, NotificationStatus::Sent);

        let failed = by_subject("n2");
        assert_eq!(failed.status, NotificationStatus::Failed);
        assert_eq!(failed.retry_count, 1);
        assert!(failed.error.as_deref().unwrap().contains("refused"));

        // nothing left to pick up until an operator resets the failed row
        assert!(store.list_pending().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reset_row_is_picked_up_by_the_next_pass() {
        let store = Arc::new(InMemoryStore::new());
        seed(&store, &["flaky"]).await;

        let failing = NotificationDispatcher::new(
            store.clone(),
            Arc::new(ScriptedSender { fail_subjects: vec!["flaky"] }),
            Duration::from_secs(10),
        );
        failing.run_once().await.unwrap();

        let mut row = NotificationRepository::list_all(store.as_ref()).await.unwrap().remove(0);
        assert_eq!(row.status, NotificationStatus::Failed);
        assert!(row.reset_for_retry());
        NotificationRepository::update(store.as_ref(), &row).await.unwrap();

        let succeeding = NotificationDispatcher::new(
            store.clone(),
            Arc::new(ScriptedSender { fail_subjects: vec![] }),
            Duration::from_secs(10),
        );
        let stats = succeeding.run_once().await.unwrap();
        assert_eq!(stats, DispatchStats { sent: 1, failed: 0 });

        let row = NotificationRepository::list_all(store.as_ref()).await.unwrap().remove(0);
        assert_eq!(row.status, NotificationStatus::Sent);
        assert_eq!(row.retry_count, 1);
    }

    #[tokio::test]
    async fn shutdown_stops_the_loop_promptly() {
        let store = Arc::new(InMemoryStore::new());
        let dispatcher = NotificationDispatcher::new(
            store,
            Arc::new(ScriptedSender { fail_subjects: vec![] }),
            // long interval: only a working shutdown lets the test finish
            Duration::from_secs(3600),
        );

        let (tx, rx) = watch::channel(false);
        let handle = tokio::spawn(dispatcher.run(rx));

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatcher did not stop on shutdown signal")
            .unwrap();
    }
}
