//! In-memory repositories for tests and local development.

use super::{AttendanceRepository, LeaveRequestRepository, NotificationRepository};
use crate::error::HrmsResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::notification::Notification;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// One store implementing every repository contract, keyed by row id.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    attendance: RwLock<HashMap<u64, AttendanceRecord>>,
    leaves: RwLock<HashMap<u64, LeaveRequest>>,
    notifications: RwLock<HashMap<u64, Notification>>,
    next_id: AtomicU64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Self::default()
        }
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<AttendanceRecord>> {
        Ok(self.attendance.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> HrmsResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self.attendance.read().await.values().cloned().collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.work_date));
        Ok(records)
    }

    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .attendance
            .read()
            .await
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse(r.work_date));
        Ok(records)
    }

    async fn list_by_employee_in_range(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HrmsResult<Vec<AttendanceRecord>> {
        let mut records: Vec<_> = self
            .attendance
            .read()
            .await
            .values()
            .filter(|r| r.employee_id == employee_id && r.work_date >= from && r.work_date <= to)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.work_date);
        Ok(records)
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> HrmsResult<Option<AttendanceRecord>> {
        Ok(self
            .attendance
            .read()
            .await
            .values()
            .find(|r| r.employee_id == employee_id && r.work_date == date)
            .cloned())
    }

    async fn insert(&self, record: &AttendanceRecord) -> HrmsResult<u64> {
        let id = self.allocate_id();
        let mut stored = record.clone();
        stored.id = id;
        self.attendance.write().await.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, record: &AttendanceRecord) -> HrmsResult<()> {
        self.attendance
            .write()
            .await
            .insert(record.id, record.clone());
        Ok(())
    }

    async fn delete(&self, id: u64) -> HrmsResult<bool> {
        Ok(self.attendance.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl LeaveRequestRepository for InMemoryStore {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<LeaveRequest>> {
        Ok(self.leaves.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> HrmsResult<Vec<LeaveRequest>> {
        let mut requests: Vec<_> = self.leaves.read().await.values().cloned().collect();
        requests.sort_by_key(|r| std::cmp::Reverse(r.id));
        Ok(requests)
    }

    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<LeaveRequest>> {
        let mut requests: Vec<_> = self
            .leaves
            .read()
            .await
            .values()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        requests.sort_by_key(|r| std::cmp::Reverse(r.id));
        Ok(requests)
    }

    async fn list_by_status(&self, status: LeaveStatus) -> HrmsResult<Vec<LeaveRequest>> {
        let mut requests: Vec<_> = self
            .leaves
            .read()
            .await
            .values()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        requests.sort_by_key(|r| std::cmp::Reverse(r.id));
        Ok(requests)
    }

    async fn list_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HrmsResult<Vec<LeaveRequest>> {
        Ok(self
            .leaves
            .read()
            .await
            .values()
            .filter(|r| r.employee_id == employee_id && r.overlaps(start, end))
            .cloned()
            .collect())
    }

    async fn insert(&self, request: &LeaveRequest) -> HrmsResult<u64> {
        let id = self.allocate_id();
        let mut stored = request.clone();
        stored.id = id;
        self.leaves.write().await.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, request: &LeaveRequest) -> HrmsResult<()> {
        self.leaves.write().await.insert(request.id, request.clone());
        Ok(())
    }

    async fn delete(&self, id: u64) -> HrmsResult<bool> {
        Ok(self.leaves.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<Notification>> {
        Ok(self.notifications.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> HrmsResult<Vec<Notification>> {
        let mut rows: Vec<_> = self.notifications.read().await.values().cloned().collect();
        rows.sort_by_key(|n| std::cmp::Reverse(n.created_at));
        Ok(rows)
    }

    async fn list_pending(&self) -> HrmsResult<Vec<Notification>> {
        let mut rows: Vec<_> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| n.status == crate::model::notification::NotificationStatus::Pending)
            .cloned()
            .collect();
        rows.sort_by_key(|n| (n.created_at, n.id));
        Ok(rows)
    }

    async fn list_recent(&self, limit: u32) -> HrmsResult<Vec<Notification>> {
        let mut rows: Vec<_> = self.notifications.read().await.values().cloned().collect();
        rows.sort_by_key(|n| std::cmp::Reverse((n.created_at, n.id)));
        rows.truncate(limit as usize);
        Ok(rows)
    }

    async fn insert(&self, notification: &Notification) -> HrmsResult<u64> {
        let id = self.allocate_id();
        let mut stored = notification.clone();
        stored.id = id;
        self.notifications.write().await.insert(id, stored);
        Ok(id)
    }

    async fn update(&self, notification: &Notification) -> HrmsResult<()> {
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceType;
    use crate::model::leave_request::LeaveType;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(employee_id: u64, day: &str) -> AttendanceRecord {
        AttendanceRecord {
            id: 0,
            employee_id,
            work_date: date(day),
            check_in: Some(format!("{day}T09:00:00").parse().unwrap()),
            check_out: None,
            attendance_type: AttendanceType::Normal,
            note: None,
        }
    }

    #[tokio::test]
    async fn attendance_crud_and_day_lookup() {
        let store = InMemoryStore::new();
        let id = AttendanceRepository::insert(&store, &record(7, "2026-01-05"))
            .await
            .unwrap();
        AttendanceRepository::insert(&store, &record(7, "2026-01-06"))
            .await
            .unwrap();
        AttendanceRepository::insert(&store, &record(8, "2026-01-05"))
            .await
            .unwrap();

        let found = AttendanceRepository::find_by_id(&store, id).await.unwrap();
        assert_eq!(found.unwrap().work_date, date("2026-01-05"));

        let day = store
            .find_by_employee_and_date(7, date("2026-01-06"))
            .await
            .unwrap();
        assert!(day.is_some());

        let range = store
            .list_by_employee_in_range(7, date("2026-01-01"), date("2026-01-31"))
            .await
            .unwrap();
        assert_eq!(range.len(), 2);
        assert!(range[0].work_date < range[1].work_date);

        assert!(AttendanceRepository::delete(&store, id).await.unwrap());
        assert!(!AttendanceRepository::delete(&store, id).await.unwrap());
    }

    #[tokio::test]
    async fn overlap_query_is_status_blind() {
        let store = InMemoryStore::new();
        let request = LeaveRequest {
            id: 0,
            employee_id: 7,
            leave_type: LeaveType::Paid,
            start_date: date("2026-02-02"),
            end_date: date("2026-02-06"),
            reason: "r".into(),
            status: LeaveStatus::Rejected,
            approver_id: None,
            approved_at: None,
            approval_comment: None,
            created_at: None,
        };
        LeaveRequestRepository::insert(&store, &request).await.unwrap();

        // the repository returns every overlapping row; filtering by status
        // is the lifecycle's decision
        let hits = store
            .list_overlapping(7, date("2026-02-06"), date("2026-02-10"))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let misses = store
            .list_overlapping(7, date("2026-02-07"), date("2026-02-10"))
            .await
            .unwrap();
        assert!(misses.is_empty());
    }

    #[tokio::test]
    async fn pending_notifications_come_back_oldest_first() {
        let store = InMemoryStore::new();
        let first = Notification::new("a@b.c", "A", "t", "first", "m");
        let mut second = Notification::new("a@b.c", "A", "t", "second", "m");
        second.created_at = first.created_at + chrono::Duration::seconds(5);
        let mut sent = Notification::new("a@b.c", "A", "t", "sent", "m");
        sent.mark_sent(first.created_at);

        // insert out of order
        NotificationRepository::insert(&store, &second).await.unwrap();
        NotificationRepository::insert(&store, &first).await.unwrap();
        NotificationRepository::insert(&store, &sent).await.unwrap();

        let pending = store.list_pending().await.unwrap();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].subject, "first");
        assert_eq!(pending[1].subject, "second");

        let recent = store.list_recent(1).await.unwrap();
        assert_eq!(recent.len(), 1);
    }
}
