//! Repository contracts for the attendance/leave/notification core.
//!
//! The domain logic is written against these traits; `mysql` backs the
//! running service, `memory` backs the tests. All operations are async and
//! cancel with their future (dropping a call aborts the underlying I/O).

pub mod memory;
pub mod mysql;

use crate::error::HrmsResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::notification::Notification;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<AttendanceRecord>>;
    async fn list_all(&self) -> HrmsResult<Vec<AttendanceRecord>>;
    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<AttendanceRecord>>;
    /// Records whose work date falls inside `[from, to]`, ordered by date.
    async fn list_by_employee_in_range(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HrmsResult<Vec<AttendanceRecord>>;
    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> HrmsResult<Option<AttendanceRecord>>;
    /// Returns the new row id.
    async fn insert(&self, record: &AttendanceRecord) -> HrmsResult<u64>;
    async fn update(&self, record: &AttendanceRecord) -> HrmsResult<()>;
    async fn delete(&self, id: u64) -> HrmsResult<bool>;
}

#[async_trait]
pub trait LeaveRequestRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<LeaveRequest>>;
    async fn list_all(&self) -> HrmsResult<Vec<LeaveRequest>>;
    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<LeaveRequest>>;
    async fn list_by_status(&self, status: LeaveStatus) -> HrmsResult<Vec<LeaveRequest>>;
    /// Requests for the employee whose range shares at least one day with
    /// `[start, end]`, regardless of status.
    async fn list_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HrmsResult<Vec<LeaveRequest>>;
    async fn insert(&self, request: &LeaveRequest) -> HrmsResult<u64>;
    async fn update(&self, request: &LeaveRequest) -> HrmsResult<()>;
    async fn delete(&self, id: u64) -> HrmsResult<bool>;
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<Notification>>;
    async fn list_all(&self) -> HrmsResult<Vec<Notification>>;
    /// Pending rows, oldest first — the dispatch order.
    async fn list_pending(&self) -> HrmsResult<Vec<Notification>>;
    /// The `limit` most recent rows, newest first.
    async fn list_recent(&self, limit: u32) -> HrmsResult<Vec<Notification>>;
    async fn insert(&self, notification: &Notification) -> HrmsResult<u64>;
    async fn update(&self, notification: &Notification) -> HrmsResult<()>;
}
