//! MySQL-backed repositories.
//!
//! Runtime-bound queries (`query_as`/`query_scalar`) against the shared
//! pool; enum columns are stored as lowercase strings and decoded through
//! their `sqlx::Type` derives.

use super::{AttendanceRepository, LeaveRequestRepository, NotificationRepository};
use crate::error::HrmsResult;
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};
use crate::model::notification::Notification;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

#[derive(Clone)]
pub struct MySqlAttendanceRepository {
    pool: MySqlPool,
}

impl MySqlAttendanceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const ATTENDANCE_COLUMNS: &str =
    "id, employee_id, work_date, check_in, check_out, attendance_type, note";

#[async_trait]
impl AttendanceRepository for MySqlAttendanceRepository {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<AttendanceRecord>> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE id = ?");
        let record = sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(record)
    }

    async fn list_all(&self) -> HrmsResult<Vec<AttendanceRecord>> {
        let sql = format!("SELECT {ATTENDANCE_COLUMNS} FROM attendance ORDER BY work_date DESC");
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? ORDER BY work_date DESC"
        );
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_employee_in_range(
        &self,
        employee_id: u64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> HrmsResult<Vec<AttendanceRecord>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance \
             WHERE employee_id = ? AND work_date BETWEEN ? AND ? \
             ORDER BY work_date"
        );
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: u64,
        date: NaiveDate,
    ) -> HrmsResult<Option<AttendanceRecord>> {
        let sql = format!(
            "SELECT {ATTENDANCE_COLUMNS} FROM attendance WHERE employee_id = ? AND work_date = ?"
        );
        Ok(sqlx::query_as::<_, AttendanceRecord>(&sql)
            .bind(employee_id)
            .bind(date)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert(&self, record: &AttendanceRecord) -> HrmsResult<u64> {
        let result = sqlx::query(
            "INSERT INTO attendance \
             (employee_id, work_date, check_in, check_out, attendance_type, note) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(record.employee_id)
        .bind(record.work_date)
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.attendance_type)
        .bind(&record.note)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn update(&self, record: &AttendanceRecord) -> HrmsResult<()> {
        sqlx::query(
            "UPDATE attendance \
             SET check_in = ?, check_out = ?, attendance_type = ?, note = ? \
             WHERE id = ?",
        )
        .bind(record.check_in)
        .bind(record.check_out)
        .bind(record.attendance_type)
        .bind(&record.note)
        .bind(record.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> HrmsResult<bool> {
        let result = sqlx::query("DELETE FROM attendance WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct MySqlLeaveRequestRepository {
    pool: MySqlPool,
}

impl MySqlLeaveRequestRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const LEAVE_COLUMNS: &str = "id, employee_id, leave_type, start_date, end_date, reason, \
     status, approver_id, approved_at, approval_comment, created_at";

#[async_trait]
impl LeaveRequestRepository for MySqlLeaveRequestRepository {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<LeaveRequest>> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?");
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_all(&self) -> HrmsResult<Vec<LeaveRequest>> {
        let sql =
            format!("SELECT {LEAVE_COLUMNS} FROM leave_requests ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_employee(&self, employee_id: u64) -> HrmsResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_by_status(&self, status: LeaveStatus) -> HrmsResult<Vec<LeaveRequest>> {
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE status = ? ORDER BY created_at DESC"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(status)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_overlapping(
        &self,
        employee_id: u64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> HrmsResult<Vec<LeaveRequest>> {
        // ranges overlap when each starts before the other ends
        let sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests \
             WHERE employee_id = ? AND start_date <= ? AND end_date >= ?"
        );
        Ok(sqlx::query_as::<_, LeaveRequest>(&sql)
            .bind(employee_id)
            .bind(end)
            .bind(start)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert(&self, request: &LeaveRequest) -> HrmsResult<u64> {
        let result = sqlx::query(
            "INSERT INTO leave_requests \
             (employee_id, leave_type, start_date, end_date, reason, status, \
              approver_id, approved_at, approval_comment, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(request.employee_id)
        .bind(request.leave_type)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(&request.reason)
        .bind(request.status)
        .bind(request.approver_id)
        .bind(request.approved_at)
        .bind(&request.approval_comment)
        .bind(request.created_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn update(&self, request: &LeaveRequest) -> HrmsResult<()> {
        sqlx::query(
            "UPDATE leave_requests \
             SET status = ?, approver_id = ?, approved_at = ?, approval_comment = ? \
             WHERE id = ?",
        )
        .bind(request.status)
        .bind(request.approver_id)
        .bind(request.approved_at)
        .bind(&request.approval_comment)
        .bind(request.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: u64) -> HrmsResult<bool> {
        let result = sqlx::query("DELETE FROM leave_requests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct MySqlNotificationRepository {
    pool: MySqlPool,
}

impl MySqlNotificationRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const NOTIFICATION_COLUMNS: &str = "id, recipient_email, recipient_name, notification_type, \
     subject, message, status, error, retry_count, created_at, sent_at";

#[async_trait]
impl NotificationRepository for MySqlNotificationRepository {
    async fn find_by_id(&self, id: u64) -> HrmsResult<Option<Notification>> {
        let sql = format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = ?");
        Ok(sqlx::query_as::<_, Notification>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list_all(&self) -> HrmsResult<Vec<Notification>> {
        let sql =
            format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC");
        Ok(sqlx::query_as::<_, Notification>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_pending(&self) -> HrmsResult<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE status = 'pending' ORDER BY created_at"
        );
        Ok(sqlx::query_as::<_, Notification>(&sql)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_recent(&self, limit: u32) -> HrmsResult<Vec<Notification>> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC LIMIT ?"
        );
        Ok(sqlx::query_as::<_, Notification>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn insert(&self, notification: &Notification) -> HrmsResult<u64> {
        let result = sqlx::query(
            "INSERT INTO notifications \
             (recipient_email, recipient_name, notification_type, subject, message, \
              status, error, retry_count, created_at, sent_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notification.recipient_email)
        .bind(&notification.recipient_name)
        .bind(&notification.notification_type)
        .bind(&notification.subject)
        .bind(&notification.message)
        .bind(notification.status)
        .bind(&notification.error)
        .bind(notification.retry_count)
        .bind(notification.created_at)
        .bind(notification.sent_at)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_id())
    }

    async fn update(&self, notification: &Notification) -> HrmsResult<()> {
        sqlx::query(
            "UPDATE notifications \
             SET status = ?, error = ?, retry_count = ?, sent_at = ? \
             WHERE id = ?",
        )
        .bind(notification.status)
        .bind(&notification.error)
        .bind(notification.retry_count)
        .bind(notification.sent_at)
        .bind(notification.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
