use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LeaveType {
    Paid,
    Sick,
    Special,
    Unpaid,
}

/// Lifecycle status of a leave request.
///
/// `Pending -> Approved | Rejected | Cancelled`, `Approved -> Cancelled`;
/// `Rejected` and `Cancelled` are terminal. Transitions live in
/// `domain::lifecycle`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    /// Pending and Approved requests reserve their date range; Rejected and
    /// Cancelled ones never block a new submission.
    pub fn blocks_new_requests(&self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 12,
    "employee_id": 1000,
    "leave_type": "paid",
    "start_date": "2026-02-02",
    "end_date": "2026-02-06",
    "reason": "family trip",
    "status": "pending",
    "approver_id": null,
    "approved_at": null,
    "approval_comment": null,
    "created_at": "2026-01-20T10:00:00Z"
}))]
pub struct LeaveRequest {
    #[schema(example = 12)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "paid")]
    pub leave_type: LeaveType,

    #[schema(example = "2026-02-02", value_type = String, format = "date")]
    pub start_date: NaiveDate,

    /// Inclusive end date.
    #[schema(example = "2026-02-06", value_type = String, format = "date")]
    pub end_date: NaiveDate,

    #[schema(example = "family trip")]
    pub reason: String,

    #[schema(example = "pending")]
    pub status: LeaveStatus,

    #[schema(example = 2, nullable = true)]
    pub approver_id: Option<u64>,

    #[schema(example = "2026-01-21T09:12:00Z", value_type = String, format = "date-time", nullable = true)]
    pub approved_at: Option<DateTime<Utc>>,

    #[schema(example = "enjoy", nullable = true)]
    pub approval_comment: Option<String>,

    #[schema(example = "2026-01-20T10:00:00Z", value_type = String, format = "date-time", nullable = true)]
    pub created_at: Option<DateTime<Utc>>,
}

impl LeaveRequest {
    /// Inclusive day span of the request.
    pub fn day_count(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Two ranges overlap when they share at least one calendar day.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start_date <= end && start <= self.end_date
    }

    /// True when the request covers the given day.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn request(start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_id: 1,
            leave_type: LeaveType::Paid,
            start_date: date(start),
            end_date: date(end),
            reason: "r".into(),
            status: LeaveStatus::Pending,
            approver_id: None,
            approved_at: None,
            approval_comment: None,
            created_at: None,
        }
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(request("2025-01-10", "2025-01-10").day_count(), 1);
        assert_eq!(request("2025-01-10", "2025-01-15").day_count(), 6);
    }

    #[test]
    fn overlap_shares_at_least_one_day() {
        let existing = request("2025-01-12", "2025-01-20");
        assert!(existing.overlaps(date("2025-01-10"), date("2025-01-15")));
        assert!(existing.overlaps(date("2025-01-20"), date("2025-01-25")));
        assert!(!existing.overlaps(date("2025-01-21"), date("2025-01-25")));
        assert!(!existing.overlaps(date("2025-01-01"), date("2025-01-11")));
    }

    #[test]
    fn terminal_statuses_do_not_block() {
        assert!(LeaveStatus::Pending.blocks_new_requests());
        assert!(LeaveStatus::Approved.blocks_new_requests());
        assert!(!LeaveStatus::Rejected.blocks_new_requests());
        assert!(!LeaveStatus::Cancelled.blocks_new_requests());
    }
}
