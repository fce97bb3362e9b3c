//! Monthly attendance aggregation.
//!
//! A single fold over one employee's records and leave requests for one
//! calendar month. Deterministic: the current date is an explicit parameter,
//! so re-running over the same inputs always yields the same summary.

use crate::domain::anomaly::WorkPolicy;
use crate::model::attendance::AttendanceRecord;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use chrono::{Months, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthlySummary {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = 1)]
    pub month: u32,
    /// Days with both a check-in and a check-out.
    #[schema(example = 20)]
    pub total_work_days: u32,
    #[schema(example = 164.5)]
    pub total_work_hours: f64,
    #[schema(example = 8.22)]
    pub average_work_hours: f64,
    #[schema(example = 2)]
    pub late_days: u32,
    /// Calendar days up to `today` with neither a record nor approved leave.
    #[schema(example = 1)]
    pub absent_days: u32,
    /// Approved paid-leave days falling inside the month.
    #[schema(example = 3)]
    pub paid_leave_days: u32,
    pub records: Vec<AttendanceRecord>,
}

/// First and (inclusive) last day of a calendar month. `None` for an invalid
/// year/month pair.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = first.checked_add_months(Months::new(1))?.pred_opt()?;
    Some((first, last))
}

/// Fold attendance records and leave requests into a [`MonthlySummary`].
///
/// `records` must already be restricted to the employee and month;
/// `leaves` to requests whose range overlaps the month. Records without a
/// check-in are skipped from work-day counting, never rejected. Absent days
/// are only counted up to `today`, so an in-progress month does not report
/// the future as absence.
pub fn summarize_month(
    policy: &WorkPolicy,
    employee_id: u64,
    year: i32,
    month: u32,
    records: Vec<AttendanceRecord>,
    leaves: &[LeaveRequest],
    today: NaiveDate,
) -> Option<MonthlySummary> {
    let (first, last) = month_bounds(year, month)?;

    let mut total_work_days = 0u32;
    let mut total_work_hours = 0f64;
    let mut late_days = 0u32;

    for record in &records {
        if let Some(hours) = record.work_hours() {
            total_work_days += 1;
            total_work_hours += hours;
        }
        if let Some(check_in) = record.check_in {
            if policy.is_late_arrival(check_in) {
                late_days += 1;
            }
        }
    }

    let average_work_hours = if total_work_days == 0 {
        0.0
    } else {
        total_work_hours / total_work_days as f64
    };

    let approved: Vec<&LeaveRequest> = leaves
        .iter()
        .filter(|l| l.status == LeaveStatus::Approved)
        .collect();

    // Absence scan stops at today for the in-progress month.
    let horizon = last.min(today);
    let mut absent_days = 0u32;
    let mut day = first;
    while day <= horizon {
        let has_record = records.iter().any(|r| r.work_date == day);
        let on_leave = approved.iter().any(|l| l.covers(day));
        if !has_record && !on_leave {
            absent_days += 1;
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    let paid_leave_days = approved
        .iter()
        .filter(|l| l.leave_type == LeaveType::Paid)
        .map(|l| {
            let start = l.start_date.max(first);
            let end = l.end_date.min(last);
            if start > end {
                0
            } else {
                (end - start).num_days() as u32 + 1
            }
        })
        .sum();

    Some(MonthlySummary {
        employee_id,
        year,
        month,
        total_work_days,
        total_work_hours,
        average_work_hours,
        late_days,
        absent_days,
        paid_leave_days,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceType;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(id: u64, day: &str, check_in: Option<&str>, check_out: Option<&str>) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: 1000,
            work_date: date(day),
            check_in: check_in.map(|s| s.parse().unwrap()),
            check_out: check_out.map(|s| s.parse().unwrap()),
            attendance_type: AttendanceType::Normal,
            note: None,
        }
    }

    fn leave(leave_type: LeaveType, status: LeaveStatus, start: &str, end: &str) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_id: 1000,
            leave_type,
            start_date: date(start),
            end_date: date(end),
            reason: String::new(),
            status,
            approver_id: None,
            approved_at: None,
            approval_comment: None,
            created_at: None,
        }
    }

    #[test]
    fn month_bounds_handle_length_and_leap_years() {
        assert_eq!(
            month_bounds(2026, 1),
            Some((date("2026-01-01"), date("2026-01-31")))
        );
        assert_eq!(
            month_bounds(2024, 2),
            Some((date("2024-02-01"), date("2024-02-29")))
        );
        assert_eq!(month_bounds(2026, 13), None);
    }

    #[test]
    fn totals_count_only_completed_days() {
        let records = vec![
            record(1, "2026-01-05", Some("2026-01-05T09:00:00"), Some("2026-01-05T17:00:00")),
            record(2, "2026-01-06", Some("2026-01-06T09:30:00"), Some("2026-01-06T17:30:00")),
            // open day: counted for lateness, not for work hours
            record(3, "2026-01-07", Some("2026-01-07T10:00:00"), None),
            // malformed row with no check-in at all: silently skipped
            record(4, "2026-01-08", None, None),
        ];
        let summary = summarize_month(
            &WorkPolicy::default(),
            1000,
            2026,
            1,
            records,
            &[],
            date("2026-03-01"),
        )
        .unwrap();

        assert_eq!(summary.total_work_days, 2);
        assert_eq!(summary.total_work_hours, 16.0);
        assert_eq!(summary.average_work_hours, 8.0);
        assert_eq!(summary.late_days, 2);
    }

    #[test]
    fn no_work_days_yields_zero_average() {
        let summary = summarize_month(
            &WorkPolicy::default(),
            1000,
            2026,
            1,
            vec![],
            &[],
            date("2025-12-01"),
        )
        .unwrap();
        assert_eq!(summary.total_work_days, 0);
        assert_eq!(summary.average_work_hours, 0.0);
        // today precedes the month: nothing can be absent yet
        assert_eq!(summary.absent_days, 0);
    }

    #[test]
    fn absent_days_cap_at_today_and_respect_approved_leave() {
        let records = vec![
            record(1, "2026-01-01", Some("2026-01-01T09:00:00"), Some("2026-01-01T17:00:00")),
            record(2, "2026-01-02", Some("2026-01-02T09:00:00"), Some("2026-01-02T17:00:00")),
        ];
        let leaves = vec![
            leave(LeaveType::Sick, LeaveStatus::Approved, "2026-01-03", "2026-01-04"),
            // pending leave does not excuse absence
            leave(LeaveType::Paid, LeaveStatus::Pending, "2026-01-05", "2026-01-05"),
        ];
        let summary = summarize_month(
            &WorkPolicy::default(),
            1000,
            2026,
            1,
            records,
            &leaves,
            date("2026-01-06"),
        )
        .unwrap();
        // Jan 1-2 worked, 3-4 on approved leave, 5-6 absent; 7+ is the future.
        assert_eq!(summary.absent_days, 2);
    }

    #[test]
    fn paid_leave_days_are_clipped_to_the_month() {
        let leaves = vec![
            // spills into February: only Jan 28-31 count
            leave(LeaveType::Paid, LeaveStatus::Approved, "2026-01-28", "2026-02-03"),
            // sick leave excuses absence but is not paid leave
            leave(LeaveType::Sick, LeaveStatus::Approved, "2026-01-05", "2026-01-06"),
            // rejected paid leave counts for nothing
            leave(LeaveType::Paid, LeaveStatus::Rejected, "2026-01-10", "2026-01-12"),
        ];
        let summary = summarize_month(
            &WorkPolicy::default(),
            1000,
            2026,
            1,
            vec![],
            &leaves,
            date("2026-03-01"),
        )
        .unwrap();
        assert_eq!(summary.paid_leave_days, 4);
        // 31 days - 4 paid leave - 2 sick leave
        assert_eq!(summary.absent_days, 25);
    }

    #[test]
    fn summary_is_deterministic_over_the_same_inputs() {
        let records = vec![record(
            1,
            "2026-01-05",
            Some("2026-01-05T09:10:00"),
            Some("2026-01-05T19:20:00"),
        )];
        let leaves = vec![leave(
            LeaveType::Paid,
            LeaveStatus::Approved,
            "2026-01-12",
            "2026-01-14",
        )];
        let today = date("2026-02-01");

        let a = summarize_month(
            &WorkPolicy::default(), 1000, 2026, 1, records.clone(), &leaves, today,
        )
        .unwrap();
        let b = summarize_month(
            &WorkPolicy::default(), 1000, 2026, 1, records, &leaves, today,
        )
        .unwrap();

        assert_eq!(a.total_work_days, b.total_work_days);
        assert_eq!(a.total_work_hours, b.total_work_hours);
        assert_eq!(a.late_days, b.late_days);
        assert_eq!(a.absent_days, b.absent_days);
        assert_eq!(a.paid_leave_days, b.paid_leave_days);
    }
}
