//! State transitions for attendance days and leave requests.
//!
//! Pure functions over already-fetched state; the API layer supplies the
//! rows and persists the outcome. Day lifecycle: `NoRecord -> CheckedIn ->
//! CheckedOut`. Leave lifecycle: `Pending -> Approved | Rejected | Cancelled`,
//! `Approved -> Cancelled`.

use crate::error::{HrmsError, HrmsResult};
use crate::model::attendance::{AttendanceRecord, AttendanceType};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Result of attempting a check-in, modeled as a tagged outcome rather than
/// an error: "already checked in" is an expected answer, not a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckInOutcome {
    /// No record existed for the day; this one should be inserted.
    Created(AttendanceRecord),
    /// A record already exists for the (employee, work date) pair.
    AlreadyCheckedIn,
}

/// Open a day record on first check-in. Any existing record for the day
/// rejects the attempt; the day key is unique.
pub fn check_in(
    existing: Option<&AttendanceRecord>,
    employee_id: u64,
    attendance_type: AttendanceType,
    at: NaiveDateTime,
    note: Option<String>,
) -> CheckInOutcome {
    if existing.is_some() {
        return CheckInOutcome::AlreadyCheckedIn;
    }
    CheckInOutcome::Created(AttendanceRecord {
        id: 0,
        employee_id,
        work_date: at.date(),
        check_in: Some(at),
        check_out: None,
        attendance_type,
        note,
    })
}

/// Record a check-out against the day's open record.
pub fn check_out(record: &mut AttendanceRecord, at: NaiveDateTime) -> HrmsResult<()> {
    let Some(check_in) = record.check_in else {
        return Err(HrmsError::InvalidTransition(
            "no check-in recorded for this day".into(),
        ));
    };
    if record.check_out.is_some() {
        return Err(HrmsError::InvalidTransition(
            "already checked out for this day".into(),
        ));
    }
    if at < check_in {
        return Err(HrmsError::InvalidTransition(
            "check-out cannot precede check-in".into(),
        ));
    }
    record.check_out = Some(at);
    Ok(())
}

/// Build a new Pending leave request, validating the date span.
pub fn submit_leave(
    employee_id: u64,
    leave_type: LeaveType,
    start_date: NaiveDate,
    end_date: NaiveDate,
    reason: String,
) -> HrmsResult<LeaveRequest> {
    if end_date < start_date {
        return Err(HrmsError::Validation(
            "end_date cannot precede start_date".into(),
        ));
    }
    Ok(LeaveRequest {
        id: 0,
        employee_id,
        leave_type,
        start_date,
        end_date,
        reason,
        status: LeaveStatus::Pending,
        approver_id: None,
        approved_at: None,
        approval_comment: None,
        created_at: Some(Utc::now()),
    })
}

/// Reject the submission when its range shares a day with any existing
/// Pending or Approved request. Rejected/Cancelled history never blocks.
pub fn ensure_no_overlap(
    start_date: NaiveDate,
    end_date: NaiveDate,
    existing: &[LeaveRequest],
) -> HrmsResult<()> {
    for other in existing {
        if other.status.blocks_new_requests() && other.overlaps(start_date, end_date) {
            return Err(HrmsError::Conflict(format!(
                "overlaps {} leave request #{} ({}..{})",
                other.status, other.id, other.start_date, other.end_date
            )));
        }
    }
    Ok(())
}

fn require_pending(request: &LeaveRequest, action: &str) -> HrmsResult<()> {
    if request.status != LeaveStatus::Pending {
        return Err(HrmsError::InvalidTransition(format!(
            "cannot {} a {} leave request",
            action, request.status
        )));
    }
    Ok(())
}

pub fn approve(
    request: &mut LeaveRequest,
    approver_id: u64,
    at: DateTime<Utc>,
    comment: Option<String>,
) -> HrmsResult<()> {
    require_pending(request, "approve")?;
    request.status = LeaveStatus::Approved;
    request.approver_id = Some(approver_id);
    request.approved_at = Some(at);
    request.approval_comment = comment;
    Ok(())
}

pub fn reject(
    request: &mut LeaveRequest,
    approver_id: u64,
    at: DateTime<Utc>,
    comment: Option<String>,
) -> HrmsResult<()> {
    require_pending(request, "reject")?;
    request.status = LeaveStatus::Rejected;
    request.approver_id = Some(approver_id);
    request.approved_at = Some(at);
    request.approval_comment = comment;
    Ok(())
}

/// Cancellation is the only transition allowed out of Approved.
pub fn cancel(request: &mut LeaveRequest) -> HrmsResult<()> {
    match request.status {
        LeaveStatus::Pending | LeaveStatus::Approved => {
            request.status = LeaveStatus::Cancelled;
            Ok(())
        }
        status => Err(HrmsError::InvalidTransition(format!(
            "cannot cancel a {} leave request",
            status
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn open_record() -> AttendanceRecord {
        match check_in(None, 7, AttendanceType::Normal, stamp("2026-01-05T09:05:00"), None) {
            CheckInOutcome::Created(record) => record,
            CheckInOutcome::AlreadyCheckedIn => unreachable!(),
        }
    }

    #[test]
    fn first_check_in_creates_the_day() {
        let record = open_record();
        assert_eq!(record.work_date, date("2026-01-05"));
        assert!(record.is_open());
    }

    #[test]
    fn second_check_in_same_day_is_rejected() {
        let record = open_record();
        let outcome = check_in(
            Some(&record),
            7,
            AttendanceType::Normal,
            stamp("2026-01-05T13:00:00"),
            None,
        );
        assert_eq!(outcome, CheckInOutcome::AlreadyCheckedIn);
    }

    #[test]
    fn check_out_requires_open_check_in_and_ordering() {
        let mut record = open_record();

        // earlier than check-in
        assert!(matches!(
            check_out(&mut record, stamp("2026-01-05T08:00:00")),
            Err(HrmsError::InvalidTransition(_))
        ));

        check_out(&mut record, stamp("2026-01-05T17:30:00")).unwrap();
        assert!(!record.is_open());

        // double check-out
        assert!(matches!(
            check_out(&mut record, stamp("2026-01-05T18:00:00")),
            Err(HrmsError::InvalidTransition(_))
        ));

        let mut no_check_in = AttendanceRecord {
            check_in: None,
            ..open_record()
        };
        assert!(matches!(
            check_out(&mut no_check_in, stamp("2026-01-05T17:00:00")),
            Err(HrmsError::InvalidTransition(_))
        ));
    }

    #[test]
    fn submit_validates_date_span() {
        assert!(matches!(
            submit_leave(1, LeaveType::Paid, date("2025-01-15"), date("2025-01-10"), "r".into()),
            Err(HrmsError::Validation(_))
        ));
        let request =
            submit_leave(1, LeaveType::Paid, date("2025-01-10"), date("2025-01-15"), "r".into())
                .unwrap();
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.day_count(), 6);
    }

    #[test]
    fn overlapping_pending_request_blocks_submission() {
        let mut existing =
            submit_leave(1, LeaveType::Paid, date("2025-01-12"), date("2025-01-20"), "r".into())
                .unwrap();
        existing.id = 41;

        let result = ensure_no_overlap(date("2025-01-10"), date("2025-01-15"), &[existing.clone()]);
        assert!(matches!(result, Err(HrmsError::Conflict(_))));

        // a rejected request frees its range
        reject(&mut existing, 2, Utc::now(), None).unwrap();
        ensure_no_overlap(date("2025-01-16"), date("2025-01-20"), &[existing]).unwrap();
    }

    #[test]
    fn approve_is_not_idempotent() {
        let mut request =
            submit_leave(1, LeaveType::Sick, date("2025-02-03"), date("2025-02-04"), "r".into())
                .unwrap();
        approve(&mut request, 9, Utc::now(), Some("ok".into())).unwrap();
        assert_eq!(request.status, LeaveStatus::Approved);
        assert_eq!(request.approver_id, Some(9));
        assert!(request.approved_at.is_some());

        assert!(matches!(
            approve(&mut request, 9, Utc::now(), None),
            Err(HrmsError::InvalidTransition(_))
        ));
    }

    #[test]
    fn cancel_only_from_pending_or_approved() {
        let mut pending =
            submit_leave(1, LeaveType::Unpaid, date("2025-03-01"), date("2025-03-02"), "r".into())
                .unwrap();
        cancel(&mut pending).unwrap();
        assert_eq!(pending.status, LeaveStatus::Cancelled);

        let mut approved =
            submit_leave(1, LeaveType::Paid, date("2025-03-10"), date("2025-03-11"), "r".into())
                .unwrap();
        approve(&mut approved, 2, Utc::now(), None).unwrap();
        cancel(&mut approved).unwrap();

        let mut rejected =
            submit_leave(1, LeaveType::Paid, date("2025-03-20"), date("2025-03-21"), "r".into())
                .unwrap();
        reject(&mut rejected, 2, Utc::now(), None).unwrap();
        assert!(matches!(cancel(&mut rejected), Err(HrmsError::InvalidTransition(_))));

        // cancelled is terminal too
        assert!(matches!(cancel(&mut pending), Err(HrmsError::InvalidTransition(_))));
    }
}
