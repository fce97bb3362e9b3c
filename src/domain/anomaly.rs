//! Attendance anomaly classification.
//!
//! Pure arithmetic over a pair of timestamps; no clock reads, no I/O. Inputs
//! are assumed well-formed (`check_out >= check_in` is the caller's job —
//! a violated pair yields a negative work span, not a fault).

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;
use utoipa::ToSchema;

/// Organization attendance policy. Defaults match the common 09:00-17:00
/// schedule; override per deployment through the environment (`Config`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkPolicy {
    pub standard_start: NaiveTime,
    pub standard_end: NaiveTime,
    /// Below this many worked hours a day is never flagged as early-leaving.
    pub minimum_work_hours: f64,
    /// Baseline against which overtime hours are computed.
    pub standard_work_hours: f64,
    /// At or above this many worked hours the day counts as overtime.
    pub overtime_threshold_hours: f64,
}

impl Default for WorkPolicy {
    fn default() -> Self {
        Self {
            standard_start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            standard_end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            minimum_work_hours: 4.0,
            standard_work_hours: 8.0,
            overtime_threshold_hours: 10.0,
        }
    }
}

/// Derived per-day classification. Computed on demand, never stored apart
/// from the record it describes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct AnomalyResult {
    #[schema(example = 8.5)]
    pub work_hours: f64,
    #[schema(example = 30)]
    pub late_minutes: i64,
    #[schema(example = false)]
    pub is_early_leaving: bool,
    #[schema(example = 0.0)]
    pub overtime_hours: f64,
}

impl WorkPolicy {
    /// Strictly after the standard start counts as late; arriving exactly on
    /// the boundary does not.
    pub fn is_late_arrival(&self, check_in: NaiveDateTime) -> bool {
        check_in.time() > self.standard_start
    }

    /// Whole minutes past the standard start (floor), 0 when not late.
    pub fn late_minutes(&self, check_in: NaiveDateTime) -> i64 {
        if !self.is_late_arrival(check_in) {
            return 0;
        }
        (check_in.time() - self.standard_start).num_minutes()
    }

    /// Leaving strictly before the standard end counts as early, except that
    /// a day below the minimum worked hours is never flagged at all.
    /// Leaving exactly at the boundary is not early.
    pub fn is_early_leaving(&self, check_in: NaiveDateTime, check_out: NaiveDateTime) -> bool {
        let worked = (check_out - check_in).num_seconds() as f64 / 3600.0;
        if worked < self.minimum_work_hours {
            return false;
        }
        check_out.time() < self.standard_end
    }

    /// The overtime boundary is inclusive: exactly the threshold is overtime.
    pub fn is_overtime(&self, work_hours: f64) -> bool {
        work_hours >= self.overtime_threshold_hours
    }

    /// Hours beyond the standard day, 0 when below the overtime threshold.
    /// Rounded to 2 decimals, half away from zero (`f64::round` semantics).
    pub fn overtime_hours(&self, work_hours: f64) -> f64 {
        if !self.is_overtime(work_hours) {
            return 0.0;
        }
        ((work_hours - self.standard_work_hours) * 100.0).round() / 100.0
    }

    /// Classify a completed day in one pass.
    pub fn evaluate(&self, check_in: NaiveDateTime, check_out: NaiveDateTime) -> AnomalyResult {
        let work_hours = (check_out - check_in).num_seconds() as f64 / 3600.0;
        AnomalyResult {
            work_hours,
            late_minutes: self.late_minutes(check_in),
            is_early_leaving: self.is_early_leaving(check_in, check_out),
            overtime_hours: self.overtime_hours(work_hours),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    fn policy() -> WorkPolicy {
        WorkPolicy::default()
    }

    #[test]
    fn late_arrival_boundary_is_exclusive() {
        let p = policy();
        assert!(!p.is_late_arrival(stamp("2026-01-05T08:30:00")));
        assert!(!p.is_late_arrival(stamp("2026-01-05T09:00:00")));
        assert!(p.is_late_arrival(stamp("2026-01-05T09:00:01")));
    }

    #[test]
    fn late_minutes_floor_whole_minutes() {
        let p = policy();
        assert_eq!(p.late_minutes(stamp("2026-01-05T09:00:00")), 0);
        assert_eq!(p.late_minutes(stamp("2026-01-05T09:30:00")), 30);
        // 59 seconds late is still 0 whole minutes
        assert_eq!(p.late_minutes(stamp("2026-01-05T09:00:59")), 0);
        assert_eq!(p.late_minutes(stamp("2026-01-05T09:01:30")), 1);
    }

    #[test]
    fn early_leaving_needs_minimum_hours() {
        let p = policy();
        // 3.5h worked: below the 4h floor, never early
        assert!(!p.is_early_leaving(stamp("2026-01-05T09:00:00"), stamp("2026-01-05T12:30:00")));
        // 7.98h worked, out before 17:00
        assert!(p.is_early_leaving(stamp("2026-01-05T09:00:00"), stamp("2026-01-05T16:59:00")));
        // exactly 17:00 is not early
        assert!(!p.is_early_leaving(stamp("2026-01-05T09:00:00"), stamp("2026-01-05T17:00:00")));
    }

    #[test]
    fn overtime_boundary_is_inclusive() {
        let p = policy();
        assert!(!p.is_overtime(8.0));
        assert!(!p.is_overtime(9.99));
        assert!(p.is_overtime(10.0));
    }

    #[test]
    fn overtime_hours_subtract_standard_day() {
        let p = policy();
        assert_eq!(p.overtime_hours(8.0), 0.0);
        assert_eq!(p.overtime_hours(10.0), 2.0);
        assert_eq!(p.overtime_hours(12.0), 4.0);
    }

    #[test]
    fn overtime_hours_round_half_away_from_zero() {
        let p = policy();
        // 10.125 and 8.0 are exact in binary: 2.125 * 100 = 212.5, a true tie.
        // Half-away-from-zero gives 2.13 where banker's rounding would give 2.12.
        assert_eq!(p.overtime_hours(10.125), 2.13);
        // non-tie case, also exact: 2.0625 * 100 = 206.25 -> 2.06
        assert_eq!(p.overtime_hours(10.0625), 2.06);
    }

    #[test]
    fn evaluate_combines_all_signals() {
        let p = policy();
        let result = p.evaluate(stamp("2026-01-05T09:30:00"), stamp("2026-01-05T20:00:00"));
        assert_eq!(result.late_minutes, 30);
        assert!(!result.is_early_leaving);
        assert_eq!(result.work_hours, 10.5);
        assert_eq!(result.overtime_hours, 2.5);
    }
}
