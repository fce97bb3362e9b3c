use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;

/// How the day was worked. Stored as a lowercase string.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceType {
    Normal,
    Remote,
    BusinessTrip,
    HalfDay,
}

/// One employee-day of attendance.
///
/// Created by the first check-in for a (employee, work date) pair. A check-out,
/// when present, is never earlier than the check-in; the lifecycle functions in
/// `domain::lifecycle` enforce that before anything is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "employee_id": 1000,
    "work_date": "2026-01-05",
    "check_in": "2026-01-05T08:58:12",
    "check_out": "2026-01-05T17:31:40",
    "attendance_type": "normal",
    "note": null
}))]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = 1000)]
    pub employee_id: u64,

    #[schema(example = "2026-01-05", value_type = String, format = "date")]
    pub work_date: NaiveDate,

    #[schema(example = "2026-01-05T08:58:12", value_type = String, format = "date-time", nullable = true)]
    pub check_in: Option<NaiveDateTime>,

    #[schema(example = "2026-01-05T17:31:40", value_type = String, format = "date-time", nullable = true)]
    pub check_out: Option<NaiveDateTime>,

    #[schema(example = "normal")]
    pub attendance_type: AttendanceType,

    #[schema(example = "worked from client site", nullable = true)]
    pub note: Option<String>,
}

impl AttendanceRecord {
    /// Hours between check-in and check-out, `None` unless both are present.
    pub fn work_hours(&self) -> Option<f64> {
        match (self.check_in, self.check_out) {
            (Some(start), Some(end)) => Some((end - start).num_seconds() as f64 / 3600.0),
            _ => None,
        }
    }

    /// A day is open after check-in until a check-out is recorded.
    pub fn is_open(&self) -> bool {
        self.check_in.is_some() && self.check_out.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn work_hours_requires_both_stamps() {
        let mut record = AttendanceRecord {
            id: 1,
            employee_id: 7,
            work_date: "2026-01-05".parse().unwrap(),
            check_in: Some(stamp("2026-01-05T09:00:00")),
            check_out: None,
            attendance_type: AttendanceType::Normal,
            note: None,
        };
        assert_eq!(record.work_hours(), None);
        assert!(record.is_open());

        record.check_out = Some(stamp("2026-01-05T17:30:00"));
        assert_eq!(record.work_hours(), Some(8.5));
        assert!(!record.is_open());
    }

    #[test]
    fn attendance_type_round_trips_as_snake_case() {
        assert_eq!(AttendanceType::BusinessTrip.to_string(), "business_trip");
        assert_eq!(
            "half_day".parse::<AttendanceType>().unwrap(),
            AttendanceType::HalfDay
        );
    }
}
