use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "EMP-001",
        "first_name": "John",
        "last_name": "Doe",
        "email": "john.doe@company.com",
        "phone": "+8801712345678",
        "department_id": 10,
        "hire_date": "2024-01-01",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub employee_code: String,

    #[schema(example = "John")]
    pub first_name: String,

    #[schema(example = "Doe")]
    pub last_name: String,

    #[schema(example = "john.doe@company.com")]
    pub email: String,

    #[schema(example = "+8801712345678", nullable = true)]
    pub phone: Option<String>,

    #[schema(example = 10)]
    pub department_id: u64,

    #[schema(
        example = "2024-01-01",
        value_type = String,
        format = "date"
    )]
    pub hire_date: NaiveDate,

    #[schema(example = "active")]
    pub status: String,
}

/// Cheap structural checks applied before an employee row is written.
/// `today` comes from the caller so the rule stays clock-free.
pub fn validate_employee_fields(
    employee_code: &str,
    first_name: &str,
    email: &str,
    hire_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), String> {
    if employee_code.trim().is_empty() {
        return Err("employee_code must not be empty".into());
    }
    if first_name.trim().is_empty() {
        return Err("first_name must not be empty".into());
    }
    let at = email.find('@');
    match at {
        Some(pos) if pos > 0 && email[pos + 1..].contains('.') => {}
        _ => return Err(format!("'{}' is not a valid email address", email)),
    }
    if hire_date > today {
        return Err("hire_date cannot be in the future".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_empty_required_fields() {
        let today = date("2026-01-01");
        assert!(validate_employee_fields("", "John", "j@x.com", today, today).is_err());
        assert!(validate_employee_fields("EMP-1", "  ", "j@x.com", today, today).is_err());
    }

    #[test]
    fn rejects_bad_email_and_future_hire_date() {
        let today = date("2026-01-01");
        assert!(validate_employee_fields("EMP-1", "John", "not-an-email", today, today).is_err());
        assert!(validate_employee_fields("EMP-1", "John", "@x.com", today, today).is_err());
        assert!(
            validate_employee_fields("EMP-1", "John", "j@x.com", date("2026-02-01"), today).is_err()
        );
        assert!(validate_employee_fields("EMP-1", "John", "j@x.com", today, today).is_ok());
    }
}
