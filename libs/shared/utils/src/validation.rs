use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use uuid::Uuid;

use shared_models::error::AppError;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
    })
}

pub fn require_text<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(trimmed)
}

/// Like `require_text` but hands back the value untouched. Used for secrets,
/// where surrounding whitespace is part of the value.
pub fn require_present<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::ValidationError(format!("{} is required", field)));
    }
    Ok(value)
}

pub fn validate_email(email: &str) -> Result<String, AppError> {
    let email = require_text("email", email)?;
    if !email_regex().is_match(email) {
        return Err(AppError::ValidationError(format!("Invalid email address: {}", email)));
    }
    Ok(email.to_lowercase())
}

pub fn require_non_negative(field: &str, value: i32) -> Result<i32, AppError> {
    if value < 0 {
        return Err(AppError::ValidationError(format!("{} must not be negative", field)));
    }
    Ok(value)
}

pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("Invalid {}: {}", field, raw)))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

/// Accepts `HH:MM` or `HH:MM:SS` and normalises to `HH:MM`.
pub fn parse_time_of_day(field: &str, raw: &str) -> Result<String, AppError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map(|time| time.format("%H:%M").to_string())
        .map_err(|_| AppError::ValidationError(format!("Invalid {} '{}', expected HH:MM", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_value_keeps_its_whitespace() {
        assert_eq!(require_present("password", "  secret  ").unwrap(), "  secret  ");
        assert!(require_present("password", "   ").is_err());
        assert!(require_present("password", "").is_err());
    }
    use assert_matches::assert_matches;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(validate_email("  DX@X.com ").unwrap(), "dx@x.com");
    }

    #[test]
    fn email_without_domain_is_rejected() {
        assert_matches!(validate_email("dx@"), Err(AppError::ValidationError(_)));
        assert_matches!(validate_email(""), Err(AppError::ValidationError(msg)) if msg == "email is required");
    }

    #[test]
    fn time_of_day_normalises_seconds() {
        assert_eq!(parse_time_of_day("time", "10:00").unwrap(), "10:00");
        assert_eq!(parse_time_of_day("time", "09:30:00").unwrap(), "09:30");
        assert!(parse_time_of_day("time", "25:00").is_err());
    }

    #[test]
    fn date_must_be_iso() {
        assert_eq!(parse_date("2025-06-01").unwrap(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert!(parse_date("01/06/2025").is_err());
    }

    #[test]
    fn ids_must_be_uuids() {
        assert!(parse_id("doctorId", "not-a-uuid").is_err());
        assert!(parse_id("doctorId", &Uuid::new_v4().to_string()).is_ok());
    }
}
