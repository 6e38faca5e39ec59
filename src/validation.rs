//! Parsing helpers for command arguments
//!
//! Everything here runs before the store is touched, so a rejected argument
//! never leaves a partial write behind.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::ValidationError;
use crate::filter::TaskFilter;
use crate::model::{Priority, TaskStatus};

pub fn parse_priority(value: &str) -> Result<Priority, ValidationError> {
    value.parse()
}

pub fn parse_status(value: &str) -> Result<TaskStatus, ValidationError> {
    value.parse()
}

pub fn parse_filter(value: &str) -> Result<TaskFilter, ValidationError> {
    value.parse()
}

/// Parse a due date given as RFC 3339, `YYYY-MM-DD HH:MM` or `YYYY-MM-DD`
///
/// Local wall-clock forms are interpreted in the local timezone. A bare date
/// means the end of that day, so a task due today is not overdue until
/// tomorrow.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    let value = value.trim();
    let invalid = || ValidationError::InvalidDate(value.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M") {
        dt
    } else if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).ok_or_else(invalid)?;
        date.and_time(end_of_day)
    } else {
        return Err(invalid());
    };

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

/// Parse an optional due date argument where `""` means "clear"
pub fn parse_optional_due_date(value: &str) -> Result<Option<DateTime<Utc>>, ValidationError> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_due_date(value).map(Some)
    }
}

/// Trim an id argument
pub fn normalize_id(id: &str) -> String {
    id.trim().to_string()
}

/// Reject blank titles; returns the trimmed title
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let title = title.trim();
    if title.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(title.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rfc3339() {
        let dt = parse_due_date("2025-03-15T10:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-03-15T10:30:00+00:00");
    }

    #[test]
    fn test_parse_local_forms() {
        let with_time = parse_due_date("2025-03-15 10:30").unwrap();
        let local = with_time.with_timezone(&Local);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2025-03-15 10:30");

        let date_only = parse_due_date("2025-03-15").unwrap();
        let local = date_only.with_timezone(&Local);
        assert_eq!(local.format("%H:%M:%S").to_string(), "23:59:59");
    }

    #[test]
    fn test_parse_invalid_date() {
        assert_eq!(
            parse_due_date("15/03/2025"),
            Err(ValidationError::InvalidDate("15/03/2025".to_string()))
        );
        assert_eq!(parse_optional_due_date("  "), Ok(None));
    }

    #[test]
    fn test_validate_title() {
        assert_eq!(validate_title("  Plan trip ").unwrap(), "Plan trip");
        assert_eq!(validate_title(" \t"), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn test_normalize_id() {
        assert_eq!(normalize_id("  abc-123 "), "abc-123");
    }
}
