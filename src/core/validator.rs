use crate::domain::model::BirthRecord;
use crate::utils::error::ValidationError;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_BIRTH_YEAR: i32 = 1900;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2}):(\d{2})$").expect("valid time pattern"));

/// Validate a birth record against today's local date.
pub fn validate_birth_record(record: &BirthRecord) -> Result<(), ValidationError> {
    validate_birth_record_on(record, Local::now().date_naive())
}

/// Validate a birth record against an explicit `today`.
pub fn validate_birth_record_on(
    record: &BirthRecord,
    today: NaiveDate,
) -> Result<(), ValidationError> {
    let birth_date = parse_birth_date(&record.birth_date)?;

    if birth_date > today {
        return Err(ValidationError::FutureDate {
            value: record.birth_date.clone(),
        });
    }

    if birth_date.year() < MIN_BIRTH_YEAR {
        return Err(ValidationError::TooEarly {
            value: record.birth_date.clone(),
        });
    }

    if let Some(time) = record.known_birth_time() {
        parse_birth_time(time)?;
    }

    Ok(())
}

/// Strict `YYYY-MM-DD` parsing; impossible dates such as `2023-02-30` are rejected.
pub fn parse_birth_date(value: &str) -> Result<NaiveDate, ValidationError> {
    let malformed = || ValidationError::MalformedDate {
        value: value.to_string(),
    };

    if !DATE_PATTERN.is_match(value) {
        return Err(malformed());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| malformed())
}

/// Strict `HH:mm` parsing into `(hour, minute)`.
pub fn parse_birth_time(value: &str) -> Result<(u32, u32), ValidationError> {
    let malformed = || ValidationError::MalformedTime {
        value: value.to_string(),
    };

    let caps = TIME_PATTERN.captures(value).ok_or_else(malformed)?;
    let hour: u32 = caps[1].parse().map_err(|_| malformed())?;
    let minute: u32 = caps[2].parse().map_err(|_| malformed())?;

    if hour > 23 || minute > 59 {
        return Err(malformed());
    }

    Ok((hour, minute))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Gender;

    fn record(date: &str, time: Option<&str>) -> BirthRecord {
        BirthRecord::new(date, time.map(str::to_string), Gender::Male)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_valid_records() {
        assert!(validate_birth_record_on(&record("1990-05-20", Some("14:30")), today()).is_ok());
        assert!(validate_birth_record_on(&record("1900-01-01", Some("00:00")), today()).is_ok());
        assert!(validate_birth_record_on(&record("2024-06-01", Some("23:59")), today()).is_ok());
        assert!(validate_birth_record_on(&record("1990-05-20", None), today()).is_ok());
        assert!(validate_birth_record_on(&record("1990-05-20", Some("unknown")), today()).is_ok());
    }

    #[test]
    fn test_future_date() {
        let err = validate_birth_record(&record("2999-01-01", None)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::FutureDate {
                value: "2999-01-01".to_string()
            }
        );

        let err = validate_birth_record_on(&record("2024-06-02", None), today()).unwrap_err();
        assert!(matches!(err, ValidationError::FutureDate { .. }));
    }

    #[test]
    fn test_too_early() {
        let err = validate_birth_record(&record("1899-12-31", None)).unwrap_err();
        assert!(matches!(err, ValidationError::TooEarly { .. }));
    }

    #[test]
    fn test_malformed_dates() {
        for bad in ["not-a-date", "1990-5-20", "1990/05/20", "2023-02-30", "1990-13-01", ""] {
            let err = validate_birth_record_on(&record(bad, None), today()).unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedDate { .. }),
                "expected MalformedDate for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_malformed_times() {
        for bad in ["24:00", "12:60", "9:05", "0930", "ab:cd", "12:30:00"] {
            let err = validate_birth_record_on(&record("1990-05-20", Some(bad)), today()).unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedTime { .. }),
                "expected MalformedTime for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_date_errors_win_over_time_errors() {
        let err = validate_birth_record_on(&record("bad", Some("99:99")), today()).unwrap_err();
        assert!(matches!(err, ValidationError::MalformedDate { .. }));
    }

    #[test]
    fn test_parse_birth_time() {
        assert_eq!(parse_birth_time("09:05").unwrap(), (9, 5));
        assert_eq!(parse_birth_time("00:00").unwrap(), (0, 0));
    }
}
