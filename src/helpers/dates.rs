use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

/// Failure to coerce a spreadsheet cell into a calendar date. Callers decide
/// whether a bad cell aborts the run; nothing is silently patched over.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid date value '{value}'")]
pub struct DateParseError {
    pub value: String,
}

/// Given a date and a day delta, returns the date that is `delta` days in
/// the future, rendered through `date_format`. A missing reference falls
/// back to the current local date, so the default call yields tomorrow as
/// dd/mm/yy.
pub fn following_date(reference: Option<NaiveDate>, delta: i64, date_format: &str) -> String {
    let reference = reference.unwrap_or_else(|| Local::now().date_naive());
    let future_date = reference + Duration::days(delta);

    future_date.format(date_format).to_string()
}

/// Parses a date cell as written by this tool (dd/mm/yy), falling back to
/// ISO and four-digit-year forms for hand-entered rows.
pub fn parse_entry_date(value: &str) -> Result<NaiveDate, DateParseError> {
    NaiveDate::parse_from_str(value, "%d/%m/%y")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(value, "%d/%m/%Y"))
        .map_err(|_| DateParseError {
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shifts_into_next_month() {
        assert_eq!(
            following_date(Some(date(2024, 1, 31)), 1, "%d/%m/%y"),
            "01/02/24"
        );
    }

    #[test]
    fn shifts_across_year_boundary() {
        assert_eq!(
            following_date(Some(date(2024, 12, 30)), 3, "%d/%m/%y"),
            "02/01/25"
        );
    }

    #[test]
    fn parses_sheet_format() {
        assert_eq!(parse_entry_date("01/02/24").unwrap(), date(2024, 2, 1));
    }

    #[test]
    fn parses_iso_format() {
        assert_eq!(parse_entry_date("2024-01-03").unwrap(), date(2024, 1, 3));
    }

    #[test]
    fn parses_four_digit_year() {
        assert_eq!(parse_entry_date("15/06/2024").unwrap(), date(2024, 6, 15));
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_entry_date("not a date").unwrap_err();
        assert_eq!(err.value, "not a date");
    }
}
