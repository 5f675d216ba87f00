use chrono::NaiveDate;
use thiserror::Error;

use crate::DateRange;

/// Literal separator between the two dates in a range message.
pub const RANGE_SEPARATOR: &str = " to ";

/// Calendar date format accepted on either side of the separator.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The message text could not be read as `YYYY-MM-DD to YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeParseError {
    #[error("expected exactly one '{}' separator", RANGE_SEPARATOR.trim())]
    BadShape,
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    BadDate(String),
}

/// Parse a free-text message of the form `"<date> to <date>"`.
///
/// Both sides are trimmed before parsing. Start and end are not ordered
/// against each other.
pub fn parse_date_range(input: &str) -> Result<DateRange, RangeParseError> {
    let parts: Vec<&str> = input.split(RANGE_SEPARATOR).collect();
    let [start, end] = parts.as_slice() else {
        return Err(RangeParseError::BadShape);
    };
    Ok(DateRange {
        start: parse_date(start)?,
        end: parse_date(end)?,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate, RangeParseError> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| RangeParseError::BadDate(text.to_string()))
}
