//! Date parsing shared by date filters and the date comparator.

use chrono::NaiveDate;
use chrono::NaiveDateTime;

/// Formats accepted for date cells and date filter operands.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Parses a date the way the grid's date filter reads cell values.
///
/// Accepts `dd/mm/yyyy` (the format of the sample dataset), ISO `yyyy-mm-dd`,
/// and ISO date-times such as `2008-08-24 00:00:00` as sent by date filters.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use gridsource_lib::query::parse_date;
///
/// let expected = NaiveDate::from_ymd_opt(2008, 8, 24);
/// assert_eq!(parse_date("24/08/2008"), expected);
/// assert_eq!(parse_date("2008-08-24 00:00:00"), expected);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(datetime.date());
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}
