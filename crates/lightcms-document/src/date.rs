//! `Date` tag parsing and formatting.

use chrono::NaiveDate;

use crate::ParseError;

/// Parse a `DD/MM/YYYY` date.
///
/// Each component may carry surrounding whitespace. Anything other than three
/// numeric components forming a real calendar date is rejected.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use lightcms_document::parse_date;
///
/// assert_eq!(parse_date("05/03/2021"), Ok(NaiveDate::from_ymd_opt(2021, 3, 5).unwrap()));
/// assert!(parse_date("31/02/2021").is_err());
/// ```
pub fn parse_date(raw: &str) -> Result<NaiveDate, ParseError> {
    let invalid = || ParseError::InvalidDate(raw.to_owned());

    let mut parts = raw.split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };

    let day: u32 = day.trim().parse().map_err(|_| invalid())?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year: i32 = year.trim().parse().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Format a date for display as `DD. Mon YYYY` (e.g. `05. Mar 2021`).
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d. %b %Y").to_string()
}
