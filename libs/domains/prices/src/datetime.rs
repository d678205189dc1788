//! The one textual date format of the API.
//!
//! Application dates arrive and leave as `dd/MM/yyyy HH:mm:ss`; anything
//! else is rejected as invalid input rather than guessed at.

use chrono::NaiveDateTime;

/// `dd/MM/yyyy HH:mm:ss`
pub const APPLICATION_DATE_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

pub fn parse_application_date(input: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(input, APPLICATION_DATE_FORMAT)
}

pub fn format_application_date(value: NaiveDateTime) -> String {
    value.format(APPLICATION_DATE_FORMAT).to_string()
}
