use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};

use crate::{Error, Result};

/// Parses a 24-hour `HH:MM` time of day.
///
/// Both fields must be exactly two digits. Seconds are always zero.
///
/// ## Errors
/// Returns [`Error::InvalidTime`] for anything else, including `24:00`.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
	let invalid = || Error::InvalidTime(s.to_string());
	let (hour, minute) = s.trim().split_once(':').ok_or_else(invalid)?;
	let hour = two_digits(hour).ok_or_else(invalid)?;
	let minute = two_digits(minute).ok_or_else(invalid)?;

	NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(invalid)
}

fn two_digits(s: &str) -> Option<u32> {
	match s.as_bytes() {
		[tens @ b'0'..=b'9', ones @ b'0'..=b'9'] => {
			Some(u32::from(tens - b'0') * 10 + u32::from(ones - b'0'))
		}
		_ => None,
	}
}

/// Parses an ISO `YYYY-MM-DD` calendar date.
///
/// ## Errors
/// Returns [`Error::InvalidDate`] when the text is not a valid date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
	let invalid = || Error::InvalidDate(s.to_string());
	let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| invalid())?;

	// iCalendar DATE values have exactly four year digits
	if !(0..=9999).contains(&date.year()) {
		return Err(invalid());
	}

	Ok(date)
}

/// Floating local timestamp, `YYYYMMDDTHHMMSS`.
///
/// Carries no offset; the reader pairs it with a `TZID` parameter.
#[must_use]
pub fn format_local(date: NaiveDate, time: NaiveTime) -> String {
	date.and_time(time).format("%Y%m%dT%H%M00").to_string()
}

/// UTC timestamp, `YYYYMMDDTHHMMSSZ`.
#[must_use]
pub fn format_utc(at: DateTime<Utc>) -> String {
	at.format("%Y%m%dT%H%M%SZ").to_string()
}
