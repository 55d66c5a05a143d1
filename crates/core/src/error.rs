use chrono::{NaiveDateTime, NaiveTime};

/// Reasons a calendar document cannot be built.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("no weekdays given")]
	EmptyWeekdays,

	#[error("unknown weekday code: {0:?}")]
	UnknownWeekday(String),

	#[error("invalid time {0:?}, expected HH:MM")]
	InvalidTime(String),

	#[error("invalid date {0:?}, expected YYYY-MM-DD")]
	InvalidDate(String),

	#[error("end time {end} is not after start time {start}")]
	EndNotAfterStart { start: NaiveTime, end: NaiveTime },

	#[error("occurrence count must be at least 1")]
	ZeroCount,

	#[error("local time {0} does not exist in the calendar timezone")]
	NonexistentLocalTime(NaiveDateTime),

	#[error("recurrence error: {0}")]
	Recurrence(#[from] rrule::RRuleError),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
