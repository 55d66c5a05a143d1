use std::num::NonZeroU32;

use chrono::{NaiveDate, NaiveTime};

use crate::{
	time::{parse_date, parse_time_of_day},
	weekday::WeekdaySet,
	Error, Result,
};

pub const DEFAULT_TITLE: &str = "Course (Live Online)";
pub const DEFAULT_BYDAY: &str = "MO,WE";
pub const DEFAULT_START: &str = "19:00";
pub const DEFAULT_END: &str = "20:00";
pub const DEFAULT_DATE: &str = "2025-11-03";
/// Ten weeks of the default two-session pattern. Not scaled by weekday count.
pub const DEFAULT_COUNT: u32 = 20;

/// Raw parameters read off an "Add to Calendar" trigger.
///
/// Missing or blank values fall back to the `DEFAULT_*` constants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerAttributes {
	pub title: Option<String>,
	pub byday: Option<String>,
	pub start: Option<String>,
	pub end: Option<String>,
	pub date: Option<String>,
}

fn or_default<'a>(value: Option<&'a str>, default: &'a str) -> &'a str {
	value.map(str::trim).filter(|v| !v.is_empty()).unwrap_or(default)
}

impl TriggerAttributes {
	#[must_use]
	pub fn title(&self) -> &str {
		or_default(self.title.as_deref(), DEFAULT_TITLE)
	}

	#[must_use]
	pub fn byday(&self) -> &str {
		or_default(self.byday.as_deref(), DEFAULT_BYDAY)
	}

	#[must_use]
	pub fn start(&self) -> &str {
		or_default(self.start.as_deref(), DEFAULT_START)
	}

	#[must_use]
	pub fn end(&self) -> &str {
		or_default(self.end.as_deref(), DEFAULT_END)
	}

	#[must_use]
	pub fn date(&self) -> &str {
		or_default(self.date.as_deref(), DEFAULT_DATE)
	}
}

/// A validated request for one recurring course event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRequest {
	title: String,
	weekdays: WeekdaySet,
	start: NaiveTime,
	end: NaiveTime,
	anchor: NaiveDate,
	count: NonZeroU32,
}

impl EventRequest {
	/// ## Errors
	/// Returns [`Error::EndNotAfterStart`] unless `end` is later than `start`.
	pub fn new(
		title: impl Into<String>,
		weekdays: WeekdaySet,
		start: NaiveTime,
		end: NaiveTime,
		anchor: NaiveDate,
	) -> Result<Self> {
		if end <= start {
			return Err(Error::EndNotAfterStart { start, end });
		}

		Ok(Self {
			title: title.into(),
			weekdays,
			start,
			end,
			anchor,
			count: NonZeroU32::MIN.saturating_add(DEFAULT_COUNT - 1),
		})
	}

	/// Replaces the number of occurrences.
	///
	/// ## Errors
	/// Returns [`Error::ZeroCount`] for zero.
	pub fn with_count(mut self, count: u32) -> Result<Self> {
		self.count = NonZeroU32::new(count).ok_or(Error::ZeroCount)?;
		Ok(self)
	}

	#[must_use]
	pub fn title(&self) -> &str {
		&self.title
	}

	#[must_use]
	pub fn weekdays(&self) -> &WeekdaySet {
		&self.weekdays
	}

	#[must_use]
	pub fn start(&self) -> NaiveTime {
		self.start
	}

	#[must_use]
	pub fn end(&self) -> NaiveTime {
		self.end
	}

	#[must_use]
	pub fn anchor(&self) -> NaiveDate {
		self.anchor
	}

	#[must_use]
	pub fn count(&self) -> NonZeroU32 {
		self.count
	}
}

impl TryFrom<&TriggerAttributes> for EventRequest {
	type Error = Error;

	fn try_from(attrs: &TriggerAttributes) -> Result<Self> {
		Self::new(
			attrs.title(),
			attrs.byday().parse()?,
			parse_time_of_day(attrs.start())?,
			parse_time_of_day(attrs.end())?,
			parse_date(attrs.date())?,
		)
	}
}
