use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{Error, Result};

/// iCalendar weekday codes, indexed by days from Sunday.
const CODES: [&str; 7] = ["SU", "MO", "TU", "WE", "TH", "FR", "SA"];
const WEEKDAYS: [Weekday; 7] = [
	Weekday::Sun,
	Weekday::Mon,
	Weekday::Tue,
	Weekday::Wed,
	Weekday::Thu,
	Weekday::Fri,
	Weekday::Sat,
];

/// The two-letter iCalendar code of a weekday (`MO`, `TU`, ...).
#[must_use]
pub fn code(day: Weekday) -> &'static str {
	CODES[day.num_days_from_sunday() as usize]
}

/// Parses a two-letter weekday code, ignoring case.
///
/// ## Errors
/// Returns [`Error::UnknownWeekday`] for anything outside `SU`..`SA`.
pub fn parse_code(s: &str) -> Result<Weekday> {
	CODES
		.iter()
		.position(|c| c.eq_ignore_ascii_case(s))
		.map(|i| WEEKDAYS[i])
		.ok_or_else(|| Error::UnknownWeekday(s.to_string()))
}

/// A non-empty list of weekdays, kept in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekdaySet(Vec<Weekday>);

impl WeekdaySet {
	/// Builds a set from the given days, dropping repeats.
	///
	/// ## Errors
	/// Returns [`Error::EmptyWeekdays`] when no day is given.
	pub fn new(days: impl IntoIterator<Item = Weekday>) -> Result<Self> {
		let mut set = Vec::with_capacity(WEEKDAYS.len());

		for day in days {
			if !set.contains(&day) {
				set.push(day);
			}
		}

		if set.is_empty() {
			return Err(Error::EmptyWeekdays);
		}

		Ok(Self(set))
	}

	pub fn iter(&self) -> impl Iterator<Item = Weekday> + '_ {
		self.0.iter().copied()
	}

	#[must_use]
	pub fn contains(&self, day: Weekday) -> bool {
		self.0.contains(&day)
	}
}

impl FromStr for WeekdaySet {
	type Err = Error;

	/// Parses a comma-separated list such as `MO,WE`.
	fn from_str(s: &str) -> Result<Self> {
		let days = s
			.split(',')
			.map(str::trim)
			.filter(|code| !code.is_empty())
			.map(parse_code)
			.collect::<Result<Vec<_>>>()?;

		Self::new(days)
	}
}

impl fmt::Display for WeekdaySet {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, day) in self.iter().enumerate() {
			if i > 0 {
				f.write_str(",")?;
			}

			f.write_str(code(day))?;
		}

		Ok(())
	}
}

/// The earliest date on or after `anchor` that falls on one of `weekdays`.
#[must_use]
pub fn first_occurrence(anchor: NaiveDate, weekdays: &WeekdaySet) -> NaiveDate {
	let from = anchor.weekday().num_days_from_sunday();

	// any weekday is at most six days away
	let days_to_add = weekdays
		.iter()
		.map(|day| (day.num_days_from_sunday() + 7 - from) % 7)
		.fold(6, u32::min);

	anchor + chrono::Duration::days(i64::from(days_to_add))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date(y: i32, m: u32, d: u32) -> NaiveDate {
		NaiveDate::from_ymd_opt(y, m, d).unwrap()
	}

	#[test]
	fn parses_codes_in_order() {
		let set: WeekdaySet = " we, mo ,WE,".parse().unwrap();

		assert_eq!(set.iter().collect::<Vec<_>>(), [Weekday::Wed, Weekday::Mon]);
		assert_eq!(set.to_string(), "WE,MO");
	}

	#[test]
	fn rejects_empty_and_unknown() {
		assert!(matches!("".parse::<WeekdaySet>(), Err(Error::EmptyWeekdays)));
		assert!(matches!(" , ".parse::<WeekdaySet>(), Err(Error::EmptyWeekdays)));
		assert!(matches!(
			"MO,XX".parse::<WeekdaySet>(),
			Err(Error::UnknownWeekday(code)) if code == "XX"
		));
		assert!(matches!(WeekdaySet::new(Vec::new()), Err(Error::EmptyWeekdays)));
	}

	#[test]
	fn anchor_on_matching_day_is_kept() {
		let set: WeekdaySet = "MO,WE".parse().unwrap();

		assert_eq!(first_occurrence(date(2025, 11, 3), &set), date(2025, 11, 3));
		assert_eq!(first_occurrence(date(2025, 11, 5), &set), date(2025, 11, 5));
	}

	#[test]
	fn moves_forward_to_next_match() {
		let set: WeekdaySet = "MO,WE".parse().unwrap();

		assert_eq!(first_occurrence(date(2025, 11, 4), &set), date(2025, 11, 5));
		assert_eq!(first_occurrence(date(2025, 11, 6), &set), date(2025, 11, 10));

		let sunday: WeekdaySet = "SU".parse().unwrap();
		assert_eq!(first_occurrence(date(2025, 11, 3), &sunday), date(2025, 11, 9));

		// crosses a month and a year boundary
		let friday: WeekdaySet = "FR".parse().unwrap();
		assert_eq!(first_occurrence(date(2025, 12, 27), &friday), date(2026, 1, 2));
	}

	#[test]
	fn resolves_within_window_for_every_pattern() {
		let start = date(2024, 2, 20);

		for mask in 1u8..128 {
			let set = WeekdaySet::new(
				WEEKDAYS
					.iter()
					.enumerate()
					.filter(|(i, _)| mask & (1 << i) != 0)
					.map(|(_, day)| *day),
			)
			.unwrap();

			for offset in 0..21 {
				let anchor = start + chrono::Duration::days(offset);
				let resolved = first_occurrence(anchor, &set);
				let distance = (resolved - anchor).num_days();

				assert!(set.contains(resolved.weekday()), "{set} from {anchor}");
				assert!((0..14).contains(&distance), "{set} from {anchor}");

				if set.contains(anchor.weekday()) {
					assert_eq!(resolved, anchor);
				}
			}
		}
	}
}
