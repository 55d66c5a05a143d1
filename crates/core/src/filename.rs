use chrono::NaiveDate;

use crate::weekday::{code, WeekdaySet};

/// Longest stem kept before `.ics` is appended.
pub const MAX_STEM_LEN: usize = 80;

/// Turns free text into a filename stem made of ASCII word characters and `-`.
///
/// Every other character becomes `-`, runs of `-` collapse to one, and the
/// result is trimmed of `-` and cut to [`MAX_STEM_LEN`] characters.
#[must_use]
pub fn sanitize_stem(s: &str) -> String {
	let mut stem = String::with_capacity(s.len().min(MAX_STEM_LEN));

	for c in s.chars() {
		let c = if c.is_ascii_alphanumeric() || c == '_' {
			c
		} else {
			'-'
		};

		if c == '-' && (stem.is_empty() || stem.ends_with('-')) {
			continue;
		}

		stem.push(c);
	}

	stem.truncate(MAX_STEM_LEN);

	while stem.ends_with('-') {
		stem.pop();
	}

	stem
}

/// `<title>-<byday>-<YYYYMMDD>.ics` for a course starting on `first`.
///
/// Only the title is capped, so the weekdays and the date always survive.
#[must_use]
pub fn ics_filename(title: &str, weekdays: &WeekdaySet, first: NaiveDate) -> String {
	let mut title = sanitize_stem(title);

	if title.is_empty() {
		title.push_str("calendar");
	}

	let byday = weekdays.iter().map(code).collect::<Vec<_>>().join("-");

	format!("{title}-{byday}-{}.ics", first.format("%Y%m%d"))
}
