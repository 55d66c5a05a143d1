use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::{
	filename::ics_filename,
	request::EventRequest,
	time::{format_local, format_utc},
	timezone::{vtimezone, TZ},
	weekday::first_occurrence,
	Error, Result,
};

pub const PRODID: &str = "-//Montanaro WL//Course Calendar//EN";
/// Suffix of every generated `UID`.
pub const UID_DOMAIN: &str = "montanarowl.com";
pub const MEDIA_TYPE: &str = "text/calendar;charset=utf-8";

/// Content lines are folded past this many octets (RFC 5545 §3.1).
const MAX_LINE_OCTETS: usize = 75;

/// Generation-time identity of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
	created: DateTime<Utc>,
	uid: String,
}

impl Stamp {
	/// Current time plus a random `UID` of the form `<millis>-<hex>@montanarowl.com`.
	#[must_use]
	pub fn now() -> Self {
		let created = Utc::now();
		let uid = format!(
			"{}-{}@{UID_DOMAIN}",
			created.timestamp_millis(),
			uuid::Uuid::new_v4().simple()
		);

		Self { created, uid }
	}

	#[must_use]
	pub fn new(created: DateTime<Utc>, uid: impl Into<String>) -> Self {
		Self {
			created,
			uid: uid.into(),
		}
	}
}

/// One recurring course event, ready to be written out as an `.ics` file.
#[derive(Debug, Clone)]
pub struct CalendarDocument {
	request: EventRequest,
	first: NaiveDate,
	stamp: Stamp,
}

impl CalendarDocument {
	#[must_use]
	pub fn new(request: EventRequest) -> Self {
		Self::with_stamp(request, Stamp::now())
	}

	#[must_use]
	pub fn with_stamp(request: EventRequest, stamp: Stamp) -> Self {
		let first = first_occurrence(request.anchor(), request.weekdays());

		debug!(
			title = request.title(),
			byday = %request.weekdays(),
			anchor = %request.anchor(),
			%first,
			uid = %stamp.uid,
			"built calendar document"
		);

		Self {
			request,
			first,
			stamp,
		}
	}

	#[must_use]
	pub fn request(&self) -> &EventRequest {
		&self.request
	}

	#[must_use]
	pub fn uid(&self) -> &str {
		&self.stamp.uid
	}

	#[must_use]
	pub fn created(&self) -> DateTime<Utc> {
		self.stamp.created
	}

	/// The date of the first session.
	#[must_use]
	pub fn first_occurrence(&self) -> NaiveDate {
		self.first
	}

	/// The `RRULE` value, e.g. `FREQ=WEEKLY;BYDAY=MO,WE;COUNT=20;WKST=SU`.
	#[must_use]
	pub fn rrule(&self) -> String {
		format!(
			"FREQ=WEEKLY;BYDAY={};COUNT={};WKST=SU",
			self.request.weekdays(),
			self.request.count()
		)
	}

	#[must_use]
	pub fn filename(&self) -> String {
		ics_filename(self.request.title(), self.request.weekdays(), self.first)
	}

	#[must_use]
	pub fn to_ics(&self) -> String {
		self.to_string()
	}

	/// Start of every session the document describes, in course time.
	///
	/// ## Errors
	/// Fails if the first start falls in a daylight-saving gap or the
	/// `rrule` crate rejects the rule.
	pub fn occurrences(&self) -> Result<Vec<DateTime<Tz>>> {
		let local = self.first.and_time(self.request.start());
		let start = TZ
			.from_local_datetime(&local)
			.earliest()
			.ok_or(Error::NonexistentLocalTime(local))?;
		let count = self.request.count().get();

		let set = rrule::RRule::new(rrule::Frequency::Weekly)
			.by_weekday(
				self.request
					.weekdays()
					.iter()
					.map(rrule::NWeekday::Every)
					.collect(),
			)
			.count(count)
			.week_start(chrono::Weekday::Sun)
			.build(start.with_timezone(&rrule::Tz::Tz(TZ)))?;

		Ok(set
			.all(u16::try_from(count).unwrap_or(u16::MAX))
			.dates
			.into_iter()
			.map(|date| date.with_timezone(&TZ))
			.collect())
	}
}

impl fmt::Display for CalendarDocument {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let tzid = TZ.name();
		let request = &self.request;

		write_line(f, "BEGIN:VCALENDAR")?;
		write_line(f, "VERSION:2.0")?;
		write_line(f, &format!("PRODID:{PRODID}"))?;
		write_line(f, "CALSCALE:GREGORIAN")?;
		write_line(f, "METHOD:PUBLISH")?;

		for line in vtimezone(TZ).unwrap_or_default() {
			write_line(f, line)?;
		}

		write_line(f, "BEGIN:VEVENT")?;
		write_line(f, &format!("UID:{}", self.stamp.uid))?;
		write_line(f, &format!("DTSTAMP:{}", format_utc(self.stamp.created)))?;
		write_line(f, "CLASS:PUBLIC")?;
		write_line(f, "TRANSP:OPAQUE")?;
		write_line(f, &format!("SUMMARY:{}", escape_text(request.title())))?;
		write_line(
			f,
			&format!(
				"DTSTART;TZID={tzid}:{}",
				format_local(self.first, request.start())
			),
		)?;
		write_line(
			f,
			&format!(
				"DTEND;TZID={tzid}:{}",
				format_local(self.first, request.end())
			),
		)?;
		write_line(f, &format!("RRULE:{}", self.rrule()))?;
		write_line(f, "END:VEVENT")?;
		write_line(f, "END:VCALENDAR")
	}
}

/// Escapes a TEXT value (RFC 5545 §3.3.11).
///
/// Line breaks of any style become `\n`; other control characters except tab
/// are dropped.
#[must_use]
pub fn escape_text(s: &str) -> String {
	let mut out = String::with_capacity(s.len());
	let mut chars = s.chars().peekable();

	while let Some(c) = chars.next() {
		match c {
			'\\' => out.push_str("\\\\"),
			';' => out.push_str("\\;"),
			',' => out.push_str("\\,"),
			'\r' => {
				chars.next_if_eq(&'\n');
				out.push_str("\\n");
			}
			'\n' => out.push_str("\\n"),
			c if c.is_control() && c != '\t' => {}
			c => out.push(c),
		}
	}

	out
}

/// Writes one content line, folding it so no physical line exceeds 75 octets.
fn write_line<W: fmt::Write>(out: &mut W, line: &str) -> fmt::Result {
	let mut rest = line;
	let mut limit = MAX_LINE_OCTETS;

	while rest.len() > limit {
		let mut split = limit;

		while !rest.is_char_boundary(split) {
			split -= 1;
		}

		out.write_str(&rest[..split])?;
		out.write_str("\r\n ")?;
		rest = &rest[split..];
		// the leading space counts towards the next line
		limit = MAX_LINE_OCTETS - 1;
	}

	out.write_str(rest)?;
	out.write_str("\r\n")
}

#[cfg(test)]
mod tests {
	use chrono::{Datelike, NaiveTime, Timelike, Weekday};

	use super::*;
	use crate::request::TriggerAttributes;

	fn stamp() -> Stamp {
		Stamp::new(
			Utc.with_ymd_and_hms(2025, 10, 1, 12, 30, 0).unwrap(),
			"1759321800000-abc@montanarowl.com",
		)
	}

	fn french_a1() -> EventRequest {
		EventRequest::try_from(&TriggerAttributes {
			title: Some("French A1 (Live Online)".into()),
			byday: Some("MO,WE".into()),
			start: Some("19:00".into()),
			end: Some("20:00".into()),
			date: Some("2025-11-03".into()),
		})
		.unwrap()
	}

	#[test]
	fn renders_full_document() {
		let document = CalendarDocument::with_stamp(french_a1(), stamp());
		let expected = [
			"BEGIN:VCALENDAR",
			"VERSION:2.0",
			"PRODID:-//Montanaro WL//Course Calendar//EN",
			"CALSCALE:GREGORIAN",
			"METHOD:PUBLISH",
			"BEGIN:VTIMEZONE",
			"TZID:America/New_York",
			"X-LIC-LOCATION:America/New_York",
			"BEGIN:DAYLIGHT",
			"TZOFFSETFROM:-0500",
			"TZOFFSETTO:-0400",
			"TZNAME:EDT",
			"DTSTART:19700308T020000",
			"RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU",
			"END:DAYLIGHT",
			"BEGIN:STANDARD",
			"TZOFFSETFROM:-0400",
			"TZOFFSETTO:-0500",
			"TZNAME:EST",
			"DTSTART:19701101T020000",
			"RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU",
			"END:STANDARD",
			"END:VTIMEZONE",
			"BEGIN:VEVENT",
			"UID:1759321800000-abc@montanarowl.com",
			"DTSTAMP:20251001T123000Z",
			"CLASS:PUBLIC",
			"TRANSP:OPAQUE",
			"SUMMARY:French A1 (Live Online)",
			"DTSTART;TZID=America/New_York:20251103T190000",
			"DTEND;TZID=America/New_York:20251103T200000",
			"RRULE:FREQ=WEEKLY;BYDAY=MO,WE;COUNT=20;WKST=SU",
			"END:VEVENT",
			"END:VCALENDAR",
			"",
		]
		.join("\r\n");

		assert_eq!(document.to_ics(), expected);
		assert_eq!(document.filename(), "French-A1-Live-Online-MO-WE-20251103.ics");
	}

	#[test]
	fn starts_on_first_matching_weekday() {
		let request = french_a1();
		let later = EventRequest::new(
			request.title(),
			"TH".parse().unwrap(),
			request.start(),
			request.end(),
			request.anchor(),
		)
		.unwrap();
		let ics = CalendarDocument::with_stamp(later, stamp()).to_ics();

		assert!(ics.contains("DTSTART;TZID=America/New_York:20251106T190000\r\n"));
		assert!(ics.contains("DTEND;TZID=America/New_York:20251106T200000\r\n"));
		assert!(ics.contains("RRULE:FREQ=WEEKLY;BYDAY=TH;COUNT=20;WKST=SU\r\n"));
	}

	#[test]
	fn escapes_summary() {
		assert_eq!(escape_text(r"a,b;c\d"), r"a\,b\;c\\d");
		assert_eq!(escape_text("one\r\ntwo\nthree\rfour"), r"one\ntwo\nthree\nfour");
		assert_eq!(escape_text("tab\there\u{7}"), "tab\there");

		let request = EventRequest::new(
			"Spanish; A2, evening\nGroup \\ B",
			"TU".parse().unwrap(),
			NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(19, 30, 0).unwrap(),
			NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
		)
		.unwrap();
		let ics = CalendarDocument::with_stamp(request, stamp()).to_ics();

		assert!(ics.contains("SUMMARY:Spanish\\; A2\\, evening\\nGroup \\\\ B\r\n"));
	}

	#[test]
	fn folds_long_lines() {
		let title = "Conversational Spanish for Travellers: Intermédiaire Évening Group (Live Online)";
		let request = EventRequest::new(
			title,
			"SA".parse().unwrap(),
			NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
			NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
		)
		.unwrap();
		let ics = CalendarDocument::with_stamp(request, stamp()).to_ics();

		assert!(ics.split("\r\n").all(|line| line.len() <= MAX_LINE_OCTETS));
		assert_eq!(ics.replace("\r\n ", "").matches(title).count(), 1);
	}

	#[test]
	fn stamps_are_unique() {
		let a = Stamp::now();
		let b = Stamp::now();

		assert_ne!(a.uid, b.uid);
		assert!(a.uid.ends_with("@montanarowl.com"));
	}

	#[test]
	fn created_matches_dtstamp() {
		let document = CalendarDocument::with_stamp(french_a1(), stamp());

		assert_eq!(document.created(), Utc.with_ymd_and_hms(2025, 10, 1, 12, 30, 0).unwrap());
		assert!(document
			.to_ics()
			.contains(&format!("DTSTAMP:{}\r\n", format_utc(document.created()))));
	}

	#[test]
	fn expands_default_occurrences() {
		let document = CalendarDocument::with_stamp(french_a1(), stamp());
		let sessions = document.occurrences().unwrap();

		assert_eq!(sessions.len(), 20);
		assert_eq!(
			sessions[0].naive_local(),
			NaiveDate::from_ymd_opt(2025, 11, 3)
				.unwrap()
				.and_hms_opt(19, 0, 0)
				.unwrap()
		);
		assert!(sessions.iter().all(|s| {
			matches!(s.weekday(), Weekday::Mon | Weekday::Wed) && s.hour() == 19 && s.minute() == 0
		}));
		// ten weeks of two sessions
		assert_eq!(
			sessions[19].date_naive(),
			NaiveDate::from_ymd_opt(2026, 1, 7).unwrap()
		);
	}

	#[test]
	fn single_weekday_keeps_fixed_count() {
		let request = EventRequest::new(
			"Saturday intensive",
			"SA".parse().unwrap(),
			NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
			NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
			NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
		)
		.unwrap();
		let sessions = CalendarDocument::with_stamp(request, stamp())
			.occurrences()
			.unwrap();

		assert_eq!(sessions.len(), 20);
		assert_eq!(
			(sessions[19].date_naive() - sessions[0].date_naive()).num_weeks(),
			19
		);
	}
}
