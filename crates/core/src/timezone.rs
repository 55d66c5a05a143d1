use chrono_tz::Tz;

/// The zone every course is scheduled in.
pub const TZ: Tz = chrono_tz::America::New_York;

const AMERICA_NEW_YORK: &[&str] = &[
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
];

/// The embedded `VTIMEZONE` block for `tz`, one content line per entry.
///
/// Returns `None` for zones without an embedded definition.
#[must_use]
pub fn vtimezone(tz: Tz) -> Option<&'static [&'static str]> {
	match tz.name() {
		"America/New_York" => Some(AMERICA_NEW_YORK),
		_ => None,
	}
}
