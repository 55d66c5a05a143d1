use std::io::Write;

use course_ics_core::{create_calendar, page, Error};

const PAGE: &str = r#"<!doctype html>
<html><body>
<section class="upcoming">
	<button class="add-to-calendar" data-title="French A1 (Live Online)" data-byday="MO,WE"
		data-start="19:00" data-end="20:00" data-date="2025-11-03">Add to Calendar</button>
	<button class="add-to-calendar" data-title="Spanish A2 / Tuesdays" data-byday="TU"
		data-start="18:30" data-end="19:30" data-date="2025-11-03">Add to Calendar</button>
	<button class="add-to-calendar" data-title="Broken" data-start="7pm">Add to Calendar</button>
</section>
<table class="course-table"><tbody>
	<tr><td class="lvl">Spanish A2 High Beginner</td>
		<td class="times-td"><div class="time-line">Tue 6:30–7:30 pm ET</div></td></tr>
</tbody></table>
</body></html>"#;

#[test]
fn builds_one_document_per_trigger() {
	let mut file = tempfile::NamedTempFile::new().unwrap();
	file.write_all(PAGE.as_bytes()).unwrap();

	let document = page::parse_from_file(file.path()).unwrap();
	let results = page::triggers(&document)
		.iter()
		.map(create_calendar)
		.collect::<Vec<_>>();

	assert_eq!(results.len(), 3);

	let french = results[0].as_ref().unwrap();
	assert_eq!(french.filename(), "French-A1-Live-Online-MO-WE-20251103.ics");

	let spanish = results[1].as_ref().unwrap();
	assert_eq!(spanish.filename(), "Spanish-A2-Tuesdays-TU-20251104.ics");
	assert!(spanish
		.to_ics()
		.contains("DTSTART;TZID=America/New_York:20251104T183000\r\n"));

	assert!(matches!(results[2], Err(Error::InvalidTime(ref s)) if s == "7pm"));
}

#[test]
fn reads_schedule_from_reader() {
	let document = page::parse_from_read(PAGE.as_bytes()).unwrap();
	let table = page::course_slots(&document);

	assert_eq!(page::slots_for(&table, &["Spanish A2"]), ["Tue 6:30–7:30 pm ET"]);
	assert!(page::slots_for(&table, &["French A1"]).is_empty());
}

#[test]
fn missing_file_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();

	assert!(matches!(
		page::parse_from_file(dir.path().join("missing.html")),
		Err(Error::Io(_))
	));
}
