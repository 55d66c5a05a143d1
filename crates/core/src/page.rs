//! Reads course pages: calendar triggers and the schedule table.

use std::{fs::File, io::Read, path::Path};

use select::{
	node::Node,
	predicate::{Class, Name, Predicate},
};
pub use select::document::Document;
use tracing::debug;

use crate::{request::TriggerAttributes, Result};

/// Class carried by every "Add to Calendar" element.
pub const TRIGGER_CLASS: &str = "add-to-calendar";

/// Enrollment form values and the schedule table titles they refer to.
const COURSE_TABLE_KEYS: [(&str, &str); 6] = [
	("French A1", "French A1 Beginner"),
	("French A2", "French A2 High Beginner"),
	("French B1", "French B1 Intermediate"),
	("Spanish A1", "Spanish A1 Beginner"),
	("Spanish A2", "Spanish A2 High Beginner"),
	("Spanish B1", "Spanish B1 Intermediate"),
];

/// Time slot labels listed for one course in the schedule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSlots {
	pub course: String,
	pub slots: Vec<String>,
}

/// ## Errors
/// Returns an error if the file cannot be opened or read.
pub fn parse_from_file<P: AsRef<Path>>(path: P) -> Result<Document> {
	let file = File::open(path)?;

	parse_from_read(file)
}

/// ## Errors
/// Returns an error if reading fails.
pub fn parse_from_read<R: Read>(reader: R) -> Result<Document> {
	Ok(Document::from_read(reader)?)
}

#[must_use]
pub fn parse_from_buf(html: &str) -> Document {
	Document::from(html)
}

fn attr(node: &Node, name: &str) -> Option<String> {
	node.attr(name).map(str::to_string)
}

fn collapse_whitespace(s: &str) -> String {
	s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Every calendar trigger on the page, in document order.
#[must_use]
pub fn triggers(document: &Document) -> Vec<TriggerAttributes> {
	let triggers = document
		.find(Class(TRIGGER_CLASS))
		.map(|node| TriggerAttributes {
			title: attr(&node, "data-title"),
			byday: attr(&node, "data-byday"),
			start: attr(&node, "data-start"),
			end: attr(&node, "data-end"),
			date: attr(&node, "data-date"),
		})
		.collect::<Vec<_>>();

	debug!(count = triggers.len(), "found calendar triggers");

	triggers
}

/// Scrapes `table.course-table` rows into per-course slot labels.
///
/// A row needs a `.lvl` title cell and a `.times-td` cell; each `.time-line`
/// inside the latter contributes the text of its first child node. Rows
/// without any label are skipped.
#[must_use]
pub fn course_slots(document: &Document) -> Vec<CourseSlots> {
	let rows = Name("table")
		.and(Class("course-table"))
		.descendant(Name("tbody"))
		.descendant(Name("tr"));

	let courses = document
		.find(rows)
		.filter_map(|row| {
			let title = row.find(Class("lvl")).next()?;
			let times = row.find(Class("times-td")).next()?;

			let slots = times
				.find(Class("time-line"))
				.filter_map(|line| {
					let text = collapse_whitespace(&line.first_child()?.text());

					(!text.is_empty()).then_some(text)
				})
				.collect::<Vec<_>>();

			if slots.is_empty() {
				return None;
			}

			Some(CourseSlots {
				course: collapse_whitespace(&title.text()),
				slots,
			})
		})
		.collect::<Vec<_>>();

	debug!(count = courses.len(), "scraped schedule table");

	courses
}

/// The schedule table title for an enrollment form value.
#[must_use]
pub fn table_key(form_value: &str) -> Option<&'static str> {
	COURSE_TABLE_KEYS
		.iter()
		.find(|(value, _)| *value == form_value)
		.map(|(_, key)| *key)
}

/// Slot labels for the selected form values, in selection order.
///
/// Unknown values and courses missing from the table contribute nothing.
#[must_use]
pub fn slots_for<'a>(table: &'a [CourseSlots], selected: &[&str]) -> Vec<&'a str> {
	selected
		.iter()
		.filter_map(|value| table_key(value))
		.filter_map(|key| table.iter().find(|course| course.course == key))
		.flat_map(|course| course.slots.iter().map(String::as_str))
		.collect()
}
