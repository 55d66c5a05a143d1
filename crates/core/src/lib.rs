#![warn(clippy::pedantic)]

pub mod document;
pub mod error;
pub mod filename;
pub mod page;
pub mod request;
pub mod time;
pub mod timezone;
pub mod weekday;

pub use document::{CalendarDocument, Stamp};
pub use error::{Error, Result};
pub use request::{EventRequest, TriggerAttributes};
pub use timezone::TZ;
pub use weekday::WeekdaySet;

/// Builds a calendar document from raw trigger attributes.
///
/// ## Errors
/// Returns the first invalid attribute; nothing is built in that case.
pub fn create_calendar(attrs: &TriggerAttributes) -> Result<CalendarDocument> {
	let request = EventRequest::try_from(attrs)?;

	Ok(CalendarDocument::new(request))
}
