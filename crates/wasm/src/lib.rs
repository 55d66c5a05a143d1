#![warn(clippy::pedantic)]

use course_ics_core::{
	create_calendar, document::MEDIA_TYPE, page::TRIGGER_CLASS, CalendarDocument, TriggerAttributes,
};
use wasm_bindgen::{prelude::*, JsCast};
use web_sys::{Blob, BlobPropertyBag, Element, HtmlAnchorElement, MouseEvent, Url};

/// Set on a trigger whose calendar could not be built, holding the reason.
const ERROR_ATTRIBUTE: &str = "data-ics-error";

fn to_js(err: &course_ics_core::Error) -> JsValue {
	JsError::new(&err.to_string()).into()
}

fn build(
	title: Option<String>,
	byday: Option<String>,
	start: Option<String>,
	end: Option<String>,
	date: Option<String>,
) -> Result<CalendarDocument, JsValue> {
	create_calendar(&TriggerAttributes {
		title,
		byday,
		start,
		end,
		date,
	})
	.map_err(|err| to_js(&err))
}

/// The calendar text for the given trigger parameters.
///
/// Missing parameters take the course defaults.
#[wasm_bindgen]
pub fn build_ics(
	title: Option<String>,
	byday: Option<String>,
	start: Option<String>,
	end: Option<String>,
	date: Option<String>,
) -> Result<String, JsValue> {
	Ok(build(title, byday, start, end, date)?.to_ics())
}

#[wasm_bindgen]
pub fn ics_filename(
	title: Option<String>,
	byday: Option<String>,
	start: Option<String>,
	end: Option<String>,
	date: Option<String>,
) -> Result<String, JsValue> {
	Ok(build(title, byday, start, end, date)?.filename())
}

/// Builds the calendar and offers it as a download.
///
/// Nothing is downloaded when the parameters are invalid.
#[wasm_bindgen]
pub fn add_to_calendar(
	title: Option<String>,
	byday: Option<String>,
	start: Option<String>,
	end: Option<String>,
	date: Option<String>,
) -> Result<(), JsValue> {
	download(&build(title, byday, start, end, date)?)
}

/// Makes every `.add-to-calendar` element download its calendar on click.
///
/// Returns the number of elements bound.
#[wasm_bindgen]
pub fn bind_calendar_buttons() -> Result<u32, JsValue> {
	let nodes = page()?.query_selector_all(&format!(".{TRIGGER_CLASS}"))?;
	let mut bound = 0;

	for i in 0..nodes.length() {
		let Some(element) = nodes.item(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
			continue;
		};

		let target = element.clone();
		let on_click = Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| {
			event.prevent_default();
			on_trigger(&target);
		});

		element.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
		// handlers live as long as the page
		on_click.forget();
		bound += 1;
	}

	Ok(bound)
}

fn on_trigger(element: &Element) {
	let attrs = TriggerAttributes {
		title: element.get_attribute("data-title"),
		byday: element.get_attribute("data-byday"),
		start: element.get_attribute("data-start"),
		end: element.get_attribute("data-end"),
		date: element.get_attribute("data-date"),
	};

	let result = match create_calendar(&attrs) {
		Ok(document) => download(&document),
		Err(err) => {
			report(element.set_attribute(ERROR_ATTRIBUTE, &err.to_string()), log_error);
			Err(to_js(&err))
		}
	};

	report(result.and_then(|()| element.remove_attribute(ERROR_ATTRIBUTE)), log_error);
}

fn log_error(err: &JsValue) {
	web_sys::console::error_1(err);
}

/// Hands a failed DOM update to `log`; click handlers have no caller to return it to.
fn report<E>(result: Result<(), E>, log: impl FnOnce(&E)) {
	if let Err(err) = &result {
		log(err);
	}
}

fn page() -> Result<web_sys::Document, JsValue> {
	web_sys::window()
		.and_then(|window| window.document())
		.ok_or_else(|| JsValue::from_str("no document available"))
}

/// An object URL that is revoked when dropped.
struct ObjectUrl(String);

impl ObjectUrl {
	fn new(blob: &Blob) -> Result<Self, JsValue> {
		Url::create_object_url_with_blob(blob).map(Self)
	}
}

impl Drop for ObjectUrl {
	fn drop(&mut self) {
		let _ = Url::revoke_object_url(&self.0);
	}
}

fn download(document: &CalendarDocument) -> Result<(), JsValue> {
	let page = page()?;
	let body = page
		.body()
		.ok_or_else(|| JsValue::from_str("document has no body"))?;

	let parts = js_sys::Array::of1(&JsValue::from_str(&document.to_ics()));
	let options = BlobPropertyBag::new();
	options.set_type(MEDIA_TYPE);

	let blob = Blob::new_with_str_sequence_and_options(&parts, &options)?;
	let url = ObjectUrl::new(&blob)?;

	let anchor: HtmlAnchorElement = page.create_element("a")?.dyn_into()?;
	anchor.set_href(&url.0);
	anchor.set_download(&document.filename());

	body.append_child(&anchor)?;
	anchor.click();
	anchor.remove();

	Ok(())
}
