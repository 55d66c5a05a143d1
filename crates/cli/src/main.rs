#![warn(clippy::pedantic)]

use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use course_ics_core::{
	page::{self, Document},
	request::{DEFAULT_BYDAY, DEFAULT_COUNT, DEFAULT_DATE, DEFAULT_END, DEFAULT_START, DEFAULT_TITLE},
	CalendarDocument, EventRequest, TriggerAttributes,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "course-ics", about = "Generate recurring course calendars (.ics)")]
struct Args {
	/// Log debug output to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
	/// Number of sessions in each calendar
	#[arg(long, global = true, env = "COURSE_ICS_COUNT", default_value_t = DEFAULT_COUNT)]
	count: u32,
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand)]
enum Command {
	/// Build one calendar from explicit parameters
	Event {
		#[arg(long, default_value = DEFAULT_TITLE)]
		title: String,
		/// Comma-separated weekday codes, e.g. MO,WE
		#[arg(long, default_value = DEFAULT_BYDAY)]
		byday: String,
		/// Start time, 24h HH:MM
		#[arg(long, default_value = DEFAULT_START)]
		start: String,
		/// End time, 24h HH:MM
		#[arg(long, default_value = DEFAULT_END)]
		end: String,
		/// Any day in the first week, YYYY-MM-DD
		#[arg(long, default_value = DEFAULT_DATE)]
		date: String,
		/// File or directory to write to (stdout if omitted)
		#[arg(short, long, value_hint = clap::ValueHint::AnyPath)]
		output: Option<PathBuf>,
		/// Print session start times instead of the calendar
		#[arg(long)]
		preview: bool,
	},
	/// Build a calendar for every "Add to Calendar" trigger on a page
	Page {
		#[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
		path: Option<PathBuf>,
		#[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
		output: PathBuf,
	},
	/// List the time slots of the schedule table
	Slots {
		#[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
		path: Option<PathBuf>,
		/// Enrollment form values to show, e.g. "French A1"
		courses: Vec<String>,
	},
}

fn main() -> Result<()> {
	let args = Args::parse();
	let default_filter = if args.verbose { "debug" } else { "warn" };

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
		)
		.with_writer(io::stderr)
		.init();

	match args.command {
		Command::Event {
			title,
			byday,
			start,
			end,
			date,
			output,
			preview,
		} => {
			let attrs = TriggerAttributes {
				title: Some(title),
				byday: Some(byday),
				start: Some(start),
				end: Some(end),
				date: Some(date),
			};
			let request = EventRequest::try_from(&attrs)?.with_count(args.count)?;
			let document = CalendarDocument::new(request);

			if preview {
				print_sessions(&document)
			} else {
				write_document(&document, output.as_deref())
			}
		}
		Command::Page { path, output } => cmd_page(&read_page(path)?, &output, args.count),
		Command::Slots { path, courses } => cmd_slots(&read_page(path)?, &courses),
	}
}

fn read_page(path: Option<PathBuf>) -> Result<Document> {
	Ok(match path {
		Some(path) => page::parse_from_file(&path)
			.with_context(|| format!("failed to read {}", path.display()))?,
		None => page::parse_from_read(io::stdin().lock()).context("failed to read stdin")?,
	})
}

fn write_document(document: &CalendarDocument, output: Option<&Path>) -> Result<()> {
	let Some(output) = output else {
		write!(&mut io::stdout().lock(), "{document}")?;
		return Ok(());
	};

	let path = if output.is_dir() {
		output.join(document.filename())
	} else {
		output.to_path_buf()
	};

	let mut file =
		File::create(&path).with_context(|| format!("failed to create {}", path.display()))?;
	write!(&mut file, "{document}")?;

	info!(
		path = %path.display(),
		uid = document.uid(),
		created = %document.created(),
		"wrote calendar"
	);

	Ok(())
}

fn print_sessions(document: &CalendarDocument) -> Result<()> {
	let mut stdout = io::stdout().lock();
	let length = document.request().end() - document.request().start();

	for start in document.occurrences()? {
		writeln!(
			&mut stdout,
			"{} - {}",
			start.format("%a %Y-%m-%d %H:%M"),
			(start + length).format("%H:%M %Z")
		)?;
	}

	Ok(())
}

fn cmd_page(document: &Document, output: &Path, count: u32) -> Result<()> {
	let triggers = page::triggers(document);
	let mut failed = 0;

	fs::create_dir_all(output).with_context(|| format!("failed to create {}", output.display()))?;

	for (i, attrs) in triggers.iter().enumerate() {
		let request = match EventRequest::try_from(attrs).and_then(|r| r.with_count(count)) {
			Ok(request) => request,
			Err(err) => {
				warn!(trigger = i, title = attrs.title(), %err, "skipping calendar trigger");
				failed += 1;
				continue;
			}
		};

		write_document(&CalendarDocument::new(request), Some(output))?;
	}

	if failed > 0 {
		bail!("{failed} of {} calendar triggers could not be built", triggers.len());
	}

	Ok(())
}

fn cmd_slots(document: &Document, courses: &[String]) -> Result<()> {
	let table = page::course_slots(document);
	let mut stdout = io::stdout().lock();

	if courses.is_empty() {
		for course in &table {
			writeln!(&mut stdout, "{}", course.course)?;

			for slot in &course.slots {
				writeln!(&mut stdout, "  {slot}")?;
			}
		}

		return Ok(());
	}

	for course in courses {
		let slots = page::slots_for(&table, &[course.as_str()]);

		if slots.is_empty() {
			writeln!(&mut stdout, "{course}: no time slots found")?;
			continue;
		}

		writeln!(&mut stdout, "{course}")?;

		for slot in slots {
			writeln!(&mut stdout, "  {slot}")?;
		}
	}

	Ok(())
}
