//! `slots` CLI: check and enumerate free calendar slots from JSON documents.
//!
//! ## Usage
//!
//! ```sh
//! # Is a 45-minute slot free once buffered events are applied?
//! slots check -i calendar.json --start 2024-01-15T09:00:00Z --duration 45
//!
//! # Same slot against the weekly window only, explaining the outcome
//! slots check -i calendar.json --start 2024-01-15T09:00:00Z --mode window --explain
//!
//! # Every free 30-minute slot in the document's range (stdin → stdout)
//! cat calendar.json | slots list
//!
//! # Override the range, write to a file
//! slots list -i calendar.json --from 2024-01-16T00:00:00Z --to 2024-01-17T00:00:00Z -o out.json
//!
//! # First free hour, or free intervals
//! slots first -i calendar.json --duration 60
//! slots free -i calendar.json
//!
//! # Slots (or intervals) free for every attendee
//! slots common -i group.json
//! slots common -i group.json --intervals
//! ```

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slot_engine::{
    common_free_intervals, find_conflicts, first_available_slot, free_intervals,
    is_slot_available, is_slot_available_with_buffer, is_slot_available_with_events,
    list_available_slots, list_available_slots_for_attendees, Attendee, Availability, BusyEvent,
    CandidateSlot, Conflict, DateRange, DEFAULT_SLOT_MINUTES,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Check and enumerate free slots against a weekly availability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Silence all logging
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a single slot is available
    Check {
        #[command(flatten)]
        io: Io,
        /// Slot start (RFC 3339, UTC)
        #[arg(long)]
        start: DateTime<Utc>,
        /// Slot length in minutes
        #[arg(long, default_value_t = DEFAULT_SLOT_MINUTES)]
        duration: u32,
        /// Which rules the slot is checked against
        #[arg(long, value_enum, default_value_t = Mode::Buffered)]
        mode: Mode,
        /// Include the window test and every blocking event in the report
        #[arg(long)]
        explain: bool,
    },
    /// List every free slot in the range
    List {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        range: RangeArgs,
        /// Slot length in minutes
        #[arg(long, default_value_t = DEFAULT_SLOT_MINUTES)]
        duration: u32,
    },
    /// Print the earliest free slot in the range, or null
    First {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        range: RangeArgs,
        /// Slot length in minutes
        #[arg(long, default_value_t = DEFAULT_SLOT_MINUTES)]
        duration: u32,
    },
    /// List the free intervals left in each day's window
    Free {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        range: RangeArgs,
    },
    /// List slots free for every attendee of a group document
    Common {
        #[command(flatten)]
        io: Io,
        #[command(flatten)]
        range: RangeArgs,
        /// Slot length in minutes
        #[arg(long, default_value_t = DEFAULT_SLOT_MINUTES, conflicts_with = "intervals")]
        duration: u32,
        /// Print common free intervals instead of fixed-length slots
        #[arg(long)]
        intervals: bool,
    },
}

#[derive(Args)]
struct Io {
    /// Input JSON document (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,
}

#[derive(Args)]
struct RangeArgs {
    /// Range start, overriding the document's range (RFC 3339, UTC)
    #[arg(long, requires = "to")]
    from: Option<DateTime<Utc>>,
    /// Range end, overriding the document's range (RFC 3339, UTC)
    #[arg(long, requires = "from")]
    to: Option<DateTime<Utc>>,
}

impl RangeArgs {
    fn resolve(&self, document: Option<DateRange>) -> Result<DateRange> {
        match (self.from, self.to) {
            (Some(from), Some(to)) => DateRange::new(from, to).context("Invalid --from/--to range"),
            _ => document
                .context("No range given: add \"range\" to the document or pass --from and --to"),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    /// Weekly window only
    Window,
    /// Window and events, ignoring buffers
    Events,
    /// Window and events with their buffers
    Buffered,
}

/// One person's weekly availability, busy events and an optional range.
#[derive(Deserialize)]
struct CalendarDocument {
    availability: Availability,
    #[serde(default)]
    events: Vec<BusyEvent>,
    range: Option<DateRange>,
}

#[derive(Deserialize)]
struct GroupDocument {
    attendees: Vec<Attendee>,
    range: Option<DateRange>,
}

#[derive(Serialize)]
struct CheckReport {
    slot: CandidateSlot,
    mode: Mode,
    available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    within_window: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conflicts: Option<Vec<Conflict>>,
}

fn init_tracing(quiet: bool, verbose: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose);

    match cli.command {
        Commands::Check {
            io,
            start,
            duration,
            mode,
            explain,
        } => {
            let doc: CalendarDocument = read_document(io.input.as_deref())?;
            let report = check(&doc, CandidateSlot::new(start, duration), mode, explain);
            write_json(io.output.as_deref(), &report)?;
        }
        Commands::List {
            io,
            range,
            duration,
        } => {
            let doc: CalendarDocument = read_document(io.input.as_deref())?;
            let range = range.resolve(doc.range)?;
            let slots = list_available_slots(&doc.availability, &doc.events, &range, duration)
                .context("Failed to list available slots")?;
            write_json(io.output.as_deref(), &slots)?;
        }
        Commands::First {
            io,
            range,
            duration,
        } => {
            let doc: CalendarDocument = read_document(io.input.as_deref())?;
            let range = range.resolve(doc.range)?;
            let slot = first_available_slot(&doc.availability, &doc.events, &range, duration)
                .context("Failed to search for a free slot")?;
            write_json(io.output.as_deref(), &slot)?;
        }
        Commands::Free { io, range } => {
            let doc: CalendarDocument = read_document(io.input.as_deref())?;
            let range = range.resolve(doc.range)?;
            let intervals = free_intervals(&doc.availability, &doc.events, &range)
                .context("Failed to compute free intervals")?;
            write_json(io.output.as_deref(), &intervals)?;
        }
        Commands::Common {
            io,
            range,
            duration,
            intervals,
        } => {
            let doc: GroupDocument = read_document(io.input.as_deref())?;
            let range = range.resolve(doc.range)?;
            debug!(attendees = doc.attendees.len(), intervals, "intersecting calendars");
            if intervals {
                let common = common_free_intervals(&doc.attendees, &range)
                    .context("Failed to compute common free intervals")?;
                write_json(io.output.as_deref(), &common)?;
            } else {
                let slots = list_available_slots_for_attendees(&doc.attendees, &range, duration)
                    .context("Failed to list slots shared by all attendees")?;
                write_json(io.output.as_deref(), &slots)?;
            }
        }
    }

    Ok(())
}

/// Run the check selected by `mode`. With `explain`, the report also carries the
/// window test on its own and the events that block the slot (buffers are
/// stripped first in `events` mode; `window` mode never reports conflicts).
fn check(doc: &CalendarDocument, slot: CandidateSlot, mode: Mode, explain: bool) -> CheckReport {
    let available = match mode {
        Mode::Window => is_slot_available(&doc.availability, &slot),
        Mode::Events => is_slot_available_with_events(&doc.availability, &doc.events, &slot),
        Mode::Buffered => is_slot_available_with_buffer(&doc.availability, &doc.events, &slot),
    };
    debug!(start = %slot.start, duration = slot.duration_minutes, ?mode, available, "checked slot");

    let (within_window, conflicts) = if explain {
        let conflicts = match mode {
            Mode::Window => Vec::new(),
            Mode::Events => {
                let unbuffered: Vec<BusyEvent> = doc
                    .events
                    .iter()
                    .map(|e| BusyEvent::new(e.start, e.end))
                    .collect();
                find_conflicts(&unbuffered, &slot)
            }
            Mode::Buffered => find_conflicts(&doc.events, &slot),
        };
        (Some(is_slot_available(&doc.availability, &slot)), Some(conflicts))
    } else {
        (None, None)
    };

    CheckReport {
        slot,
        mode,
        available,
        within_window,
        conflicts,
    }
}

fn read_document<T: DeserializeOwned>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse document from {}", path.unwrap_or("stdin")))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut pretty = serde_json::to_string_pretty(value)?;
    pretty.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, pretty)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", pretty);
        }
    }
    Ok(())
}
