//! Core of sessionlog.
//!
//! Reads a day's events from a calendar, pulls session metadata out of each
//! event's title and description, and appends one row per session to a sheet:
//! - `parse` holds the title, description and session type parsers
//! - `record` assembles a `SessionRecord` from those parts
//! - `calendar` and `sink` are the local adapters behind `EventSource` / `TableSink`
//! - `daily` wires everything together for a single day

pub mod calendar;
pub mod config;
pub mod daily;
pub mod error;
pub mod event;
pub mod parse;
pub mod record;
pub mod schedule;
pub mod sink;

pub use error::{SessionLogError, SessionLogResult};
pub use event::RawEvent;
pub use record::SessionRecord;
