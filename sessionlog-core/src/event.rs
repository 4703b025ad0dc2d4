//! Raw calendar events and the source that supplies them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::SessionLogResult;

/// A calendar event as handed over by an event source.
///
/// `date` is the local day the event was fetched for, not its start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
}

impl RawEvent {
    pub fn new(title: impl Into<String>, description: Option<&str>, date: NaiveDate) -> Self {
        RawEvent {
            title: title.into(),
            description: description.map(str::to_string),
            date,
        }
    }
}

/// Supplies the events of one local calendar day.
pub trait EventSource {
    /// Events overlapping `date` (local 00:00 up to the next midnight), in a
    /// stable order for a given query.
    fn events_for_day(&self, date: NaiveDate) -> SessionLogResult<Vec<RawEvent>>;
}
