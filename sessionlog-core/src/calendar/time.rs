//! Event start/end times and local-day arithmetic.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// A DTSTART/DTEND/RECURRENCE-ID value, keeping the form it was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum EventTime {
    Date(NaiveDate),
    DateTimeUtc(chrono::DateTime<Utc>),
    /// No timezone: read as wall-clock time wherever the log runs.
    DateTimeFloating(NaiveDateTime),
    DateTimeZoned {
        datetime: NaiveDateTime,
        tzid: String,
    },
}

impl EventTime {
    /// Wall-clock time on this machine. All-day dates start at midnight.
    pub fn to_local_naive(&self) -> NaiveDateTime {
        match self {
            EventTime::Date(d) => d.and_time(NaiveTime::MIN),
            EventTime::DateTimeUtc(dt) => dt.with_timezone(&Local).naive_local(),
            EventTime::DateTimeFloating(dt) => *dt,
            EventTime::DateTimeZoned { datetime, tzid } => zoned_to_local(datetime, tzid),
        }
    }
}

/// Unknown zones and times skipped by a DST jump fall back to floating.
fn zoned_to_local(datetime: &NaiveDateTime, tzid: &str) -> NaiveDateTime {
    let Ok(tz) = tzid.parse::<Tz>() else {
        tracing::debug!(tzid, "Unknown TZID, reading time as local");
        return *datetime;
    };
    match tz.from_local_datetime(datetime).earliest() {
        Some(zoned) => zoned.with_timezone(&Local).naive_local(),
        None => *datetime,
    }
}

/// Local `[00:00, next 00:00)` window of a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        let start = date.and_time(NaiveTime::MIN);
        DayWindow {
            start,
            end: start + Duration::days(1),
        }
    }

    /// Whether `[start, end)` touches the window. Zero-length and
    /// open-ended events count when they start inside it.
    pub fn overlaps(&self, start: NaiveDateTime, end: Option<NaiveDateTime>) -> bool {
        match end {
            Some(end) if end > start => start < self.end && end > self.start,
            _ => start >= self.start && start < self.end,
        }
    }

    /// The window as UTC instants, widened by `margin` on both sides.
    pub fn to_utc_widened(
        &self,
        margin: Duration,
    ) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
        let to_utc = |naive: NaiveDateTime| {
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| naive.and_utc())
        };
        (to_utc(self.start - margin), to_utc(self.end + margin))
    }
}
