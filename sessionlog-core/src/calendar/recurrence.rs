//! RRULE expansion for recurring events.

use chrono::{DateTime, Utc};
use rrule::RRuleSet;

use super::ics::Recurrence;
use super::time::EventTime;

/// Build an iCalendar-format RRULE string for the rrule crate parser.
fn build_rrule_string(start: &EventTime, recurrence: &Recurrence) -> String {
    let mut lines = vec![format!("DTSTART{}", rrule_time(start))];
    lines.push(format!("RRULE:{}", recurrence.rrule));

    for exdate in &recurrence.exdates {
        lines.push(format!("EXDATE{}", rrule_time(exdate)));
    }

    lines.join("\n")
}

/// The rrule crate needs datetimes, so dates become midnight UTC and
/// floating times are expanded as if they were UTC. `occurrence_time`
/// reverses both. A TZID chrono-tz does not know is read as floating,
/// otherwise the rrule parser rejects the whole series.
fn rrule_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(d) => format!(":{}T000000Z", d.format("%Y%m%d")),
        EventTime::DateTimeUtc(dt) => format!(":{}", dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::DateTimeFloating(dt) => format!(":{}Z", dt.format("%Y%m%dT%H%M%S")),
        EventTime::DateTimeZoned { datetime, tzid } if tzid.parse::<chrono_tz::Tz>().is_ok() => {
            format!(";TZID={}:{}", tzid, datetime.format("%Y%m%dT%H%M%S"))
        }
        EventTime::DateTimeZoned { datetime, .. } => {
            format!(":{}Z", datetime.format("%Y%m%dT%H%M%S"))
        }
    }
}

/// Convert an rrule occurrence back to an EventTime matching the master's variant.
fn occurrence_time(dt: &DateTime<rrule::Tz>, master_start: &EventTime) -> EventTime {
    match master_start {
        EventTime::Date(_) => EventTime::Date(dt.date_naive()),
        EventTime::DateTimeUtc(_) => EventTime::DateTimeUtc(dt.with_timezone(&Utc)),
        EventTime::DateTimeFloating(_) => EventTime::DateTimeFloating(dt.naive_utc()),
        EventTime::DateTimeZoned { tzid, .. } => EventTime::DateTimeZoned {
            datetime: dt.naive_local(),
            tzid: tzid.clone(),
        },
    }
}

/// Start times of the occurrences of a recurring event between `from` and
/// `to`, with EXDATEs removed. The caller narrows these to the exact day.
pub fn occurrences(
    start: &EventTime,
    recurrence: &Recurrence,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<EventTime>, String> {
    let rrule_set: RRuleSet = build_rrule_string(start, recurrence)
        .parse()
        .map_err(|e| format!("{e}"))?;

    let tz: rrule::Tz = Utc.into();
    let result = rrule_set
        .after(from.with_timezone(&tz))
        .before(to.with_timezone(&tz))
        .all(MAX_OCCURRENCES);

    Ok(result
        .dates
        .iter()
        .map(|dt| occurrence_time(dt, start))
        .collect())
}

/// More than enough for the few days around one queried day.
const MAX_OCCURRENCES: u16 = 512;
