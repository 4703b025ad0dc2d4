//! ICS file parsing using the icalendar crate's parser.

use chrono::{NaiveDate, NaiveDateTime};
use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use super::time::EventTime;

/// One VEVENT, reduced to what session logging needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarEntry {
    pub uid: String,
    pub summary: String,
    pub description: Option<String>,
    pub start: EventTime,
    pub end: Option<EventTime>,
    pub cancelled: bool,
    pub recurrence: Option<Recurrence>,
    /// Set on instance overrides of a recurring event.
    pub recurrence_id: Option<EventTime>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recurrence {
    pub rrule: String,
    pub exdates: Vec<EventTime>,
}

/// Parse every VEVENT in an ICS document. Returns None if the document
/// itself is unreadable; events missing DTSTART are left out.
pub fn parse_entries(content: &str) -> Option<Vec<CalendarEntry>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).ok()?;

    let entries = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(parse_vevent)
        .collect();

    Some(entries)
}

fn parse_vevent(vevent: &Component) -> Option<CalendarEntry> {
    let start = to_event_time(DatePerhapsTime::try_from(vevent.find_prop("DTSTART")?).ok()?);
    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    let uid = vevent
        .find_prop("UID")
        .map(|p| p.val.to_string())
        .unwrap_or_default();
    let summary = vevent
        .find_prop("SUMMARY")
        .map(|p| unescape_text(p.val.as_ref()))
        .unwrap_or_default();
    let description = vevent
        .find_prop("DESCRIPTION")
        .map(|p| unescape_text(p.val.as_ref()));

    let cancelled = vevent
        .find_prop("STATUS")
        .is_some_and(|p| p.val.as_ref() == "CANCELLED");

    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();
    let recurrence = rrule.map(|rrule| Recurrence { rrule, exdates });

    let recurrence_id = vevent
        .find_prop("RECURRENCE-ID")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    Some(CalendarEntry {
        uid,
        summary,
        description,
        start,
        end,
        cancelled,
        recurrence,
        recurrence_id,
    })
}

/// Undo RFC 5545 TEXT escaping (`\n`, `\,`, `\;`, `\\`).
fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n' | 'N') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

/// Convert icalendar's DatePerhapsTime to our EventTime, preserving timezone info
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTimeUtc(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTimeFloating(naive),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                EventTime::DateTimeZoned {
                    datetime: date_time,
                    tzid,
                }
            }
        },
    }
}

/// Parse an EXDATE property, which may carry TZID or VALUE=DATE and hold
/// several comma-separated values.
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let tzid = prop
        .params
        .iter()
        .find(|p| p.key == "TZID")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()));

    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            if is_date {
                return NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(EventTime::Date);
            }
            let utc = s.strip_suffix('Z');
            let datetime = NaiveDateTime::parse_from_str(utc.unwrap_or(s), "%Y%m%dT%H%M%S").ok()?;
            Some(match (&tzid, utc) {
                (Some(tz), _) => EventTime::DateTimeZoned {
                    datetime,
                    tzid: tz.clone(),
                },
                (None, Some(_)) => EventTime::DateTimeUtc(datetime.and_utc()),
                (None, None) => EventTime::DateTimeFloating(datetime),
            })
        })
        .collect()
}
