//! Local calendar directories as an event source.
//!
//! A calendar is a directory of `.ics` files inside the calendar root, one
//! event (plus any instance overrides) per file.

mod ics;
mod recurrence;
mod time;

pub use ics::{CalendarEntry, Recurrence, parse_entries};
pub use time::{DayWindow, EventTime};

use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::error::{SessionLogError, SessionLogResult};
use crate::event::{EventSource, RawEvent};

/// Slack around the queried day when expanding recurrences, on top of the
/// event's own length. Covers timezone offsets between rule and machine.
const EXPANSION_MARGIN_DAYS: i64 = 2;

pub struct IcsCalendar {
    id: String,
    path: PathBuf,
}

impl IcsCalendar {
    /// Resolve `id` to a calendar directory under `root`.
    pub fn open(root: &Path, id: &str) -> SessionLogResult<Self> {
        let path = root.join(id);

        if id.trim().is_empty() || !path.is_dir() {
            return Err(SessionLogError::CalendarNotFound(format!(
                "'{}' is not a calendar in {}. \
                 Check `calendar_id` and `calendar_dir` in your config",
                id,
                root.display()
            )));
        }

        Ok(IcsCalendar {
            id: id.to_string(),
            path,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every parseable entry in the calendar, in file name order.
    pub fn entries(&self) -> SessionLogResult<Vec<CalendarEntry>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == "ics"))
            .collect();
        paths.sort();

        let mut entries = Vec::new();
        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .ok()
                .and_then(|content| parse_entries(&content));

            match parsed {
                Some(found) => entries.extend(found),
                None => tracing::warn!(path = %path.display(), "Skipping unreadable event file"),
            }
        }

        Ok(entries)
    }
}

impl EventSource for IcsCalendar {
    fn events_for_day(&self, date: NaiveDate) -> SessionLogResult<Vec<RawEvent>> {
        let window = DayWindow::for_date(date);
        let entries = self.entries()?;

        // Overrides match occurrences by instant, RECURRENCE-ID may use a
        // different form (UTC, other zone) than the master's DTSTART.
        let overrides: Vec<(&str, NaiveDateTime)> = entries
            .iter()
            .filter_map(|e| {
                let rid = e.recurrence_id.as_ref()?;
                Some((e.uid.as_str(), rid.to_local_naive()))
            })
            .collect();

        let mut found: Vec<(NaiveDateTime, &CalendarEntry)> = Vec::new();

        for entry in entries.iter().filter(|e| !e.cancelled) {
            let start = entry.start.to_local_naive();
            let end = entry.end.as_ref().map(EventTime::to_local_naive);

            let recurrence = match (&entry.recurrence, &entry.recurrence_id) {
                (Some(recurrence), None) => recurrence,
                _ => {
                    if window.overlaps(start, end) {
                        found.push((start, entry));
                    }
                    continue;
                }
            };

            let length = end.map(|end| end - start).unwrap_or_else(Duration::zero);
            let margin = length.max(Duration::zero()) + Duration::days(EXPANSION_MARGIN_DAYS);
            let (from, to) = window.to_utc_widened(margin);

            let occurrences = match recurrence::occurrences(&entry.start, recurrence, from, to) {
                Ok(occurrences) => occurrences,
                Err(e) => {
                    tracing::warn!(
                        uid = %entry.uid,
                        error = %e,
                        "Skipping event with unusable recurrence rule"
                    );
                    continue;
                }
            };

            for occurrence in occurrences {
                let occ_start = occurrence.to_local_naive();
                if overrides.contains(&(entry.uid.as_str(), occ_start)) {
                    continue;
                }
                let occ_end = end.map(|_| occ_start + length);
                if window.overlaps(occ_start, occ_end) {
                    found.push((occ_start, entry));
                }
            }
        }

        // Stable sort keeps file order for events starting together
        found.sort_by_key(|(start, _)| *start);

        tracing::debug!(calendar = %self.id, %date, count = found.len(), "Fetched events");

        Ok(found
            .into_iter()
            .map(|(_, entry)| {
                RawEvent::new(entry.summary.clone(), entry.description.as_deref(), date)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEKLY_MASTER: &[&str] = &[
        "UID:weekly",
        "SUMMARY:Blades: weekly",
        "DTSTART:20250303T190000",
        "DTEND:20250303T220000",
        "RRULE:FREQ=WEEKLY;BYDAY=MO",
    ];

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    /// A VCALENDAR holding one VEVENT per property list.
    fn vevent(events: &[&[&str]]) -> String {
        let mut body = String::from("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\n");
        for properties in events {
            body.push_str("BEGIN:VEVENT\r\n");
            for property in *properties {
                body.push_str(property);
                body.push_str("\r\n");
            }
            body.push_str("END:VEVENT\r\n");
        }
        body.push_str("END:VCALENDAR\r\n");
        body
    }

    fn calendar_with(files: &[(&str, String)]) -> (tempfile::TempDir, IcsCalendar) {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("games");
        std::fs::create_dir(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        let calendar = IcsCalendar::open(root.path(), "games").unwrap();
        (root, calendar)
    }

    fn titles(calendar: &IcsCalendar) -> Vec<String> {
        calendar
            .events_for_day(day())
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect()
    }

    #[test]
    fn unknown_calendar_is_not_found() {
        let root = tempfile::tempdir().unwrap();
        let result = IcsCalendar::open(root.path(), "missing");
        let Err(SessionLogError::CalendarNotFound(msg)) = result else {
            panic!("Expected CalendarNotFound");
        };
        assert!(msg.contains("missing"));

        assert!(IcsCalendar::open(root.path(), "").is_err());
    }

    #[test]
    fn picks_events_of_the_day_in_start_order() {
        let (_root, calendar) = calendar_with(&[
            (
                "a.ics",
                vevent(&[&[
                    "UID:late",
                    "SUMMARY:Late game",
                    "DTSTART:20250310T200000",
                    "DTEND:20250310T230000",
                ]]),
            ),
            (
                "b.ics",
                vevent(&[&[
                    "UID:early",
                    "SUMMARY:Early game",
                    "DTSTART:20250310T100000",
                    "DTEND:20250310T120000",
                ]]),
            ),
            (
                "c.ics",
                vevent(&[&[
                    "UID:other",
                    "SUMMARY:Tomorrow",
                    "DTSTART:20250311T100000",
                    "DTEND:20250311T120000",
                ]]),
            ),
            (
                "d.ics",
                vevent(&[&[
                    "UID:allday",
                    "SUMMARY:Con day",
                    "DTSTART;VALUE=DATE:20250310",
                    "DTEND;VALUE=DATE:20250311",
                ]]),
            ),
            ("notes.txt", "System: ignored".to_string()),
        ]);

        assert_eq!(titles(&calendar), vec!["Con day", "Early game", "Late game"]);
    }

    #[test]
    fn events_carry_description_and_query_date() {
        let (_root, calendar) = calendar_with(&[(
            "s.ics",
            vevent(&[&[
                "UID:s",
                "SUMMARY:Strahd: #3",
                "DTSTART:20250310T180000",
                "DTEND:20250310T220000",
                "DESCRIPTION:System: D&D 5e\\nType: gm",
            ]]),
        )]);

        let events = calendar.events_for_day(day()).unwrap();
        assert_eq!(
            events,
            vec![RawEvent::new("Strahd: #3", Some("System: D&D 5e\nType: gm"), day())]
        );
    }

    #[test]
    fn cancelled_and_broken_files_are_skipped() {
        let (_root, calendar) = calendar_with(&[
            (
                "cancelled.ics",
                vevent(&[&[
                    "UID:c",
                    "SUMMARY:Called off",
                    "DTSTART:20250310T180000",
                    "DTEND:20250310T220000",
                    "STATUS:CANCELLED",
                ]]),
            ),
            ("broken.ics", "this is not a calendar".to_string()),
            (
                "ok.ics",
                vevent(&[&[
                    "UID:ok",
                    "SUMMARY:Still on",
                    "DTSTART:20250310T180000",
                    "DTEND:20250310T220000",
                ]]),
            ),
        ]);

        assert_eq!(titles(&calendar), vec!["Still on"]);
    }

    #[test]
    fn recurring_sessions_expand_onto_the_day() {
        let (_root, calendar) = calendar_with(&[("weekly.ics", vevent(&[WEEKLY_MASTER]))]);

        assert_eq!(titles(&calendar), vec!["Blades: weekly"]);

        let tuesday = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert!(calendar.events_for_day(tuesday).unwrap().is_empty());
    }

    #[test]
    fn exdate_removes_the_occurrence() {
        let mut master = WEEKLY_MASTER.to_vec();
        master.push("EXDATE:20250310T190000");
        let (_root, calendar) = calendar_with(&[("weekly.ics", vevent(&[&master]))]);

        assert!(titles(&calendar).is_empty());
    }

    #[test]
    fn override_replaces_the_occurrence() {
        let (_root, calendar) = calendar_with(&[(
            "weekly.ics",
            vevent(&[
                WEEKLY_MASTER,
                &[
                    "UID:weekly",
                    "SUMMARY:Blades: double session",
                    "RECURRENCE-ID:20250310T190000",
                    "DTSTART:20250310T170000",
                    "DTEND:20250310T230000",
                ],
            ]),
        )]);

        assert_eq!(titles(&calendar), vec!["Blades: double session"]);
    }

    #[test]
    fn override_in_another_time_form_replaces_the_occurrence() {
        // Master in UTC-named zone, override addressed with a UTC RECURRENCE-ID
        let (_root, calendar) = calendar_with(&[(
            "weekly.ics",
            vevent(&[
                &[
                    "UID:weekly",
                    "SUMMARY:Blades: weekly",
                    "DTSTART;TZID=Etc/UTC:20250303T120000",
                    "DTEND;TZID=Etc/UTC:20250303T130000",
                    "RRULE:FREQ=WEEKLY;BYDAY=MO",
                ],
                &[
                    "UID:weekly",
                    "SUMMARY:Blades: moved",
                    "RECURRENCE-ID:20250310T120000Z",
                    "DTSTART:20250310T120000Z",
                    "DTEND:20250310T130000Z",
                ],
            ]),
        )]);

        assert_eq!(titles(&calendar), vec!["Blades: moved"]);
    }

    #[test]
    fn cancelled_override_drops_the_occurrence() {
        let (_root, calendar) = calendar_with(&[(
            "weekly.ics",
            vevent(&[
                WEEKLY_MASTER,
                &[
                    "UID:weekly",
                    "SUMMARY:Blades: weekly",
                    "RECURRENCE-ID:20250310T190000",
                    "DTSTART:20250310T190000",
                    "DTEND:20250310T220000",
                    "STATUS:CANCELLED",
                ],
            ]),
        )]);

        assert!(titles(&calendar).is_empty());
    }

    #[test]
    fn unknown_tzid_reads_as_local_time() {
        let (_root, calendar) = calendar_with(&[
            (
                "one-off.ics",
                vevent(&[&[
                    "UID:one-off",
                    "SUMMARY:One-off",
                    "DTSTART;TZID=Custom/Zone:20250310T120000",
                    "DTEND;TZID=Custom/Zone:20250310T140000",
                ]]),
            ),
            (
                "weekly.ics",
                vevent(&[&[
                    "UID:weekly",
                    "SUMMARY:Weekly",
                    "DTSTART;TZID=Custom/Zone:20250303T150000",
                    "DTEND;TZID=Custom/Zone:20250303T170000",
                    "RRULE:FREQ=WEEKLY;BYDAY=MO",
                ]]),
            ),
        ]);

        assert_eq!(titles(&calendar), vec!["One-off", "Weekly"]);
    }
}
