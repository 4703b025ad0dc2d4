//! Logging one day's sessions.

use chrono::NaiveDate;

use crate::config::SessionLogConfig;
use crate::error::SessionLogResult;
use crate::event::EventSource;
use crate::parse::TitlePrefix;
use crate::record::SessionRecord;
use crate::sink::TableSink;

/// What a daily run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub date: NaiveDate,
    /// Events the source returned for the day.
    pub fetched: usize,
    /// Events left after the title prefix filter.
    pub matched: usize,
    /// Rows appended to the sink. Zero on a dry run.
    pub written: usize,
    pub records: Vec<SessionRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub prefix: TitlePrefix,
    /// Build records without appending them.
    pub dry_run: bool,
}

impl RunOptions {
    pub fn from_config(config: &SessionLogConfig) -> Self {
        RunOptions {
            prefix: config.title_prefix(),
            dry_run: false,
        }
    }
}

/// Log every session on `date`.
///
/// Events are handled one at a time in source order. A failed append stops
/// the run; rows already written stay written. Running the same day twice
/// appends the same rows twice.
pub fn run_daily(
    source: &dyn EventSource,
    sink: &mut dyn TableSink,
    date: NaiveDate,
    options: &RunOptions,
) -> SessionLogResult<RunSummary> {
    let events = source.events_for_day(date)?;

    let mut summary = RunSummary {
        date,
        fetched: events.len(),
        matched: 0,
        written: 0,
        records: Vec::new(),
    };

    if events.is_empty() {
        tracing::info!(%date, "No events found");
        return Ok(summary);
    }

    let prefix = &options.prefix;
    let sessions: Vec<_> = events
        .iter()
        .filter(|event| {
            let keep = prefix.matches(&event.title);
            if !keep {
                tracing::debug!(
                    title = %event.title,
                    prefix = prefix.as_str(),
                    "Skipping event without prefix"
                );
            }
            keep
        })
        .collect();
    summary.matched = sessions.len();

    if sessions.is_empty() {
        tracing::info!(%date, prefix = prefix.as_str(), "No events match the title prefix");
        return Ok(summary);
    }

    for event in sessions {
        let title = prefix.strip(&event.title);
        let record = SessionRecord::build(date, title, event.description.as_deref());

        if !options.dry_run {
            sink.append_row(&record)?;
            summary.written += 1;
            tracing::info!(campaign = %record.campaign_name, %date, "Logged session");
        }

        summary.records.push(record);
    }

    Ok(summary)
}
