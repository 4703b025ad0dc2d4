//! Terminal output for daily runs.

use std::path::Path;

use owo_colors::OwoColorize;
use sessionlog_core::daily::RunSummary;
use sessionlog_core::parse::TitlePrefix;
use sessionlog_core::record::SessionRecord;

pub fn summary(summary: &RunSummary, prefix: &TitlePrefix, sheet: &Path, dry_run: bool) -> String {
    let date = summary.date.format("%Y-%m-%d").to_string();

    if summary.fetched == 0 {
        return format!("No events on {date}").dimmed().to_string();
    }
    if summary.matched == 0 {
        return format!(
            "None of the {} {} on {date} start with \"{}\"",
            summary.fetched,
            pluralize("event", summary.fetched),
            prefix.as_str()
        )
        .dimmed()
        .to_string();
    }

    let mut lines = vec![format!("{}", date.bold())];
    lines.extend(summary.records.iter().map(|r| format!("  {}", record(r))));
    lines.push(String::new());

    let count = summary.records.len();
    if dry_run {
        lines.push(
            format!("Dry run: {count} {} not written", pluralize("session", count))
                .yellow()
                .to_string(),
        );
    } else {
        lines.push(format!(
            "{} Logged {} {} to {}",
            "✓".green(),
            summary.written,
            pluralize("session", summary.written),
            sheet.display()
        ));
    }

    lines.join("\n")
}

/// One record as `+ Campaign  System · Type · Players`, skipping empty fields.
fn record(record: &SessionRecord) -> String {
    let name = if record.campaign_name.is_empty() {
        "(no campaign)"
    } else {
        record.campaign_name.as_str()
    };

    let details: Vec<&str> = [
        record.system.as_str(),
        record.session_type.as_str(),
        record.players.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();

    format!("{} {} {}", "+".green(), name, details.join(" · ").dimmed())
        .trim_end()
        .to_string()
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
