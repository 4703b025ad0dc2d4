use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use sessionlog_core::calendar::IcsCalendar;
use sessionlog_core::config::SessionLogConfig;
use sessionlog_core::daily::{RunOptions, run_daily};
use sessionlog_core::sink::CsvWorkbook;

use crate::render;

pub fn run(config: &SessionLogConfig, date: NaiveDate, dry_run: bool, json: bool) -> Result<()> {
    let calendar = IcsCalendar::open(&config.calendar_root(), &config.calendar_id)?;
    let mut sheet = CsvWorkbook::open(&config.spreadsheet_path(), &config.sheet_name)?;

    let options = RunOptions {
        dry_run,
        ..RunOptions::from_config(config)
    };
    let summary = run_daily(&calendar, &mut sheet, date, &options)
        .with_context(|| format!("Logging sessions for {date} failed"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary.records)?);
        return Ok(());
    }

    println!(
        "{}",
        render::summary(&summary, &options.prefix, sheet.sheet_path(), dry_run)
    );
    Ok(())
}

/// Today when absent, otherwise YYYY-MM-DD or a natural language day.
pub fn resolve_date(input: Option<&str>) -> Result<NaiveDate> {
    let Some(input) = input.map(str::trim) else {
        return Ok(Local::now().date_naive());
    };

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(date);
    }

    fuzzydate::parse(input)
        .map(|dt| dt.date())
        .map_err(|_| anyhow::anyhow!("Could not parse date: \"{}\". Use YYYY-MM-DD", input))
}
