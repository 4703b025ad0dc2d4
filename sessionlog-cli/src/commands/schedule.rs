use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sessionlog_core::schedule::{Crontab, DAILY_SCHEDULE, ScheduleEntry, shell_quote};

pub fn install(config: Option<&Path>) -> Result<()> {
    let exe = std::env::current_exe().context("Could not determine the sessionlog binary path")?;

    let mut command = shell_quote(&exe.to_string_lossy());
    if let Some(config) = config {
        let config = std::path::absolute(config)?;
        command.push_str(&format!(" --config {}", shell_quote(&config.to_string_lossy())));
    }
    command.push_str(" run");

    let entry = ScheduleEntry::daily_at_midnight(DAILY_SCHEDULE, command);
    Crontab::locate()?.install(&entry)?;

    println!("{} Scheduled daily run at midnight", "✓".green());
    println!("  {}", entry.cron_line().dimmed());
    Ok(())
}

pub fn remove() -> Result<()> {
    if Crontab::locate()?.remove(DAILY_SCHEDULE)? {
        println!("{} Removed daily run", "✓".green());
    } else {
        println!("{}", "No daily run was scheduled".dimmed());
    }
    Ok(())
}
