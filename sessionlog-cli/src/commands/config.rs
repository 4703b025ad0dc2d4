use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use sessionlog_core::config::SessionLogConfig;

pub fn run(config: &SessionLogConfig, config_path: &Path) -> Result<()> {
    println!("{}", "Paths".bold());
    println!("  Config:     {}", config_path.display());
    println!("  Calendars:  {}", config.calendar_root().display());
    println!("  Workbook:   {}", config.spreadsheet_path().display());

    println!();
    println!("{}", "Settings".bold());
    for line in toml::to_string_pretty(config)?.lines() {
        println!("  {line}");
    }

    if let Err(e) = config.validate(config_path) {
        println!();
        println!("{}", e.to_string().yellow());
    }

    Ok(())
}
