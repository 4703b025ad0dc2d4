//! Daily scheduling through the user's crontab.
//!
//! Each schedule is one cron line tagged with a trailing
//! `# sessionlog:<name>` comment, so it can be found again to replace or
//! remove it without touching the rest of the crontab.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{SessionLogError, SessionLogResult};

const TAG_PREFIX: &str = "# sessionlog:";

/// Name of the schedule that runs the daily check.
pub const DAILY_SCHEDULE: &str = "daily-check";

/// A command run every day at local midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub name: String,
    pub command: String,
}

impl ScheduleEntry {
    pub fn daily_at_midnight(name: impl Into<String>, command: impl Into<String>) -> Self {
        ScheduleEntry {
            name: name.into(),
            command: command.into(),
        }
    }

    pub fn cron_line(&self) -> String {
        // cron turns a bare % into a newline
        let command = self.command.replace('%', "\\%");
        format!("0 0 * * * {} {}", command, tag(&self.name))
    }
}

fn tag(name: &str) -> String {
    format!("{TAG_PREFIX}{name}")
}

fn is_tagged(line: &str, name: &str) -> bool {
    line.trim_end().ends_with(&format!(" {}", tag(name)))
}

/// Crontab text with `entry` installed, replacing any earlier line with
/// the same name.
pub fn with_entry(crontab: &str, entry: &ScheduleEntry) -> String {
    let (mut kept, _) = without_entry(crontab, &entry.name);
    kept.push_str(&entry.cron_line());
    kept.push('\n');
    kept
}

/// Crontab text with every line named `name` removed, and whether there
/// was one.
pub fn without_entry(crontab: &str, name: &str) -> (String, bool) {
    let mut removed = false;
    let mut kept = String::with_capacity(crontab.len());

    for line in crontab.lines() {
        if is_tagged(line, name) {
            removed = true;
            continue;
        }
        kept.push_str(line);
        kept.push('\n');
    }

    (kept, removed)
}

/// Quote a word for the shell cron runs commands with.
pub fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:@+,".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// The `crontab` binary of the current user.
pub struct Crontab {
    binary: PathBuf,
}

impl Crontab {
    pub fn locate() -> SessionLogResult<Self> {
        let binary = which::which("crontab").map_err(|_| {
            SessionLogError::Schedule(
                "`crontab` not found in PATH. Install cron or schedule `sessionlog run` yourself"
                    .into(),
            )
        })?;
        Ok(Crontab { binary })
    }

    /// Install or replace `entry`.
    pub fn install(&self, entry: &ScheduleEntry) -> SessionLogResult<()> {
        let current = self.read()?;
        self.write(&with_entry(&current, entry))?;
        tracing::info!(name = %entry.name, line = %entry.cron_line(), "Installed schedule");
        Ok(())
    }

    /// Remove the schedule called `name`. Returns false if there was none.
    pub fn remove(&self, name: &str) -> SessionLogResult<bool> {
        let current = self.read()?;
        let (updated, removed) = without_entry(&current, name);
        if removed {
            self.write(&updated)?;
            tracing::info!(name, "Removed schedule");
        }
        Ok(removed)
    }

    fn read(&self) -> SessionLogResult<String> {
        let output = Command::new(&self.binary).arg("-l").output()?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if stderr.contains("no crontab") {
            return Ok(String::new());
        }

        Err(SessionLogError::Schedule(format!(
            "crontab -l failed: {}",
            stderr.trim()
        )))
    }

    fn write(&self, contents: &str) -> SessionLogResult<()> {
        let mut child = Command::new(&self.binary)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SessionLogError::Schedule(format!("Failed to spawn {}: {e}", self.binary.display()))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| SessionLogError::Schedule("crontab stdin unavailable".into()))?;
        stdin.write_all(contents.as_bytes())?;
        drop(stdin);

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SessionLogError::Schedule(format!(
                "crontab rejected the update: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(())
    }
}
