//! sessionlog configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{SessionLogError, SessionLogResult};
use crate::parse::TitlePrefix;

static DEFAULT_CALENDAR_DIR: &str = "~/calendar";
static DEFAULT_SHEET_NAME: &str = "Sessions";
static ENV_PREFIX: &str = "SESSIONLOG";

fn default_calendar_dir() -> PathBuf {
    PathBuf::from(DEFAULT_CALENDAR_DIR)
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET_NAME.to_string()
}

/// Configuration at ~/.config/sessionlog/config.toml, overridable with
/// `SESSIONLOG_*` environment variables.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionLogConfig {
    /// Directory holding one subdirectory per calendar.
    #[serde(default = "default_calendar_dir")]
    pub calendar_dir: PathBuf,

    /// Calendar to read, as a directory name under `calendar_dir`.
    #[serde(default)]
    pub calendar_id: String,

    /// Workbook directory the session sheet lives in.
    #[serde(default)]
    pub spreadsheet_id: String,

    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Only events whose title starts with this are logged. Empty logs all.
    #[serde(default)]
    pub title_prefix: String,
}

impl Default for SessionLogConfig {
    fn default() -> Self {
        SessionLogConfig {
            calendar_dir: default_calendar_dir(),
            calendar_id: String::new(),
            spreadsheet_id: String::new(),
            sheet_name: default_sheet_name(),
            title_prefix: String::new(),
        }
    }
}

impl SessionLogConfig {
    pub fn config_path() -> SessionLogResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SessionLogError::Config("Could not determine config directory".into()))?
            .join("sessionlog");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config from `path` (or the default location) and the
    /// environment. A missing default config file is created first.
    pub fn load(path: Option<&Path>) -> SessionLogResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default_path = Self::config_path()?;
                if !default_path.exists() {
                    Self::create_default_config(&default_path)?;
                }
                default_path
            }
        };

        if path.is_some() && !config_path.exists() {
            return Err(SessionLogError::Config(format!(
                "Config file {} does not exist",
                config_path.display()
            )));
        }

        Config::builder()
            .add_source(File::from(config_path).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| SessionLogError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| SessionLogError::Config(e.to_string()))
    }

    /// Check that both identifiers are set and the sheet name is usable.
    pub fn validate(&self, config_path: &Path) -> SessionLogResult<()> {
        let missing = |key: &str| {
            SessionLogError::Config(format!(
                "`{key}` is not set. Add it to {} or set {ENV_PREFIX}_{}",
                config_path.display(),
                key.to_uppercase()
            ))
        };

        if self.calendar_id.trim().is_empty() {
            return Err(missing("calendar_id"));
        }
        if self.spreadsheet_id.trim().is_empty() {
            return Err(missing("spreadsheet_id"));
        }

        validate_sheet_name(&self.sheet_name)
    }

    pub fn calendar_root(&self) -> PathBuf {
        expand(&self.calendar_dir)
    }

    pub fn spreadsheet_path(&self) -> PathBuf {
        expand(Path::new(&self.spreadsheet_id))
    }

    pub fn title_prefix(&self) -> TitlePrefix {
        TitlePrefix::new(self.title_prefix.clone())
    }

    /// Create a config file with all options commented out.
    pub fn create_default_config(path: &Path) -> SessionLogResult<()> {
        let contents = format!(
            "\
# sessionlog configuration

# Where your calendars live:
# calendar_dir = \"{DEFAULT_CALENDAR_DIR}\"

# Calendar to read sessions from (a directory inside calendar_dir):
# calendar_id = \"personal\"

# Workbook directory the session log is written to:
# spreadsheet_id = \"~/Documents/sessions\"

# Sheet inside the workbook:
# sheet_name = \"{DEFAULT_SHEET_NAME}\"

# Only log events whose title starts with this (empty logs every event):
# title_prefix = \"TTRPG - \"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SessionLogError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| SessionLogError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

/// Sheet names become file names, so they must be a single path component.
pub fn validate_sheet_name(name: &str) -> SessionLogResult<()> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == "..";

    if bad {
        return Err(SessionLogError::Config(format!(
            "Invalid sheet name '{name}': it must be non-empty and contain no path separators"
        )));
    }
    Ok(())
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_to_missing_keys() {
        let (_dir, path) = write_config("calendar_id = \"games\"\nspreadsheet_id = \"/tmp/log\"\n");
        let config = SessionLogConfig::load(Some(&path)).unwrap();

        assert_eq!(config.calendar_id, "games");
        assert_eq!(config.spreadsheet_id, "/tmp/log");
        assert_eq!(config.sheet_name, "Sessions");
        assert_eq!(config.title_prefix, "");
        assert_eq!(config.calendar_dir, PathBuf::from("~/calendar"));
        assert!(!config.title_prefix().is_enabled());
        assert!(config.validate(&path).is_ok());
    }

    #[test]
    fn all_keys_are_read() {
        let (_dir, path) = write_config(
            "calendar_dir = \"/srv/cal\"\n\
             calendar_id = \"games\"\n\
             spreadsheet_id = \"/srv/log\"\n\
             sheet_name = \"2025\"\n\
             title_prefix = \"TTRPG - \"\n",
        );
        let config = SessionLogConfig::load(Some(&path)).unwrap();

        assert_eq!(config.calendar_root(), PathBuf::from("/srv/cal"));
        assert_eq!(config.spreadsheet_path(), PathBuf::from("/srv/log"));
        assert_eq!(config.sheet_name, "2025");
        assert_eq!(config.title_prefix().as_str(), "TTRPG - ");
    }

    #[test]
    fn missing_identifiers_fail_validation() {
        let path = PathBuf::from("/etc/sessionlog.toml");
        let config = SessionLogConfig::default();

        let err = config.validate(&path).unwrap_err().to_string();
        assert!(err.contains("calendar_id"), "{err}");

        let config = SessionLogConfig {
            calendar_id: "games".into(),
            ..SessionLogConfig::default()
        };
        let err = config.validate(&path).unwrap_err().to_string();
        assert!(err.contains("spreadsheet_id"), "{err}");
        assert!(err.contains("SESSIONLOG_SPREADSHEET_ID"), "{err}");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SessionLogConfig::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(SessionLogError::Config(_))));
    }

    #[test]
    fn default_config_is_all_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        SessionLogConfig::create_default_config(&path).unwrap();

        let config = SessionLogConfig::load(Some(&path)).unwrap();
        assert_eq!(config.sheet_name, "Sessions");
        assert_eq!(config.calendar_id, "");
    }

    #[test]
    fn sheet_names_must_be_single_component() {
        assert!(validate_sheet_name("Sessions").is_ok());
        assert!(validate_sheet_name("Campaign log 2025").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name("a/b").is_err());
        assert!(validate_sheet_name("..").is_err());
    }
}
