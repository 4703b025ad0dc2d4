//! Session type vocabulary.

use std::fmt;

/// The kinds of session a calendar entry can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionType {
    Gm,
    Player,
    Solo,
    GmLess,
}

impl SessionType {
    pub const ALL: [SessionType; 4] = [
        SessionType::Gm,
        SessionType::Player,
        SessionType::Solo,
        SessionType::GmLess,
    ];

    /// Canonical spelling, as written to the sheet.
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Gm => "GM",
            SessionType::Player => "Player",
            SessionType::Solo => "Solo",
            SessionType::GmLess => "GMless",
        }
    }

    /// Case-insensitive lookup. Surrounding whitespace is not ignored.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonicalize a session type value.
///
/// Unknown values are returned verbatim so they stay visible in the sheet.
pub fn normalize_type(value: &str) -> String {
    match SessionType::from_label(value) {
        Some(session_type) => session_type.as_str().to_string(),
        None => {
            let valid: Vec<_> = SessionType::ALL.iter().map(|t| t.as_str()).collect();
            tracing::warn!(
                value,
                "Unrecognized session type, keeping it as-is (expected one of: {})",
                valid.join(", ")
            );
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber that writes plain-text log lines into a buffer.
    fn capture_logs(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        tracing::subscriber::with_default(subscriber, f);

        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    fn warnings(logs: &str) -> Vec<&str> {
        logs.lines().filter(|line| line.contains("WARN")).collect()
    }

    #[test]
    fn unknown_value_logs_one_warning() {
        let logs = capture_logs(|| {
            assert_eq!(normalize_type("Mixed"), "Mixed");
        });

        let found = warnings(&logs);
        assert_eq!(found.len(), 1, "logs: {logs}");
        assert!(found[0].contains("Unrecognized session type"));
        assert!(found[0].contains("value=\"Mixed\""));
        assert!(found[0].contains("GM, Player, Solo, GMless"));
    }

    #[test]
    fn known_value_logs_nothing() {
        let logs = capture_logs(|| {
            assert_eq!(normalize_type("player"), "Player");
        });

        assert!(warnings(&logs).is_empty(), "logs: {logs}");
    }

    #[test]
    fn canonical_casing_is_restored() {
        assert_eq!(normalize_type("player"), "Player");
        assert_eq!(normalize_type("gm"), "GM");
        assert_eq!(normalize_type("SOLO"), "Solo");
        assert_eq!(normalize_type("gmLESS"), "GMless");
    }

    #[test]
    fn canonical_values_pass_through() {
        for t in SessionType::ALL {
            assert_eq!(normalize_type(t.as_str()), t.as_str());
        }
    }

    #[test]
    fn unknown_value_is_preserved_verbatim() {
        assert_eq!(normalize_type("Mixed"), "Mixed");
        assert_eq!(normalize_type("game master"), "game master");
    }

    #[test]
    fn lookup_is_exact_apart_from_case() {
        assert_eq!(SessionType::from_label("Gm"), Some(SessionType::Gm));
        assert_eq!(SessionType::from_label("GM-less"), None);
        assert_eq!(SessionType::from_label(" GM"), None);
    }
}
