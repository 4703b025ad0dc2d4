//! Event title parsing.

/// Campaign name from an event title: everything before the first colon,
/// or the whole title when there is none. Always trimmed.
pub fn parse_campaign_name(title: &str) -> String {
    let name = match title.split_once(':') {
        Some((before, _)) => before,
        None => title,
    };
    name.trim().to_string()
}

/// Title prefix that marks an event as a game session.
///
/// An empty prefix disables filtering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitlePrefix(String);

impl TitlePrefix {
    pub fn new(prefix: impl Into<String>) -> Self {
        TitlePrefix(prefix.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_enabled(&self) -> bool {
        !self.0.is_empty()
    }

    /// Case-sensitive, exact prefix match.
    pub fn matches(&self, title: &str) -> bool {
        title.starts_with(&self.0)
    }

    /// Remove the prefix and trim what is left. Titles without the prefix
    /// come back unchanged.
    pub fn strip<'a>(&self, title: &'a str) -> &'a str {
        if !self.is_enabled() {
            return title;
        }
        match title.strip_prefix(self.0.as_str()) {
            Some(rest) => rest.trim(),
            None => title,
        }
    }
}
