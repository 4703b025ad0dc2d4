//! Event description parsing.
//!
//! Descriptions are free-form `Key: Value` lines. `System`, `Players` and
//! `Type` get their own columns, every other pair is kept in order as an
//! additional detail. Anything that is not a usable pair is skipped.

use super::session_type::normalize_type;

/// Fields pulled out of an event description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDetails {
    pub system: String,
    pub players: String,
    pub session_type: String,
    /// Non-canonical pairs as `Key: Value`, joined with `"; "`.
    pub additional_details: String,
}

const DETAIL_SEPARATOR: &str = "; ";

const ENTITIES: [(&str, &str); 6] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    // Last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

pub fn parse_description(description: Option<&str>) -> SessionDetails {
    let mut details = SessionDetails::default();

    let Some(description) = description.filter(|d| !d.is_empty()) else {
        return details;
    };

    let text = decode_entities(&strip_tags(description));
    let mut extras = Vec::new();

    for line in split_lines(text.trim()) {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }

        match key.to_lowercase().as_str() {
            "system" => details.system = value.to_string(),
            "players" => details.players = value.to_string(),
            "type" => details.session_type = normalize_type(value),
            _ => extras.push(format!("{key}: {value}")),
        }
    }

    details.additional_details = extras.join(DETAIL_SEPARATOR);
    details
}

/// Tags that end a line when rendered. Every other tag is inline.
const LINE_BREAK_TAGS: [&str; 17] = [
    "br", "p", "div", "li", "ul", "ol", "tr", "table", "hr", "blockquote", "h1", "h2", "h3", "h4",
    "h5", "h6", "pre",
];

/// Remove markup. Line-breaking tags (`<br>`, `<p>`, `</div>`, ...) become
/// a newline, inline tags (`<b>`, `</span>`, `<>`, ...) disappear, so
/// `<b>System:</b> D&D` stays on one line. A tag never spans lines; a
/// stray `<` is text.
fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        let after_open = &rest[open + 1..];
        let close = after_open
            .find(['<', '>', '\n', '\r'])
            .filter(|&i| after_open[i..].starts_with('>'));

        match close {
            Some(close) => {
                out.push_str(&rest[..open]);
                if breaks_line(&after_open[..close]) {
                    out.push('\n');
                }
                rest = &after_open[close + 1..];
            }
            None => {
                out.push_str(&rest[..=open]);
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}

fn breaks_line(tag: &str) -> bool {
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    LINE_BREAK_TAGS.contains(&name.as_str())
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\n', '\r']).filter(|line| !line.is_empty())
}
