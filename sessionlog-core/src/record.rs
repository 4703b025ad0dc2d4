//! Session records: one row of the session log.

use chrono::NaiveDate;
use serde::Serialize;

use crate::parse::{parse_campaign_name, parse_description};

/// Column headers of the session log, in row order.
pub const HEADER: [&str; 6] = [
    "Date",
    "Campaign Name",
    "System",
    "Players",
    "Type",
    "Additional Details",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A normalized session, ready to be appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub date: String,
    pub campaign_name: String,
    pub system: String,
    pub players: String,
    #[serde(rename = "type")]
    pub session_type: String,
    pub additional_details: String,
}

impl SessionRecord {
    /// Build a record from an event title (prefix already stripped) and
    /// description. The date always comes from the day being logged.
    pub fn build(date: NaiveDate, title: &str, description: Option<&str>) -> Self {
        let details = parse_description(description);

        SessionRecord {
            date: date.format(DATE_FORMAT).to_string(),
            campaign_name: parse_campaign_name(title),
            system: details.system,
            players: details.players,
            session_type: details.session_type,
            additional_details: details.additional_details,
        }
    }

    /// Cells in `HEADER` order.
    pub fn to_row(&self) -> [&str; 6] {
        [
            self.date.as_str(),
            self.campaign_name.as_str(),
            self.system.as_str(),
            self.players.as_str(),
            self.session_type.as_str(),
            self.additional_details.as_str(),
        ]
    }
}
