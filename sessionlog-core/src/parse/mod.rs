//! Text parsers for session metadata.

mod description;
mod session_type;
mod title;

pub use description::{SessionDetails, parse_description};
pub use session_type::{SessionType, normalize_type};
pub use title::{TitlePrefix, parse_campaign_name};
