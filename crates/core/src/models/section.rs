//! Hangout page sections

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Section of the hangout page a member is viewing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HangoutSection {
    Dashboard,
    Availability,
    Suggestions,
    Members,
    Chat,
    Settings,
}

impl HangoutSection {
    pub fn as_str(&self) -> &'static str {
        match self {
            HangoutSection::Dashboard => "dashboard",
            HangoutSection::Availability => "availability",
            HangoutSection::Suggestions => "suggestions",
            HangoutSection::Members => "members",
            HangoutSection::Chat => "chat",
            HangoutSection::Settings => "settings",
        }
    }
}

impl Default for HangoutSection {
    fn default() -> Self {
        HangoutSection::Dashboard
    }
}

impl fmt::Display for HangoutSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HangoutSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dashboard" => Ok(HangoutSection::Dashboard),
            "availability" => Ok(HangoutSection::Availability),
            "suggestions" => Ok(HangoutSection::Suggestions),
            "members" => Ok(HangoutSection::Members),
            "chat" => Ok(HangoutSection::Chat),
            "settings" => Ok(HangoutSection::Settings),
            other => Err(format!("unknown hangout section '{}'", other)),
        }
    }
}
