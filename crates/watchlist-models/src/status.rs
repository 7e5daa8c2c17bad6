use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Viewing status of a tracked title
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum WatchStatus {
    #[serde(rename = "Watched")]
    Watched,
    #[serde(rename = "Currently Watching")]
    CurrentlyWatching,
    #[serde(rename = "To Watch")]
    ToWatch,
}

impl WatchStatus {
    pub const ALL: [WatchStatus; 3] = [
        WatchStatus::Watched,
        WatchStatus::CurrentlyWatching,
        WatchStatus::ToWatch,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WatchStatus::Watched => "Watched",
            WatchStatus::CurrentlyWatching => "Currently Watching",
            WatchStatus::ToWatch => "To Watch",
        }
    }
}

impl fmt::Display for WatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{0}' (expected Watched, Currently Watching or To Watch)")]
pub struct ParseStatusError(pub String);

impl FromStr for WatchStatus {
    type Err = ParseStatusError;

    /// Accepts the display labels in any case, plus kebab/snake forms
    /// (`to-watch`, `currently_watching`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c.to_ascii_lowercase() })
            .collect();
        match normalized.as_str() {
            "watched" => Ok(WatchStatus::Watched),
            "currently watching" | "watching" => Ok(WatchStatus::CurrentlyWatching),
            "to watch" => Ok(WatchStatus::ToWatch),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}
