//! Priority scale shared by contacts and tasks.

use super::ParsePriorityError;
use serde::{Deserialize, Serialize};

/// Three-level priority used by both contacts and tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low urgency.
    Low,
    /// Default urgency.
    #[default]
    Normal,
    /// High urgency.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }

    /// Parses a persisted value, falling back to [`Priority::Normal`] for
    /// anything outside the three valid levels. Follow-up task creation
    /// mirrors the contact's priority through this lenient path.
    #[must_use]
    pub fn parse_lossy(value: &str) -> Self {
        Self::try_from(value).unwrap_or_default()
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}
