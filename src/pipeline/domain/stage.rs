//! Pipeline stage enumeration.

use super::ParseStageError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pipeline stage a deal occupies on the board.
///
/// `Won` and `Lost` are conventionally terminal but the domain does not
/// forbid moving out of them; a mis-dropped deal can be dragged back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Unqualified inbound interest.
    Lead,
    /// Qualification in progress.
    Qualify,
    /// Proposal sent.
    Proposal,
    /// Terms under negotiation.
    Negotiation,
    /// Closed won.
    Won,
    /// Closed lost.
    Lost,
}

impl Stage {
    /// All stages in board order.
    pub const ALL: [Self; 6] = [
        Self::Lead,
        Self::Qualify,
        Self::Proposal,
        Self::Negotiation,
        Self::Won,
        Self::Lost,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Qualify => "qualify",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::Won => "won",
            Self::Lost => "lost",
        }
    }

    /// Returns `true` for the conventionally terminal stages.
    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl TryFrom<&str> for Stage {
    type Error = ParseStageError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "lead" => Ok(Self::Lead),
            "qualify" => Ok(Self::Qualify),
            "proposal" => Ok(Self::Proposal),
            "negotiation" => Ok(Self::Negotiation),
            "won" => Ok(Self::Won),
            "lost" => Ok(Self::Lost),
            _ => Err(ParseStageError(value.to_owned())),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
