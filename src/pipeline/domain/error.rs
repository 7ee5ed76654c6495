//! Error types for pipeline domain validation and parsing.

use thiserror::Error;

/// Error returned while parsing stages from input or persistence. Stage
/// values outside the closed enum are rejected at the boundary; the
/// transition engine itself never sees one.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown deal stage: {0}")]
pub struct ParseStageError(pub String);

/// Error returned when a probability value exceeds 100.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("probability {0} out of range, expected 0-100")]
pub struct ProbabilityOutOfRange(pub u8);
