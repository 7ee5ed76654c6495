//! Error types for follow-up domain parsing.

use thiserror::Error;

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing contact kinds from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown contact kind: {0}")]
pub struct ParseContactKindError(pub String);

/// Error returned while parsing contact statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown contact status: {0}")]
pub struct ParseContactStatusError(pub String);
