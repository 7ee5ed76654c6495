//! Application services for follow-up management.
//!
//! Services orchestrate domain operations and coordinate between ports,
//! keeping the single-pending-follow-up invariant per contact.

mod reconciler;

pub use reconciler::{FollowupReconciler, FollowupServiceError, FollowupServiceResult};
