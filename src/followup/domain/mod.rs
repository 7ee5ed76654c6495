//! Domain model for contacts and follow-up tasks.
//!
//! Aggregates here carry no infrastructure concerns; identifiers are
//! storage-assigned and timestamps come from an injected clock.

mod contact;
mod error;
mod ids;
mod priority;
mod task;

pub use contact::{Contact, ContactKind, ContactStatus, NewContact, PersistedContactData};
pub use error::{ParseContactKindError, ParseContactStatusError, ParsePriorityError};
pub use ids::{ContactId, TaskId};
pub use priority::Priority;
pub use task::{FOLLOW_UP_TITLE, NewTask, PersistedTaskData, Task};
