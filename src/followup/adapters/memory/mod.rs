//! In-memory repositories for follow-up tests.

mod contact;
mod task;

pub use contact::InMemoryContactRepository;
pub use task::InMemoryTaskRepository;
