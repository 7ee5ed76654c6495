//! In-memory repositories for pipeline tests.

mod deal;

pub use deal::InMemoryDealRepository;
