//! Domain model for the deal pipeline.

mod deal;
mod error;
mod ids;
mod stage;

pub use deal::{Deal, NewDeal, PersistedDealData, Probability};
pub use error::{ParseStageError, ProbabilityOutOfRange};
pub use ids::DealId;
pub use stage::Stage;
