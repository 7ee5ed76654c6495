//! Application services for the deal pipeline.
//!
//! Ordering and stage transitions are deliberately separate services: one
//! mutates bucket positions, the other mutates pipeline state. A deal move
//! composes them at the calling layer: reserve an index through
//! [`OrderIndexAllocator`], then apply it through [`StageTransitionEngine`].

mod ordering;
mod transition;

pub use ordering::{GAP, OrderIndexAllocator};
pub use transition::{PipelineServiceError, PipelineServiceResult, StageTransitionEngine};
