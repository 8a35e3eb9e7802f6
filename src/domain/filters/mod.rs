//! Filter stages for event pipelines.

mod chain;
mod filter;
mod match_set;
mod stage;

pub use chain::Pipeline;
pub use filter::{Filter, Polarity};
pub use match_set::MatchSet;
pub use stage::{FilterStage, FilterTarget, Stage};
