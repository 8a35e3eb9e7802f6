//! Domain layer containing core filtering logic.
//!
//! This module contains:
//! - Event and reading data types
//! - The pipeline continuation signal
//! - Filters, the stage trait and the pipeline runner
//! - Logger with rotation

mod error;
pub mod filters;
pub mod logger;
mod types;

pub use error::{EventError, FilterAppError, StageError};
pub use filters::{Filter, Pipeline, Polarity};
pub use types::{
    Event, PipelineContext, Reading, ReadingValue, StageOutcome, StageOutput, StageParams,
    ValueType,
};
