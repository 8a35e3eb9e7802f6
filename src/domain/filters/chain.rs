//! Sequential pipeline runner.

use tracing::{debug, info};

use crate::config::Config;
use crate::domain::{Event, PipelineContext, StageError, StageOutcome, StageParams};

use super::{Filter, FilterStage, MatchSet, Stage};

/// Ordered stages that an event flows through.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a new Pipeline from configuration, one stage per `[[filters]]`
    /// entry in file order.
    pub fn new(config: &Config) -> Self {
        let stages = config
            .filters
            .iter()
            .map(|f| {
                let filter = Filter::new(MatchSet::new(f.values.iter().cloned()), f.mode);
                Box::new(FilterStage::new(f.name.clone(), f.target, filter)) as Box<dyn Stage>
            })
            .collect();

        Self { stages }
    }

    /// Create a pipeline from already built stages.
    pub fn from_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|s| s.name())
    }

    /// Run the event through every stage, stopping at the first stage that
    /// halts or faults.
    pub fn execute(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        params: Option<&StageParams>,
    ) -> StageOutcome {
        let mut current = event;

        for stage in &self.stages {
            debug!("[{}] Running stage: {}", ctx.correlation_id(), stage.name());

            match stage.process(ctx, current, params) {
                StageOutcome::Continue(event) => current = Some(event),
                StageOutcome::Halt => {
                    info!("[{}] Halted by stage: {}", ctx.correlation_id(), stage.name());
                    return StageOutcome::Halt;
                }
                StageOutcome::Fault(err) => {
                    info!(
                        "[{}] Fault in stage {}: {}",
                        ctx.correlation_id(),
                        stage.name(),
                        err
                    );
                    return StageOutcome::Fault(err);
                }
            }
        }

        match current {
            Some(event) => StageOutcome::Continue(event),
            None => StageOutcome::Fault(StageError::NoEventReceived),
        }
    }
}
