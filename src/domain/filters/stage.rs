//! Pipeline stage trait and the filter stage.

use std::fmt;

use serde::Deserialize;

use super::Filter;
use crate::domain::{Event, PipelineContext, StageOutcome, StageParams};

/// Trait for pipeline stages.
pub trait Stage: Send + Sync {
    /// Name used in log lines.
    fn name(&self) -> &str;

    /// Process one event and tell the runner whether to continue.
    fn process(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        params: Option<&StageParams>,
    ) -> StageOutcome;
}

/// Event field a filter stage tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterTarget {
    ProfileName,
    DeviceName,
    SourceName,
    ResourceName,
}

impl FilterTarget {
    pub fn as_str(self) -> &'static str {
        match self {
            FilterTarget::ProfileName => "profile_name",
            FilterTarget::DeviceName => "device_name",
            FilterTarget::SourceName => "source_name",
            FilterTarget::ResourceName => "resource_name",
        }
    }
}

impl fmt::Display for FilterTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage that applies a [`Filter`] to one event field.
pub struct FilterStage {
    name: String,
    target: FilterTarget,
    filter: Filter,
}

impl FilterStage {
    /// Create a new FilterStage. Without a name, one is derived from the
    /// target and polarity, e.g. `device_name-for`.
    pub fn new(name: Option<String>, target: FilterTarget, filter: Filter) -> Self {
        let name = name
            .unwrap_or_else(|| format!("{}-{}", target.as_str(), filter.polarity().as_str()));
        Self {
            name,
            target,
            filter,
        }
    }
}

impl Stage for FilterStage {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        params: Option<&StageParams>,
    ) -> StageOutcome {
        match self.target {
            FilterTarget::ProfileName => self.filter.filter_by_profile_name(ctx, event, params),
            FilterTarget::DeviceName => self.filter.filter_by_device_name(ctx, event, params),
            FilterTarget::SourceName => self.filter.filter_by_source_name(ctx, event, params),
            FilterTarget::ResourceName => self.filter.filter_by_resource_name(ctx, event, params),
        }
    }
}
