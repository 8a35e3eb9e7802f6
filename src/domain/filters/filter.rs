//! Profile, device, source and resource name filtering.

use serde::Deserialize;
use tracing::debug;

use super::MatchSet;
use crate::domain::{Event, PipelineContext, StageError, StageOutcome, StageParams};

/// Whether a filter keeps or drops the values it matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Keep only matches
    For,
    /// Drop matches
    Out,
}

impl Polarity {
    /// Whether a value with the given match result survives the filter.
    pub fn keeps(self, matched: bool) -> bool {
        matched != (self == Polarity::Out)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Polarity::For => "for",
            Polarity::Out => "out",
        }
    }
}

/// Filter over one event at a time.
///
/// Holds no per-call state, so one instance can serve any number of
/// concurrent pipeline executions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    values: MatchSet,
    polarity: Polarity,
}

impl Filter {
    /// Filter that keeps only events or readings matching `values`.
    pub fn new_for<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchSet::new(values), Polarity::For)
    }

    /// Filter that drops events or readings matching `values`.
    pub fn new_out<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MatchSet::new(values), Polarity::Out)
    }

    pub fn new(values: MatchSet, polarity: Polarity) -> Self {
        Self { values, polarity }
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Continue or halt based on the event's profile name.
    pub fn filter_by_profile_name(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        _params: Option<&StageParams>,
    ) -> StageOutcome {
        self.filter_by_field(ctx, event, "ProfileName", |e| &e.profile_name)
    }

    /// Continue or halt based on the event's device name.
    pub fn filter_by_device_name(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        _params: Option<&StageParams>,
    ) -> StageOutcome {
        self.filter_by_field(ctx, event, "DeviceName", |e| &e.device_name)
    }

    /// Continue or halt based on the event's source name.
    pub fn filter_by_source_name(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        _params: Option<&StageParams>,
    ) -> StageOutcome {
        self.filter_by_field(ctx, event, "SourceName", |e| &e.source_name)
    }

    /// Keep or drop readings based on their resource name.
    ///
    /// Surviving readings keep their relative order. The pipeline halts
    /// when no reading survives.
    pub fn filter_by_resource_name(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        _params: Option<&StageParams>,
    ) -> StageOutcome {
        let Some(mut event) = event else {
            return StageOutcome::Fault(StageError::NoEventReceived);
        };

        debug!(
            "[{}] Filtering {} by ResourceName: values={:?}",
            ctx.correlation_id(),
            self.polarity.as_str(),
            self.values
        );

        if self.values.is_empty() {
            return StageOutcome::Continue(event);
        }

        let before = event.readings.len();
        event
            .readings
            .retain(|r| self.polarity.keeps(self.values.contains(&r.resource_name)));

        debug!(
            "[{}] Readings kept: {} of {}",
            ctx.correlation_id(),
            event.readings.len(),
            before
        );

        if event.readings.is_empty() {
            return StageOutcome::Halt;
        }
        StageOutcome::Continue(event)
    }

    fn filter_by_field(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        field_name: &str,
        field: impl Fn(&Event) -> &String,
    ) -> StageOutcome {
        let Some(event) = event else {
            return StageOutcome::Fault(StageError::NoEventReceived);
        };

        debug!(
            "[{}] Filtering {} by {}: values={:?}",
            ctx.correlation_id(),
            self.polarity.as_str(),
            field_name,
            self.values
        );

        if self.values.is_empty() {
            return StageOutcome::Continue(event);
        }

        let value = field(&event);
        if self.polarity.keeps(self.values.contains(value)) {
            debug!("[{}] {} '{}' accepted", ctx.correlation_id(), field_name, value);
            StageOutcome::Continue(event)
        } else {
            debug!("[{}] {} '{}' rejected", ctx.correlation_id(), field_name, value);
            StageOutcome::Halt
        }
    }
}
