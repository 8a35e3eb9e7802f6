//! Core domain types: events, readings and the pipeline continuation signal.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{EventError, StageError};

/// One telemetry submission from a device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Name of the device profile the event belongs to
    pub profile_name: String,

    /// Name of the device that produced the event
    pub device_name: String,

    /// Name of the source (command or resource) that produced the event
    #[serde(default)]
    pub source_name: String,

    /// Nanoseconds since the Unix epoch, 0 when unknown
    #[serde(default)]
    pub origin: i64,

    /// Readings in the order they were added
    #[serde(default)]
    pub readings: Vec<Reading>,
}

impl Event {
    /// Create an event with no readings, stamped with the current time.
    pub fn new(
        profile_name: impl Into<String>,
        device_name: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        let origin = i64::try_from(time::OffsetDateTime::now_utc().unix_timestamp_nanos())
            .unwrap_or(i64::MAX);
        Self {
            profile_name: profile_name.into(),
            device_name: device_name.into(),
            source_name: source_name.into(),
            origin,
            readings: Vec::new(),
        }
    }

    /// Append a reading after checking `value` fits `value_type`.
    ///
    /// The event is left untouched when the value is rejected.
    pub fn add_simple_reading(
        &mut self,
        resource_name: impl Into<String>,
        value_type: ValueType,
        value: impl Into<ReadingValue>,
    ) -> Result<(), EventError> {
        let resource_name = resource_name.into();
        let value = value.into().render(&resource_name, value_type)?;
        self.readings.push(Reading {
            resource_name,
            value_type,
            value,
        });
        Ok(())
    }

    /// Resource names of the readings, in order.
    pub fn resource_names(&self) -> impl Iterator<Item = &str> {
        self.readings.iter().map(|r| r.resource_name.as_str())
    }
}

/// One named measurement within an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    /// Device resource the value was read from
    pub resource_name: String,

    /// Declared type of `value`
    pub value_type: ValueType,

    /// Textual form of the value
    pub value: String,
}

/// Value types a simple reading may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Bool,
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float32,
    Float64,
}

impl ValueType {
    /// Inclusive bounds for the integer types.
    fn integer_bounds(self) -> Option<(i128, i128)> {
        let bounds: (i128, i128) = match self {
            ValueType::Int8 => (i8::MIN.into(), i8::MAX.into()),
            ValueType::Int16 => (i16::MIN.into(), i16::MAX.into()),
            ValueType::Int32 => (i32::MIN.into(), i32::MAX.into()),
            ValueType::Int64 => (i64::MIN.into(), i64::MAX.into()),
            ValueType::Uint8 => (0, u8::MAX.into()),
            ValueType::Uint16 => (0, u16::MAX.into()),
            ValueType::Uint32 => (0, u32::MAX.into()),
            ValueType::Uint64 => (0, u64::MAX.into()),
            _ => return None,
        };
        Some(bounds)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A value supplied when adding a simple reading.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadingValue {
    Bool(bool),
    String(String),
    Int(i64),
    Uint(u64),
    Float32(f32),
    Float(f64),
}

impl ReadingValue {
    fn kind(&self) -> &'static str {
        match self {
            ReadingValue::Bool(_) => "bool",
            ReadingValue::String(_) => "string",
            ReadingValue::Int(_) | ReadingValue::Uint(_) => "integer",
            ReadingValue::Float32(_) | ReadingValue::Float(_) => "float",
        }
    }

    /// Check the value against `value_type` and produce its textual form.
    fn render(self, resource_name: &str, value_type: ValueType) -> Result<String, EventError> {
        let out_of_range = |value: String| EventError::ValueOutOfRange {
            resource_name: resource_name.to_string(),
            value_type,
            value,
        };
        let check_integer = |n: i128| match value_type.integer_bounds() {
            Some((min, max)) if n < min || n > max => Err(out_of_range(n.to_string())),
            Some(_) => Ok(n.to_string()),
            None => Err(EventError::ValueTypeMismatch {
                resource_name: resource_name.to_string(),
                value_type,
                found: "integer",
            }),
        };

        match (value_type, self) {
            (ValueType::Bool, ReadingValue::Bool(b)) => Ok(b.to_string()),
            (ValueType::String, ReadingValue::String(s)) => Ok(s),
            (ValueType::Float32, ReadingValue::Float32(v)) => Ok(v.to_string()),
            (ValueType::Float64, ReadingValue::Float32(v)) => Ok(f64::from(v).to_string()),
            (ValueType::Float64, ReadingValue::Float(v)) => Ok(v.to_string()),
            (ValueType::Float32, ReadingValue::Float(v)) => {
                if v.is_finite() && v.abs() > f64::from(f32::MAX) {
                    return Err(out_of_range(v.to_string()));
                }
                // Text follows the 32-bit value, e.g. 1.1 stays "1.1".
                Ok((v as f32).to_string())
            }
            (_, ReadingValue::Int(v)) => check_integer(v.into()),
            (_, ReadingValue::Uint(v)) => check_integer(v.into()),
            (_, value) => Err(EventError::ValueTypeMismatch {
                resource_name: resource_name.to_string(),
                value_type,
                found: value.kind(),
            }),
        }
    }
}

impl From<bool> for ReadingValue {
    fn from(v: bool) -> Self {
        ReadingValue::Bool(v)
    }
}

impl From<&str> for ReadingValue {
    fn from(v: &str) -> Self {
        ReadingValue::String(v.to_string())
    }
}

impl From<String> for ReadingValue {
    fn from(v: String) -> Self {
        ReadingValue::String(v)
    }
}

macro_rules! reading_value_from {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for ReadingValue {
                fn from(v: $t) -> Self {
                    ReadingValue::$variant(<$target>::from(v))
                }
            }
        )*
    };
}

reading_value_from!(Int, i64: i8, i16, i32, i64);
reading_value_from!(Uint, u64: u8, u16, u32, u64);
reading_value_from!(Float32, f32: f32);
reading_value_from!(Float, f64: f64);

/// Opaque per-execution context handed to every stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    correlation_id: String,
}

impl PipelineContext {
    /// Create a context for one pipeline execution.
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: correlation_id.into(),
        }
    }

    /// Identifier used to tie log lines of one execution together.
    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }
}

/// Metadata from upstream stages. Filters accept it and ignore it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageParams {
    /// Content type of the payload, e.g. "application/json"
    pub content_type: Option<String>,
}

impl StageParams {
    /// Params carrying only a content type.
    pub fn with_content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
        }
    }
}

/// Continuation signal returned by a stage to the pipeline runner.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome {
    /// Forward the (possibly updated) event to the next stage
    Continue(Event),
    /// Stop silently; nothing survived the stage
    Halt,
    /// Stop and surface a precondition fault
    Fault(StageError),
}

impl StageOutcome {
    /// Whether the runner should invoke the next stage.
    pub fn continues(&self) -> bool {
        matches!(self, StageOutcome::Continue(_))
    }

    /// Consume the outcome, returning the event to forward.
    pub fn into_event(self) -> Option<Event> {
        match self {
            StageOutcome::Continue(event) => Some(event),
            _ => None,
        }
    }

    /// The fault, if the stage could not run.
    pub fn error(&self) -> Option<&StageError> {
        match self {
            StageOutcome::Fault(err) => Some(err),
            _ => None,
        }
    }

    /// Convert outcome to StageOutput.
    pub fn into_output(self) -> StageOutput {
        match self {
            StageOutcome::Continue(event) => StageOutput {
                continue_pipeline: true,
                event: Some(event),
                error: None,
            },
            StageOutcome::Halt => StageOutput {
                continue_pipeline: false,
                event: None,
                error: None,
            },
            StageOutcome::Fault(err) => StageOutput::error(err.to_string()),
        }
    }

    /// Get exit code for this outcome.
    ///
    /// - Continue: 0
    /// - Halt: 1
    /// - Fault: 2
    pub fn exit_code(&self) -> i32 {
        match self {
            StageOutcome::Continue(_) => 0,
            StageOutcome::Halt => 1,
            StageOutcome::Fault(_) => 2,
        }
    }
}

/// Pipeline result written to stdout.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutput {
    #[serde(rename = "continue")]
    pub continue_pipeline: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<Event>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageOutput {
    /// Halting output carrying an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            continue_pipeline: false,
            event: None,
            error: Some(message.into()),
        }
    }
}
