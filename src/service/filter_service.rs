//! Filter processing service.

use std::io::{self, Read, Write};

use anyhow::Result;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::domain::{
    Event, FilterAppError, Pipeline, PipelineContext, StageOutcome, StageOutput, StageParams,
};

/// Exit code for faults: missing or unreadable input, bad configuration.
pub const FAULT_EXIT_CODE: i32 = 2;

/// Service that runs one event through the configured pipeline.
pub struct FilterService {
    pipeline: Pipeline,
}

impl FilterService {
    /// Create a new FilterService from configuration.
    pub fn new(config: &Config) -> Self {
        let pipeline = Pipeline::new(config);
        debug!("Pipeline built with {} stage(s)", pipeline.len());
        Self { pipeline }
    }

    /// Read one event from stdin, run it and write the result to stdout.
    ///
    /// Returns the process exit code for the outcome.
    pub fn run(&self, ctx: &PipelineContext, params: &StageParams) -> Result<i32> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with(stdin.lock(), stdout.lock(), ctx, params)
    }

    /// Same as [`FilterService::run`] over arbitrary reader and writer.
    ///
    /// Input that cannot be read, decoded or parsed is reported as a fault
    /// in the output, never as an `Err`.
    pub fn run_with<R: Read, W: Write>(
        &self,
        reader: R,
        mut writer: W,
        ctx: &PipelineContext,
        params: &StageParams,
    ) -> Result<i32> {
        let (output, exit_code) = match Self::read_event(reader) {
            Ok(event) => {
                let outcome = self.process(ctx, event, params);
                let exit_code = outcome.exit_code();
                (outcome.into_output(), exit_code)
            }
            Err(e) => {
                let action = match e {
                    FilterAppError::Io(_) => "read",
                    _ => "parse",
                };
                let error_msg = format!("Failed to {} event: {}", action, e);
                error!("[{}] {}", ctx.correlation_id(), error_msg);
                (StageOutput::error(error_msg), FAULT_EXIT_CODE)
            }
        };

        let output_json = serde_json::to_string(&output)?;
        info!("[{}] Output: {}", ctx.correlation_id(), output_json);
        writeln!(writer, "{}", output_json)?;

        Ok(exit_code)
    }

    /// Run an already parsed event through the pipeline.
    pub fn process(
        &self,
        ctx: &PipelineContext,
        event: Option<Event>,
        params: &StageParams,
    ) -> StageOutcome {
        debug!(
            "[{}] Processing event: content_type={:?}, present={}",
            ctx.correlation_id(),
            params.content_type,
            event.is_some()
        );
        self.pipeline.execute(ctx, event, Some(params))
    }

    /// Read the whole input and parse it as an event.
    pub fn read_event<R: Read>(mut reader: R) -> Result<Option<Event>, FilterAppError> {
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;
        Self::parse_event(&input)
    }

    /// Parse an event from UTF-8 JSON. Blank input means no event.
    pub fn parse_event(input: &[u8]) -> Result<Option<Event>, FilterAppError> {
        let input = std::str::from_utf8(input)?.trim();
        if input.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(input)?))
    }
}

/// Write a fault that stopped the pipeline before it could run.
pub fn write_fault<W: Write>(mut writer: W, message: &str) -> Result<i32> {
    let output_json = serde_json::to_string(&StageOutput::error(message))?;
    writeln!(writer, "{}", output_json)?;
    Ok(FAULT_EXIT_CODE)
}

/// Correlation id derived from the current time, for runs that are not given one.
pub fn new_correlation_id() -> String {
    format!(
        "{:x}",
        time::OffsetDateTime::now_utc().unix_timestamp_nanos()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterConfig;
    use crate::domain::filters::{FilterTarget, Polarity};

    fn service(target: FilterTarget, mode: Polarity, values: &[&str]) -> FilterService {
        let config = Config {
            filters: vec![FilterConfig {
                name: None,
                target,
                mode,
                values: values.iter().map(|v| v.to_string()).collect(),
            }],
            ..Config::default()
        };
        FilterService::new(&config)
    }

    fn run(service: &FilterService, input: &str) -> (String, i32) {
        let mut out = Vec::new();
        let ctx = PipelineContext::new("test");
        let params = StageParams::with_content_type("application/json");
        let code = service
            .run_with(input.as_bytes(), &mut out, &ctx, &params)
            .unwrap();
        (String::from_utf8(out).unwrap(), code)
    }

    const EVENT: &str = r#"{"profileName":"profile1","deviceName":"device1","readings":[
        {"resourceName":"resource1","valueType":"Int32","value":"1"},
        {"resourceName":"resource2","valueType":"Int32","value":"2"}]}"#;

    #[test]
    fn test_continue_writes_event() {
        let service = service(FilterTarget::ResourceName, Polarity::For, &["resource2"]);
        let (out, code) = run(&service, EVENT);

        assert_eq!(code, 0);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["continue"], true);
        assert_eq!(json["event"]["readings"].as_array().unwrap().len(), 1);
        assert_eq!(json["event"]["readings"][0]["resourceName"], "resource2");
    }

    #[test]
    fn test_halt_writes_no_event() {
        let service = service(FilterTarget::DeviceName, Polarity::Out, &["device1"]);
        let (out, code) = run(&service, EVENT);

        assert_eq!(code, 1);
        assert_eq!(out.trim(), r#"{"continue":false}"#);
    }

    #[test]
    fn test_blank_input_is_fault() {
        let service = service(FilterTarget::DeviceName, Polarity::For, &["device1"]);
        let (out, code) = run(&service, "  \n");

        assert_eq!(code, 2);
        assert_eq!(out.trim(), r#"{"continue":false,"error":"no Event Received"}"#);
    }

    #[test]
    fn test_invalid_utf8_is_reported() {
        let service = service(FilterTarget::DeviceName, Polarity::Out, &["device1"]);
        let mut out = Vec::new();
        let ctx = PipelineContext::new("test");
        let params = StageParams::default();
        let code = service
            .run_with(&b"\xff\xfe{"[..], &mut out, &ctx, &params)
            .unwrap();

        assert_eq!(code, FAULT_EXIT_CODE);
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["continue"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse event: UTF-8 error"));
    }

    #[test]
    fn test_read_failure_is_reported() {
        struct BrokenPipe;

        impl Read for BrokenPipe {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let service = service(FilterTarget::DeviceName, Polarity::For, &["device1"]);
        let mut out = Vec::new();
        let ctx = PipelineContext::new("test");
        let code = service
            .run_with(BrokenPipe, &mut out, &ctx, &StageParams::default())
            .unwrap();

        assert_eq!(code, FAULT_EXIT_CODE);
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to read event"));
    }

    #[test]
    fn test_write_fault() {
        let mut out = Vec::new();
        let code = write_fault(&mut out, "Invalid configuration").unwrap();

        assert_eq!(code, FAULT_EXIT_CODE);
        assert_eq!(
            String::from_utf8(out).unwrap().trim(),
            r#"{"continue":false,"error":"Invalid configuration"}"#
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let service = service(FilterTarget::DeviceName, Polarity::For, &["device1"]);
        let (out, code) = run(&service, "{not json");

        assert_eq!(code, 2);
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["continue"], false);
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to parse event"));
    }
}
