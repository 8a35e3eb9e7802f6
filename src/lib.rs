//! event-filter: filtering stage for telemetry event pipelines
//!
//! Filters decide, for one event at a time, whether the pipeline goes on.
//! Profile, device and source filters test a single field; resource filters
//! keep or drop individual readings.

pub mod config;
pub mod domain;
pub mod service;
