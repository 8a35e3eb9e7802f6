//! Service layer driving one pipeline execution.

mod filter_service;

pub use filter_service::{new_correlation_id, write_fault, FilterService, FAULT_EXIT_CODE};
