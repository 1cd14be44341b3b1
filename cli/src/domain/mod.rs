//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod error;
pub mod stack;

pub use config::{BackendConfig, ProjectConfig};
pub use error::{ConfigError, RemovalError};
pub use stack::{
    RemovalReport, ReportEntry, StackSelector, StackStatus, StackUnit, WireStackState,
    debug_stack_name, format_status, is_batch_complete,
};
