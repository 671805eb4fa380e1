//! yamlclog Core - Core library for changelog fragment aggregation
//!
//! This crate provides the error types, configuration, and persistence
//! workflow shared by the yamlclog changelog crate and CLI.

pub mod config;
pub mod error;
pub mod workflow;

pub use error::{ChangelogError, ConfigError, FragmentError, Result, YamlclogError};
