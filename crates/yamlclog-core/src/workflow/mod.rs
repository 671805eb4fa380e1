//! Workflow operations for yamlclog

mod changelog;

pub use changelog::*;
