//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for yamlclog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fragment discovery configuration
    pub fragments: FragmentsConfig,

    /// Master changelog configuration
    pub changelog: ChangelogConfig,
}

/// Where fragments live and which files count as fragments
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentsConfig {
    /// Directory holding the YAML fragments
    pub dir: PathBuf,

    /// Glob patterns, relative to `dir`, that select fragment files
    pub patterns: Vec<String>,
}

impl Default for FragmentsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("changelogs"),
            patterns: vec!["*.yml".to_string(), "*.yaml".to_string()],
        }
    }
}

/// Master changelog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangelogConfig {
    /// Changelog file path
    pub file: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("CHANGELOG.md"),
        }
    }
}
