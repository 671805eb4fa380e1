//! Error types for yamlclog

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using YamlclogError
pub type Result<T> = std::result::Result<T, YamlclogError>;

/// Main error type for yamlclog operations
#[derive(Debug, Error)]
pub enum YamlclogError {
    /// Configuration-related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fragment-related errors
    #[error(transparent)]
    Fragment(#[from] FragmentError),

    /// Changelog-related errors
    #[error(transparent)]
    Changelog(#[from] ChangelogError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found at {0}")]
    NotFound(PathBuf),

    /// Invalid configuration value
    #[error("Invalid configuration: {field} - {message}")]
    InvalidValue { field: String, message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// IO error
    #[error("IO error reading config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while reading and merging changelog fragments
#[derive(Debug, Error)]
pub enum FragmentError {
    /// Fragment could not be read from disk
    #[error("Failed to read fragment {path}: {error}")]
    Read {
        path: PathBuf,
        error: std::io::Error,
    },

    /// Fragment is not valid YAML
    #[error("Failed to parse fragment {path}: {error}")]
    Parse {
        path: PathBuf,
        error: serde_yaml::Error,
    },

    /// Fragment content does not have the expected shape
    #[error("Malformed changelog section:\n{content}")]
    Structural { content: String },

    /// Fragment declares a category outside the recognized set
    #[error("Unknown changelog section '{name}'. Valid sections are: {}", valid.join(", "))]
    UnknownCategory { name: String, valid: Vec<String> },

    /// Wraps another fragment error with the file it came from
    #[error("Invalid fragment {path}: {error}")]
    Invalid {
        path: PathBuf,
        error: Box<FragmentError>,
    },

    /// Input pattern could not be compiled
    #[error("Invalid fragment pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Changelog rendering and persistence errors
#[derive(Debug, Error)]
pub enum ChangelogError {
    /// Nothing to render
    #[error("No changes found. Make sure properly formatted YAML fragments are present in {}", .0.display())]
    NoChanges(PathBuf),

    /// Master changelog must exist before saving
    #[error("Changelog file not found at {0}")]
    MasterNotFound(PathBuf),

    /// Formatter could not produce output
    #[error("Failed to render changelog section: {0}")]
    RenderFailed(String),

    /// Failed to write changelog
    #[error("Failed to write changelog {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    /// One or more fragments could not be deleted
    #[error("Failed to delete {} fragment file(s): {}", .0.len(), format_failures(.0))]
    CleanupFailed(Vec<(PathBuf, std::io::Error)>),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_failures(failures: &[(PathBuf, std::io::Error)]) -> String {
    failures
        .iter()
        .map(|(path, err)| format!("{} ({})", path.display(), err))
        .collect::<Vec<_>>()
        .join(", ")
}

impl YamlclogError {
    /// Create a new "other" error with a message
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Self::Other(msg.into())
    }

    /// Whether the error stems from bad fragment input or an empty changeset
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Fragment(_) | Self::Changelog(ChangelogError::NoChanges(_))
        )
    }

    /// Whether the error stems from configuration
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
