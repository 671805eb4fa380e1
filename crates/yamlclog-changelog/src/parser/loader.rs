//! Fragment discovery on disk

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use yamlclog_core::config::FragmentsConfig;
use yamlclog_core::{FragmentError, Result};

use super::fragment::{parse_fragment, ParsedFragment};

/// Default patterns selecting fragment files
pub const DEFAULT_PATTERNS: [&str; 2] = ["*.yml", "*.yaml"];

/// Finds and reads fragment files in a directory
#[derive(Debug, Clone)]
pub struct FragmentLoader {
    dir: PathBuf,
    patterns: Vec<String>,
}

impl FragmentLoader {
    /// Create a loader for `dir` using the default patterns
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            patterns: DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Create a loader for `dir` using the configured patterns
    pub fn from_config(dir: impl Into<PathBuf>, config: &FragmentsConfig) -> Self {
        Self::new(dir).with_patterns(config.patterns.clone())
    }

    /// Use custom patterns, relative to the directory
    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = patterns;
        self
    }

    /// Directory searched for fragments
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files in the directory matching any pattern, sorted and deduplicated.
    ///
    /// Hidden files only match a pattern that spells out the leading dot.
    /// A missing directory yields no files.
    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        if !self.dir.is_dir() {
            warn!(dir = %self.dir.display(), "fragment directory does not exist");
            return Ok(Vec::new());
        }

        let base = glob::Pattern::escape(&self.dir.to_string_lossy());
        let options = glob::MatchOptions {
            require_literal_leading_dot: true,
            ..glob::MatchOptions::new()
        };
        let mut found = BTreeSet::new();

        for pattern in &self.patterns {
            let full = format!("{}/{}", base, pattern);
            let paths = glob::glob_with(&full, options).map_err(|e| FragmentError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;

            for entry in paths {
                let path = entry.map_err(|e| FragmentError::Read {
                    path: e.path().to_path_buf(),
                    error: e.into(),
                })?;
                if path.is_file() {
                    found.insert(path);
                }
            }
        }

        debug!(count = found.len(), "fragments discovered");
        Ok(found.into_iter().collect())
    }

    /// Read and parse a single fragment file
    pub fn read(&self, path: &Path) -> Result<ParsedFragment> {
        read_fragment(path)
    }
}

/// Read and parse a fragment file, tagging errors with the file path
pub fn read_fragment(path: &Path) -> Result<ParsedFragment> {
    let content = std::fs::read_to_string(path).map_err(|error| FragmentError::Read {
        path: path.to_path_buf(),
        error,
    })?;

    parse_fragment(&content, path).map_err(|err| match err {
        yamlclog_core::YamlclogError::Fragment(
            inner @ (FragmentError::Structural { .. } | FragmentError::UnknownCategory { .. }),
        ) => FragmentError::Invalid {
            path: path.to_path_buf(),
            error: Box::new(inner),
        }
        .into(),
        other => other,
    })
}
