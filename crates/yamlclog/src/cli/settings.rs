//! Path and configuration resolution shared by commands

use std::path::{Path, PathBuf};

use tracing::debug;
use yamlclog_changelog::FragmentLoader;
use yamlclog_core::config::{load_config, load_config_or_default, Config};

use super::Cli;

/// Resolved configuration and paths for one run.
///
/// Precedence for each path: command-line flag, then environment variable
/// (both handled by clap), then config file, then built-in default.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Loaded or default configuration
    pub config: Config,
    /// Config file the values came from, if any
    pub config_path: Option<PathBuf>,
    /// Fragment folder
    pub input_dir: PathBuf,
    /// Master changelog
    pub markdown_file: PathBuf,
}

impl Settings {
    /// Resolve settings for the current working directory
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::resolve_in(cli, &cwd)
    }

    /// Resolve settings relative to `cwd`
    pub fn resolve_in(cli: &Cli, cwd: &Path) -> anyhow::Result<Self> {
        let (config, config_path) = match &cli.config {
            Some(path) => (load_config(&cwd.join(path))?, Some(cwd.join(path))),
            None => load_config_or_default(cwd)?,
        };

        let input_dir = cwd.join(cli.input.as_ref().unwrap_or(&config.fragments.dir));
        let markdown_file = cwd.join(cli.markdown.as_ref().unwrap_or(&config.changelog.file));
        debug!(
            input_dir = %input_dir.display(),
            markdown_file = %markdown_file.display(),
            config = ?config_path,
            "settings resolved"
        );

        Ok(Self {
            config,
            config_path,
            input_dir,
            markdown_file,
        })
    }

    /// Fragment loader for the resolved folder and configured patterns
    pub fn loader(&self) -> FragmentLoader {
        FragmentLoader::from_config(&self.input_dir, &self.config.fragments)
    }
}
