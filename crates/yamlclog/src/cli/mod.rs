//! CLI definition and command handling

pub mod commands;
pub mod output;
mod settings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{CheckCommand, CompletionsCommand, GenerateArgs, InitCommand};
use yamlclog_core::config::{INPUT_ENV, MARKDOWN_ENV};

pub use settings::Settings;

/// yamlclog - Aggregate YAML changelog fragments into a release section
#[derive(Debug, Parser)]
#[command(name = "yamlclog")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_negates_reqs = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress output except errors and the rendered section
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Working directory
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (default: search upwards for yamlclog.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Folder of YAML changelog fragments [default: ./changelogs]
    #[arg(short, long, global = true, env = INPUT_ENV, value_name = "DIR")]
    pub input: Option<PathBuf>,

    /// Changelog file to prepend the new section to [default: ./CHANGELOG.md]
    #[arg(short, long, global = true, env = MARKDOWN_ENV, value_name = "FILE")]
    pub markdown: Option<PathBuf>,

    #[command(flatten)]
    pub generate: GenerateArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate fragments without rendering
    Check(CheckCommand),

    /// Create a configuration file, fragment folder and changelog
    Init(InitCommand),

    /// Generate shell completions
    Completions(CompletionsCommand),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> anyhow::Result<()> {
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)?;
        }

        match self.command {
            Some(Commands::Check(ref cmd)) => cmd.execute(&self),
            Some(Commands::Init(ref cmd)) => cmd.execute(&self),
            Some(Commands::Completions(ref cmd)) => cmd.execute(&self),
            None => self.generate.execute(&self),
        }
    }
}
