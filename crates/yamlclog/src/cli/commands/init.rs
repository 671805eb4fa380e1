//! Init command

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use yamlclog_core::config::{validate_config, Config, DEFAULT_CONFIG_TEMPLATE, DEFAULT_CONFIG_YAML};

use crate::cli::output;
use crate::cli::Cli;

/// Create a configuration file, fragment folder and changelog
#[derive(Debug, Args)]
pub struct InitCommand {
    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Write the configuration as TOML
    #[arg(long)]
    pub toml: bool,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl InitCommand {
    /// Execute the init command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(force = self.force, toml = self.toml, "executing init command");
        let cwd = std::env::current_dir()?;
        let created = self.run(&cwd)?;

        if !cli.quiet {
            for path in &created {
                output::success(&format!(
                    "Created {}",
                    output::path_style().apply_to(path.display())
                ));
            }
            println!();
            println!("Next steps:");
            println!("  1. Add a fragment such as {}", style("changelogs/my-change.yml").cyan());
            println!("  2. Run {} to validate it", style("yamlclog check").cyan());
            println!("  3. Run {} to publish it", style("yamlclog <VERSION> --save --cleanup").cyan());
        }

        Ok(())
    }

    /// Write the project skeleton under `cwd`, returning the paths created
    fn run(&self, cwd: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let config_path = match &self.output {
            Some(path) => cwd.join(path),
            None if self.toml => cwd.join(DEFAULT_CONFIG_YAML).with_extension("toml"),
            None => cwd.join(DEFAULT_CONFIG_YAML),
        };

        if config_path.exists() && !self.force {
            anyhow::bail!(
                "Configuration file already exists at {}. Use --force to overwrite.",
                config_path.display()
            );
        }

        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE)?;
        validate_config(&config)?;
        let content = if self.toml {
            toml::to_string_pretty(&config)?
        } else {
            DEFAULT_CONFIG_TEMPLATE.to_string()
        };

        std::fs::write(&config_path, content)?;
        let mut created = vec![config_path];

        let fragments = cwd.join(&config.fragments.dir);
        if !fragments.is_dir() {
            std::fs::create_dir_all(&fragments)?;
            created.push(fragments);
        }

        // Saving needs an existing changelog to prepend to.
        let changelog = cwd.join(&config.changelog.file);
        if !changelog.exists() {
            std::fs::write(&changelog, "")?;
            created.push(changelog);
        }

        Ok(created)
    }
}
