//! Check command: validate fragments without rendering

use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::{info, warn};

use yamlclog_changelog::{Category, Sections};
use yamlclog_core::{ChangelogError, YamlclogError};

use crate::cli::output;
use crate::cli::{Cli, OutputFormat, Settings};

/// Validate every fragment in the fragment folder
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Fail when the folder holds no changelog entries
    #[arg(long)]
    pub strict: bool,
}

/// Result of checking one fragment file
struct FileReport {
    path: PathBuf,
    entries: usize,
    error: Option<YamlclogError>,
}

impl CheckCommand {
    /// Execute the check command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        info!(strict = self.strict, "executing check command");
        let settings = Settings::resolve(cli)?;
        self.run(cli, &settings)
    }

    fn run(&self, cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
        let loader = settings.loader();
        let files = loader.discover()?;

        let mut sections = Sections::new();
        let mut reports = Vec::with_capacity(files.len());
        for path in files {
            match loader.read(&path) {
                Ok(fragment) => {
                    let entries = fragment.iter().map(|(_, e)| e.len()).sum();
                    for (category, items) in fragment {
                        sections.extend(category, items);
                    }
                    reports.push(FileReport {
                        path,
                        entries,
                        error: None,
                    });
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "invalid fragment");
                    reports.push(FileReport {
                        path,
                        entries: 0,
                        error: Some(err),
                    });
                }
            }
        }

        let invalid = reports.iter().filter(|r| r.error.is_some()).count();
        match cli.format {
            OutputFormat::Json => print_json(settings, &reports, &sections)?,
            OutputFormat::Text if !cli.quiet => print_text(cli, settings, &reports, &sections),
            OutputFormat::Text => {}
        }

        if invalid > 0 {
            let total = reports.len();
            let first = reports
                .into_iter()
                .find_map(|r| r.error)
                .unwrap_or_else(|| YamlclogError::other("invalid fragment"));
            return Err(anyhow::Error::new(first)
                .context(format!("{} of {} fragments are invalid", invalid, total)));
        }

        if self.strict && sections.is_empty() {
            let err = ChangelogError::NoChanges(settings.input_dir.clone());
            return Err(YamlclogError::from(err).into());
        }

        Ok(())
    }
}

fn print_json(
    settings: &Settings,
    reports: &[FileReport],
    sections: &Sections,
) -> anyhow::Result<()> {
    let files: Vec<_> = reports
        .iter()
        .map(|r| {
            serde_json::json!({
                "path": r.path.display().to_string(),
                "entries": r.entries,
                "error": r.error.as_ref().map(|e| e.to_string()),
            })
        })
        .collect();
    let counts: serde_json::Map<String, serde_json::Value> = Category::ALL
        .iter()
        .map(|c| (c.name().to_string(), serde_json::json!(sections.get(*c).len())))
        .collect();

    let output = serde_json::json!({
        "valid": reports.iter().all(|r| r.error.is_none()),
        "input_dir": settings.input_dir.display().to_string(),
        "files": files,
        "entries": counts,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_text(cli: &Cli, settings: &Settings, reports: &[FileReport], sections: &Sections) {
    println!("{}", output::header("Fragment check"));
    println!(
        "Folder: {}",
        output::path_style().apply_to(settings.input_dir.display())
    );
    if let Some(path) = &settings.config_path {
        println!("Config: {}", output::path_style().apply_to(path.display()));
    }
    println!();

    for report in reports {
        match &report.error {
            Some(err) => println!("  {} {}", style("✗").red(), err),
            None if cli.verbose => println!(
                "  {} {} ({} entries)",
                style("✓").green(),
                report.path.display(),
                report.entries
            ),
            None => {}
        }
    }

    if sections.is_empty() {
        output::warning("No changelog entries found");
        return;
    }

    for (category, entries) in sections.iter() {
        println!("  {:<12} {}", category.title(), entries.len());
    }
    println!();

    let invalid = reports.iter().filter(|r| r.error.is_some()).count();
    if invalid == 0 {
        output::success(&format!(
            "{} fragment(s), {} entries",
            reports.len(),
            sections.len()
        ));
    }
}
