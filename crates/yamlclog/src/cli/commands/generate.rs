//! Generate command: render, and optionally save, a release section

use clap::Args;
use tracing::{info, warn};

use yamlclog_changelog::Changeset;

use crate::cli::output;
use crate::cli::{Cli, OutputFormat, Settings};

/// Render a changelog section from the fragment folder
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// The version number being written
    #[arg(value_name = "VERSION", required = true)]
    pub version_num: Option<String>,

    /// Optional codename to display in the header for this version
    #[arg(long)]
    pub codename: Option<String>,

    /// Prepend the section to the changelog file (also prints to stdout)
    #[arg(long)]
    pub save: bool,

    /// Delete the fragment files after a successful save
    #[arg(long, requires = "save")]
    pub cleanup: bool,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        let version = self
            .version_num
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("a version number is required"))?;
        info!(
            version,
            codename = ?self.codename,
            save = self.save,
            cleanup = self.cleanup,
            "executing generate command"
        );

        if semver::Version::parse(version).is_err() {
            warn!(version, "version is not a valid semantic version");
        }

        let settings = Settings::resolve(cli)?;
        self.run(cli, version, &settings)
    }

    fn run(&self, cli: &Cli, version: &str, settings: &Settings) -> anyhow::Result<()> {
        let mut changes = Changeset::new(&settings.input_dir, version, self.codename.clone());
        let loaded = changes.generate_with(&settings.loader())?;

        let status = !cli.quiet && cli.format == OutputFormat::Text;
        if status && cli.verbose {
            for path in changes.input_files() {
                output::info(&format!("Loaded {}", path.display()));
            }
        }

        match cli.format {
            OutputFormat::Json => {
                let release = changes.release_section()?;
                println!("{}", serde_json::to_string_pretty(&release)?);
            }
            OutputFormat::Text => {
                println!("{}\n", changes.render()?);
            }
        }

        if !self.save {
            return Ok(());
        }

        changes.save(&settings.markdown_file)?;
        if status {
            output::success(&format!(
                "{} updated",
                output::path_style().apply_to(settings.markdown_file.display())
            ));
        }

        if self.cleanup {
            changes.cleanup()?;
            if status {
                output::success(&format!("Deleted {} fragment file(s)", loaded));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        let fragments = temp.path().join("changelogs");
        std::fs::create_dir(&fragments).unwrap();
        std::fs::write(fragments.join("feature.yml"), "added: [Feature X]\n").unwrap();
        std::fs::write(
            fragments.join("auth.yaml"),
            "fixed:\n  Auth: [Bug B, Bug A]\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("CHANGELOG.md"), "# 1.1.0 - 2024-01-01\n").unwrap();
        temp
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec![
            "yamlclog",
            "--input",
            "changelogs",
            "--markdown",
            "CHANGELOG.md",
            "--quiet",
        ];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_codename_is_optional() {
        let cli = Cli::try_parse_from(["yamlclog", "2.0.0"]).unwrap();
        assert!(cli.generate.codename.is_none());
        assert!(!cli.generate.save);
        assert!(!cli.generate.cleanup);
    }

    #[test]
    fn test_print_only_leaves_files_alone() {
        let temp = project();
        let cli = cli(&["1.2.0"]);
        let settings = Settings::resolve_in(&cli, temp.path()).unwrap();

        cli.generate.run(&cli, "1.2.0", &settings).unwrap();

        assert_eq!(
            std::fs::read_to_string(temp.path().join("CHANGELOG.md")).unwrap(),
            "# 1.1.0 - 2024-01-01\n"
        );
        assert!(temp.path().join("changelogs/feature.yml").exists());
    }

    #[test]
    fn test_save_and_cleanup() {
        let temp = project();
        let cli = cli(&["1.2.0", "--codename", "Badger", "--save", "--cleanup"]);
        let settings = Settings::resolve_in(&cli, temp.path()).unwrap();

        cli.generate.run(&cli, "1.2.0", &settings).unwrap();

        let content = std::fs::read_to_string(temp.path().join("CHANGELOG.md")).unwrap();
        assert!(content.starts_with("# 1.2.0 \"Badger\" - "));
        assert!(content.contains("## Added\n- Feature X\n## Fixed\n- Auth: Bug A\n- Auth: Bug B\n\n# 1.1.0"));
        assert!(!temp.path().join("changelogs/feature.yml").exists());
        assert!(!temp.path().join("changelogs/auth.yaml").exists());
    }

    #[test]
    fn test_empty_folder_fails_without_side_effects() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("CHANGELOG.md"), "old\n").unwrap();
        let cli = cli(&["1.2.0", "--save"]);
        let settings = Settings::resolve_in(&cli, temp.path()).unwrap();

        let err = cli.generate.run(&cli, "1.2.0", &settings).unwrap_err();

        assert_eq!(crate::exit_codes::for_error(&err), crate::exit_codes::VALIDATION_ERROR);
        assert_eq!(
            std::fs::read_to_string(temp.path().join("CHANGELOG.md")).unwrap(),
            "old\n"
        );
    }
}
