//! Default configuration values

/// Default configuration file name (YAML)
pub const DEFAULT_CONFIG_YAML: &str = "yamlclog.yaml";

/// Default configuration file name (TOML)
pub const DEFAULT_CONFIG_TOML: &str = "yamlclog.toml";

/// Alternative configuration file name
pub const ALT_CONFIG_FILE: &str = ".yamlclog.yaml";

/// Environment variable naming the fragment directory
pub const INPUT_ENV: &str = "YAMLCLOG_INPUT";

/// Environment variable naming the master changelog
pub const MARKDOWN_ENV: &str = "YAMLCLOG_MARKDOWN";

/// Get list of config file names to search for
pub fn config_file_names() -> Vec<&'static str> {
    vec![
        DEFAULT_CONFIG_YAML,
        DEFAULT_CONFIG_TOML,
        ALT_CONFIG_FILE,
        ".yamlclog.toml",
    ]
}

/// Configuration written by `yamlclog init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# yamlclog configuration
#
# Paths are relative to the directory yamlclog runs in. The
# YAMLCLOG_INPUT and YAMLCLOG_MARKDOWN environment variables and the
# --input and --markdown flags take precedence over these values.

fragments:
  # Folder holding one YAML file per change
  dir: changelogs
  # File name patterns selecting fragments inside the folder
  patterns:
    - "*.yml"
    - "*.yaml"

changelog:
  # Markdown file new release sections are prepended to
  file: CHANGELOG.md
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{validate_config, Config};

    #[test]
    fn test_template_matches_defaults() {
        let config: Config = serde_yaml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        validate_config(&config).unwrap();

        let defaults = Config::default();
        assert_eq!(config.fragments.dir, defaults.fragments.dir);
        assert_eq!(config.fragments.patterns, defaults.fragments.patterns);
        assert_eq!(config.changelog.file, defaults.changelog.file);
    }

    #[test]
    fn test_config_file_names_prefer_yaml() {
        assert_eq!(config_file_names()[0], DEFAULT_CONFIG_YAML);
    }
}
