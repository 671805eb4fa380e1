//! Markdown release section formatter

use tracing::{debug, instrument};
use yamlclog_core::{ChangelogError, Result};

use super::SectionFormatter;
use crate::types::ReleaseSection;

/// Markdown formatter.
///
/// Produces a `#` heading with version, optional quoted codename and date,
/// then one `##` heading per category followed by its entries as a YAML
/// block list.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new() -> Self {
        Self
    }

    fn heading(release: &ReleaseSection) -> String {
        match &release.codename {
            Some(codename) => format!(
                "# {} \"{}\" - {}",
                release.version,
                codename,
                release.date.format("%Y-%m-%d")
            ),
            None => format!("# {} - {}", release.version, release.date.format("%Y-%m-%d")),
        }
    }
}

impl SectionFormatter for MarkdownFormatter {
    #[instrument(skip(self, release), fields(version = %release.version, section_count = release.sections.len()))]
    fn format(&self, release: &ReleaseSection) -> Result<String> {
        let mut lines = vec![Self::heading(release)];

        for section in &release.sections {
            lines.push(format!("## {}", section.category.title()));
            let block = serde_yaml::to_string(&section.entries)
                .map_err(|e| ChangelogError::RenderFailed(e.to_string()))?;
            lines.push(block.trim_end().to_string());
        }

        let output = lines.join("\n");
        debug!(output_len = output.len(), "markdown section formatted");
        Ok(output)
    }
}
