//! Release section formatters

mod markdown;

pub use markdown::MarkdownFormatter;

use yamlclog_core::Result;

use crate::types::ReleaseSection;

/// Trait for release section formatters
pub trait SectionFormatter: Send + Sync {
    /// Format a release section to string
    fn format(&self, release: &ReleaseSection) -> Result<String>;
}
