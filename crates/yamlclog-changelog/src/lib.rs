//! yamlclog Changelog - Fragment aggregation for release changelogs
//!
//! This crate loads per-change YAML fragments, merges them into category
//! buckets, and renders a release section for the master changelog.

pub mod changeset;
pub mod formatter;
pub mod parser;
pub mod types;

pub use changeset::Changeset;
pub use formatter::{MarkdownFormatter, SectionFormatter};
pub use parser::FragmentLoader;
pub use types::{Category, CategorySection, Entry, ReleaseSection, Scalar, Sections};
