//! Fragment parsing and discovery

mod fragment;
mod loader;

pub use fragment::{parse_category, parse_document, parse_fragment, ParsedFragment};
pub use loader::{read_fragment, FragmentLoader, DEFAULT_PATTERNS};
