//! Fragment document parsing

use std::path::Path;

use serde_yaml::{Mapping, Value};
use tracing::trace;
use yamlclog_core::{FragmentError, Result, YamlclogError};

use crate::types::{Category, Entry, Scalar};

/// Entries contributed by one fragment, grouped by category
pub type ParsedFragment = Vec<(Category, Vec<Entry>)>;

/// Parse the text of a fragment file.
pub fn parse_fragment(content: &str, path: &Path) -> Result<ParsedFragment> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let document: Value = serde_yaml::from_str(content).map_err(|error| FragmentError::Parse {
        path: path.to_path_buf(),
        error,
    })?;
    parse_document(&document)
}

/// Parse a fragment document whose top level maps category names to content.
///
/// Every category is validated before anything is returned, so callers can
/// merge the result without risking a half-applied fragment.
pub fn parse_document(document: &Value) -> Result<ParsedFragment> {
    let mapping = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(mapping) => mapping,
        other => return Err(structural(other).into()),
    };

    let mut parsed = Vec::with_capacity(mapping.len());
    for (key, value) in mapping {
        let name = scalar(key).ok_or_else(|| structural(key))?;
        let category: Category = name.to_string().parse()?;
        let entries = parse_category(value)?;
        trace!(%category, count = entries.len(), "parsed category");
        parsed.push((category, entries));
    }
    Ok(parsed)
}

/// Normalize the content of one category to a list of entries.
///
/// - null: no entries
/// - scalar: one plain entry, keeping its YAML kind
/// - sequence: one entry per item; scalars are plain, `{label: text}` items labeled
/// - mapping of label to scalar or sequence: one labeled entry per value
pub fn parse_category(value: &Value) -> Result<Vec<Entry>> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Sequence(items) => items
            .iter()
            .map(|item| parse_item(item).map_err(YamlclogError::from))
            .collect(),
        Value::Mapping(subsections) => expand_subsections(subsections),
        other => match scalar(other) {
            Some(text) => Ok(vec![Entry::Plain(text)]),
            None => Err(structural(other).into()),
        },
    }
}

fn parse_item(item: &Value) -> std::result::Result<Entry, FragmentError> {
    if let Some(text) = scalar(item) {
        return Ok(Entry::Plain(text));
    }

    if let Value::Mapping(mapping) = item {
        if mapping.len() == 1 {
            if let Some((label, text)) = mapping.iter().next() {
                if let (Some(label), Some(text)) = (scalar(label), scalar(text)) {
                    return Ok(Entry::Labeled { label, text });
                }
            }
        }
    }

    Err(structural(item))
}

fn expand_subsections(subsections: &Mapping) -> Result<Vec<Entry>> {
    let mut entries = Vec::new();

    for (label, changes) in subsections {
        let label = scalar(label).ok_or_else(|| structural(label))?;
        match changes {
            Value::Null => {}
            Value::Sequence(items) => {
                for item in items {
                    let text = scalar(item).ok_or_else(|| structural(item))?;
                    entries.push(Entry::labeled(label.clone(), text));
                }
            }
            other => {
                let text = scalar(other).ok_or_else(|| structural(other))?;
                entries.push(Entry::labeled(label.clone(), text));
            }
        }
    }

    Ok(entries)
}

fn scalar(value: &Value) -> Option<Scalar> {
    match value {
        Value::String(s) => Some(Scalar::Text(s.clone())),
        Value::Number(n) => Some(Scalar::Number(n.clone())),
        Value::Bool(b) => Some(Scalar::Bool(*b)),
        _ => None,
    }
}

fn structural(value: &Value) -> FragmentError {
    let content = serde_yaml::to_string(value)
        .map(|s| s.trim_end().to_string())
        .unwrap_or_else(|_| format!("{:?}", value));
    FragmentError::Structural { content }
}
