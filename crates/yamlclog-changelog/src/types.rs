//! Changelog types

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use yamlclog_core::FragmentError;

/// A changelog category.
///
/// Declaration order is the order categories appear in a rendered section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Security fixes
    Security,
    /// New features
    Added,
    /// Changes in existing functionality
    Changed,
    /// Bug fixes
    Fixed,
    /// Soon-to-be removed features
    Deprecated,
    /// Removed features
    Removed,
}

impl Category {
    /// All categories in render order
    pub const ALL: [Category; 6] = [
        Category::Security,
        Category::Added,
        Category::Changed,
        Category::Fixed,
        Category::Deprecated,
        Category::Removed,
    ];

    /// Normalized key used in fragment files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Added => "added",
            Self::Changed => "changed",
            Self::Fixed => "fixed",
            Self::Deprecated => "deprecated",
            Self::Removed => "removed",
        }
    }

    /// Heading used in the rendered section
    pub fn title(&self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Added => "Added",
            Self::Changed => "Changed",
            Self::Fixed => "Fixed",
            Self::Deprecated => "Deprecated",
            Self::Removed => "Removed",
        }
    }

    /// Names of every recognized category
    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.name().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Category {
    type Err = FragmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "security" => Ok(Self::Security),
            "added" => Ok(Self::Added),
            "changed" => Ok(Self::Changed),
            "fixed" => Ok(Self::Fixed),
            "deprecated" => Ok(Self::Deprecated),
            "removed" => Ok(Self::Removed),
            _ => Err(FragmentError::UnknownCategory {
                name: s.to_string(),
                valid: Self::names(),
            }),
        }
    }
}

/// A scalar from a fragment, kept with its YAML kind so numbers and
/// booleans render unquoted.
///
/// Numbers and booleans compare by numeric value (`true` is 1) and sort
/// before text; text compares byte-wise.
#[derive(Debug, Clone)]
pub enum Scalar {
    /// `true` or `false`
    Bool(bool),
    /// Integer or float
    Number(serde_yaml::Number),
    /// Any string
    Text(String),
}

impl Scalar {
    fn numeric(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(f64::from(u8::from(*b))),
            Self::Number(n) => n.as_f64(),
            Self::Text(_) => None,
        }
    }
}

impl Ord for Scalar {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
            _ => {
                let a = self.numeric().unwrap_or(f64::NAN);
                let b = other.numeric().unwrap_or(f64::NAN);
                a.total_cmp(&b)
                    .then_with(|| matches!(other, Self::Bool(_)).cmp(&matches!(self, Self::Bool(_))))
                    .then_with(|| self.to_string().cmp(&other.to_string()))
            }
        }
    }
}

impl PartialOrd for Scalar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scalar {}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for Scalar {
    fn from(n: f64) -> Self {
        Self::Number(n.into())
    }
}

/// A single changelog line.
///
/// Ordering follows the kind of the line: numeric and boolean lines first,
/// then labeled lines by label and text, then text lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A bare line
    Plain(Scalar),
    /// A line grouped under a subsection label
    Labeled {
        /// Subsection label
        label: Scalar,
        /// Line content
        text: Scalar,
    },
}

impl Entry {
    /// Create a plain entry
    pub fn plain(text: impl Into<Scalar>) -> Self {
        Self::Plain(text.into())
    }

    /// Create an entry under a subsection label
    pub fn labeled(label: impl Into<Scalar>, text: impl Into<Scalar>) -> Self {
        Self::Labeled {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Subsection label, if any
    pub fn label(&self) -> Option<&Scalar> {
        match self {
            Self::Plain(_) => None,
            Self::Labeled { label, .. } => Some(label),
        }
    }

    /// Content of the entry
    pub fn text(&self) -> &Scalar {
        match self {
            Self::Plain(text) | Self::Labeled { text, .. } => text,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Plain(Scalar::Text(_)) => 2,
            Self::Labeled { .. } => 1,
            Self::Plain(_) => 0,
        }
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (self, other) {
            (
                Self::Labeled { label: a, text: x },
                Self::Labeled { label: b, text: y },
            ) => a.cmp(b).then_with(|| x.cmp(y)),
            _ => self.text().cmp(other.text()),
        })
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Labeled entries serialize as one-key maps so YAML output reads `label: text`.
impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Plain(text) => text.serialize(serializer),
            Self::Labeled { label, text } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(label, text)?;
                map.end()
            }
        }
    }
}

/// Entries for every category, owned per changeset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    security: Vec<Entry>,
    added: Vec<Entry>,
    changed: Vec<Entry>,
    fixed: Vec<Entry>,
    deprecated: Vec<Entry>,
    removed: Vec<Entry>,
}

impl Sections {
    /// Create empty sections
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries of a category
    pub fn get(&self, category: Category) -> &[Entry] {
        match category {
            Category::Security => &self.security,
            Category::Added => &self.added,
            Category::Changed => &self.changed,
            Category::Fixed => &self.fixed,
            Category::Deprecated => &self.deprecated,
            Category::Removed => &self.removed,
        }
    }

    /// Mutable entries of a category
    pub fn get_mut(&mut self, category: Category) -> &mut Vec<Entry> {
        match category {
            Category::Security => &mut self.security,
            Category::Added => &mut self.added,
            Category::Changed => &mut self.changed,
            Category::Fixed => &mut self.fixed,
            Category::Deprecated => &mut self.deprecated,
            Category::Removed => &mut self.removed,
        }
    }

    /// Append entries to a category
    pub fn extend(&mut self, category: Category, entries: impl IntoIterator<Item = Entry>) {
        self.get_mut(category).extend(entries);
    }

    /// Sort every category
    pub fn sort(&mut self) {
        for category in Category::ALL {
            self.get_mut(category).sort();
        }
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        Category::ALL.iter().map(|c| self.get(*c).len()).sum()
    }

    /// Check if every category is empty
    pub fn is_empty(&self) -> bool {
        Category::ALL.iter().all(|c| self.get(*c).is_empty())
    }

    /// Non-empty categories in render order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Entry])> + '_ {
        Category::ALL
            .into_iter()
            .map(|c| (c, self.get(c)))
            .filter(|(_, entries)| !entries.is_empty())
    }
}

/// One category of a release section
#[derive(Debug, Clone, Serialize)]
pub struct CategorySection {
    /// Category
    pub category: Category,
    /// Sorted entries
    pub entries: Vec<Entry>,
}

/// The sorted, render-ready view of a changeset
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseSection {
    /// Version string
    pub version: String,
    /// Optional release codename
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codename: Option<String>,
    /// Release date
    pub date: NaiveDate,
    /// Non-empty categories in render order
    pub sections: Vec<CategorySection>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_str_ignores_case() {
        assert_eq!("added".parse::<Category>().unwrap(), Category::Added);
        assert_eq!("ADDED".parse::<Category>().unwrap(), Category::Added);
        assert_eq!("Security".parse::<Category>().unwrap(), Category::Security);
    }

    #[test]
    fn test_category_from_str_unknown() {
        let err = "improved".parse::<Category>().unwrap_err();
        match err {
            FragmentError::UnknownCategory { name, valid } => {
                assert_eq!(name, "improved");
                assert_eq!(valid.len(), 6);
                assert!(valid.contains(&"deprecated".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_entry_ordering() {
        let mut entries = vec![
            Entry::labeled("C", "laf"),
            Entry::labeled("C", "foo"),
            Entry::labeled("A", "baz"),
            Entry::labeled("B", "bar"),
        ];
        entries.sort();

        let labels: Vec<_> = entries
            .iter()
            .filter_map(|e| e.label())
            .map(|l| l.to_string())
            .collect();
        assert_eq!(labels, vec!["A", "B", "C", "C"]);
        assert_eq!(entries[2].text().to_string(), "foo");
        assert_eq!(entries[3].text().to_string(), "laf");
    }

    #[test]
    fn test_mixed_entries_labeled_before_text() {
        let mut entries = vec![
            Entry::labeled("Api", "alpha"),
            Entry::plain("zulu"),
            Entry::plain("bravo"),
            Entry::labeled("Abc", "yankee"),
        ];
        entries.sort();

        assert_eq!(
            entries,
            vec![
                Entry::labeled("Abc", "yankee"),
                Entry::labeled("Api", "alpha"),
                Entry::plain("bravo"),
                Entry::plain("zulu"),
            ]
        );
    }

    #[test]
    fn test_numbers_and_booleans_sort_first_by_value() {
        let mut entries = vec![
            Entry::plain(42_i64),
            Entry::plain("zeta"),
            Entry::plain(true),
            Entry::labeled("Api", "alpha"),
            Entry::plain(1.5),
        ];
        entries.sort();

        assert_eq!(
            entries,
            vec![
                Entry::plain(true),
                Entry::plain(1.5),
                Entry::plain(42_i64),
                Entry::labeled("Api", "alpha"),
                Entry::plain("zeta"),
            ]
        );
    }

    #[test]
    fn test_scalar_kind_is_part_of_equality() {
        assert_ne!(Entry::plain("42"), Entry::plain(42_i64));
        assert_ne!(Entry::plain(true), Entry::plain(1_i64));
        assert_eq!(Entry::plain(42_i64), Entry::plain(42_i64));
    }

    #[test]
    fn test_numbers_and_booleans_serialize_unquoted() {
        let yaml = serde_yaml::to_string(&vec![
            Entry::plain(42_i64),
            Entry::plain(1.5),
            Entry::plain(false),
            Entry::labeled(2024_i64, "x"),
            Entry::plain("42"),
        ])
        .unwrap();
        assert_eq!(yaml, "- 42\n- 1.5\n- false\n- 2024: x\n- '42'\n");
    }

    #[test]
    fn test_entry_serializes_as_yaml_list_item() {
        let yaml =
            serde_yaml::to_string(&vec![Entry::plain("Feature X"), Entry::labeled("Auth", "Bug A")])
                .unwrap();
        assert_eq!(yaml, "- Feature X\n- Auth: Bug A\n");
    }

    #[test]
    fn test_sections_are_independent() {
        let mut first = Sections::new();
        first.extend(Category::Added, [Entry::plain("only here")]);
        let second = Sections::new();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
    }

    #[test]
    fn test_sections_iter_skips_empty_in_order() {
        let mut sections = Sections::new();
        sections.extend(Category::Removed, [Entry::plain("old api")]);
        sections.extend(Category::Security, [Entry::plain("patched")]);

        let order: Vec<_> = sections.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::Security, Category::Removed]);
    }
}
