//! Changeset aggregation

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde_yaml::Value;
use tracing::{debug, info, instrument};
use yamlclog_core::workflow::{prepend_changelog, remove_fragments};
use yamlclog_core::{ChangelogError, Result};

use crate::formatter::{MarkdownFormatter, SectionFormatter};
use crate::parser::{parse_document, read_fragment, FragmentLoader, ParsedFragment};
use crate::types::{Category, CategorySection, Entry, ReleaseSection, Sections};

/// All changes for one release, collected from fragment files
pub struct Changeset {
    input_dir: PathBuf,
    version: String,
    codename: Option<String>,
    input_files: Vec<PathBuf>,
    sections: Sections,
    release_date: Option<NaiveDate>,
    rendered: Option<String>,
    formatter: Box<dyn SectionFormatter>,
}

impl Changeset {
    /// Create an empty changeset.
    ///
    /// An empty codename is treated as no codename.
    pub fn new(
        input_dir: impl Into<PathBuf>,
        version: impl Into<String>,
        codename: Option<String>,
    ) -> Self {
        Self {
            input_dir: input_dir.into(),
            version: version.into(),
            codename: codename.filter(|c| !c.is_empty()),
            input_files: Vec::new(),
            sections: Sections::new(),
            release_date: None,
            rendered: None,
            formatter: Box::new(MarkdownFormatter::new()),
        }
    }

    /// Use a custom formatter
    pub fn with_formatter<F: SectionFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Box::new(formatter);
        self.rendered = None;
        self
    }

    /// Pin the release date instead of using today's date at first render
    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self.rendered = None;
        self
    }

    /// Version string
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Release codename
    pub fn codename(&self) -> Option<&str> {
        self.codename.as_deref()
    }

    /// Directory fragments are loaded from
    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    /// Fragment files loaded so far, in load order
    pub fn input_files(&self) -> &[PathBuf] {
        &self.input_files
    }

    /// Entries of every category
    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    /// Entries of one category
    pub fn entries(&self, category: Category) -> &[Entry] {
        self.sections.get(category)
    }

    /// Load every fragment in the input directory using the default patterns
    pub fn generate(&mut self) -> Result<usize> {
        let loader = FragmentLoader::new(&self.input_dir);
        self.generate_with(&loader)
    }

    /// Load every fragment found by `loader`.
    ///
    /// Returns the number of files loaded. Stops at the first bad fragment.
    #[instrument(skip(self, loader), fields(dir = %loader.dir().display()))]
    pub fn generate_with(&mut self, loader: &FragmentLoader) -> Result<usize> {
        let paths = loader.discover()?;
        info!(count = paths.len(), "loading fragments");

        for path in &paths {
            self.add_file(path)?;
        }
        Ok(paths.len())
    }

    /// Load one fragment file and record it for cleanup
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn add_file(&mut self, path: &Path) -> Result<()> {
        let parsed = read_fragment(path)?;
        self.merge(parsed);
        self.input_files.push(path.to_path_buf());
        debug!(path = %path.display(), "fragment loaded");
        Ok(())
    }

    /// Merge an already-parsed fragment document.
    ///
    /// Nothing is merged if any category in the document is invalid.
    pub fn add(&mut self, document: &Value) -> Result<()> {
        let parsed = parse_document(document)?;
        self.merge(parsed);
        Ok(())
    }

    /// Append entries to a category directly
    pub fn add_entries(&mut self, category: Category, entries: impl IntoIterator<Item = Entry>) {
        self.sections.extend(category, entries);
        self.rendered = None;
    }

    fn merge(&mut self, parsed: ParsedFragment) {
        for (category, entries) in parsed {
            self.add_entries(category, entries);
        }
    }

    /// Sort every category into its deterministic order
    pub fn sort(&mut self) {
        self.sections.sort();
    }

    /// Sorted, render-ready view of the changeset.
    ///
    /// Fixes the release date on first call. Fails if there are no entries.
    pub fn release_section(&mut self) -> Result<ReleaseSection> {
        if self.sections.is_empty() {
            return Err(ChangelogError::NoChanges(self.input_dir.clone()).into());
        }

        self.sort();
        let date = *self
            .release_date
            .get_or_insert_with(|| Local::now().date_naive());

        Ok(ReleaseSection {
            version: self.version.clone(),
            codename: self.codename.clone(),
            date,
            sections: self
                .sections
                .iter()
                .map(|(category, entries)| CategorySection {
                    category,
                    entries: entries.to_vec(),
                })
                .collect(),
        })
    }

    /// Render the release section.
    ///
    /// The result is cached; later calls return the same text until the
    /// changeset is modified.
    #[instrument(skip(self), fields(version = %self.version))]
    pub fn render(&mut self) -> Result<&str> {
        if self.rendered.is_none() {
            let release = self.release_section()?;
            let output = self.formatter.format(&release)?;
            debug!(entries = self.sections.len(), "changeset rendered");
            self.rendered = Some(output);
        }
        Ok(self.rendered.as_deref().unwrap_or_default())
    }

    /// Prepend the rendered section to the master changelog at `path`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        let section = self.render()?.to_string();
        prepend_changelog(path, &section)
    }

    /// Delete every loaded fragment file.
    ///
    /// Only call this after a successful [`Changeset::save`].
    pub fn cleanup(&self) -> Result<()> {
        remove_fragments(&self.input_files)
    }
}

impl std::fmt::Debug for Changeset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Changeset")
            .field("input_dir", &self.input_dir)
            .field("version", &self.version)
            .field("codename", &self.codename)
            .field("input_files", &self.input_files)
            .field("sections", &self.sections)
            .field("release_date", &self.release_date)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use yamlclog_core::{FragmentError, YamlclogError};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, 1, 18).unwrap()
    }

    fn changeset(dir: &Path) -> Changeset {
        Changeset::new(dir, "1.0.0", Some("TestChanges".to_string())).with_release_date(date())
    }

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    #[test]
    fn test_basic_file_loading() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("basic.yml");
        std::fs::write(
            &path,
            "added:\n  - New widget\n  - Widget settings\nchanged:\n  Api:\n    - Renamed endpoint\n    - Dropped field\n  Cli: New default\n",
        )
        .unwrap();

        let mut changes = changeset(temp.path());
        changes.add_file(&path).unwrap();

        assert_eq!(changes.entries(Category::Added).len(), 2);
        assert_eq!(changes.entries(Category::Changed).len(), 3);
        assert_eq!(changes.input_files(), &[path]);
    }

    #[test]
    fn test_sections_case_insensitive() {
        let mut changes = changeset(Path::new("changelogs"));
        for category in Category::ALL {
            let upper = category.name().to_uppercase();
            changes.add(&yaml(&format!("{}: [Foo]", upper))).unwrap();

            assert_eq!(changes.entries(category), &[Entry::plain("Foo")]);
        }
    }

    #[test]
    fn test_mixed_casing_shares_bucket() {
        let mut changes = changeset(Path::new("changelogs"));
        changes.add(&yaml("ADDED: [one]")).unwrap();
        changes.add(&yaml("Added: [two]")).unwrap();
        changes.add(&yaml("added: [three]")).unwrap();

        assert_eq!(changes.entries(Category::Added).len(), 3);
    }

    #[test]
    fn test_dict_parsing() {
        let mut changes = changeset(Path::new("changelogs"));
        changes.add(&yaml("added:\n  Foo: [bar, baz]\n")).unwrap();

        assert_eq!(
            changes.entries(Category::Added),
            &[Entry::labeled("Foo", "bar"), Entry::labeled("Foo", "baz")]
        );
    }

    #[test]
    fn test_sorting() {
        let mut changes = changeset(Path::new("changelogs"));
        changes
            .add(&yaml("added:\n  C: [laf, foo]\n  A: [baz]\n  B: bar\n"))
            .unwrap();
        changes.sort();

        assert_eq!(
            changes.entries(Category::Added),
            &[
                Entry::labeled("A", "baz"),
                Entry::labeled("B", "bar"),
                Entry::labeled("C", "foo"),
                Entry::labeled("C", "laf"),
            ]
        );
    }

    #[test]
    fn test_unknown_category_leaves_buckets_untouched() {
        let mut changes = changeset(Path::new("changelogs"));
        let err = changes
            .add(&yaml("added: [valid]\nimproved: [nope]\n"))
            .unwrap_err();

        assert!(matches!(
            err,
            YamlclogError::Fragment(FragmentError::UnknownCategory { .. })
        ));
        assert!(changes.sections().is_empty());
    }

    #[test]
    fn test_bad_file_is_not_recorded() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yml");
        std::fs::write(&path, "fixed:\n  Auth:\n    nested: map\n").unwrap();

        let mut changes = changeset(temp.path());
        assert!(changes.add_file(&path).is_err());
        assert!(changes.input_files().is_empty());
        assert!(changes.sections().is_empty());
    }

    #[test]
    fn test_empty_changeset_refuses_to_render() {
        let mut changes = changeset(Path::new("changelogs"));
        let err = changes.render().unwrap_err();
        assert!(matches!(
            err,
            YamlclogError::Changelog(ChangelogError::NoChanges(_))
        ));
    }

    #[test]
    fn test_render_is_cached() {
        let mut changes = Changeset::new("changelogs", "2.0.0", None);
        changes.add_entries(Category::Fixed, [Entry::plain("Crash on start")]);

        let first = changes.render().unwrap().to_string();
        let pinned = changes.release_section().unwrap().date;
        let second = changes.render().unwrap().to_string();

        assert_eq!(first, second);
        assert!(first.contains(&pinned.format("%Y-%m-%d").to_string()));
    }

    #[test]
    fn test_render_date_fixed_after_first_render() {
        let mut changes = Changeset::new("changelogs", "2.0.0", None);
        changes.add_entries(Category::Fixed, [Entry::plain("a")]);
        let first_date = changes.release_section().unwrap().date;

        changes.add_entries(Category::Fixed, [Entry::plain("b")]);
        let second_date = changes.release_section().unwrap().date;

        assert_eq!(first_date, second_date);
    }

    #[test]
    fn test_render_full_output() {
        let mut changes = changeset(Path::new("changelogs"));
        changes
            .add(&yaml(
                "removed: [Legacy mode]\nadded: [Zoom, Alpha]\nsecurity: [Patched token leak]\nchanged:\n  Cli: New default\n",
            ))
            .unwrap();

        assert_eq!(
            changes.render().unwrap(),
            "# 1.0.0 \"TestChanges\" - 2017-01-18\n\
             ## Security\n\
             - Patched token leak\n\
             ## Added\n\
             - Alpha\n\
             - Zoom\n\
             ## Changed\n\
             - Cli: New default\n\
             ## Removed\n\
             - Legacy mode"
        );
    }

    #[test]
    fn test_render_mixed_scalar_kinds() {
        let mut changes = changeset(Path::new("changelogs"));
        changes
            .add(&yaml(
                "added: [42, true, 1.5, zeta, {Api: alpha}]\nfixed:\n  2024: [x]\n",
            ))
            .unwrap();

        assert_eq!(
            changes.render().unwrap(),
            "# 1.0.0 \"TestChanges\" - 2017-01-18\n\
             ## Added\n\
             - true\n\
             - 1.5\n\
             - 42\n\
             - Api: alpha\n\
             - zeta\n\
             ## Fixed\n\
             - 2024: x"
        );
    }

    #[test]
    fn test_end_to_end_generate() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("feature.yml"), "added: [\"Feature X\"]\n").unwrap();
        std::fs::write(
            temp.path().join("auth.yaml"),
            "fixed:\n  Auth:\n    - Bug B\n    - Bug A\n",
        )
        .unwrap();

        let mut changes = Changeset::new(temp.path(), "1.2.0", Some("Badger".to_string()));
        assert_eq!(changes.generate().unwrap(), 2);

        let output = changes.render().unwrap().to_string();
        let date = changes.release_section().unwrap().date;
        let lines: Vec<_> = output.lines().collect();

        assert!((Local::now().date_naive() - date).num_days() <= 1);
        assert_eq!(lines[0], format!("# 1.2.0 \"Badger\" - {}", date));
        assert_eq!(
            &lines[1..],
            &[
                "## Added",
                "- Feature X",
                "## Fixed",
                "- Auth: Bug A",
                "- Auth: Bug B",
            ]
        );
    }

    #[test]
    fn test_save_and_cleanup() {
        let temp = TempDir::new().unwrap();
        let fragments = temp.path().join("changelogs");
        std::fs::create_dir(&fragments).unwrap();
        std::fs::write(fragments.join("one.yml"), "fixed: [Bug]\n").unwrap();
        let master = temp.path().join("CHANGELOG.md");
        std::fs::write(&master, "# 0.9.0 - 2016-12-01\n## Added\n- Start\n").unwrap();

        let mut changes = Changeset::new(&fragments, "1.0.0", None).with_release_date(date());
        changes.generate().unwrap();
        changes.save(&master).unwrap();
        changes.cleanup().unwrap();

        assert_eq!(
            std::fs::read_to_string(&master).unwrap(),
            "# 1.0.0 - 2017-01-18\n## Fixed\n- Bug\n\n# 0.9.0 - 2016-12-01\n## Added\n- Start\n"
        );
        assert!(!fragments.join("one.yml").exists());
    }

    #[test]
    fn test_save_requires_master() {
        let temp = TempDir::new().unwrap();
        let mut changes = changeset(temp.path());
        changes.add_entries(Category::Added, [Entry::plain("Thing")]);

        let err = changes.save(&temp.path().join("CHANGELOG.md")).unwrap_err();
        assert!(matches!(
            err,
            YamlclogError::Changelog(ChangelogError::MasterNotFound(_))
        ));
    }

    #[test]
    fn test_custom_formatter() {
        struct Count;
        impl SectionFormatter for Count {
            fn format(&self, release: &ReleaseSection) -> Result<String> {
                Ok(format!("{} sections", release.sections.len()))
            }
        }

        let mut changes = changeset(Path::new("changelogs")).with_formatter(Count);
        changes.add(&yaml("added: [a]\nfixed: [b]\n")).unwrap();
        assert_eq!(changes.render().unwrap(), "2 sections");
    }

    #[test]
    fn test_instances_do_not_share_state() {
        let mut first = changeset(Path::new("a"));
        first.add_entries(Category::Added, [Entry::plain("first only")]);
        let second = changeset(Path::new("b"));

        assert!(second.sections().is_empty());
    }

    #[test]
    fn test_release_section_serializes() {
        let mut changes = changeset(Path::new("changelogs"));
        changes.add(&yaml("fixed:\n  Auth: [Bug A]\n")).unwrap();

        let json = serde_json::to_value(changes.release_section().unwrap()).unwrap();
        assert_eq!(json["version"], "1.0.0");
        assert_eq!(json["codename"], "TestChanges");
        assert_eq!(json["date"], "2017-01-18");
        assert_eq!(json["sections"][0]["category"], "fixed");
        assert_eq!(json["sections"][0]["entries"][0]["Auth"], "Bug A");
    }
}
