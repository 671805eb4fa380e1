//! Changelog persistence operations

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{ChangelogError, Result};

/// Separator between the new section and the existing changelog text
pub const SECTION_SEPARATOR: &str = "\n\n";

/// Prepend `section` to the master changelog at `path`.
///
/// The master must already exist. New content goes to a temporary file in the
/// same directory which then replaces the master, so a failed write leaves the
/// original untouched.
pub fn prepend_changelog(path: &Path, section: &str) -> Result<()> {
    info!(path = %path.display(), "prepending section to changelog");

    let existing =
        read_changelog(path)?.ok_or_else(|| ChangelogError::MasterNotFound(path.to_path_buf()))?;
    let combined = format!("{}{}{}", section, SECTION_SEPARATOR, existing);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let write_failed = |reason: String| ChangelogError::WriteFailed {
        path: path.to_path_buf(),
        reason,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_failed(e.to_string()))?;
    tmp.write_all(combined.as_bytes())
        .map_err(|e| write_failed(e.to_string()))?;

    // Keep the master's permissions; temp files are created owner-only.
    let permissions = std::fs::metadata(path)
        .map_err(ChangelogError::Io)?
        .permissions();
    tmp.as_file()
        .set_permissions(permissions)
        .map_err(|e| write_failed(e.to_string()))?;
    tmp.persist(path).map_err(|e| write_failed(e.error.to_string()))?;

    debug!(path = %path.display(), bytes = combined.len(), "changelog written");
    Ok(())
}

/// Read existing changelog content
pub fn read_changelog(path: &Path) -> Result<Option<String>> {
    if path.exists() {
        debug!(path = %path.display(), "reading existing changelog");
        Ok(Some(std::fs::read_to_string(path).map_err(ChangelogError::Io)?))
    } else {
        debug!(path = %path.display(), "no existing changelog found");
        Ok(None)
    }
}

/// Delete every file in `paths`.
///
/// All deletions are attempted; failures are collected into a single
/// [`ChangelogError::CleanupFailed`].
pub fn remove_fragments(paths: &[PathBuf]) -> Result<()> {
    info!(count = paths.len(), "removing consumed fragments");
    let mut failures = Vec::new();

    for path in paths {
        match std::fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "fragment removed"),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to remove fragment");
                failures.push((path.clone(), e));
            }
        }
    }

    if failures.is_empty() {
        Ok(())
    } else {
        Err(ChangelogError::CleanupFailed(failures).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::YamlclogError;
    use tempfile::TempDir;

    #[test]
    fn test_prepend_changelog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        std::fs::write(&path, "# 0.9.0 - 2016-12-01\n## Added\n- old\n").unwrap();

        prepend_changelog(&path, "# 1.0.0 - 2017-01-18\n## Fixed\n- new").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "# 1.0.0 - 2017-01-18\n## Fixed\n- new\n\n# 0.9.0 - 2016-12-01\n## Added\n- old\n"
        );
    }

    #[test]
    fn test_prepend_to_empty_changelog() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");
        std::fs::write(&path, "").unwrap();

        prepend_changelog(&path, "# 1.0.0").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# 1.0.0\n\n");
    }

    #[test]
    fn test_prepend_requires_existing_master() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("CHANGELOG.md");

        let err = prepend_changelog(&path, "# 1.0.0").unwrap_err();
        assert!(matches!(
            err,
            YamlclogError::Changelog(ChangelogError::MasterNotFound(_))
        ));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_changelog_missing() {
        let temp = TempDir::new().unwrap();
        assert!(read_changelog(&temp.path().join("nope.md")).unwrap().is_none());
    }

    #[test]
    fn test_remove_fragments() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.yml");
        let b = temp.path().join("b.yaml");
        std::fs::write(&a, "added: [x]").unwrap();
        std::fs::write(&b, "fixed: [y]").unwrap();

        remove_fragments(&[a.clone(), b.clone()]).unwrap();
        assert!(!a.exists());
        assert!(!b.exists());
    }

    #[test]
    fn test_remove_fragments_attempts_all() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.yml");
        let present = temp.path().join("present.yml");
        let also_missing = temp.path().join("also-missing.yml");
        std::fs::write(&present, "added: [x]").unwrap();

        let err = remove_fragments(&[missing.clone(), present.clone(), also_missing.clone()])
            .unwrap_err();

        assert!(!present.exists());
        match err {
            YamlclogError::Changelog(ChangelogError::CleanupFailed(failures)) => {
                let paths: Vec<_> = failures.into_iter().map(|(p, _)| p).collect();
                assert_eq!(paths, vec![missing, also_missing]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
