//! Directory enumeration.

use std::path::{Path, PathBuf};

use crate::path::{concat, is_dir, is_file};

/// Lists the entry names of a directory, excluding `.` and `..`.
///
/// Returns names, not full paths, in whatever order the OS yields them.
/// An unreadable directory is logged and yields an empty list, so callers
/// cannot tell it apart from an empty one.
pub fn listdir(path: impl AsRef<Path>) -> Vec<PathBuf> {
    let path = path.as_ref();
    let entries = match std::fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not open directory");
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => {
                let name = entry.file_name();
                if name != "." && name != ".." {
                    items.push(PathBuf::from(name));
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "error while reading directory");
            }
        }
    }
    items
}

/// Lists the names of regular files in a directory.
pub fn listfiles(path: impl AsRef<Path>) -> Vec<PathBuf> {
    let path = path.as_ref();
    listdir(path)
        .into_iter()
        .filter(|name| is_file(concat(path, name)))
        .collect()
}

/// Lists the names of subdirectories in a directory.
pub fn listsubdirs(path: impl AsRef<Path>) -> Vec<PathBuf> {
    let path = path.as_ref();
    listdir(path)
        .into_iter()
        .filter(|name| is_dir(concat(path, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn names(items: Vec<PathBuf>) -> BTreeSet<String> {
        items
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    fn populated() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let base = tmp.path();
        std::fs::create_dir(base.join("saves")).unwrap();
        std::fs::create_dir(base.join(".hidden")).unwrap();
        std::fs::write(base.join("level1.lev"), "1").unwrap();
        std::fs::write(base.join("settings.ini"), "x=1").unwrap();
        tmp
    }

    #[test]
    fn listdir_returns_every_entry_but_pseudo_entries() {
        let tmp = populated();
        let all = names(listdir(tmp.path()));

        assert_eq!(
            all,
            BTreeSet::from([
                ".hidden".to_string(),
                "level1.lev".to_string(),
                "saves".to_string(),
                "settings.ini".to_string(),
            ])
        );
        assert!(!all.contains("."));
        assert!(!all.contains(".."));
    }

    #[test]
    fn files_and_subdirs_split_listing() {
        let tmp = populated();

        let files = names(listfiles(tmp.path()));
        let dirs = names(listsubdirs(tmp.path()));

        assert_eq!(
            files,
            BTreeSet::from(["level1.lev".to_string(), "settings.ini".to_string()])
        );
        assert_eq!(
            dirs,
            BTreeSet::from([".hidden".to_string(), "saves".to_string()])
        );
        assert!(files.is_disjoint(&dirs));
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlinks_are_neither_file_nor_dir() {
        let tmp = populated();
        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("dangling")).unwrap();

        let all = names(listdir(tmp.path()));
        let files = names(listfiles(tmp.path()));
        let dirs = names(listsubdirs(tmp.path()));

        assert!(all.contains("dangling"));
        let union: BTreeSet<_> = files.union(&dirs).cloned().collect();
        let mut expected = all.clone();
        expected.remove("dangling");
        assert_eq!(union, expected);
    }

    #[test]
    fn missing_directory_yields_empty_listing() {
        assert!(listdir("/definitely/not/real").is_empty());
        assert!(listfiles("/definitely/not/real").is_empty());
        assert!(listsubdirs("/definitely/not/real").is_empty());
    }

    #[test]
    fn empty_directory_yields_empty_listing() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(listdir(tmp.path()).is_empty());
    }

    #[test]
    fn file_path_yields_empty_listing() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(listdir(tmp.path()).is_empty());
    }
}
