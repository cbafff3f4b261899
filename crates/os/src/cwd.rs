//! Current working directory.

use std::path::{Path, PathBuf};

/// Returns the current working directory, or `None` if the OS cannot report it.
pub fn getcwd() -> Option<PathBuf> {
    match crate::sys::current_dir() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "could not read the working directory");
            None
        }
    }
}

/// Changes the current working directory. Returns true on success.
pub fn chdir(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    tracing::info!(path = %path.display(), "changing directory");
    match std::env::set_current_dir(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not change directory");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;
    use crate::path::is_dir;

    #[test]
    #[serial(cwd)]
    fn getcwd_is_a_directory() {
        let cwd = getcwd().expect("working directory");
        assert!(is_dir(&cwd));
        assert_eq!(cwd, std::env::current_dir().unwrap());
    }

    #[test]
    #[serial(cwd)]
    fn chdir_round_trip() {
        let original = getcwd().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        let target = std::fs::canonicalize(tmp.path()).unwrap();

        assert!(chdir(&target));
        assert_eq!(std::fs::canonicalize(getcwd().unwrap()).unwrap(), target);

        assert!(chdir(&original));
        assert_eq!(getcwd().unwrap(), original);
    }

    #[test]
    #[serial(cwd)]
    fn chdir_to_missing_directory_fails() {
        let original = getcwd().unwrap();
        assert!(!chdir("/definitely/not/real"));
        assert_eq!(getcwd().unwrap(), original);
    }
}
