//! Path of the running executable.

use std::path::PathBuf;

use crate::OsError;

/// Returns the absolute path of the running binary, or `None` on failure.
pub fn executable_path() -> Option<PathBuf> {
    match locate() {
        Ok(path) => Some(path),
        Err(e) => {
            tracing::warn!(error = %e, "could not determine the executable path");
            None
        }
    }
}

// Platform-specific lookup.
#[cfg(target_os = "macos")]
fn locate() -> Result<PathBuf, OsError> {
    crate::sys_macos::executable_path()
}

#[cfg(not(target_os = "macos"))]
fn locate() -> Result<PathBuf, OsError> {
    crate::sys::executable_path()
}
