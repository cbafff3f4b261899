//! Per-user application data locations.

use std::path::{Path, PathBuf};

use crate::OsError;
use crate::path::{ensure_dir, rtrim};

/// Returns the platform-conventional root for persistent per-user data.
///
/// - Windows: the roaming application data folder (created if absent).
/// - macOS: `~/Library/Application Support`, else the POSIX rules.
/// - POSIX: `$XDG_DATA_HOME`, else `$HOME/.local/share`, where a missing
///   `HOME` falls back to the password database entry of the current user.
///
/// The result never ends with a separator. `None` when no rule applies.
pub fn app_data_dir() -> Option<PathBuf> {
    match platform_root() {
        Ok(root) => Some(rtrim(root)),
        Err(e) => {
            tracing::warn!(error = %e, "could not locate the application data directory");
            None
        }
    }
}

/// Returns `app_data_dir()/name`, creating the directory if needed.
///
/// Idempotent: an existing directory is returned as is.
pub fn custom_app_data_dir(name: impl AsRef<Path>) -> Option<PathBuf> {
    let root = app_data_dir()?;
    let dir = root.join(name);
    ensure_dir(&dir).then_some(dir)
}

#[cfg(windows)]
fn platform_root() -> Result<PathBuf, OsError> {
    crate::sys::app_data_root()
}

#[cfg(target_os = "macos")]
fn platform_root() -> Result<PathBuf, OsError> {
    match crate::sys_macos::application_support() {
        Ok(path) => Ok(path),
        Err(e) => {
            tracing::warn!(
                error = %e,
                "could not locate the application support folder, falling back to user home"
            );
            posix_root()
        }
    }
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_root() -> Result<PathBuf, OsError> {
    posix_root()
}

#[cfg(not(any(unix, windows)))]
fn platform_root() -> Result<PathBuf, OsError> {
    Err(OsError::Unsupported("application data directory"))
}

#[cfg(unix)]
fn posix_root() -> Result<PathBuf, OsError> {
    resolve_posix(
        std::env::var_os("XDG_DATA_HOME"),
        std::env::var_os("HOME"),
        crate::sys::passwd_home,
    )
}

/// Applies the POSIX precedence rules to already-read inputs.
#[cfg(any(unix, test))]
fn resolve_posix(
    xdg_data_home: Option<std::ffi::OsString>,
    home: Option<std::ffi::OsString>,
    passwd_home: impl FnOnce() -> Option<PathBuf>,
) -> Result<PathBuf, OsError> {
    if let Some(xdg) = xdg_data_home.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(xdg));
    }

    let home = match home.filter(|v| !v.is_empty()) {
        Some(home) => PathBuf::from(home),
        None => {
            tracing::warn!("HOME is not set, trying the password database");
            match passwd_home() {
                Some(home) => home,
                None => {
                    tracing::warn!("no password database entry for the current user either");
                    return Err(OsError::NoHome);
                }
            }
        }
    };

    Ok(crate::path::concat(home, ".local/share"))
}
