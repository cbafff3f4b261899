//! Stub primitives for platforms that are neither POSIX nor Windows.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::OsError;

pub(crate) fn may_execute(_path: &Path) -> bool {
    false
}

pub(crate) fn current_dir() -> Result<PathBuf, OsError> {
    std::env::current_dir().map_err(OsError::from)
}

pub(crate) fn executable_path() -> Result<PathBuf, OsError> {
    Err(OsError::Unsupported("executable path lookup"))
}

pub(crate) fn spawn_detached(
    _program: &Path,
    _args: &[OsString],
    _delay_secs: u32,
) -> Result<(), OsError> {
    Err(OsError::Unsupported("process launch"))
}
