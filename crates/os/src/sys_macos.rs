//! macOS-specific lookups layered over the POSIX primitives.

use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;

use crate::OsError;

unsafe extern "C" {
    fn _NSGetExecutablePath(buf: *mut libc::c_char, bufsize: *mut u32) -> libc::c_int;
}

/// Asks dyld for the executable path.
///
/// The first attempt uses `PATH_MAX`. When that is too small dyld writes the
/// required size back, so exactly one more attempt is made with it.
pub(crate) fn executable_path() -> Result<PathBuf, OsError> {
    let mut size = libc::PATH_MAX as u32;
    if let Some(path) = try_executable_path(&mut size) {
        return Ok(path);
    }

    tracing::info!(
        path_max = libc::PATH_MAX,
        size,
        "first _NSGetExecutablePath call failed, retrying with the reported size"
    );

    try_executable_path(&mut size)
        .ok_or_else(|| OsError::NotFound("_NSGetExecutablePath failed completely".into()))
}

fn try_executable_path(size: &mut u32) -> Option<PathBuf> {
    let mut buf = vec![0 as libc::c_char; *size as usize + 1];
    // SAFETY: `buf` holds at least `*size` writable bytes.
    let ret = unsafe { _NSGetExecutablePath(buf.as_mut_ptr(), size) };
    if ret != 0 {
        return None;
    }
    // SAFETY: on success dyld wrote a NUL-terminated string into `buf`.
    let path = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(PathBuf::from(OsStr::from_bytes(path.to_bytes())))
}

/// `~/Library/Application Support` for the current user.
pub(crate) fn application_support() -> Result<PathBuf, OsError> {
    dirs::data_dir().ok_or_else(|| OsError::NotFound("application support folder".into()))
}
