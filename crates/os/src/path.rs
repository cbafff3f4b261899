//! Platform-aware path syntax helpers.
//!
//! The string-level helpers never touch the filesystem. The `is_*`
//! predicates do query the OS but treat every failure as `false`.

use std::path::{Component, Path, PathBuf};

/// Returns the platform path separator.
pub fn separator() -> char {
    std::path::MAIN_SEPARATOR
}

/// Returns the platform line terminator.
pub fn newline() -> &'static str {
    if cfg!(windows) { "\r\n" } else { "\n" }
}

/// Joins two path segments with the platform separator.
///
/// Separators are never doubled: a trailing separator on `a` and a leading
/// root on `b` collapse into one. An empty `a` yields `b` relative.
pub fn concat(a: impl AsRef<Path>, b: impl AsRef<Path>) -> PathBuf {
    let tail: PathBuf = b
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    a.as_ref().join(tail)
}

/// Returns true when `p` has more than one path component, i.e. it is a
/// path rather than a bare command name.
pub fn contains_separator(p: impl AsRef<Path>) -> bool {
    p.as_ref().components().count() > 1
}

/// Strips trailing separators. A bare root (`/`, `C:\`) is left intact.
pub fn rtrim(p: impl AsRef<Path>) -> PathBuf {
    let os = p.as_ref().as_os_str();

    #[cfg(unix)]
    {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let bytes = os.as_bytes();
        PathBuf::from(OsStr::from_bytes(&bytes[..trimmed_len(bytes)]))
    }

    #[cfg(windows)]
    {
        use std::ffi::OsString;
        use std::os::windows::ffi::{OsStrExt, OsStringExt};
        let wide: Vec<u16> = os.encode_wide().collect();
        PathBuf::from(OsString::from_wide(&wide[..trimmed_len(&wide)]))
    }

    #[cfg(not(any(unix, windows)))]
    {
        let text = os.to_string_lossy();
        let units: Vec<u32> = text.chars().map(u32::from).collect();
        PathBuf::from(text.chars().take(trimmed_len(&units)).collect::<String>())
    }
}

/// Length of `units` once trailing separators are dropped, keeping a bare
/// root and, on Windows, a drive root.
fn trimmed_len<T: Copy + Into<u32>>(units: &[T]) -> usize {
    let mut end = units.len();
    while end > 1 && is_separator_unit(units[end - 1].into()) {
        if cfg!(windows) && Into::<u32>::into(units[end - 2]) == u32::from(b':') {
            break;
        }
        end -= 1;
    }
    end
}

fn is_separator_unit(u: u32) -> bool {
    char::from_u32(u).is_some_and(|c| c.is_ascii() && std::path::is_separator(c))
}

/// Returns true if `p` exists and is a regular file (symlinks followed).
pub fn is_file(p: impl AsRef<Path>) -> bool {
    std::fs::metadata(p).map(|m| m.is_file()).unwrap_or(false)
}

/// Returns true if `p` exists and is a directory (symlinks followed).
pub fn is_dir(p: impl AsRef<Path>) -> bool {
    std::fs::metadata(p).map(|m| m.is_dir()).unwrap_or(false)
}

/// Returns true if `p` is a regular file the current user may execute.
pub fn is_executable(p: impl AsRef<Path>) -> bool {
    let p = p.as_ref();
    is_file(p) && crate::sys::may_execute(p)
}

/// Creates `p` and any missing parents. An existing directory is success.
pub fn ensure_dir(p: impl AsRef<Path>) -> bool {
    let p = p.as_ref();
    match std::fs::create_dir_all(p) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %p.display(), error = %e, "could not create directory");
            false
        }
    }
}
