//! Windows primitives.

use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use windows_sys::Win32::Foundation::{CloseHandle, MAX_PATH, S_OK};
use windows_sys::Win32::System::Environment::GetCurrentDirectoryW;
use windows_sys::Win32::System::LibraryLoader::GetModuleFileNameW;
use windows_sys::Win32::System::Threading::{
    CreateProcessW, NORMAL_PRIORITY_CLASS, PROCESS_INFORMATION, STARTUPINFOW,
};
use windows_sys::Win32::UI::Shell::{CSIDL_APPDATA, CSIDL_FLAG_CREATE, SHGetFolderPathW};

use crate::OsError;
use crate::buffered::{self, Fill};

const DEFAULT_PATHEXT: &str = ".COM;.EXE;.BAT;.CMD";

/// A file counts as executable when its extension is listed in `PATHEXT`.
pub(crate) fn may_execute(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    let pathext = std::env::var("PATHEXT").unwrap_or_else(|_| DEFAULT_PATHEXT.into());
    pathext
        .split(';')
        .filter_map(|e| e.strip_prefix('.'))
        .any(|e| e.eq_ignore_ascii_case(ext))
}

/// Maps a "returns the length" Win32 call onto the buffer protocol.
///
/// These calls signal a short buffer by returning a length that does not fit,
/// not through an error code.
fn fill_from_len(call: &'static str, len: u32, capacity: usize) -> Fill {
    let len = len as usize;
    if len == 0 {
        Fill::Failed(OsError::last(call))
    } else if len >= capacity {
        Fill::TooSmall
    } else {
        Fill::Done(len)
    }
}

pub(crate) fn current_dir() -> Result<PathBuf, OsError> {
    let wide = buffered::query::<u16, _>("GetCurrentDirectoryW", |buf| {
        // SAFETY: `buf` is valid for writes of `buf.len()` UTF-16 units.
        let len = unsafe { GetCurrentDirectoryW(buf.len() as u32, buf.as_mut_ptr()) };
        fill_from_len("GetCurrentDirectoryW", len, buf.len())
    })?;
    Ok(PathBuf::from(OsString::from_wide(&wide)))
}

pub(crate) fn executable_path() -> Result<PathBuf, OsError> {
    let wide = buffered::query::<u16, _>("GetModuleFileNameW", |buf| {
        // SAFETY: a null module handle means the current executable; `buf`
        // is valid for writes of `buf.len()` UTF-16 units.
        let len =
            unsafe { GetModuleFileNameW(std::ptr::null_mut(), buf.as_mut_ptr(), buf.len() as u32) };
        fill_from_len("GetModuleFileNameW", len, buf.len())
    })?;
    Ok(PathBuf::from(OsString::from_wide(&wide)))
}

/// The roaming application data folder, created if it does not exist.
pub(crate) fn app_data_root() -> Result<PathBuf, OsError> {
    let mut buf = [0u16; MAX_PATH as usize];
    // SAFETY: `buf` holds MAX_PATH units as the API requires.
    let hr = unsafe {
        SHGetFolderPathW(
            std::ptr::null_mut(),
            (CSIDL_APPDATA | CSIDL_FLAG_CREATE) as i32,
            std::ptr::null_mut(),
            0,
            buf.as_mut_ptr(),
        )
    };
    if hr != S_OK {
        return Err(OsError::Sys {
            call: "SHGetFolderPathW",
            source: std::io::Error::from_raw_os_error(hr),
        });
    }
    let len = buf.iter().position(|&c| c == 0).unwrap_or(buf.len());
    Ok(PathBuf::from(OsString::from_wide(&buf[..len])))
}

/// Starts `program` with `CreateProcessW` and drops both handles at once.
pub(crate) fn spawn_detached(
    program: &Path,
    args: &[OsString],
    delay_secs: u32,
) -> Result<(), OsError> {
    if delay_secs > 0 {
        tracing::warn!(delay_secs, "delayed start is not supported on Windows, starting now");
    }

    let mut command_line = command_line(program.as_os_str(), args);

    // SAFETY: all-zero is a valid initial state for both structs.
    let mut startup: STARTUPINFOW = unsafe { std::mem::zeroed() };
    startup.cb = std::mem::size_of::<STARTUPINFOW>() as u32;
    let mut info: PROCESS_INFORMATION = unsafe { std::mem::zeroed() };

    // SAFETY: `command_line` is a mutable NUL-terminated buffer as the API
    // requires; every other pointer is null or points at a live local.
    let ok = unsafe {
        CreateProcessW(
            std::ptr::null(),
            command_line.as_mut_ptr(),
            std::ptr::null(),
            std::ptr::null(),
            0,
            NORMAL_PRIORITY_CLASS,
            std::ptr::null(),
            std::ptr::null(),
            &startup,
            &mut info,
        )
    };
    if ok == 0 {
        return Err(OsError::last("CreateProcessW"));
    }

    tracing::debug!(pid = info.dwProcessId, "created launcher child");
    // SAFETY: both handles were just returned by CreateProcessW and are not
    // used afterwards.
    unsafe {
        CloseHandle(info.hProcess);
        CloseHandle(info.hThread);
    }
    Ok(())
}

/// Builds `"program" "arg1" "arg2"` as a NUL-terminated wide string.
fn command_line(program: &OsStr, args: &[OsString]) -> Vec<u16> {
    let mut line = Vec::new();
    push_quoted(&mut line, program);
    for arg in args {
        line.push(u16::from(b' '));
        push_quoted(&mut line, arg);
    }
    line.push(0);
    line
}

/// Appends `s` in double quotes using the MSVCRT escaping rules:
/// backslashes are literal unless they precede a quote, in which case they
/// are doubled and the quote itself is escaped.
fn push_quoted(line: &mut Vec<u16>, s: &OsStr) {
    const QUOTE: u16 = b'"' as u16;
    const BACKSLASH: u16 = b'\\' as u16;

    line.push(QUOTE);
    let mut backslashes = 0usize;
    for unit in s.encode_wide() {
        match unit {
            BACKSLASH => backslashes += 1,
            QUOTE => {
                line.extend(std::iter::repeat_n(BACKSLASH, backslashes * 2 + 1));
                line.push(QUOTE);
                backslashes = 0;
            }
            _ => {
                line.extend(std::iter::repeat_n(BACKSLASH, backslashes));
                line.push(unit);
                backslashes = 0;
            }
        }
    }
    // The closing quote must not be escaped by a trailing backslash.
    line.extend(std::iter::repeat_n(BACKSLASH, backslashes * 2));
    line.push(QUOTE);
}
