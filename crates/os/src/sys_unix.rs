//! POSIX primitives.

use std::ffi::{CStr, CString, OsString};
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::unistd::{AccessFlags, ForkResult, User, access, fork, getuid};

use crate::OsError;
use crate::buffered::{self, Fill};

pub(crate) fn may_execute(path: &Path) -> bool {
    access(path, AccessFlags::X_OK).is_ok()
}

pub(crate) fn current_dir() -> Result<PathBuf, OsError> {
    let bytes = buffered::query::<u8, _>("getcwd", |buf| {
        // SAFETY: `buf` is valid for writes of `buf.len()` bytes.
        let ret = unsafe { libc::getcwd(buf.as_mut_ptr().cast(), buf.len()) };
        if ret.is_null() {
            match Errno::last() {
                Errno::ERANGE => Fill::TooSmall,
                _ => Fill::Failed(OsError::last("getcwd")),
            }
        } else {
            Fill::Done(buf.iter().position(|&b| b == 0).unwrap_or(buf.len()))
        }
    })?;
    Ok(PathBuf::from(OsString::from_vec(bytes)))
}

/// Reads the per-process `/proc/<pid>/exe` link.
///
/// Systems without procfs (several BSDs) are not covered.
#[cfg(not(target_os = "macos"))]
pub(crate) fn executable_path() -> Result<PathBuf, OsError> {
    let link = PathBuf::from(format!("/proc/{}/exe", nix::unistd::getpid()));
    std::fs::read_link(&link).map_err(|source| {
        tracing::debug!(link = %link.display(), "failed to read link");
        OsError::Sys {
            call: "readlink",
            source,
        }
    })
}

/// Home directory from the password database entry of the real uid.
pub(crate) fn passwd_home() -> Option<PathBuf> {
    match User::from_uid(getuid()) {
        Ok(user) => user.map(|u| u.dir),
        Err(errno) => {
            tracing::debug!(error = %errno, "getpwuid failed");
            None
        }
    }
}

/// Forks; the child sleeps `delay_secs` and execs `program`.
///
/// The parent returns as soon as the fork succeeded and never waits.
pub(crate) fn spawn_detached(
    program: &Path,
    args: &[OsString],
    delay_secs: u32,
) -> Result<(), OsError> {
    let path = to_cstring(program.as_os_str().as_bytes())?;
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(path.clone());
    for arg in args {
        argv.push(to_cstring(arg.as_bytes())?);
    }
    let mut argv_ptrs: Vec<*const libc::c_char> = argv.iter().map(|a| a.as_ptr()).collect();
    argv_ptrs.push(std::ptr::null());
    let fatal = format!("FATAL: exec failed for {}\n", program.display());

    // SAFETY: the child only touches memory prepared above and calls
    // async-signal-safe functions before exec or _exit.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => {
            tracing::debug!(pid = child.as_raw(), "forked launcher child");
            Ok(())
        }
        Ok(ForkResult::Child) => exec_child(&path, &argv_ptrs, delay_secs, fatal.as_bytes()),
        Err(errno) => Err(OsError::Sys {
            call: "fork",
            source: std::io::Error::from_raw_os_error(errno as i32),
        }),
    }
}

fn exec_child(
    path: &CStr,
    argv: &[*const libc::c_char],
    delay_secs: u32,
    fatal: &[u8],
) -> ! {
    // SAFETY: `argv` is null-terminated and every pointer in it outlives
    // the call; sleep, execv, write and _exit are async-signal-safe.
    unsafe {
        if delay_secs > 0 {
            libc::sleep(delay_secs);
        }
        libc::execv(path.as_ptr(), argv.as_ptr());
        libc::write(libc::STDERR_FILENO, fatal.as_ptr().cast(), fatal.len());
        libc::_exit(127)
    }
}

fn to_cstring(bytes: &[u8]) -> Result<CString, OsError> {
    CString::new(bytes).map_err(|e| {
        OsError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })
}
