//! Portable operating-system layer.
//!
//! Directory enumeration, application-data locations, own-executable lookup,
//! working-directory management and detached process launching behind one
//! platform-independent contract. Every platform-divergent primitive lives in
//! a single `sys` module selected at build time.
//!
//! Public operations never return errors: OS failures are logged at warning
//! level and reported as a sentinel (`None`, an empty `Vec` or `false`).

mod appdata;
pub mod buffered;
mod cwd;
mod dir;
mod error;
mod exe;
pub mod path;
mod process;
mod webpage;

#[cfg(unix)]
#[path = "sys_unix.rs"]
mod sys;

#[cfg(windows)]
#[path = "sys_windows.rs"]
mod sys;

#[cfg(not(any(unix, windows)))]
#[path = "sys_other.rs"]
mod sys;

#[cfg(target_os = "macos")]
mod sys_macos;

pub use appdata::{app_data_dir, custom_app_data_dir};
pub use cwd::{chdir, getcwd};
pub use dir::{listdir, listfiles, listsubdirs};
pub use error::OsError;
pub use exe::executable_path;
pub use process::{
    NativeSpawner, ProcessSpec, Spawner, run, run_spec, run_with, search_path,
};
pub use webpage::WebpageOpener;
