//! PATH resolution and detached process launching.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::OsError;
use crate::path::{concat, contains_separator, is_executable, is_file};

/// A request to launch a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    /// Bare command name (resolved through `PATH`) or a path used as is.
    pub program: PathBuf,
    /// Arguments, not including the program itself.
    pub args: Vec<OsString>,
    /// Seconds the child waits before replacing itself with the program.
    pub delay_secs: u32,
}

impl ProcessSpec {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            delay_secs: 0,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn delay_secs(mut self, secs: u32) -> Self {
        self.delay_secs = secs;
        self
    }
}

/// Starts an already-resolved executable without waiting for it.
///
/// `Ok(())` means the OS accepted the launch request, not that the program
/// is running.
pub trait Spawner {
    fn spawn(&self, program: &Path, spec: &ProcessSpec) -> Result<(), OsError>;
}

/// The platform launcher compiled into this build.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSpawner;

impl Spawner for NativeSpawner {
    fn spawn(&self, program: &Path, spec: &ProcessSpec) -> Result<(), OsError> {
        crate::sys::spawn_detached(program, &spec.args, spec.delay_secs)
    }
}

/// Resolves a bare command name to a file path.
///
/// The current directory is checked first and always wins over `PATH`.
/// Names that already contain a separator are rejected.
pub fn search_path(name: impl AsRef<Path>) -> Option<PathBuf> {
    let name = name.as_ref();
    let cwd = if contains_separator(name) {
        None
    } else {
        crate::getcwd()
    };
    search_in(name, cwd.as_deref(), std::env::var_os("PATH").as_deref())
}

fn search_in(name: &Path, cwd: Option<&Path>, path_var: Option<&OsStr>) -> Option<PathBuf> {
    if contains_separator(name) {
        tracing::warn!(name = %name.display(), "app name should not be a path");
        return None;
    }

    if let Some(cwd) = cwd {
        let candidate = concat(cwd, name);
        if is_file(&candidate) {
            tracing::debug!(name = %name.display(), path = %candidate.display(), "found in current directory");
            return Some(candidate);
        }
    }

    let path_var = path_var?;
    let found = std::env::split_paths(path_var)
        .map(|dir| concat(dir, name))
        .find(|candidate| is_file(candidate));

    match &found {
        Some(path) => {
            tracing::debug!(name = %name.display(), path = %path.display(), "found in PATH");
        }
        None => tracing::debug!(name = %name.display(), "not found in PATH"),
    }
    found
}

/// Launches `app` with `args`, the child waiting `seconds_before_start` first.
///
/// Returns true once the OS has accepted the launch. See [`run_with`].
pub fn run<I, S>(app: impl AsRef<Path>, args: I, seconds_before_start: u32) -> bool
where
    I: IntoIterator<Item = S>,
    S: Into<OsString>,
{
    let spec = ProcessSpec::new(app.as_ref())
        .args(args)
        .delay_secs(seconds_before_start);
    run_spec(&spec)
}

/// Launches `spec` with the native spawner.
pub fn run_spec(spec: &ProcessSpec) -> bool {
    run_with(&NativeSpawner, spec)
}

/// Resolves, checks and launches `spec` through `spawner`.
///
/// A program containing a separator is used as is; a bare name goes through
/// [`search_path`]. The resolved file must be executable, otherwise the
/// spawner is never invoked.
pub fn run_with<S: Spawner>(spawner: &S, spec: &ProcessSpec) -> bool {
    let program = if contains_separator(&spec.program) {
        spec.program.clone()
    } else {
        match search_path(&spec.program) {
            Some(path) => path,
            None => {
                tracing::warn!(app = %spec.program.display(), "failed to resolve to a full path");
                return false;
            }
        }
    };

    if !is_executable(&program) {
        tracing::warn!(path = %program.display(), "failed to run process, file is not executable");
        return false;
    }

    tracing::info!(path = %program.display(), delay_secs = spec.delay_secs, "running process");
    for arg in &spec.args {
        tracing::info!(arg = %arg.to_string_lossy(), "process argument");
    }

    match spawner.spawn(&program, spec) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(path = %program.display(), error = %e, "failed to launch process");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct RecordingSpawner {
        calls: RefCell<Vec<(PathBuf, Vec<OsString>, u32)>>,
    }

    impl Spawner for RecordingSpawner {
        fn spawn(&self, program: &Path, spec: &ProcessSpec) -> Result<(), OsError> {
            self.calls
                .borrow_mut()
                .push((program.to_path_buf(), spec.args.clone(), spec.delay_secs));
            Ok(())
        }
    }

    fn touch(path: &Path) {
        std::fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    }

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        touch(path);
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn names_with_separator_are_never_resolved() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("a")).unwrap();
        touch(&tmp.path().join("a").join("b"));

        let path_var = std::env::join_paths([tmp.path()]).unwrap();
        assert_eq!(search_in(Path::new("a/b"), Some(tmp.path()), Some(path_var.as_os_str())), None);
        assert_eq!(search_path("a/b"), None);
    }

    #[test]
    fn current_directory_wins_over_path() {
        let cwd = tempfile::tempdir().unwrap();
        let bin = tempfile::tempdir().unwrap();
        touch(&cwd.path().join("toolX"));
        touch(&bin.path().join("toolX"));

        let path_var = std::env::join_paths([bin.path()]).unwrap();
        let found = search_in(Path::new("toolX"), Some(cwd.path()), Some(path_var.as_os_str()));
        assert_eq!(found, Some(cwd.path().join("toolX")));
    }

    #[test]
    fn first_path_entry_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let empty = tempfile::tempdir().unwrap();
        touch(&first.path().join("toolY"));
        touch(&second.path().join("toolY"));

        let path_var = std::env::join_paths([empty.path(), first.path(), second.path()]).unwrap();
        let found = search_in(Path::new("toolY"), Some(empty.path()), Some(path_var.as_os_str()));
        assert_eq!(found, Some(first.path().join("toolY")));
    }

    #[test]
    fn directories_do_not_match() {
        let bin = tempfile::tempdir().unwrap();
        std::fs::create_dir(bin.path().join("toolZ")).unwrap();

        let path_var = std::env::join_paths([bin.path()]).unwrap();
        assert_eq!(search_in(Path::new("toolZ"), None, Some(path_var.as_os_str())), None);
    }

    #[test]
    fn missing_path_variable_is_not_found() {
        let cwd = tempfile::tempdir().unwrap();
        assert_eq!(search_in(Path::new("toolX"), Some(cwd.path()), None), None);
    }

    #[test]
    #[serial_test::serial(env)]
    fn unresolvable_program_is_not_spawned() {
        let spawner = RecordingSpawner::default();
        let spec = ProcessSpec::new("moppet-no-such-tool-anywhere");
        assert!(!run_with(&spawner, &spec));
        assert!(spawner.calls.borrow().is_empty());
    }

    #[test]
    fn non_executable_target_is_not_spawned() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("notes.txt");
        std::fs::write(&target, "not a program").unwrap();

        let spawner = RecordingSpawner::default();
        assert!(!run_with(&spawner, &ProcessSpec::new(&target)));
        assert!(!run_with(&spawner, &ProcessSpec::new(tmp.path())));
        assert!(spawner.calls.borrow().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn executable_target_reaches_spawner() {
        let tmp = tempfile::tempdir().unwrap();
        let target = tmp.path().join("updater");
        make_executable(&target);

        let spawner = RecordingSpawner::default();
        let spec = ProcessSpec::new(&target)
            .arg("--channel")
            .arg("stable")
            .delay_secs(3);
        assert!(run_with(&spawner, &spec));

        let calls = spawner.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, target);
        assert_eq!(calls[0].1, vec![OsString::from("--channel"), OsString::from("stable")]);
        assert_eq!(calls[0].2, 3);
    }

    #[cfg(unix)]
    #[test]
    fn native_launch_runs_detached() {
        let tmp = tempfile::tempdir().unwrap();
        let marker = tmp.path().join("launched");
        let script = format!("touch '{}'", marker.display());

        assert!(run("/bin/sh", ["-c", script.as_str()], 0));

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while !marker.exists() && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        assert!(marker.exists(), "child never ran");
    }

    #[test]
    fn spec_builder_collects_arguments() {
        let spec = ProcessSpec::new("updater")
            .args(["a", "b"])
            .arg("c")
            .delay_secs(2);
        assert_eq!(spec.program, PathBuf::from("updater"));
        assert_eq!(spec.args.len(), 3);
        assert_eq!(spec.delay_secs, 2);
    }
}
