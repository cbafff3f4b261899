//! OS layer error types.

/// Errors produced by the platform primitives.
///
/// These never cross the public API of the crate except through
/// [`Spawner`](crate::Spawner); public operations log them and return a
/// sentinel instead.
#[derive(Debug, thiserror::Error)]
pub enum OsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{call} failed: {source}")]
    Sys {
        call: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} needs a buffer larger than {ceiling} units")]
    BufferCeiling { what: &'static str, ceiling: usize },

    #[error("no home directory for the current user")]
    NoHome,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),
}

impl OsError {
    /// Wraps the calling thread's last OS error.
    pub(crate) fn last(call: &'static str) -> Self {
        OsError::Sys {
            call,
            source: std::io::Error::last_os_error(),
        }
    }
}
