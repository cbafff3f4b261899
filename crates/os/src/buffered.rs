//! Retry protocol for OS calls that fill a caller-supplied buffer.
//!
//! The caller does not know the required size up front, so the buffer starts
//! at [`INITIAL_CAPACITY`] units and doubles every time the OS reports it was
//! too small. Growth stops at [`CAPACITY_CEILING`]; past that the query fails
//! instead of looping forever on a misbehaving primitive.

use crate::OsError;

/// First buffer size tried, in units of the buffer element type.
pub const INITIAL_CAPACITY: usize = 1024;

/// Largest buffer size ever allocated, in units.
pub const CAPACITY_CEILING: usize = 16384;

/// Outcome of one attempt at filling the buffer.
#[derive(Debug)]
pub enum Fill {
    /// The call succeeded and wrote this many units.
    Done(usize),
    /// The buffer was too small; retry with a larger one.
    TooSmall,
    /// The call failed for a reason a larger buffer will not fix.
    Failed(OsError),
}

/// Runs `fill` with growing buffers using the default limits.
///
/// `what` names the query in diagnostics.
pub fn query<T, F>(what: &'static str, fill: F) -> Result<Vec<T>, OsError>
where
    T: Copy + Default,
    F: FnMut(&mut [T]) -> Fill,
{
    query_with_limits(what, INITIAL_CAPACITY, CAPACITY_CEILING, fill)
}

/// Runs `fill` with buffers of `initial`, `2 * initial`, ... units, never
/// exceeding `ceiling`.
///
/// On success the returned vector holds exactly the units the call reported.
pub fn query_with_limits<T, F>(
    what: &'static str,
    initial: usize,
    ceiling: usize,
    mut fill: F,
) -> Result<Vec<T>, OsError>
where
    T: Copy + Default,
    F: FnMut(&mut [T]) -> Fill,
{
    let mut capacity = initial.max(1);

    while capacity <= ceiling {
        let mut buf = vec![T::default(); capacity];
        match fill(&mut buf) {
            Fill::Done(len) => {
                buf.truncate(len.min(capacity));
                return Ok(buf);
            }
            Fill::TooSmall => {
                tracing::debug!(what, capacity, "buffer too small, growing");
                capacity = capacity.saturating_mul(2);
            }
            Fill::Failed(e) => return Err(e),
        }
    }

    tracing::warn!(what, ceiling, "giving up on an absurdly long result");
    Err(OsError::BufferCeiling { what, ceiling })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_ceiling_when_always_too_small() {
        let mut sizes = Vec::new();
        let result = query::<u8, _>("test", |buf| {
            sizes.push(buf.len());
            Fill::TooSmall
        });

        assert!(matches!(
            result,
            Err(OsError::BufferCeiling { ceiling: CAPACITY_CEILING, .. })
        ));
        assert_eq!(sizes, vec![1024, 2048, 4096, 8192, 16384]);
        assert!(sizes.iter().all(|&s| s <= CAPACITY_CEILING));
    }

    #[test]
    fn returns_exact_content_after_growth() {
        let payload = b"/a/rather/long/path";
        let mut calls = 0;
        let result = query_with_limits::<u8, _>("test", 4, 64, |buf| {
            calls += 1;
            if buf.len() < payload.len() {
                return Fill::TooSmall;
            }
            buf[..payload.len()].copy_from_slice(payload);
            Fill::Done(payload.len())
        })
        .unwrap();

        assert_eq!(result, payload);
        assert_eq!(calls, 4); // 4, 8, 16, 32
    }

    #[test]
    fn first_attempt_success_does_not_retry() {
        let mut calls = 0;
        let result = query::<u16, _>("test", |buf| {
            calls += 1;
            buf[0] = 7;
            Fill::Done(1)
        })
        .unwrap();

        assert_eq!(result, vec![7]);
        assert_eq!(calls, 1);
    }

    #[test]
    fn hard_failure_is_not_retried() {
        let mut calls = 0;
        let result = query::<u8, _>("test", |_| {
            calls += 1;
            Fill::Failed(OsError::Unsupported("test"))
        });

        assert!(matches!(result, Err(OsError::Unsupported(_))));
        assert_eq!(calls, 1);
    }
}
