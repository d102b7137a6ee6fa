//! Error types.
//!
//! Lookups on a [`Chord`](crate::Chord) report "not found" as `None`; that is
//! an expected outcome, not a failure. The types here exist for callers that
//! want to know *why* a path did not resolve, and for [`Chord::dispatch`]
//! which also flushes an [`Output`](crate::Output).
//!
//! [`Chord::dispatch`]: crate::Chord::dispatch

use thiserror::Error;

/// Why a path failed to resolve to a handler.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("empty path")]
    EmptyPath,

    /// An intermediate segment did not name a mounted chord. `depth` is the
    /// zero-based index of the segment in the path.
    #[error("no chord mounted at `{key}` (segment {depth})")]
    ChordNotFound { key: String, depth: usize },

    #[error("no handler registered at `{key}`")]
    HandlerNotFound { key: String },

    #[error("path has {depth} segments, limit is {limit}")]
    TooDeep { depth: usize, limit: usize },
}

/// The error type returned by chord's fallible operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_segment() {
        let err = ResolveError::ChordNotFound { key: "git".into(), depth: 0 };
        assert_eq!(err.to_string(), "no chord mounted at `git` (segment 0)");

        let err: Error = ResolveError::HandlerNotFound { key: "push".into() }.into();
        assert_eq!(err.to_string(), "no handler registered at `push`");
    }
}
