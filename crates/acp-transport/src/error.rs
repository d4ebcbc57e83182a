//! Transport-level errors.

use thiserror::Error;

/// A specialized `Result` type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while spawning, framing, or tearing down an ndjson
/// transport.
#[derive(Error, Debug, Clone)]
#[non_exhaustive]
pub enum TransportError {
    /// `executable` did not resolve to a file on `PATH` (or at the given
    /// path, if it contained a separator).
    #[error("executable not found: {0}")]
    ExecutableNotFound(String),

    /// `executable` resolved to a file without the executable bit set.
    #[error("not executable: {0}")]
    NotExecutable(String),

    /// The agent subprocess could not be spawned.
    #[error("failed to spawn agent process: {0}")]
    SpawnFailed(String),

    /// A line to be written contained an embedded newline, which would
    /// desynchronize ndjson framing.
    #[error("line contains an embedded newline")]
    EmbeddedNewline,

    /// A read or write against the underlying stream failed.
    #[error("io error: {0}")]
    Io(String),

    /// The transport is already closed.
    #[error("transport closed: {0:?}")]
    Closed(ClosedReason),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Why a transport stopped accepting reads/writes, unifying the three ways
/// an ndjson-over-stdio pipe can end (spec §4.1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClosedReason {
    /// The reader hit end-of-file.
    Eof,
    /// The peer process exited.
    ProcessExited {
        code: Option<i32>,
    },
    /// A write to the outbound stream failed.
    WriteFailed(String),
}
