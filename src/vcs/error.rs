//! Errors raised by the version-control engine and the local git binary.

use thiserror::Error as ThisError;

/// Error returned by the VCS capability ports.
///
/// Callers never match on these to recover; the facade wraps them in a
/// stage-labelled [`crate::Error`].
#[derive(Debug, ThisError)]
pub enum GitError {
    /// libgit2 reported an error.
    #[error(transparent)]
    Engine(#[from] git2::Error),

    /// Spawning or talking to a process failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The `git` executable is not available on `PATH`.
    #[error("git executable not found in PATH")]
    GitNotInstalled,

    /// git refused to operate on a directory owned by someone else.
    #[error("detected dubious ownership in repository at '{0}'")]
    DubiousOwnership(String),

    /// A git command exited unsuccessfully.
    #[error("git {command} failed: {stderr}")]
    CommandFailed {
        /// The git subcommand that was run.
        command: String,
        /// Trimmed standard error of the command.
        stderr: String,
    },

    /// The repository has no working directory (bare repository).
    #[error("repository has no working directory")]
    BareRepository,

    /// The reference does not point at an object.
    #[error("reference '{0}' has no target")]
    SymbolicReference(String),

    /// The operation was cancelled through its [`super::StatusContext`].
    #[error("operation cancelled")]
    Cancelled,

    /// Error produced by a test double.
    #[error("{0}")]
    Fake(String),
}

impl GitError {
    /// Creates a test-double error with the given message.
    #[must_use]
    pub fn fake(message: impl Into<String>) -> Self {
        Self::Fake(message.into())
    }
}
