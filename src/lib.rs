//! # Okteto Repository
//!
//! Answers questions about the git repository a deploy runs against.
//!
//! A [`Repository`] wraps a raw location (a URL, an SSH shorthand or a local
//! path) and binds a control strategy once, at construction:
//!
//! - On a developer machine the working directory is inspected through
//!   libgit2, with the local `git` binary used for status when present.
//! - In a remote deploy the commit was resolved beforehand and handed over
//!   through the environment, so no repository is opened at all.
//!
//! ## Features
//!
//! - Working tree cleanliness, current commit and tree ids
//! - Location equality across `https://` and `git@host:path` forms
//! - Credential-free rendering of locations for logs and telemetry
//! - Cancellable status scans
//!
//! ## Example
//!
//! ```rust,no_run
//! use okteto_repository::Repository;
//!
//! let repo = Repository::new("/home/dev/movies");
//! if repo.is_clean()? {
//!     println!("deploying {}", repo.sha()?);
//! }
//! # Ok::<(), okteto_repository::Error>(())
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
// multiple_crate_versions is inherently crate-level (detects duplicate transitive dependencies).
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod control;
pub mod location;
pub mod repository;
pub mod vcs;

// Re-exports for convenience
pub use config::ControlSettings;
pub use control::Control;
pub use location::{Credentials, LocationError, RepositoryLocation};
pub use repository::Repository;
pub use vcs::{GitError, StatusContext};

/// Error type for repository operations.
///
/// Each variant names the stage that failed and wraps the underlying
/// [`GitError`].
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `OpenFailure` | The path is not a repository, or cannot be read |
/// | `HeadUnavailable` | `HEAD` is unborn or symbolic, or the repository is bare |
/// | `StatusFailure` | The status scan fails or is cancelled |
/// | `TreeUnavailable` | The `HEAD` commit or its tree cannot be read |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The repository could not be opened.
    #[error("failed to analyze git repo: {0}")]
    OpenFailure(#[source] GitError),

    /// The current branch or worktree could not be resolved.
    ///
    /// Raised when:
    /// - `HEAD` points at an unborn branch (empty repository)
    /// - The repository has no working directory
    #[error("failed to infer current branch: {0}")]
    HeadUnavailable(#[source] GitError),

    /// The working tree status could not be computed.
    ///
    /// Raised when:
    /// - libgit2 or the `git` binary fails
    /// - The scan is cancelled through a [`StatusContext`]
    #[error("failed to infer status: {0}")]
    StatusFailure(#[source] GitError),

    /// The tree of the current commit could not be read.
    #[error("failed to infer commit tree: {0}")]
    TreeUnavailable(#[source] GitError),
}

impl Error {
    /// The underlying git failure.
    #[must_use]
    pub const fn git_error(&self) -> &GitError {
        match self {
            Self::OpenFailure(e)
            | Self::HeadUnavailable(e)
            | Self::StatusFailure(e)
            | Self::TreeUnavailable(e) => e,
        }
    }
}

/// Result type alias for repository operations.
pub type Result<T> = std::result::Result<T, Error>;
