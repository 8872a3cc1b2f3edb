//! Version-control capability ports.
//!
//! The crate talks to the version-control engine only through the narrow
//! traits in this module:
//!
//! - [`RepositoryGetter`] opens a repository from a path
//! - [`GitRepository`] exposes the worktree, `HEAD` and commit objects
//! - [`GitWorktree`] exposes the working directory and its status
//! - [`GitCommit`] exposes the commit's tree
//! - [`LocalGit`] is the status policy backed by the local `git` binary
//!
//! [`engine`] adapts these to `git2`; [`fake`] provides scripted doubles.
//!
//! Handles are call-scoped: worktree and commit handles borrow the
//! repository handle they came from and are dropped with it.

mod error;

pub mod engine;
pub mod fake;
pub mod local_git;

pub use engine::Git2RepositoryGetter;
pub use error::GitError;
pub use local_git::{CliLocalGit, LocalGit, NoLocalGit};

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Hex-encoded git object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectId(String);

impl ObjectId {
    /// Creates an id from its hex form, lowercasing it.
    #[must_use]
    pub fn new(hex: impl AsRef<str>) -> Self {
        Self(hex.as_ref().to_ascii_lowercase())
    }

    /// Returns the lowercase hex form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<git2::Oid> for ObjectId {
    fn from(oid: git2::Oid) -> Self {
        Self(oid.to_string())
    }
}

/// A resolved reference such as `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Full reference name, e.g. `refs/heads/main`, or `HEAD` when detached.
    pub name: String,
    /// The commit the reference points at.
    pub target: ObjectId,
}

impl Reference {
    /// Creates a reference.
    #[must_use]
    pub fn new(name: impl Into<String>, target: ObjectId) -> Self {
        Self {
            name: name.into(),
            target,
        }
    }

    /// Returns the target commit id.
    #[must_use]
    pub const fn hash(&self) -> &ObjectId {
        &self.target
    }
}

/// Status of a working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorktreeStatus {
    changed: Vec<String>,
}

impl WorktreeStatus {
    /// A status with no changes.
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            changed: Vec::new(),
        }
    }

    /// A status listing the given changed paths.
    #[must_use]
    pub fn with_changes<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            changed: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns `true` if nothing is modified, added, deleted or untracked.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.changed.is_empty()
    }

    /// Paths with uncommitted changes, relative to the worktree root.
    #[must_use]
    pub fn changed_paths(&self) -> &[String] {
        &self.changed
    }
}

/// Cancellation handle for worktree status scans.
///
/// Clones share the same flag, so a caller can keep one clone and cancel a
/// scan running on another thread.
#[derive(Debug, Clone, Default)]
pub struct StatusContext {
    cancelled: Arc<AtomicBool>,
}

impl StatusContext {
    /// Creates a context that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`Self::cancel`] has been called on any clone.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Fails with [`GitError::Cancelled`] if cancellation was requested.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::Cancelled`] when the context is cancelled.
    pub fn check(&self) -> Result<(), GitError> {
        if self.is_cancelled() {
            Err(GitError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Opens repositories.
///
/// This is the single failure point for "not a repository", permission and
/// corruption errors.
pub trait RepositoryGetter: Send + Sync {
    /// Opens the repository at `path`.
    fn get(&self, path: &str) -> Result<Box<dyn GitRepository>, GitError>;
}

/// An opened repository.
pub trait GitRepository {
    /// Returns the working tree.
    fn worktree(&self) -> Result<Box<dyn GitWorktree + '_>, GitError>;

    /// Resolves `HEAD`.
    fn head(&self) -> Result<Reference, GitError>;

    /// Looks up a commit by id.
    fn commit_object(&self, id: &ObjectId) -> Result<Box<dyn GitCommit + '_>, GitError>;
}

/// A repository's working tree.
pub trait GitWorktree {
    /// Absolute path of the working directory.
    fn root(&self) -> &Path;

    /// Computes the status of the working tree.
    ///
    /// `local_git` may replace or augment the engine's own status
    /// computation; see [`engine::Git2Worktree`] for the policy.
    fn status(
        &self,
        ctx: &StatusContext,
        local_git: &dyn LocalGit,
    ) -> Result<WorktreeStatus, GitError>;
}

/// A commit object.
pub trait GitCommit {
    /// Returns the id of the commit's root tree.
    fn tree(&self) -> Result<ObjectId, GitError>;
}
