//! Strategy for a developer machine with a git working directory.

use crate::vcs::{
    CliLocalGit, Git2RepositoryGetter, GitRepository, LocalGit, RepositoryGetter, StatusContext,
};
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Answers by inspecting the repository on disk.
///
/// Every call opens a fresh repository handle through the getter and drops
/// it before returning. Failures are not retried.
#[derive(Clone)]
pub struct LocalController {
    path: String,
    getter: Arc<dyn RepositoryGetter>,
    local_git: Arc<dyn LocalGit>,
}

impl LocalController {
    /// Uses libgit2 and the `git` binary from `PATH`.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_getter(path, Arc::new(Git2RepositoryGetter))
    }

    /// Uses the given getter and the `git` binary from `PATH`.
    #[must_use]
    pub fn with_getter(path: impl Into<String>, getter: Arc<dyn RepositoryGetter>) -> Self {
        Self {
            path: path.into(),
            getter,
            local_git: Arc::new(CliLocalGit::new()),
        }
    }

    /// Replaces the status policy.
    #[must_use]
    pub fn with_local_git(mut self, local_git: Arc<dyn LocalGit>) -> Self {
        self.local_git = local_git;
        self
    }

    /// Path handed to the getter.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn open(&self) -> Result<Box<dyn GitRepository>> {
        self.getter.get(&self.path).map_err(Error::OpenFailure)
    }

    /// Returns `true` if the working tree has no uncommitted changes.
    pub fn is_clean(&self, ctx: &StatusContext) -> Result<bool> {
        let repo = self.open()?;
        let worktree = repo.worktree().map_err(Error::HeadUnavailable)?;
        let status = worktree
            .status(ctx, self.local_git.as_ref())
            .map_err(Error::StatusFailure)?;

        if !status.is_clean() {
            tracing::debug!(
                changed = status.changed_paths().len(),
                "working tree has uncommitted changes"
            );
        }
        Ok(status.is_clean())
    }

    /// Returns the lowercase hex id of the commit `HEAD` points at.
    pub fn sha(&self) -> Result<String> {
        let repo = self.open()?;
        let head = repo.head().map_err(Error::HeadUnavailable)?;
        Ok(head.hash().to_string())
    }

    /// Returns the id of the tree of the `HEAD` commit.
    pub fn tree_hash(&self) -> Result<Option<String>> {
        let repo = self.open()?;
        let head = repo.head().map_err(Error::HeadUnavailable)?;
        let commit = repo
            .commit_object(head.hash())
            .map_err(Error::TreeUnavailable)?;
        let tree = commit.tree().map_err(Error::TreeUnavailable)?;
        Ok(Some(tree.to_string()))
    }

    /// Returns the absolute path of the working directory.
    pub fn root(&self) -> Result<Option<PathBuf>> {
        let repo = self.open()?;
        let worktree = repo.worktree().map_err(Error::HeadUnavailable)?;
        Ok(Some(worktree.root().to_path_buf()))
    }
}

impl fmt::Debug for LocalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The raw path may be a URL with credentials.
        f.debug_struct("LocalController").finish_non_exhaustive()
    }
}
