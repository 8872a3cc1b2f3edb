//! Scripted test doubles for the capability ports.
//!
//! Provides deterministic implementations of [`RepositoryGetter`],
//! [`GitRepository`], [`GitWorktree`], [`GitCommit`] and [`LocalGit`] for
//! unit tests that must not touch a real repository.
//!
//! # Example
//!
//! ```rust
//! use okteto_repository::vcs::fake::{FakeRepository, FakeRepositoryGetter};
//! use okteto_repository::vcs::{ObjectId, Reference};
//!
//! let getter = FakeRepositoryGetter::new().with_repository(
//!     FakeRepository::new().with_head(Reference::new("refs/heads/main", ObjectId::new("abc123"))),
//! );
//! assert_eq!(getter.calls(), 0);
//! ```

use super::{
    GitCommit, GitError, GitRepository, GitWorktree, LocalGit, ObjectId, Reference,
    RepositoryGetter, StatusContext, WorktreeStatus,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Getter returning one scripted result per call, in order.
///
/// Calls past the end of the script fail.
#[derive(Debug, Default)]
pub struct FakeRepositoryGetter {
    results: Mutex<VecDeque<Result<FakeRepository, String>>>,
    paths: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl FakeRepositoryGetter {
    /// Creates a getter with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a successful open.
    #[must_use]
    pub fn with_repository(mut self, repository: FakeRepository) -> Self {
        queue(&mut self.results).push_back(Ok(repository));
        self
    }

    /// Appends a failed open.
    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        queue(&mut self.results).push_back(Err(message.into()));
        self
    }

    /// Number of times [`RepositoryGetter::get`] was called.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Paths passed to [`RepositoryGetter::get`], in call order.
    #[must_use]
    pub fn paths(&self) -> Vec<String> {
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RepositoryGetter for FakeRepositoryGetter {
    fn get(&self, path: &str) -> Result<Box<dyn GitRepository>, GitError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.paths
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(path.to_string());

        let next = self
            .results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(Ok(repository)) => Ok(Box::new(repository)),
            Some(Err(message)) => Err(GitError::fake(message)),
            None => Err(GitError::fake("no repository scripted")),
        }
    }
}

/// Repository with scripted worktree, `HEAD` and commit.
///
/// By default the worktree is clean and both `HEAD` and commit lookups fail.
#[derive(Debug, Clone)]
pub struct FakeRepository {
    worktree: Result<FakeWorktree, String>,
    head: Result<Reference, String>,
    commit: Result<FakeCommit, String>,
}

impl Default for FakeRepository {
    fn default() -> Self {
        Self {
            worktree: Ok(FakeWorktree::default()),
            head: Err("reference not found".to_string()),
            commit: Err("object not found".to_string()),
        }
    }
}

impl FakeRepository {
    /// Creates a repository with the default script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worktree.
    #[must_use]
    pub fn with_worktree(mut self, worktree: FakeWorktree) -> Self {
        self.worktree = Ok(worktree);
        self
    }

    /// Makes [`GitRepository::worktree`] fail.
    #[must_use]
    pub fn with_worktree_error(mut self, message: impl Into<String>) -> Self {
        self.worktree = Err(message.into());
        self
    }

    /// Sets `HEAD`.
    #[must_use]
    pub fn with_head(mut self, head: Reference) -> Self {
        self.head = Ok(head);
        self
    }

    /// Makes [`GitRepository::head`] fail.
    #[must_use]
    pub fn with_head_error(mut self, message: impl Into<String>) -> Self {
        self.head = Err(message.into());
        self
    }

    /// Sets the commit returned for any id.
    #[must_use]
    pub fn with_commit(mut self, commit: FakeCommit) -> Self {
        self.commit = Ok(commit);
        self
    }
}

impl GitRepository for FakeRepository {
    fn worktree(&self) -> Result<Box<dyn GitWorktree + '_>, GitError> {
        match &self.worktree {
            Ok(worktree) => Ok(Box::new(worktree.clone())),
            Err(message) => Err(GitError::fake(message.clone())),
        }
    }

    fn head(&self) -> Result<Reference, GitError> {
        self.head.clone().map_err(GitError::fake)
    }

    fn commit_object(&self, _id: &ObjectId) -> Result<Box<dyn GitCommit + '_>, GitError> {
        match &self.commit {
            Ok(commit) => Ok(Box::new(commit.clone())),
            Err(message) => Err(GitError::fake(message.clone())),
        }
    }
}

/// Worktree with a scripted root and status.
#[derive(Debug, Clone)]
pub struct FakeWorktree {
    root: PathBuf,
    status: Result<WorktreeStatus, String>,
}

impl Default for FakeWorktree {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/fake/repo"),
            status: Ok(WorktreeStatus::clean()),
        }
    }
}

impl FakeWorktree {
    /// Creates a clean worktree rooted at `/fake/repo`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: WorktreeStatus) -> Self {
        self.status = Ok(status);
        self
    }

    /// Makes [`GitWorktree::status`] fail.
    #[must_use]
    pub fn with_status_error(mut self, message: impl Into<String>) -> Self {
        self.status = Err(message.into());
        self
    }
}

impl GitWorktree for FakeWorktree {
    fn root(&self) -> &Path {
        &self.root
    }

    fn status(
        &self,
        ctx: &StatusContext,
        _local_git: &dyn LocalGit,
    ) -> Result<WorktreeStatus, GitError> {
        ctx.check()?;
        self.status.clone().map_err(GitError::fake)
    }
}

/// Commit with a scripted tree.
#[derive(Debug, Clone)]
pub struct FakeCommit {
    tree: Result<ObjectId, String>,
}

impl FakeCommit {
    /// A commit whose tree is `tree`.
    #[must_use]
    pub const fn with_tree(tree: ObjectId) -> Self {
        Self { tree: Ok(tree) }
    }

    /// A commit whose tree lookup fails.
    #[must_use]
    pub fn with_tree_error(message: impl Into<String>) -> Self {
        Self {
            tree: Err(message.into()),
        }
    }
}

impl GitCommit for FakeCommit {
    fn tree(&self) -> Result<ObjectId, GitError> {
        self.tree.clone().map_err(GitError::fake)
    }
}

/// [`LocalGit`] with scripted availability and status results.
///
/// Status calls past the end of the script report a clean worktree.
#[derive(Debug, Default)]
pub struct FakeLocalGit {
    available: bool,
    statuses: Mutex<VecDeque<Result<WorktreeStatus, GitError>>>,
    status_calls: AtomicUsize,
    fix_calls: AtomicUsize,
}

impl FakeLocalGit {
    /// A local git that exists.
    #[must_use]
    pub fn available() -> Self {
        Self {
            available: true,
            ..Self::default()
        }
    }

    /// A local git that is not installed.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }

    /// Appends a status result.
    #[must_use]
    pub fn with_status(mut self, status: Result<WorktreeStatus, GitError>) -> Self {
        queue(&mut self.statuses).push_back(status);
        self
    }

    /// Number of status computations requested.
    #[must_use]
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Number of dubious-ownership fixes requested.
    #[must_use]
    pub fn fix_calls(&self) -> usize {
        self.fix_calls.load(Ordering::SeqCst)
    }
}

impl LocalGit for FakeLocalGit {
    fn exists(&self) -> Result<PathBuf, GitError> {
        if self.available {
            Ok(PathBuf::from("/usr/bin/git"))
        } else {
            Err(GitError::GitNotInstalled)
        }
    }

    fn status(&self, ctx: &StatusContext, _root: &Path) -> Result<WorktreeStatus, GitError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        ctx.check()?;
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Ok(WorktreeStatus::clean()))
    }

    fn fix_dubious_ownership(&self, _root: &Path) -> Result<(), GitError> {
        self.fix_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn queue<T>(mutex: &mut Mutex<VecDeque<T>>) -> &mut VecDeque<T> {
    mutex.get_mut().unwrap_or_else(PoisonError::into_inner)
}
