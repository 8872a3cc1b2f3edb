//! `git2` adapters for the capability ports.

use super::{
    GitCommit, GitError, GitRepository, GitWorktree, LocalGit, ObjectId, Reference,
    RepositoryGetter, StatusContext, WorktreeStatus,
};
use git2::{Status, StatusOptions};
use std::path::{Path, PathBuf};

/// Opens repositories on disk with libgit2.
///
/// The path must be the repository's working directory or git directory;
/// parent directories are not searched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2RepositoryGetter;

impl RepositoryGetter for Git2RepositoryGetter {
    fn get(&self, path: &str) -> Result<Box<dyn GitRepository>, GitError> {
        let repo = git2::Repository::open(path)?;
        tracing::trace!(path = %path, "opened git repository");
        Ok(Box::new(Git2Repository { repo }))
    }
}

/// A repository opened with libgit2.
pub struct Git2Repository {
    repo: git2::Repository,
}

impl Git2Repository {
    /// Wraps an already opened repository.
    #[must_use]
    pub const fn new(repo: git2::Repository) -> Self {
        Self { repo }
    }
}

impl GitRepository for Git2Repository {
    fn worktree(&self) -> Result<Box<dyn GitWorktree + '_>, GitError> {
        let root = self.repo.workdir().ok_or(GitError::BareRepository)?;
        Ok(Box::new(Git2Worktree {
            repo: &self.repo,
            root: root.to_path_buf(),
        }))
    }

    fn head(&self) -> Result<Reference, GitError> {
        let head = self.repo.head()?;
        let name = head.name().unwrap_or("HEAD").to_string();
        let target = head
            .target()
            .ok_or_else(|| GitError::SymbolicReference(name.clone()))?;
        Ok(Reference::new(name, target.into()))
    }

    fn commit_object(&self, id: &ObjectId) -> Result<Box<dyn GitCommit + '_>, GitError> {
        let oid = git2::Oid::from_str(id.as_str())?;
        let commit = self.repo.find_commit(oid)?;
        Ok(Box::new(Git2Commit { commit }))
    }
}

/// Working tree of a [`Git2Repository`].
///
/// # Status policy
///
/// When the [`LocalGit`] capability reports a usable `git` binary, its
/// porcelain status is used, since it honours configuration libgit2 does
/// not read (global excludes, `core.fsmonitor`, sparse checkouts). A
/// dubious-ownership refusal is fixed once through the capability and the
/// status retried. Without a local `git`, libgit2's own status is used.
pub struct Git2Worktree<'r> {
    repo: &'r git2::Repository,
    root: PathBuf,
}

impl Git2Worktree<'_> {
    fn native_status(&self, ctx: &StatusContext) -> Result<WorktreeStatus, GitError> {
        let mut opts = StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .include_unmodified(false);

        let statuses = self.repo.statuses(Some(&mut opts))?;
        ctx.check()?;

        let changed = statuses
            .iter()
            .filter(|entry| {
                let status = entry.status();
                status != Status::CURRENT && !status.contains(Status::IGNORED)
            })
            .filter_map(|entry| entry.path().map(String::from));

        Ok(WorktreeStatus::with_changes(changed))
    }
}

impl GitWorktree for Git2Worktree<'_> {
    fn root(&self) -> &Path {
        &self.root
    }

    fn status(
        &self,
        ctx: &StatusContext,
        local_git: &dyn LocalGit,
    ) -> Result<WorktreeStatus, GitError> {
        ctx.check()?;

        let git = match local_git.exists() {
            Ok(git) => git,
            Err(e) => {
                tracing::debug!(
                    root = %self.root.display(),
                    error = %e,
                    "local git unavailable, using libgit2 status"
                );
                return self.native_status(ctx);
            }
        };

        tracing::debug!(
            root = %self.root.display(),
            git = %git.display(),
            "computing status with local git"
        );

        match local_git.status(ctx, &self.root) {
            Err(GitError::DubiousOwnership(dir)) => {
                tracing::warn!(root = %dir, "marking repository as a safe directory");
                local_git.fix_dubious_ownership(&self.root)?;
                local_git.status(ctx, &self.root)
            }
            result => result,
        }
    }
}

/// A commit looked up with libgit2.
pub struct Git2Commit<'r> {
    commit: git2::Commit<'r>,
}

impl GitCommit for Git2Commit<'_> {
    fn tree(&self) -> Result<ObjectId, GitError> {
        Ok(self.commit.tree_id().into())
    }
}
