//! Strategy for remote deploys, where no git metadata is available.

use crate::Result;
use std::path::PathBuf;

/// Answers from the commit resolved before the remote deploy started.
///
/// Never touches the filesystem and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteController {
    git_commit: String,
}

impl RemoteController {
    /// Binds the pre-resolved commit.
    #[must_use]
    pub fn new(git_commit: impl Into<String>) -> Self {
        Self {
            git_commit: git_commit.into(),
        }
    }

    /// Always clean: a remote deploy has no mutable working tree.
    pub const fn is_clean(&self) -> Result<bool> {
        Ok(true)
    }

    /// Returns the bound commit verbatim.
    pub fn sha(&self) -> Result<String> {
        Ok(self.git_commit.clone())
    }

    /// No commit objects are available remotely.
    pub const fn tree_hash(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// No working directory exists remotely.
    pub const fn root(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}
