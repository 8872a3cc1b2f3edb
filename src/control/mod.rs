//! Control strategies.
//!
//! A [`Control`] answers "is the working tree clean?" and "what is the
//! current commit?". It is selected once from [`ControlSettings`] and never
//! changes afterwards:
//!
//! | Remote deploy | Commit | Strategy |
//! |---------------|--------|----------|
//! | `true` | non-empty | [`RemoteController`] bound to the commit |
//! | `true` | empty | [`LocalController`] |
//! | `false` | any | [`LocalController`] |

mod local;
mod remote;

pub use local::LocalController;
pub use remote::RemoteController;

use crate::Result;
use crate::config::ControlSettings;
use crate::vcs::StatusContext;
use std::path::PathBuf;

/// The strategy bound to a [`crate::Repository`].
#[derive(Debug, Clone)]
pub enum Control {
    /// Inspects the repository on disk.
    Local(LocalController),
    /// Answers from a pre-resolved commit.
    Remote(RemoteController),
}

impl Control {
    /// Selects the strategy for `path` from the given settings.
    #[must_use]
    pub fn select(path: &str, settings: &ControlSettings) -> Self {
        if let Some(commit) = settings.remote_commit() {
            tracing::debug!(commit = %commit, "using remote repository control");
            Self::Remote(RemoteController::new(commit))
        } else {
            tracing::debug!(
                remote_deploy = settings.remote_deploy,
                "using local repository control"
            );
            Self::Local(LocalController::new(path))
        }
    }

    /// Returns `true` for the remote strategy.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Returns `true` if the working tree has no uncommitted changes.
    pub fn is_clean(&self, ctx: &StatusContext) -> Result<bool> {
        match self {
            Self::Local(local) => local.is_clean(ctx),
            Self::Remote(remote) => remote.is_clean(),
        }
    }

    /// Returns the current commit id.
    pub fn sha(&self) -> Result<String> {
        match self {
            Self::Local(local) => local.sha(),
            Self::Remote(remote) => remote.sha(),
        }
    }

    /// Returns the tree id of the current commit, when one is available.
    pub fn tree_hash(&self) -> Result<Option<String>> {
        match self {
            Self::Local(local) => local.tree_hash(),
            Self::Remote(remote) => remote.tree_hash(),
        }
    }

    /// Returns the working directory, when one is available.
    pub fn root(&self) -> Result<Option<PathBuf>> {
        match self {
            Self::Local(local) => local.root(),
            Self::Remote(remote) => remote.root(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_local_without_commit() {
        let control = Control::select("/repo", &ControlSettings::new(false, None::<String>));
        assert!(!control.is_remote());
    }

    #[test]
    fn test_select_local_with_commit() {
        let control = Control::select("/repo", &ControlSettings::new(false, Some("1234567890")));
        assert!(matches!(control, Control::Local(ref local) if local.path() == "/repo"));
    }

    #[test]
    fn test_select_local_in_remote_deploy_without_commit() {
        let control = Control::select("/repo", &ControlSettings::new(true, Some("")));
        assert!(!control.is_remote());
    }

    #[test]
    fn test_select_remote() {
        let control = Control::select("/repo", &ControlSettings::remote("1234567890"));
        assert!(control.is_remote());
        assert!(control.is_clean(&StatusContext::new()).unwrap());
        assert_eq!(control.sha().unwrap(), "1234567890");
    }

    #[test]
    fn test_remote_ignores_cancelled_context() {
        let control = Control::select("/repo", &ControlSettings::remote("1234567890"));
        let ctx = StatusContext::new();
        ctx.cancel();
        assert!(control.is_clean(&ctx).unwrap());
    }
}
