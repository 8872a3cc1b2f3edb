//! Environment facts that select the control strategy.

/// Environment variable set to a boolean when running inside a remote deploy.
pub const DEPLOY_REMOTE_ENV: &str = "OKTETO_DEPLOY_REMOTE";

/// Environment variable holding the pre-resolved commit of a remote deploy.
pub const GIT_COMMIT_ENV: &str = "OKTETO_GIT_COMMIT";

/// Facts used once, at construction, to pick a control strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlSettings {
    /// Whether the process runs in a remote deploy context.
    pub remote_deploy: bool,
    /// Commit resolved before the remote deploy started. Never empty.
    pub git_commit: Option<String>,
}

impl ControlSettings {
    /// Creates settings from already-resolved values.
    ///
    /// An empty commit is treated as absent; any other value is kept verbatim.
    #[must_use]
    pub fn new(remote_deploy: bool, git_commit: Option<impl Into<String>>) -> Self {
        Self {
            remote_deploy,
            git_commit: git_commit.map(Into::into).filter(|c| !c.is_empty()),
        }
    }

    /// Settings for a developer machine.
    #[must_use]
    pub const fn local() -> Self {
        Self {
            remote_deploy: false,
            git_commit: None,
        }
    }

    /// Settings for a remote deploy of `git_commit`.
    #[must_use]
    pub fn remote(git_commit: impl Into<String>) -> Self {
        Self::new(true, Some(git_commit))
    }

    /// Reads [`DEPLOY_REMOTE_ENV`] and [`GIT_COMMIT_ENV`].
    ///
    /// Unset or unparseable booleans are `false`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use okteto_repository::config::ControlSettings;
    ///
    /// let settings = ControlSettings::from_env();
    /// // Settings are populated from the environment with defaults
    /// ```
    #[must_use]
    pub fn from_env() -> Self {
        let remote_deploy = std::env::var(DEPLOY_REMOTE_ENV)
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);

        let git_commit = std::env::var(GIT_COMMIT_ENV).ok();

        Self::new(remote_deploy, git_commit)
    }

    /// Returns the commit to bind to a remote strategy, if one applies.
    ///
    /// Only a remote deploy with a non-empty commit qualifies.
    #[must_use]
    pub fn remote_commit(&self) -> Option<&str> {
        if self.remote_deploy {
            self.git_commit.as_deref()
        } else {
            None
        }
    }
}

/// Parses the boolean spellings accepted by the deploy tooling.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
