//! Configuration management.
//!
//! Settings are read from the environment once, when a
//! [`crate::Repository`] is created, and never re-read.
//!
//! # Environment Variables
//!
//! | Variable | Type | Effect |
//! |----------|------|--------|
//! | `OKTETO_DEPLOY_REMOTE` | bool | Marks a remote deploy context |
//! | `OKTETO_GIT_COMMIT` | string | Commit resolved before a remote deploy |

mod control;

pub use control::{ControlSettings, DEPLOY_REMOTE_ENV, GIT_COMMIT_ENV};
