//! Status policy backed by the local `git` executable.

use super::{GitError, StatusContext, WorktreeStatus};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

/// Source of worktree status outside the libgit2 engine.
///
/// Implementations decide whether a local `git` is usable and, if so,
/// compute the status with it. See [`super::engine::Git2Worktree`] for how the
/// engine combines this with its own status.
pub trait LocalGit: Send + Sync {
    /// Returns the path of a usable `git` executable.
    fn exists(&self) -> Result<PathBuf, GitError>;

    /// Computes the status of the worktree rooted at `root`.
    fn status(&self, ctx: &StatusContext, root: &Path) -> Result<WorktreeStatus, GitError>;

    /// Marks `root` as a safe directory so git stops refusing to read it.
    fn fix_dubious_ownership(&self, root: &Path) -> Result<(), GitError>;
}

/// [`LocalGit`] that shells out to `git`.
#[derive(Debug, Clone)]
pub struct CliLocalGit {
    program: PathBuf,
    poll_interval: Duration,
}

impl CliLocalGit {
    /// Default interval between checks of a running status command.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(20);

    /// Uses `git` from `PATH`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Uses the given git executable.
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }

    /// Sets how often a running status command checks for cancellation.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    fn output(&self, mut cmd: Command) -> Result<Output, GitError> {
        tracing::trace!(cmd = ?cmd, "running git command");
        cmd.output().map_err(|e| self.spawn_error(e))
    }

    fn spawn_error(&self, e: std::io::Error) -> GitError {
        if e.kind() == std::io::ErrorKind::NotFound {
            tracing::debug!(program = %self.program.display(), "git not found");
            GitError::GitNotInstalled
        } else {
            GitError::Io(e)
        }
    }

    /// Runs `cmd`, killing it if `ctx` is cancelled before it exits.
    fn output_cancellable(&self, mut cmd: Command, ctx: &StatusContext) -> Result<Output, GitError> {
        tracing::trace!(cmd = ?cmd, "running git command");
        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let mut stdout = child.stdout.take();
        let mut stderr = child.stderr.take();

        thread::scope(|scope| {
            let out = scope.spawn(move || read_pipe(stdout.as_mut()));
            let err = scope.spawn(move || read_pipe(stderr.as_mut()));

            let status = loop {
                if ctx.is_cancelled() {
                    // The child may already have exited; kill errors are irrelevant then.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(GitError::Cancelled);
                }
                match child.try_wait()? {
                    Some(status) => break status,
                    None => thread::sleep(self.poll_interval),
                }
            };

            let stdout = join_pipe(out)?;
            let stderr = join_pipe(err)?;
            Ok(Output {
                status,
                stdout,
                stderr,
            })
        })
    }
}

impl Default for CliLocalGit {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalGit for CliLocalGit {
    fn exists(&self) -> Result<PathBuf, GitError> {
        let mut cmd = self.command();
        cmd.arg("--version");
        let output = self.output(cmd)?;
        if output.status.success() {
            Ok(self.program.clone())
        } else {
            Err(command_failed("--version", &output.stderr))
        }
    }

    fn status(&self, ctx: &StatusContext, root: &Path) -> Result<WorktreeStatus, GitError> {
        ctx.check()?;

        let mut cmd = self.command();
        cmd.arg("-C")
            .arg(root)
            .args(["status", "--porcelain=v1", "-z", "--untracked-files=all"]);
        let output = self.output_cancellable(cmd, ctx)?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("dubious ownership") {
                return Err(GitError::DubiousOwnership(root.display().to_string()));
            }
            return Err(command_failed("status", &output.stderr));
        }

        Ok(parse_porcelain(&output.stdout))
    }

    fn fix_dubious_ownership(&self, root: &Path) -> Result<(), GitError> {
        let mut cmd = self.command();
        cmd.args(["config", "--global", "--add", "safe.directory"])
            .arg(root);
        let output = self.output(cmd)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(command_failed("config", &output.stderr))
        }
    }
}

/// [`LocalGit`] that never finds a `git` executable.
///
/// Forces the engine's native status computation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalGit;

impl LocalGit for NoLocalGit {
    fn exists(&self) -> Result<PathBuf, GitError> {
        Err(GitError::GitNotInstalled)
    }

    fn status(&self, _ctx: &StatusContext, _root: &Path) -> Result<WorktreeStatus, GitError> {
        Err(GitError::GitNotInstalled)
    }

    fn fix_dubious_ownership(&self, _root: &Path) -> Result<(), GitError> {
        Ok(())
    }
}

fn read_pipe<R: Read>(pipe: Option<&mut R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(pipe) = pipe {
        pipe.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

fn join_pipe(
    handle: thread::ScopedJoinHandle<'_, std::io::Result<Vec<u8>>>,
) -> Result<Vec<u8>, GitError> {
    handle
        .join()
        .map_err(|_| GitError::Io(std::io::Error::other("pipe reader panicked")))?
        .map_err(GitError::Io)
}

fn command_failed(command: &str, stderr: &[u8]) -> GitError {
    GitError::CommandFailed {
        command: command.to_string(),
        stderr: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}

/// Parses `git status --porcelain=v1 -z` output.
///
/// Records are `XY path`, NUL-terminated; renames and copies are followed
/// by an extra record holding the original path.
fn parse_porcelain(stdout: &[u8]) -> WorktreeStatus {
    let mut changed = Vec::new();
    let mut records = stdout.split(|b| *b == 0).filter(|r| !r.is_empty());

    while let Some(record) = records.next() {
        if record.len() < 4 {
            continue;
        }
        let (code, path) = record.split_at(3);
        changed.push(String::from_utf8_lossy(path).into_owned());
        if code.contains(&b'R') || code.contains(&b'C') {
            records.next();
        }
    }

    WorktreeStatus::with_changes(changed)
}
