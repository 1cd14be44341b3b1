//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::path::Path;
use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};

use crate::application::ports::CommandRunner;

/// Default timeout for a single backend helper invocation.
///
/// One poll returns quickly, but the build step and the single-stack destroy
/// wait for the backend to finish.
pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Production `CommandRunner` using tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// On Windows, `tokio::time::timeout` around `.output().await` does NOT kill
/// the child process when the timeout fires. This implementation uses
/// `tokio::select!` with explicit `child.kill()` to guarantee the process is
/// terminated.
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn command(program: &str, args: &[&str], dir: Option<&Path>) -> Command {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd
    }

    async fn collect(&self, program: &str, mut child: Child) -> Result<Output> {
        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", self.timeout.as_secs())
            }
        }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<Output> {
        tracing::debug!(program, ?args, ?dir, "spawning");
        let child = Self::command(program, args, dir)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;
        self.collect(program, child).await
    }

    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        dir: Option<&Path>,
        input: &[u8],
    ) -> Result<Output> {
        tracing::debug!(program, ?args, ?dir, stdin_bytes = input.len(), "spawning");
        let mut child = Self::command(program, args, dir)
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        // Write stdin and close it before collecting, so the child sees EOF.
        if let Some(mut stdin) = child.stdin.take() {
            let input_owned = input.to_vec();
            tokio::spawn(async move {
                let _ = stdin.write_all(&input_owned).await;
            });
        }

        self.collect(program, child).await
    }
}
