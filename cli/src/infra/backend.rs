//! Infrastructure implementation of the provisioning backend ports.
//!
//! `CdkBackend<R>` drives an external backend helper program through a
//! `CommandRunner`. Every call is one process invocation:
//!
//! - `synth --output <dir>` builds the app's artifacts.
//! - `destroy --app <dir> --stack <name|all> --region <r>` reads the prior
//!   stack states as JSON on stdin (`null` on the first call) and prints
//!   `{"stackStates": [...], "isCompleted": bool}` on stdout.
//! - `destroy-stack --stack <name> --stage <s> --region <r> --output <dir>`
//!   removes a single stack and exits once it is gone.

use std::path::{Path, PathBuf};
use std::process::Output;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{
    ArtifactBuilder, BatchDestroyer, BatchPoll, CommandRunner, ExecutionContext,
    StackDestroyRequest, StackDestroyer,
};
use crate::domain::{ProjectConfig, StackSelector, StackUnit, WireStackState};

/// JSON printed by the helper's `destroy` subcommand.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DestroyResponse {
    stack_states: Vec<WireStackState>,
    is_completed: bool,
}

/// Backend adapter that shells out to the configured helper program.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct CdkBackend<R: CommandRunner> {
    runner: R,
    program: String,
    base_args: Vec<String>,
    region: String,
    app_root: PathBuf,
    artifact_dir: PathBuf,
}

impl<R: CommandRunner> CdkBackend<R> {
    /// Create a backend for the app rooted at `app_root`.
    pub fn new(runner: R, config: &ProjectConfig, app_root: &Path) -> Self {
        Self {
            runner,
            program: config.backend.program.clone(),
            base_args: config.backend.args.clone(),
            region: config.region.clone(),
            app_root: app_root.to_path_buf(),
            artifact_dir: config.artifact_dir(app_root),
        }
    }

    fn args<'a>(&'a self, extra: &[&'a str]) -> Vec<&'a str> {
        self.base_args
            .iter()
            .map(String::as_str)
            .chain(extra.iter().copied())
            .collect()
    }
}

fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("path is not valid UTF-8: {}", path.display()))
}

fn ensure_success(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("{what} failed: {}", stderr.trim())
}

impl<R: CommandRunner> ArtifactBuilder for CdkBackend<R> {
    async fn build_artifacts(&self) -> Result<PathBuf> {
        let output_dir = path_arg(&self.artifact_dir)?;
        let args = self.args(&["synth", "--output", output_dir]);
        let output = self
            .runner
            .run(&self.program, &args, Some(&self.app_root))
            .await
            .context("running synth")?;
        ensure_success(&output, "synth")?;
        Ok(self.artifact_dir.clone())
    }
}

impl<R: CommandRunner> BatchDestroyer for CdkBackend<R> {
    async fn poll_batch_status(
        &self,
        selector: &StackSelector,
        artifacts: &Path,
        prior: Option<&[StackUnit]>,
    ) -> Result<BatchPoll> {
        let prior_wire: Option<Vec<WireStackState>> =
            prior.map(|states| states.iter().map(WireStackState::from).collect());
        let stdin = serde_json::to_vec(&prior_wire).context("encoding prior stack states")?;

        let app = path_arg(artifacts)?;
        let args = self.args(&[
            "destroy",
            "--app",
            app,
            "--stack",
            selector.as_backend_arg(),
            "--region",
            &self.region,
        ]);
        let output = self
            .runner
            .run_with_stdin(&self.program, &args, Some(&self.app_root), &stdin)
            .await
            .context("running destroy")?;
        ensure_success(&output, "destroy")?;

        let response: DestroyResponse =
            serde_json::from_slice(&output.stdout).context("parsing destroy response")?;
        Ok(BatchPoll {
            states: response.stack_states,
            is_complete: response.is_completed,
        })
    }
}

impl<R: CommandRunner> StackDestroyer for CdkBackend<R> {
    async fn destroy_stack(
        &self,
        request: &StackDestroyRequest<'_>,
        context: &ExecutionContext,
    ) -> Result<()> {
        let output_dir = path_arg(&context.output)?;
        let args = self.args(&[
            "destroy-stack",
            "--stack",
            request.stack_name,
            "--stage",
            request.stage,
            "--region",
            request.region,
            "--output",
            output_dir,
        ]);
        let output = self
            .runner
            .run(&self.program, &args, Some(&context.root))
            .await
            .with_context(|| format!("running destroy-stack for {}", request.stack_name))?;
        ensure_success(&output, "destroy-stack")
    }
}
