//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{ProjectConfig, StackSelector, StackUnit, WireStackState};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Where a backend call runs and where it writes its artifacts.
///
/// Replaces changing the process working directory: adapters apply `root`
/// to the child process only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionContext {
    /// Directory relative paths inside the stack definition resolve against.
    pub root: PathBuf,
    /// Artifact output directory.
    pub output: PathBuf,
}

impl ExecutionContext {
    /// Context rooted at `root` with artifacts written to `root/cdk.out`.
    #[must_use]
    pub fn rooted_at(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let output = root.join(crate::domain::config::ARTIFACT_DIR_NAME);
        Self { root, output }
    }
}

/// Parameters for removing one stack outside of a batch.
pub struct StackDestroyRequest<'a> {
    pub stack_name: &'a str,
    pub stage: &'a str,
    pub region: &'a str,
}

/// One poll response. Statuses are still in wire form; the orchestrator
/// decodes them so unknown values surface as a typed error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchPoll {
    pub states: Vec<WireStackState>,
    pub is_complete: bool,
}

// ── Provisioning Backend Ports ────────────────────────────────────────────────

/// Build step: synthesize deployable artifacts for the whole application.
#[allow(async_fn_in_trait)]
pub trait ArtifactBuilder {
    /// Build all stacks and return the artifact location.
    async fn build_artifacts(&self) -> Result<PathBuf>;
}

/// Batch removal: request-and-poll as one combined operation.
#[allow(async_fn_in_trait)]
pub trait BatchDestroyer {
    /// Report the current state of the batch.
    ///
    /// `prior` is `None` on the first call, which also issues the destroy
    /// request. Work still in progress is reported through
    /// `BatchPoll::is_complete`, never as an error.
    async fn poll_batch_status(
        &self,
        selector: &StackSelector,
        artifacts: &Path,
        prior: Option<&[StackUnit]>,
    ) -> Result<BatchPoll>;
}

/// Single-stack removal, run inside an explicit execution context.
#[allow(async_fn_in_trait)]
pub trait StackDestroyer {
    /// Remove one stack and wait for the backend to finish.
    async fn destroy_stack(
        &self,
        request: &StackDestroyRequest<'_>,
        context: &ExecutionContext,
    ) -> Result<()>;
}

/// Composite trait: any type implementing all three sub-traits is a `ProvisioningBackend`.
pub trait ProvisioningBackend: ArtifactBuilder + BatchDestroyer + StackDestroyer {}

/// Blanket implementation: any type implementing all three sub-traits is a `ProvisioningBackend`.
impl<T> ProvisioningBackend for T where T: ArtifactBuilder + BatchDestroyer + StackDestroyer {}

// ── Timing Port ───────────────────────────────────────────────────────────────

/// Suspension between polls, injectable so tests never sleep.
#[allow(async_fn_in_trait)]
pub trait PollDelay {
    async fn wait(&self, duration: Duration);
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// When `dir` is set the child runs there; the caller's working
    /// directory is untouched.
    async fn run(&self, program: &str, args: &[&str], dir: Option<&Path>) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(
        &self,
        program: &str,
        args: &[&str],
        dir: Option<&Path>,
        stdin: &[u8],
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading the project configuration.
pub trait ConfigStore {
    /// Load and parse the project configuration.
    fn load(&self) -> Result<ProjectConfig>;
    /// Path the configuration is read from.
    fn path(&self) -> PathBuf;
}
