//! `teardown remove [--stack <NAME>]`: remove the app's stacks.

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::app::AppContext;
use crate::application::ports::{ConfigStore, ProvisioningBackend};
use crate::application::services::debug_stack::{self, DebugStackTarget};
use crate::application::services::{removal, report};
use crate::domain::{ProjectConfig, RemovalError, RemovalReport, StackSelector};
use crate::infra::backend::CdkBackend;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::delay::TokioDelay;
use crate::output::{HumanRenderer, SpinnerReporter, TerminalReporter, json};

use super::RemoveArgs;

/// Run `teardown remove`.
///
/// Exits with failure when any stack ends in `failed`.
///
/// # Errors
///
/// Returns an error if the project configuration is invalid, the build step
/// fails, a backend call fails, or the run is cancelled.
pub async fn run(app: &AppContext, args: &RemoveArgs) -> Result<ExitCode> {
    let mut config = YamlConfigStore::new(&app.app_root).load()?;
    config.apply_overrides(args.stage.as_deref(), args.region.as_deref());
    config.validate()?;
    tracing::debug!(
        name = %config.name,
        stage = %config.stage,
        region = %config.region,
        "project configuration loaded"
    );

    let backend = CdkBackend::new(TokioCommandRunner::default(), &config, &app.app_root);

    // Covers the debug stack as well as the batch.
    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_interrupt(
        cancel.clone(),
        tokio::signal::ctrl_c(),
        args.timeout,
    ));
    let _stop_watcher = cancel.clone().drop_guard();

    let stacks = remove_app(&backend, app, args, &config, &cancel).await?;

    let summary = report::summarize(&stacks);
    if app.is_json() {
        println!("{}", json::format_report(&summary.entries)?);
    } else {
        let renderer = HumanRenderer::new(&app.output);
        renderer.render_removal(&stacks);
        renderer.render_summary(&summary);
    }

    Ok(if summary.any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Debug stack first, then the selected stacks.
async fn remove_app(
    backend: &impl ProvisioningBackend,
    app: &AppContext,
    args: &RemoveArgs,
    config: &ProjectConfig,
    cancel: &CancellationToken,
) -> Result<RemovalReport, RemovalError> {
    let ctx = &app.output;

    if !args.skip_debug_stack {
        match debug_stack_dir(config) {
            Ok(app_dir) => {
                let outcome = debug_stack::remove_debug_stack(
                    backend,
                    &TerminalReporter::new(ctx),
                    &DebugStackTarget {
                        stage: &config.stage,
                        app_name: &config.name,
                        region: &config.region,
                        app_dir: &app_dir,
                    },
                    cancel,
                )
                .await;
                HumanRenderer::new(ctx).render_debug_stack(&outcome);
            }
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "debug stack location unknown");
                ctx.warn("Skipping debug stack: its location could not be determined");
            }
        }
    }

    let selector = StackSelector::from_arg(args.stack.as_deref());
    if ctx.show_progress() {
        let reporter = SpinnerReporter::new(ctx);
        let result =
            removal::remove_stacks(backend, &TokioDelay, &reporter, &selector, cancel).await;
        reporter.finish(
            result.is_ok(),
            if result.is_ok() {
                "Removal finished"
            } else {
                "Removal aborted"
            },
        );
        result
    } else {
        let reporter = TerminalReporter::new(ctx);
        removal::remove_stacks(backend, &TokioDelay, &reporter, &selector, cancel).await
    }
}

/// Debug stack app directory: configured, or `assets/debug-stack` next to
/// the executable.
fn debug_stack_dir(config: &ProjectConfig) -> Result<PathBuf> {
    if let Some(dir) = &config.debug_stack_dir {
        return Ok(dir.clone());
    }
    let exe = std::env::current_exe().context("cannot locate executable")?;
    let dir = exe
        .parent()
        .context("executable has no parent directory")?
        .join("assets")
        .join("debug-stack");
    Ok(dir)
}

/// Cancel `token` when `interrupt` fires or after `timeout_secs`. Returns
/// once the token is cancelled by anyone.
///
/// If the interrupt listener cannot be installed, only the timeout applies.
async fn cancel_on_interrupt(
    token: CancellationToken,
    interrupt: impl Future<Output = std::io::Result<()>>,
    timeout_secs: Option<u64>,
) {
    let interrupted = async {
        match interrupt.await {
            Ok(()) => tracing::warn!("interrupted"),
            Err(e) => {
                tracing::debug!(error = %e, "cannot listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        }
    };
    let deadline = async {
        match timeout_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };
    tokio::select! {
        () = token.cancelled() => return,
        () = interrupted => {}
        () = deadline => tracing::warn!(timeout_secs, "removal timed out"),
    }
    token.cancel();
}
