//! Presentation-layer implementations of `ProgressReporter`.
//!
//! Application services emit progress events through the port trait without
//! depending on any presentation type directly.

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"` (suppressed when `ctx.quiet`)
/// - `success()` prints `"  ✓ {message}"` (suppressed when `ctx.quiet`)
/// - `warn()` prints `"  ! {message}"` (suppressed when `ctx.quiet`)
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "→".style(self.ctx.styles.info));
        }
    }

    fn success(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "✓".style(self.ctx.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        if !self.ctx.quiet {
            println!("  {} {message}", "!".style(self.ctx.styles.warning));
        }
    }
}

/// Reporter that keeps a spinner running on a TTY.
///
/// The spinner shows the current step. When a different step starts, the
/// previous one is printed above the spinner, so each step appears once.
pub struct SpinnerReporter<'a> {
    ctx: &'a OutputContext,
    pb: ProgressBar,
}

impl<'a> SpinnerReporter<'a> {
    /// Start a spinner with no message; the first `step()` sets it.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            pb: progress::spinner(""),
        }
    }

    /// Stop the spinner, leaving a final status line.
    pub fn finish(self, ok: bool, msg: &str) {
        if ok {
            progress::finish_ok(&self.pb, msg);
        } else {
            progress::finish_error(&self.pb, msg);
        }
    }
}

/// Step to print above the spinner when `next` replaces `current`.
fn finished_step<'s>(current: &'s str, next: &str) -> Option<&'s str> {
    (!current.is_empty() && current != next).then_some(current)
}

impl ProgressReporter for SpinnerReporter<'_> {
    fn step(&self, message: &str) {
        let current = self.pb.message();
        if let Some(done) = finished_step(&current, message) {
            self.pb
                .println(format!("  {} {done}", "→".style(self.ctx.styles.info)));
        }
        self.pb.set_message(message.to_string());
    }

    fn success(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", "✓".style(self.ctx.styles.success)));
    }

    fn warn(&self, message: &str) {
        self.pb
            .println(format!("  {} {message}", "!".style(self.ctx.styles.warning)));
    }
}
