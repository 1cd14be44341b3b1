//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::debug_stack::DebugStackOutcome;
use crate::application::services::report::{RemovalSummary, stack_block};
use crate::domain::StackUnit;
use crate::output::OutputContext;

/// Renders removal results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the per-stack blocks of a finished removal.
    pub fn render_removal(&self, report: &[StackUnit]) {
        if self.ctx.quiet {
            return;
        }
        if report.is_empty() {
            self.ctx.info("No stacks to remove.");
            return;
        }
        for unit in report {
            println!();
            for (i, line) in stack_block(unit).iter().enumerate() {
                if i == 0 {
                    println!("{}", line.style(self.ctx.styles.bold));
                } else if unit.error_message.is_some() && line.starts_with("  Error:") {
                    println!("{}", line.style(self.ctx.styles.error));
                } else {
                    println!("{line}");
                }
            }
        }
        println!();
    }

    /// Render the one-line verdict under the report.
    pub fn render_summary(&self, summary: &RemovalSummary) {
        if summary.any_failed {
            let failed = summary
                .entries
                .iter()
                .filter(|e| e.status == crate::domain::StackStatus::Failed)
                .count();
            self.ctx.error(&format!("{failed} stack(s) failed to remove"));
        } else if !summary.entries.is_empty() {
            self.ctx.success("Stacks removed");
        }
    }

    /// Render the debug stack result when it did not go through.
    pub fn render_debug_stack(&self, outcome: &DebugStackOutcome) {
        if let DebugStackOutcome::Failed { name, .. } | DebugStackOutcome::Skipped { name } =
            outcome
        {
            self.ctx
                .warn(&format!("{name} may still exist; remove it manually if needed"));
        }
    }
}
