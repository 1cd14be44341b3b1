//! Command implementations

pub mod remove;

use clap::Args;

/// Arguments for the remove command.
#[derive(Args, Debug, Default)]
pub struct RemoveArgs {
    /// Remove only this stack (default: every stack in the app)
    #[arg(long)]
    pub stack: Option<String>,

    /// Stage to remove (overrides the project file)
    #[arg(long)]
    pub stage: Option<String>,

    /// Region the stacks live in (overrides the project file)
    #[arg(long)]
    pub region: Option<String>,

    /// Give up waiting after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Leave the debug stack in place
    #[arg(long)]
    pub skip_debug_stack: bool,
}
