//! Teardown CLI - Remove application stacks and track their progress

use std::process::ExitCode;

use clap::Parser;

use teardown_cli::cli::{Cli, init_tracing};
use teardown_cli::domain::RemovalError;
use teardown_cli::output::json;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);
    let json_mode = cli.json;

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json_mode {
                let code = e
                    .downcast_ref::<RemovalError>()
                    .map_or("error", RemovalError::code);
                match json::format_error(&format!("{e:#}"), code) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
