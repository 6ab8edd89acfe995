mod cli;

use std::process::ExitCode;

use clap::Parser as _;
use tracing_subscriber::EnvFilter;

use crate::cli::{run_menu, run_mode, App, Cli};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let result = App::from_cli(&cli).and_then(|app| match cli.run_mode() {
        Some(mode) => run_mode(&app, mode, std::io::stdout()),
        None => {
            let stdin = std::io::stdin();
            run_menu(&app, stdin.lock(), std::io::stdout())
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
