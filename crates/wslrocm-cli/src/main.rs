//! CLI entry point - the composition root.
//!
//! Loads `.env`, parses arguments, initialises logging and dispatches to a
//! handler. Handlers return the exit code; errors are printed with their
//! remediation hint and mapped through [`CliError::exit_code`].

use std::process::ExitCode;

use clap::Parser;

use wslrocm_cli::{Cli, CliError, Commands, handlers, init_tracing, load_config};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before the configuration reads them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("Error: {err:#}");
            let cli_err = err.downcast_ref::<CliError>();
            if let Some(hint) = cli_err.and_then(CliError::hint) {
                eprintln!("{hint}");
            }
            ExitCode::from(cli_err.map_or(1, CliError::exit_code))
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<u8> {
    let config = load_config()?;

    match cli.command_or_default() {
        Commands::Install => handlers::install::execute(&config).await,
        Commands::CheckGpu => handlers::check_gpu::execute(&config).await,
        Commands::Paths { json } => handlers::paths::execute(&config, json),
    }
}
