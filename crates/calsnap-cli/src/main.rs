//! calsnap CLI entry point.

use std::process::ExitCode;

use clap::Parser;

use calsnap_cli::cli::{Cli, Command, ExportFormat};
use calsnap_cli::commands::{self, Context};
use calsnap_cli::config::CliConfig;
use calsnap_cli::error::{CliError, CliResult};
use calsnap_core::{TracingConfig, init_tracing};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.debug {
        TracingConfig::cli_debug()
    } else {
        TracingConfig::cli_quiet()
    };
    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = if let Some(ref path) = cli.config {
        CliConfig::load_from(path).map_err(CliError::Config)?
    } else {
        CliConfig::load().unwrap_or_default()
    };

    let ctx = Context {
        config,
        api_key: cli.api_key,
        model: cli.model,
    };

    match cli.command {
        Command::Image { path } => commands::image(&ctx, &path).await,
        Command::Text { message } => commands::text(&ctx, &message).await,
        Command::List => commands::list(&ctx),
        Command::Export { format } => match format {
            ExportFormat::Ics { output } => commands::export_ics(&ctx, output),
            ExportFormat::Url => commands::export_url(&ctx),
        },
        Command::Clear => commands::clear(&ctx),
    }
}
