mod cli;
mod commands;
mod error;
mod output;

use std::process::ExitCode;

use clap::Parser;
use stockpulse_core::telemetry::{self, COMMAND_DIRECTIVE};
use stockpulse_core::AppConfig;

use crate::cli::Cli;
use crate::commands::Context;
use crate::error::{exit_code_for_error, CliError};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format, COMMAND_DIRECTIVE);

    let context = Context::from_config(&config);
    let envelope = commands::run(&cli, &context).await?;
    output::render(&envelope, cli.format, cli.pretty)?;

    if let Some(error) = envelope.errors.first() {
        return Ok(ExitCode::from(exit_code_for_error(&error.code)));
    }

    if cli.strict && !envelope.meta.warnings.is_empty() {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    Ok(ExitCode::SUCCESS)
}
