use stockpulse_core::EnvelopeError;

use crate::cli::SeriesArgs;
use crate::error::CliError;

use super::{lookup, CommandResult, Context};

pub async fn run(args: &SeriesArgs, context: &Context) -> Result<CommandResult, CliError> {
    let (outcome, warnings) = lookup(args, context).await;

    let result = match &outcome.result {
        Ok(series) => CommandResult::ok(serde_json::to_value(series)?),
        Err(error) => CommandResult::failed(EnvelopeError::from(error)),
    };
    Ok(result.with_outcome(&outcome).with_warnings(warnings))
}
