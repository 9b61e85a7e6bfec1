use std::fs;

use serde_json::json;
use stockpulse_core::{render_svg, ChartOptions, EnvelopeError};

use crate::cli::ChartArgs;
use crate::error::CliError;

use super::{lookup, CommandResult, Context};

pub async fn run(args: &ChartArgs, context: &Context) -> Result<CommandResult, CliError> {
    let (outcome, warnings) = lookup(&args.series, context).await;

    let result = match &outcome.result {
        Ok(series) => {
            let options = ChartOptions {
                max_points: args.points.max(1),
                ..ChartOptions::default()
            };
            let svg = render_svg(series.metadata.symbol.as_str(), &series.points, &options);
            let drawn = series.points.len().min(options.max_points);

            match &args.output {
                Some(path) => {
                    fs::write(path, &svg)?;
                    CommandResult::ok(json!({
                        "symbol": series.metadata.symbol,
                        "points": drawn,
                        "output": path.display().to_string(),
                    }))
                }
                None => CommandResult::ok(json!({
                    "symbol": series.metadata.symbol,
                    "points": drawn,
                    "svg": svg,
                })),
            }
        }
        Err(error) => CommandResult::failed(EnvelopeError::from(error)),
    };
    Ok(result.with_outcome(&outcome).with_warnings(warnings))
}
