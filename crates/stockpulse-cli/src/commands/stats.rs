use serde::Serialize;
use stockpulse_core::{EnvelopeError, SeriesMetadata, SeriesPoint, SeriesStats, StockReport};

use crate::cli::StatsArgs;
use crate::error::CliError;

use super::{lookup, CommandResult, Context};

/// A report without the full series.
#[derive(Debug, Serialize)]
struct StatsResponseData {
    metadata: SeriesMetadata,
    stats: SeriesStats,
    recent: Vec<SeriesPoint>,
}

pub async fn run(args: &StatsArgs, context: &Context) -> Result<CommandResult, CliError> {
    let (outcome, warnings) = lookup(&args.series, context).await;

    let result = match &outcome.result {
        Ok(series) => {
            let report = StockReport::build_with_recent(series.clone(), args.recent);
            CommandResult::ok(serde_json::to_value(StatsResponseData {
                metadata: report.metadata,
                stats: report.stats,
                recent: report.recent,
            })?)
        }
        Err(error) => CommandResult::failed(EnvelopeError::from(error)),
    };
    Ok(result.with_outcome(&outcome).with_warnings(warnings))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{context, daily_body};
    use super::*;
    use crate::cli::SeriesArgs;

    #[tokio::test]
    async fn stats_cover_the_whole_series_and_list_recent_newest_first() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (context, _) = context(Some(daily_body()), temp.path());
        let args = StatsArgs {
            series: SeriesArgs {
                symbol: String::from("AAPL"),
                time_frame: String::from("daily"),
            },
            recent: 2,
        };

        let result = run(&args, &context).await.expect("run");

        let data = result.data.expect("data");
        assert_eq!(data["stats"]["periods"], 3);
        assert_eq!(data["stats"]["maximum"], 185.64);
        assert_eq!(data["recent"].as_array().expect("recent").len(), 2);
        assert_eq!(data["recent"][0]["date"], "2024-01-04");
        assert!(data.get("series").is_none());
    }
}
