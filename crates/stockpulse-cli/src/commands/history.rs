use crate::cli::HistoryArgs;
use crate::error::CliError;

use super::{CommandResult, Context};

pub async fn run(args: &HistoryArgs, context: &Context) -> Result<CommandResult, CliError> {
    let (limit, by_symbol) = (args.limit, args.by_symbol);
    let data = context
        .with_query_log(move |query_log| {
            let data = if by_symbol {
                serde_json::to_value(query_log.query_counts(limit)?)?
            } else {
                serde_json::to_value(query_log.recent_queries(limit)?)?
            };
            Ok(data)
        })
        .await?;
    Ok(CommandResult::ok(data))
}
