use serde::Serialize;
use stockpulse_core::{EnvelopeError, FetchOutcome};

use crate::cli::{SearchArgs, SymbolArgs};
use crate::error::CliError;

use super::{CommandResult, Context};

pub async fn quote(args: &SymbolArgs, context: &Context) -> Result<CommandResult, CliError> {
    result_of(context.fetcher.fetch_quote(&args.symbol).await)
}

pub async fn overview(args: &SymbolArgs, context: &Context) -> Result<CommandResult, CliError> {
    result_of(context.fetcher.fetch_overview(&args.symbol).await)
}

pub async fn search(args: &SearchArgs, context: &Context) -> Result<CommandResult, CliError> {
    result_of(context.fetcher.search_symbols(&args.keywords).await)
}

fn result_of<T: Serialize>(outcome: FetchOutcome<T>) -> Result<CommandResult, CliError> {
    let result = match &outcome.result {
        Ok(data) => CommandResult::ok(serde_json::to_value(data)?),
        Err(error) => CommandResult::failed(EnvelopeError::from(error)),
    };
    Ok(result.with_outcome(&outcome))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::context;
    use super::*;

    #[tokio::test]
    async fn quote_is_returned_with_attempts() {
        let temp = tempfile::tempdir().expect("tempdir");
        let body = serde_json::json!({
            "Global Quote": { "01. symbol": "IBM", "05. price": "161.25", "10. change percent": "-0.3100%" }
        })
        .to_string();
        let (context, _) = context(Some(body), temp.path());

        let result = quote(&SymbolArgs { symbol: String::from("ibm") }, &context)
            .await
            .expect("run");

        let data = result.data.expect("data");
        assert_eq!(data["symbol"], "IBM");
        assert_eq!(data["price"], 161.25);
        assert_eq!(data["change_pct"], -0.31);
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test]
    async fn search_without_matches_is_an_empty_list() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (context, _) = context(Some(String::from(r#"{"bestMatches": []}"#)), temp.path());

        let result = search(&SearchArgs { keywords: String::from("zzzz") }, &context)
            .await
            .expect("run");

        assert_eq!(result.data.expect("data"), serde_json::json!([]));
        assert!(result.errors.is_empty());
    }

    #[tokio::test]
    async fn invalid_overview_symbol_is_reported_without_network_call() {
        let temp = tempfile::tempdir().expect("tempdir");
        let (context, client) = context(Some(String::from("{}")), temp.path());

        let result = overview(&SymbolArgs { symbol: String::from("BRK.B") }, &context)
            .await
            .expect("run");

        assert_eq!(result.errors[0].code, "fetch.invalid_input");
        assert_eq!(*client.calls.lock().expect("calls"), 0);
    }
}
