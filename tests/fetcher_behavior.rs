//! Behavior-driven tests for the resilient fetcher
//!
//! These tests verify HOW the fetcher validates input, classifies provider
//! responses and retries transport failures, using a scripted transport.

mod support;

use std::time::{Duration, Instant};

use stockpulse_core::{
    AlphaVantageFetcher, Backoff, FetchError, FetchErrorKind, QuoteRequest, RetryPolicy, Symbol,
    TimeFrame, TradingDate,
};
use support::{connection_error, daily_body, fetcher, ok, series_body, status, ScriptedHttpClient};

const FAST: Duration = Duration::from_millis(1);

// =============================================================================
// Fetcher: Input Validation
// =============================================================================

#[tokio::test]
async fn when_symbol_is_invalid_fetcher_rejects_without_network_call() {
    for symbol in ["", "   ", "AB1", "BRK.B", "TOOLONG", "A-B", "ÄPFEL"] {
        // Given: A fetcher with a transport that would succeed
        let client = ScriptedHttpClient::new([ok(daily_body(&[("2024-01-02", 10.0, 1)]))]);
        let fetcher = fetcher(client.clone(), FAST);

        // When: The caller asks for an invalid symbol
        let result = fetcher.fetch_raw(symbol, "daily").await;

        // Then: InvalidInput is returned and the transport was never touched
        assert!(
            matches!(result, Err(FetchError::InvalidInput(_))),
            "symbol {symbol:?} should be rejected, got {result:?}"
        );
        assert_eq!(client.calls(), 0, "symbol {symbol:?} reached the network");
    }
}

#[tokio::test]
async fn when_time_frame_is_unknown_fetcher_behaves_as_daily() {
    for time_frame in ["", "hourly", "quarterly", "DAILYISH"] {
        // Given: A provider answering with a daily series
        let client = ScriptedHttpClient::new([ok(daily_body(&[("2024-01-02", 10.0, 1)]))]);
        let fetcher = fetcher(client.clone(), FAST);

        // When: An unrecognized time frame is requested
        let series = fetcher
            .fetch_raw("ibm", time_frame)
            .await
            .expect("falls back to daily");

        // Then: The daily endpoint was called and the series is tagged daily
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].url.contains("function=TIME_SERIES_DAILY"));
        assert_eq!(series.metadata.time_frame, TimeFrame::Daily);
    }
}

#[tokio::test]
async fn when_time_frame_is_known_fetcher_selects_matching_endpoint() {
    let cases = [
        ("weekly", "TIME_SERIES_WEEKLY", "Weekly Time Series"),
        ("monthly", "TIME_SERIES_MONTHLY", "Monthly Time Series"),
    ];
    for (time_frame, function, key) in cases {
        let client = ScriptedHttpClient::new([ok(series_body(key, &[("2024-01-05", 50.0, 10)]))]);
        let fetcher = fetcher(client.clone(), FAST);

        let series = fetcher.fetch_raw("msft", time_frame).await.expect("success");

        let url = &client.requests()[0].url;
        assert!(url.contains(&format!("function={function}")), "{url}");
        assert!(url.contains("symbol=MSFT"));
        assert!(url.contains("outputsize=compact"));
        assert_eq!(series.points.len(), 1);
    }
}

#[tokio::test]
async fn when_api_key_is_missing_fetcher_reports_unconfigured_without_network_call() {
    // Given: A fetcher constructed without a credential
    let client = ScriptedHttpClient::new([ok(daily_body(&[("2024-01-02", 10.0, 1)]))]);
    let fetcher = AlphaVantageFetcher::new(client.clone(), None);

    // When: A valid request is made
    let outcome = fetcher.fetch_raw_detailed("AAPL", "daily").await;

    // Then: The terminal unconfigured error is returned with zero attempts
    assert_eq!(outcome.result, Err(FetchError::Unconfigured));
    assert_eq!(outcome.attempts, 0);
    assert_eq!(client.calls(), 0);
}

// =============================================================================
// Fetcher: Retry Behavior
// =============================================================================

#[tokio::test]
async fn when_transport_fails_twice_then_succeeds_fetcher_returns_success_after_three_calls() {
    // Given: A transport that fails twice, then answers
    let client = ScriptedHttpClient::new([
        connection_error(),
        status(503),
        ok(daily_body(&[("2024-01-02", 192.53, 100)])),
    ]);
    let fetcher = fetcher(client.clone(), FAST);

    // When: The series is fetched
    let request = QuoteRequest::new(Symbol::parse("AAPL").expect("valid"), TimeFrame::Daily);
    let outcome = fetcher.fetch_detailed(&request).await;

    // Then: Success after exactly three transport invocations
    let series = outcome.result.expect("third attempt succeeds");
    assert_eq!(series.points.len(), 1);
    assert_eq!(outcome.attempts, 3);
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn when_transport_always_fails_fetcher_gives_up_after_three_attempts() {
    // Given: A transport that is never reachable and a measurable base delay
    let base = Duration::from_millis(20);
    let client = ScriptedHttpClient::unreachable();
    let fetcher = AlphaVantageFetcher::new(client.clone(), Some("key".to_owned()))
        .with_retry_policy(RetryPolicy::new(3, Backoff::Jittered { base }));

    // When: The series is fetched
    let started = Instant::now();
    let result = fetcher.fetch_raw("AAPL", "daily").await;
    let elapsed = started.elapsed();

    // Then: The last transport failure is returned after three attempts
    let error = result.expect_err("transport never recovers");
    assert_eq!(error.kind(), FetchErrorKind::TransportFailure);
    assert!(error.retryable());
    assert_eq!(client.calls(), 3);

    // And: At least two base delays were waited
    assert!(elapsed >= base * 2, "waited only {elapsed:?}");
}

#[tokio::test]
async fn when_non_2xx_status_persists_last_transport_failure_is_returned() {
    let client = ScriptedHttpClient::new([status(500), status(502), status(504)]);
    let fetcher = fetcher(client.clone(), FAST);

    let error = fetcher.fetch_raw("AAPL", "daily").await.expect_err("all attempts fail");

    assert_eq!(error, FetchError::transport("provider returned HTTP 504"));
    assert_eq!(client.calls(), 3);
}

// =============================================================================
// Fetcher: Response Classification
// =============================================================================

#[tokio::test]
async fn when_provider_reports_error_message_fetcher_returns_it_verbatim_without_retry() {
    // Given: A provider rejecting the call
    let client = ScriptedHttpClient::new([ok(r#"{"Error Message": "Invalid API call"}"#)]);
    let fetcher = fetcher(client.clone(), FAST);

    // When: The series is fetched
    let result = fetcher.fetch_raw("ZZZZ", "daily").await;

    // Then: ProviderError with the exact message, single attempt
    assert_eq!(result, Err(FetchError::provider("Invalid API call")));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_provider_sends_note_fetcher_reports_rate_limit_without_retry() {
    let note = "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute.";
    let client = ScriptedHttpClient::new([ok(serde_json::json!({ "Note": note }).to_string())]);
    let fetcher = fetcher(client.clone(), FAST);

    let result = fetcher.fetch_raw("AAPL", "daily").await;

    assert_eq!(result, Err(FetchError::rate_limited(note)));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_provider_sends_information_fetcher_reports_rate_limit() {
    let client = ScriptedHttpClient::new([ok(
        r#"{"Information": "We have detected your API key and our standard API rate limit is 25 requests per day."}"#,
    )]);
    let fetcher = fetcher(client.clone(), FAST);

    let error = fetcher.fetch_raw("AAPL", "daily").await.expect_err("rate limited");

    assert_eq!(error.kind(), FetchErrorKind::RateLimited);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_body_has_error_and_note_provider_error_wins() {
    let client = ScriptedHttpClient::new([ok(r#"{"Note": "slow down", "Error Message": "bad symbol"}"#)]);
    let fetcher = fetcher(client, FAST);

    let result = fetcher.fetch_raw("AAPL", "daily").await;

    assert_eq!(result, Err(FetchError::provider("bad symbol")));
}

#[tokio::test]
async fn when_body_is_well_formed_fetcher_extracts_points() {
    // Given: A minimal daily body
    let client = ScriptedHttpClient::new([ok(
        r#"{"Time Series (Daily)": {"2024-01-02": {"1. open": "187.15", "2. high": "188.44", "3. low": "183.89", "4. close": "192.53", "5. volume": "82488700"}}}"#,
    )]);
    let fetcher = fetcher(client, FAST);

    // When: The series is fetched
    let series = fetcher.fetch_raw("AAPL", "daily").await.expect("success");

    // Then: One point dated 2024-01-02 with the provider's close
    assert_eq!(series.points.len(), 1);
    let point = &series.points[0];
    assert_eq!(point.date, TradingDate::parse("2024-01-02").expect("valid"));
    assert_eq!(point.close, 192.53);
    assert_eq!(point.volume, 82_488_700);
}

#[tokio::test]
async fn when_provider_lists_dates_newest_first_points_are_sorted_ascending() {
    let client = ScriptedHttpClient::new([ok(daily_body(&[
        ("2024-01-04", 30.0, 3),
        ("2024-01-02", 10.0, 1),
        ("2024-01-03", 20.0, 2),
    ]))]);
    let fetcher = fetcher(client, FAST);

    let series = fetcher.fetch_raw("AAPL", "daily").await.expect("success");

    let closes = series.points.iter().map(|p| p.close).collect::<Vec<_>>();
    assert_eq!(closes, vec![10.0, 20.0, 30.0]);
    assert_eq!(series.metadata.last_refreshed.as_deref(), Some("2024-01-04"));
}

#[tokio::test]
async fn when_series_section_is_empty_fetcher_reports_malformed() {
    let client = ScriptedHttpClient::new([ok(r#"{"Time Series (Daily)": {}}"#)]);
    let fetcher = fetcher(client.clone(), FAST);

    let error = fetcher.fetch_raw("AAPL", "daily").await.expect_err("malformed");

    assert_eq!(error.kind(), FetchErrorKind::MalformedResponse);
    assert!(!error.retryable());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn when_body_lacks_series_or_is_not_json_fetcher_reports_malformed() {
    for body in [
        r#"{"Meta Data": {"2. Symbol": "AAPL"}}"#,
        "<html>maintenance</html>",
        "",
        r#""just a string""#,
        r#"{"Time Series (Daily)": {"not-a-date": {"4. close": "1.0"}}}"#,
    ] {
        let client = ScriptedHttpClient::new([ok(body)]);
        let fetcher = fetcher(client.clone(), FAST);

        let error = fetcher.fetch_raw("AAPL", "daily").await.expect_err("malformed");

        assert_eq!(error.kind(), FetchErrorKind::MalformedResponse, "body {body:?}");
        assert_eq!(client.calls(), 1);
    }
}

#[tokio::test]
async fn when_expected_key_is_absent_any_time_series_section_is_accepted() {
    let client = ScriptedHttpClient::new([ok(series_body(
        "Time Series (60min)",
        &[("2024-01-02", 12.0, 5)],
    ))]);
    let fetcher = fetcher(client, FAST);

    let series = fetcher.fetch_raw("AAPL", "daily").await.expect("fallback section used");

    assert_eq!(series.points.len(), 1);
}

#[tokio::test]
async fn when_some_entries_are_invalid_they_are_skipped() {
    let client = ScriptedHttpClient::new([ok(r#"{"Time Series (Daily)": {
        "2024-01-02": {"4. close": "10.0"},
        "2024-01-03": {"4. close": "-3.0"},
        "2024-01-04": {"4. close": "oops"},
        "2024-01-05": {"4. close": "12.5"}
    }}"#)]);
    let fetcher = fetcher(client, FAST);

    let series = fetcher.fetch_raw("AAPL", "daily").await.expect("partial success");

    let closes = series.points.iter().map(|p| p.close).collect::<Vec<_>>();
    assert_eq!(closes, vec![10.0, 12.5]);
}

// =============================================================================
// Fetcher: Outbound Request
// =============================================================================

#[tokio::test]
async fn outbound_request_uses_fixed_timeout_and_encodes_key() {
    let client = ScriptedHttpClient::new([ok(daily_body(&[("2024-01-02", 10.0, 1)]))]);
    let fetcher = AlphaVantageFetcher::new(client.clone(), Some("a b&c".to_owned()))
        .with_base_url("http://provider.test/query");

    fetcher.fetch_raw("aapl", "daily").await.expect("success");

    let request = &client.requests()[0];
    assert_eq!(request.timeout_ms, 15_000);
    assert_eq!(
        request.url,
        "http://provider.test/query?function=TIME_SERIES_DAILY&symbol=AAPL&outputsize=compact&apikey=a%20b%26c"
    );
}

#[tokio::test]
async fn fetcher_is_shareable_across_concurrent_requests() {
    let client = ScriptedHttpClient::new([
        ok(daily_body(&[("2024-01-02", 10.0, 1)])),
        ok(daily_body(&[("2024-01-02", 10.0, 1)])),
    ]);
    let fetcher = std::sync::Arc::new(fetcher(client.clone(), FAST));

    let first = tokio::spawn({
        let fetcher = fetcher.clone();
        async move { fetcher.fetch_raw("AAPL", "daily").await }
    });
    let second = tokio::spawn({
        let fetcher = fetcher.clone();
        async move { fetcher.fetch_raw("MSFT", "daily").await }
    });

    assert!(first.await.expect("join").is_ok());
    assert!(second.await.expect("join").is_ok());
    assert_eq!(client.calls(), 2);
}
