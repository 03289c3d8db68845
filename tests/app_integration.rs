use std::fs;
use tracing::info;

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CURRENCIES: &str = r#"{
        "meta": {"code": 200, "disclaimer": "Usage subject to terms"},
        "response": [
            {"id": 1, "name": "US Dollar", "short_code": "USD", "code": "840", "precision": 2, "subunit": 100, "symbol": "$", "symbol_first": true, "decimal_mark": ".", "thousands_separator": ","},
            {"id": 2, "name": "Euro", "short_code": "EUR", "code": "978", "precision": 2, "subunit": 100, "symbol": "€", "symbol_first": false, "decimal_mark": ",", "thousands_separator": "."},
            {"id": 3, "name": "Brazilian Real", "short_code": "BRL", "code": "986", "precision": 2, "subunit": 100, "symbol": "R$", "symbol_first": true, "decimal_mark": ",", "thousands_separator": "."}
        ]
    }"#;

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/convert"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .and(query_param("amount", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"meta": {"code": 200}, "timestamp": 1709251200, "date": "2024-03-01", "from": "USD", "to": "EUR", "amount": 100, "value": 92.5}"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/timeseries"))
            .and(query_param("base", "USD"))
            .and(query_param("symbols", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"meta": {"code": 200}, "response": {"2024-03-01": {"EUR": 0.92}, "2024-01-01": {"EUR": 0.90}}}"#,
            ))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            api_key: "integration-key"
            providers:
              currencybeacon:
                base_url: {base_url}
            request_timeout_secs: 5
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            from: "US Dollar".to_string(),
            to: "eur".to_string(),
            amount: "100".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_currencies_and_history_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str().unwrap();

    let result = fxc::run_command(fxc::AppCommand::Currencies, Some(config_path)).await;
    assert!(result.is_ok(), "Currencies failed with: {:?}", result.err());

    let result = fxc::run_command(
        fxc::AppCommand::History {
            from: "USD".to_string(),
            to: "Euro".to_string(),
        },
        Some(config_path),
    )
    .await;
    assert!(result.is_ok(), "History failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_amount_fails_convert() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Convert {
            from: "US Dollar".to_string(),
            to: "Euro".to_string(),
            amount: "12abc".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("an invalid amount must fail");
    info!(error = %err, "Conversion rejected");
    assert!(err.to_string().contains("Invalid amount"));
    // nothing beyond the startup listing should have been requested
    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.iter().all(|r| r.url.path() == "/v1/currencies"));
}

#[test_log::test(tokio::test)]
async fn test_directory_failure_aborts_startup() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::path("/v1/currencies"))
        .respond_with(wiremock::ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("startup must fail without a directory");
    assert!(
        err.to_string()
            .contains("Failed to load the list of supported currencies")
    );
}

#[test_log::test(tokio::test)]
async fn test_empty_currency_listing_aborts_startup() {
    let mock_server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::path("/v1/currencies"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_string(r#"{"response": []}"#),
        )
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxc::run_command(
        fxc::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("an empty listing must fail startup");
    let message = format!("{err:#}");
    assert!(message.contains("Failed to load the list of supported currencies"));
    assert!(message.contains("Malformed response from /v1/currencies"));
}

#[test_log::test(tokio::test)]
async fn test_startup_error_hides_api_key() {
    // nothing listens on the discard port
    let config_file = test_utils::write_config("http://127.0.0.1:9");

    let result = fxc::run_command(
        fxc::AppCommand::Currencies,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;

    let err = result.expect_err("an unreachable service must fail startup");
    assert!(!format!("{err:#}").contains("integration-key"));
    assert!(!format!("{err:?}").contains("integration-key"));
}

#[test_log::test(tokio::test)]
async fn test_missing_config_path_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("absent.yaml");
    assert!(!missing.exists());

    let result = fxc::run_command(fxc::AppCommand::Currencies, missing.to_str()).await;
    assert!(result.is_err());

    // the directory is still empty afterwards
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
