use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::amount::Amount;
use crate::core::currency::{Currency, CurrencyDataProvider};
use crate::core::error::FetchError;
use crate::core::timeseries::{API_DATE_FORMAT, DateRange, TimeSeries};

const CURRENCIES_ENDPOINT: &str = "/v1/currencies";
const CONVERT_ENDPOINT: &str = "/v1/convert";
const TIMESERIES_ENDPOINT: &str = "/v1/timeseries";

// CurrencyBeaconProvider implementation for CurrencyDataProvider
pub struct CurrencyBeaconProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CurrencyBeaconProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent("fxc/1.0");
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(CurrencyBeaconProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: builder.build()?,
        })
    }

    /// Issues a GET with the access key attached and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let query =
            std::iter::once(("api_key", self.api_key.as_str())).chain(params.iter().copied());
        let url = Url::parse_with_params(&format!("{}{}", self.base_url, endpoint), query)
            .map_err(|e| FetchError::Network(format!("Invalid URL for {endpoint}: {e}")))?;
        debug!(endpoint, ?params, "Requesting currency data");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                status: response.status().as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| FetchError::Malformed {
            endpoint: endpoint.to_string(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CurrenciesResponse {
    response: Vec<CurrencyEntry>,
}

#[derive(Debug, Deserialize)]
struct CurrencyEntry {
    name: String,
    short_code: String,
    symbol: String,
    #[serde(default)]
    symbol_first: bool,
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct TimeseriesResponse {
    response: HashMap<String, HashMap<String, f64>>,
}

#[async_trait]
impl CurrencyDataProvider for CurrencyBeaconProvider {
    #[instrument(name = "BeaconCurrencies", skip(self))]
    async fn currencies(&self) -> Result<Vec<Currency>, FetchError> {
        let data: CurrenciesResponse = self.get_json(CURRENCIES_ENDPOINT, &[]).await?;
        debug!(count = data.response.len(), "Received currency listing");

        Ok(data
            .response
            .into_iter()
            .map(|entry| Currency {
                name: entry.name,
                code: entry.short_code,
                symbol: entry.symbol,
                symbol_first: entry.symbol_first,
            })
            .collect())
    }

    #[instrument(name = "BeaconConvert", skip(self, amount), fields(amount = %amount))]
    async fn convert(&self, from: &str, to: &str, amount: &Amount) -> Result<f64, FetchError> {
        let data: ConvertResponse = self
            .get_json(
                CONVERT_ENDPOINT,
                &[("from", from), ("to", to), ("amount", amount.as_str())],
            )
            .await?;
        Ok(data.value)
    }

    #[instrument(name = "BeaconTimeseries", skip(self, range), fields(range = %range))]
    async fn timeseries(
        &self,
        base: &str,
        target: &str,
        range: &DateRange,
    ) -> Result<TimeSeries, FetchError> {
        let start = range.start.format(API_DATE_FORMAT).to_string();
        let end = range.end.format(API_DATE_FORMAT).to_string();
        let data: TimeseriesResponse = self
            .get_json(
                TIMESERIES_ENDPOINT,
                &[
                    ("base", base),
                    ("start_date", start.as_str()),
                    ("end_date", end.as_str()),
                    ("symbols", target),
                ],
            )
            .await?;

        TimeSeries::from_daily_rates(&data.response, target).map_err(|e| FetchError::Malformed {
            endpoint: TIMESERIES_ENDPOINT.to_string(),
            reason: format!("bad date key: {e}"),
        })
    }
}
