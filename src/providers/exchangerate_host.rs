use crate::core::error::FetchError;
use crate::core::rate::{CurrencyPair, RateProvider};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Live quotes from an exchangerate.host compatible API.
pub struct ExchangeRateHostProvider {
    base_url: String,
    access_key: Option<String>,
    client: Client,
}

impl ExchangeRateHostProvider {
    pub fn new(base_url: &str, access_key: Option<String>, timeout: Duration) -> Result<Self> {
        if access_key.is_none() {
            warn!("No access key configured for the exchange rate provider");
        }
        let client = Client::builder()
            .user_agent(concat!("usdcop/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(ExchangeRateHostProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
            client,
        })
    }

    fn live_url(&self, pair: &CurrencyPair) -> Result<Url, FetchError> {
        let mut params = vec![
            ("source", pair.base.as_str()),
            ("currencies", pair.quote.as_str()),
        ];
        if let Some(key) = &self.access_key {
            params.insert(0, ("access_key", key.as_str()));
        }
        Url::parse_with_params(&format!("{}/live", self.base_url), &params)
            .map_err(|e| FetchError::UpstreamUnavailable(format!("Invalid provider URL: {e}")))
    }
}

#[derive(Debug, Deserialize)]
struct LiveQuotesResponse {
    success: bool,
    #[serde(default)]
    quotes: HashMap<String, Value>,
    #[serde(default)]
    error: Option<Value>,
}

#[async_trait]
impl RateProvider for ExchangeRateHostProvider {
    #[instrument(name = "LiveRateFetch", skip(self, pair), fields(pair = %pair))]
    async fn fetch_rate(&self, pair: &CurrencyPair) -> Result<f64, FetchError> {
        let url = self.live_url(pair)?;
        debug!(base_url = %self.base_url, "Requesting live quote");

        let response = self.client.get(url).send().await.map_err(|e| {
            FetchError::UpstreamUnavailable(format!("Request error for {pair}: {e}"))
        })?;

        if !response.status().is_success() {
            return Err(FetchError::UpstreamUnavailable(format!(
                "HTTP error: {} for currency pair: {}",
                response.status(),
                pair
            )));
        }

        let text = response.text().await.map_err(|e| {
            FetchError::UpstreamUnavailable(format!("Failed to read response for {pair}: {e}"))
        })?;

        let data: LiveQuotesResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::MalformedResponse(format!("Failed to parse JSON response for {pair}: {e}"))
        })?;

        if !data.success {
            let detail = data
                .error
                .map_or_else(|| "no details".to_string(), |e| e.to_string());
            return Err(FetchError::MalformedResponse(format!(
                "Provider reported failure for {pair}: {detail}"
            )));
        }

        let key = pair.quote_key();
        let quote = data
            .quotes
            .get(&key)
            .ok_or_else(|| FetchError::MalformedResponse(format!("Missing quote {key}")))?;

        match quote.as_f64() {
            Some(rate) if rate.is_finite() && rate > 0.0 => {
                debug!(rate, "Received live quote");
                Ok(rate)
            }
            _ => Err(FetchError::MalformedResponse(format!(
                "Quote {key} is not a positive number: {quote}"
            ))),
        }
    }
}
