use super::ui;
use crate::build_service;
use crate::core::config::AppConfig;
use crate::core::convert::{
    cop_to_usd, format_amount, parse_amount, rate_from_body, rate_headline, scale_amount,
    usd_to_cop,
};
use crate::core::response::{ErrorResponse, RateResponse};
use crate::server::EXCHANGE_RATE_PATH;
use anyhow::{Result, bail};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const RATE_UNAVAILABLE: &str = "Exchange rate unavailable";

#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    pub usd: Option<String>,
    pub cop: Option<String>,
    /// Multiplier applied to the COP amount (the ×1,000 / ×1,000,000 shortcuts).
    pub times: Option<f64>,
    /// Base URL of a running service. Without it the rate is looked up locally.
    pub server: Option<String>,
}

/// Produces the same JSON body the endpoint would serve.
async fn fetch_body(config: &AppConfig, server: Option<&str>) -> Result<Value> {
    match server {
        Some(base_url) => {
            let url = format!("{}{}", base_url.trim_end_matches('/'), EXCHANGE_RATE_PATH);
            debug!("Requesting exchange rate from {}", url);
            let response = match reqwest::Client::builder()
                .timeout(Duration::from_secs(config.provider.timeout_secs))
                .build()
            {
                Ok(client) => client.get(&url).send().await,
                Err(e) => Err(e),
            };
            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    // An unreachable server reads the same as a body without a rate.
                    warn!(error = %e, "Failed to reach exchange rate server");
                    return Ok(Value::Null);
                }
            };
            // The body is inspected whatever the status; error bodies carry no rate.
            Ok(response.json::<Value>().await.unwrap_or(Value::Null))
        }
        None => {
            let service = build_service(config).await?;
            let body = match service.get_rate().await {
                Ok(outcome) => serde_json::to_value(RateResponse::from(outcome))?,
                Err(e) => serde_json::to_value(ErrorResponse::from(&e))?,
            };
            Ok(body)
        }
    }
}

/// Renders the converter output. Amounts that do not parse show as `-`.
pub fn render_conversion(rate: Option<f64>, args: &ConvertArgs) -> String {
    let Some(rate) = rate else {
        return ui::style_text(RATE_UNAVAILABLE, ui::StyleType::Error);
    };

    let mut lines = vec![ui::style_text(&rate_headline(rate), ui::StyleType::Subtle)];

    if let Some(input) = &args.usd {
        let converted = parse_amount(input).and_then(|usd| Some((usd, usd_to_cop(usd, rate)?)));
        lines.push(match converted {
            Some((usd, cop)) => format!(
                "{} USD = {} COP",
                format_amount(usd),
                ui::style_text(&format_amount(cop), ui::StyleType::Value)
            ),
            None => "USD: -".to_string(),
        });
    }

    if let Some(input) = &args.cop {
        let converted = parse_amount(input)
            .map(|cop| scale_amount(cop, args.times.unwrap_or(1.0)))
            .and_then(|cop| Some((cop, cop_to_usd(cop, rate)?)));
        lines.push(match converted {
            Some((cop, usd)) => format!(
                "{} COP = {} USD",
                format_amount(cop),
                ui::style_text(&format_amount(usd), ui::StyleType::Value)
            ),
            None => "COP: -".to_string(),
        });
    }

    lines.join("\n")
}

pub async fn run(config: &AppConfig, args: &ConvertArgs) -> Result<()> {
    let spinner = ui::new_spinner("Fetching exchange rate...");
    let body = fetch_body(config, args.server.as_deref()).await;
    spinner.finish_and_clear();

    let body = body?;
    let rate = rate_from_body(&body);
    if rate.is_none() {
        debug!(body = %body, "Unexpected exchange rate response");
    }

    println!("{}", render_conversion(rate, args));
    if rate.is_none() {
        bail!(RATE_UNAVAILABLE);
    }
    Ok(())
}
