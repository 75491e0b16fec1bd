pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod store;

use crate::cli::convert::ConvertArgs;
use crate::core::config::AppConfig;
use crate::core::rate::{RateRecord, UtcClock};
use crate::core::service::RateService;
use crate::providers::ExchangeRateHostProvider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Serve,
    Rate,
    Convert(ConvertArgs),
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Wires the configured store and provider into a rate service, seeding the
/// store when it is empty and a seed is configured.
pub async fn build_service(config: &AppConfig) -> Result<Arc<RateService>> {
    let store = store::open_store(&config.store)?;
    let provider = ExchangeRateHostProvider::new(
        &config.provider.base_url,
        config.provider.access_key.clone(),
        Duration::from_secs(config.provider.timeout_secs),
    )?;

    let service = RateService::new(store, Arc::new(provider), Arc::new(UtcClock));
    if let Some(seed) = config.store.seed {
        let seed = RateRecord::new(seed.rate, seed.date)?;
        service.seed_if_empty(seed).await?;
    }
    Ok(Arc::new(service))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("USD/COP rate service starting...");
    let config = load_config(config_path)?;

    match command {
        AppCommand::Serve => {
            let service = build_service(&config).await?;
            server::serve(service, config.server.bind_addr).await
        }
        AppCommand::Rate => {
            let service = build_service(&config).await?;
            cli::rate::run(&service).await
        }
        AppCommand::Convert(args) => cli::convert::run(&config, &args).await,
    }
}
