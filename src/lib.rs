pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::conversion::ConversionRequest;
use crate::core::{CurrencyDataProvider, CurrencyDirectory};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    Interactive,
    Currencies,
    Convert {
        from: String,
        to: String,
        amount: String,
    },
    History {
        from: String,
        to: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxc starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(
        base_url = %config.providers.currencybeacon.base_url,
        defaults = ?config.defaults,
        "Loaded config"
    );

    let api_key = config.api_key()?;
    let provider: Arc<dyn CurrencyDataProvider> =
        Arc::new(providers::CurrencyBeaconProvider::new(
            &config.providers.currencybeacon.base_url,
            &api_key,
            config.request_timeout_secs.map(Duration::from_secs),
        )?);

    // Nothing works without the directory, so a failure here ends the run.
    let directory = CurrencyDirectory::load(provider.as_ref())
        .await
        .context("Failed to load the list of supported currencies")?;
    let today = chrono::Local::now().date_naive();

    match command {
        AppCommand::Interactive => {
            cli::tui::run(Arc::new(directory), provider, &config.defaults).await
        }
        AppCommand::Currencies => cli::currencies::run(&directory),
        AppCommand::Convert { from, to, amount } => {
            let request = ConversionRequest { from, to, amount };
            cli::convert::run(&directory, provider.as_ref(), request, today).await
        }
        AppCommand::History { from, to } => {
            cli::history::run(&directory, provider.as_ref(), &from, &to, today).await
        }
    }
}
