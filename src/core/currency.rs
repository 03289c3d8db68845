//! Currency metadata, the directory loaded at startup and the data
//! provider abstraction

use crate::core::amount::Amount;
use crate::core::error::FetchError;
use crate::core::timeseries::{DateRange, TimeSeries};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    pub code: String,
    pub symbol: String,
    pub symbol_first: bool,
}

impl Currency {
    /// Formats a converted value with two decimals and the symbol on the
    /// side this currency puts it.
    pub fn format_value(&self, value: f64) -> String {
        if self.symbol_first {
            format!("{} {value:.2}", self.symbol)
        } else {
            format!("{value:.2} {}", self.symbol)
        }
    }
}

/// Source of currency metadata, conversions and rate history.
#[async_trait]
pub trait CurrencyDataProvider: Send + Sync {
    async fn currencies(&self) -> Result<Vec<Currency>, FetchError>;

    async fn convert(&self, from: &str, to: &str, amount: &Amount) -> Result<f64, FetchError>;

    async fn timeseries(
        &self,
        base: &str,
        target: &str,
        range: &DateRange,
    ) -> Result<TimeSeries, FetchError>;
}

/// Supported currencies keyed by display name, plus the names in the
/// order the service listed them.
#[derive(Debug, Clone, Default)]
pub struct CurrencyDirectory {
    by_name: HashMap<String, Currency>,
    names: Vec<String>,
}

impl CurrencyDirectory {
    pub fn new(currencies: Vec<Currency>) -> Self {
        let mut directory = CurrencyDirectory::default();
        for currency in currencies {
            if directory.by_name.contains_key(&currency.name) {
                debug!(name = %currency.name, "Ignoring duplicate currency entry");
                continue;
            }
            directory.names.push(currency.name.clone());
            directory.by_name.insert(currency.name.clone(), currency);
        }
        directory
    }

    /// Fetches the directory once. An empty listing is treated as a
    /// malformed response.
    pub async fn load(provider: &dyn CurrencyDataProvider) -> Result<Self, FetchError> {
        let currencies = provider.currencies().await?;
        if currencies.is_empty() {
            return Err(FetchError::Malformed {
                endpoint: "/v1/currencies".to_string(),
                reason: "no currencies listed".to_string(),
            });
        }
        let directory = Self::new(currencies);
        debug!(count = directory.len(), "Loaded currency directory");
        Ok(directory)
    }

    pub fn get(&self, name: &str) -> Option<&Currency> {
        self.by_name.get(name)
    }

    /// Resolves a display name, falling back to a case-insensitive code match.
    pub fn lookup(&self, key: &str) -> Option<&Currency> {
        self.get(key).or_else(|| {
            self.names
                .iter()
                .filter_map(|name| self.by_name.get(name))
                .find(|c| c.code.eq_ignore_ascii_case(key.trim()))
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Index of the first name containing `query`, ignoring case.
    pub fn search(&self, query: &str) -> Option<usize> {
        let query = query.to_lowercase();
        self.names
            .iter()
            .position(|name| name.to_lowercase().contains(&query))
    }

    /// Currencies in listing order.
    pub fn iter(&self) -> impl Iterator<Item = &Currency> {
        self.names.iter().filter_map(|name| self.by_name.get(name))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
