//! The convert-then-chart flow and the guard against stale completions

use crate::core::amount::Amount;
use crate::core::currency::{CurrencyDataProvider, CurrencyDirectory};
use crate::core::error::ConversionError;
use crate::core::timeseries::{DateRange, TimeSeries};
use chrono::NaiveDate;
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub amount: String,
}

/// Everything a successful conversion changes on screen. Built only once
/// both calls succeeded so label and chart are always replaced together.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub from_code: String,
    pub to_code: String,
    pub display: String,
    pub series: TimeSeries,
}

/// Resolves the request against the directory, converts the amount and then
/// fetches the last three months of rates for the same pair.
#[instrument(
    name = "Conversion",
    skip(directory, provider),
    fields(from = %request.from, to = %request.to)
)]
pub async fn convert(
    directory: &CurrencyDirectory,
    provider: &dyn CurrencyDataProvider,
    request: &ConversionRequest,
    today: NaiveDate,
) -> Result<ConversionOutcome, ConversionError> {
    let from = directory
        .lookup(&request.from)
        .ok_or_else(|| ConversionError::UnknownCurrency(request.from.clone()))?;
    let to = directory
        .lookup(&request.to)
        .ok_or_else(|| ConversionError::UnknownCurrency(request.to.clone()))?;
    let amount = Amount::parse(&request.amount)?;

    let value = provider.convert(&from.code, &to.code, &amount).await?;
    debug!(%amount, value, "Converted amount");

    let range = DateRange::last_three_months(today);
    let series = provider.timeseries(&from.code, &to.code, &range).await?;
    debug!(points = series.len(), %range, "Fetched rate history");

    Ok(ConversionOutcome {
        from_code: from.code.clone(),
        to_code: to.code.clone(),
        display: to.format_value(value),
        series,
    })
}

/// Monotonic id of a dispatched conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

/// Tracks the latest dispatched conversion so that slower, older requests
/// cannot overwrite a newer result.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: u64,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispatch(&mut self) -> Generation {
        self.latest += 1;
        Generation(self.latest)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.latest
    }
}
