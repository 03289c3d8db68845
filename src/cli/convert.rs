use super::{history, ui};
use crate::core::conversion::{self, ConversionOutcome, ConversionRequest};
use crate::core::{CurrencyDataProvider, CurrencyDirectory};
use anyhow::Result;

/// Result line followed by the rate history of the pair.
pub fn render_outcome(request: &ConversionRequest, outcome: &ConversionOutcome) -> String {
    format!(
        "{} {} = {}\n\n{}",
        request.amount.trim(),
        outcome.from_code,
        ui::style_text(&outcome.display, ui::StyleType::Result),
        history::render_history(&outcome.series, &outcome.from_code, &outcome.to_code)
    )
}

pub async fn run(
    directory: &CurrencyDirectory,
    provider: &dyn CurrencyDataProvider,
    request: ConversionRequest,
    today: chrono::NaiveDate,
) -> Result<()> {
    let pb = ui::new_spinner("Converting");
    let result = conversion::convert(directory, provider, &request, today).await;
    pb.finish_and_clear();

    match result {
        Ok(outcome) => {
            println!("{}", render_outcome(&request, &outcome));
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", ui::style_text(err.user_message(), ui::StyleType::Error));
            Err(err.into())
        }
    }
}
