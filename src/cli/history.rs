use super::ui;
use crate::core::timeseries::DISPLAY_DATE_FORMAT;
use crate::core::{ConversionError, CurrencyDataProvider, CurrencyDirectory, DateRange, TimeSeries};
use anyhow::{Context, Result};
use comfy_table::Cell;

/// Rate table for a pair, followed by the change over the whole range.
pub fn render_history(series: &TimeSeries, base: &str, target: &str) -> String {
    if series.is_empty() {
        return ui::style_text("No rate history available.", ui::StyleType::Subtle);
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("{base}/{target}")),
    ]);
    for point in series.points() {
        table.add_row(vec![
            Cell::new(point.date.format(DISPLAY_DATE_FORMAT)),
            ui::number_cell(format!("{:.3}", point.rate)),
        ]);
    }

    let mut output = table.to_string();
    if let (Some((lo, hi)), Some(change)) = (series.rate_bounds(), series.change_pct()) {
        let mut summary = ui::new_styled_table();
        summary.set_header(vec![
            ui::header_cell("Low"),
            ui::header_cell("High"),
            ui::header_cell("Change"),
        ]);
        summary.add_row(vec![
            ui::number_cell(format!("{lo:.3}")),
            ui::number_cell(format!("{hi:.3}")),
            ui::change_cell(change),
        ]);
        output.push_str("\n\n");
        output.push_str(&summary.to_string());
    }
    output
}

pub async fn run(
    directory: &CurrencyDirectory,
    provider: &dyn CurrencyDataProvider,
    from: &str,
    to: &str,
    today: chrono::NaiveDate,
) -> Result<()> {
    let resolve = |key: &str| {
        directory
            .lookup(key)
            .ok_or_else(|| ConversionError::UnknownCurrency(key.to_string()))
    };
    let base = resolve(from)?;
    let target = resolve(to)?;
    let range = DateRange::last_three_months(today);

    let pb = ui::new_spinner("Fetching rate history");
    let series = provider.timeseries(&base.code, &target.code, &range).await;
    pb.finish_and_clear();
    let series = series.with_context(|| format!("Failed to fetch rates for {range}"))?;

    println!(
        "{}\n",
        ui::style_text(
            &format!("{} → {}, last 3 months", base.name, target.name),
            ui::StyleType::Title
        )
    );
    println!("{}", render_history(&series, &base.code, &target.code));
    Ok(())
}
