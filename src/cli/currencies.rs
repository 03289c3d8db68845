use super::ui;
use crate::core::CurrencyDirectory;
use comfy_table::Cell;

/// Table of every supported currency in listing order.
pub fn render_table(directory: &CurrencyDirectory) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Example"),
    ]);

    for currency in directory.iter() {
        table.add_row(vec![
            Cell::new(&currency.name),
            Cell::new(&currency.code),
            Cell::new(&currency.symbol),
            ui::number_cell(currency.format_value(1234.5)),
        ]);
    }

    table.to_string()
}

pub fn run(directory: &CurrencyDirectory) -> anyhow::Result<()> {
    println!(
        "{} {}\n",
        ui::style_text("Supported currencies", ui::StyleType::Title),
        ui::style_text(&format!("({})", directory.len()), ui::StyleType::Subtle)
    );
    println!("{}", render_table(directory));
    Ok(())
}
