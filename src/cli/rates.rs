use super::ui;
use crate::core::CurrencyRateProvider;
use crate::core::conversion::round_to;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;
use tracing::debug;

/// Unit rates for every ordered pair of `currencies`, row-major.
///
/// `None` marks a pair the provider has no rate for.
pub async fn build_rate_matrix(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    currencies: &[String],
    precision: u32,
) -> Vec<Vec<Option<f64>>> {
    let rate_futures = currencies.iter().map(move |from| async move {
        let row_futures = currencies.iter().map(move |to| async move {
            match provider.get_rate(from, to).await {
                Ok(rate) => Some(round_to(rate, precision)),
                Err(e) => {
                    debug!("No rate for {} -> {}: {}", from, to, e);
                    None
                }
            }
        });
        join_all(row_futures).await
    });
    join_all(rate_futures).await
}

pub async fn run(
    provider: &(dyn CurrencyRateProvider + Send + Sync),
    currencies: &[String],
    precision: u32,
) -> Result<()> {
    if currencies.is_empty() {
        println!("No currencies to show.");
        return Ok(());
    }

    let matrix = build_rate_matrix(provider, currencies, precision).await;

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("1 unit of")];
    header.extend(currencies.iter().map(|c| ui::header_cell(c)));
    table.set_header(header);

    let places = precision as usize;
    for (from, row) in currencies.iter().zip(matrix) {
        let mut cells = vec![Cell::new(from)];
        cells.extend(
            row.into_iter()
                .map(|rate| ui::format_optional_cell(rate, |r| format!("{r:.places$}"))),
        );
        table.add_row(cells);
    }

    println!(
        "\n{}\n",
        ui::style_text("Exchange rates", ui::StyleType::Title)
    );
    println!("{table}");
    Ok(())
}
