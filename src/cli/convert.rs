use super::ui;
use crate::core::config::PrecisionConfig;
use crate::core::{Conversion, Leg, RateConverter, RatePath};
use anyhow::{Result, bail};
use tracing::{info, warn};

pub fn run(
    converter: &RateConverter,
    amount: f64,
    from: &str,
    to: &str,
    precision: &PrecisionConfig,
    strict: bool,
    json: bool,
) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        bail!("Amount must be a non-negative number, got {amount}");
    }
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();
    if from.is_empty() || to.is_empty() {
        bail!("Currency codes must not be empty");
    }

    info!(amount, %from, %to, "Converting");
    let conversion = if strict {
        converter.try_convert(amount, &from, &to, precision.amount)?
    } else {
        converter
            .resolve(amount, &from, &to)
            .rounded(precision.amount)
    };

    if !conversion.is_exact() {
        warn!(%from, %to, "No exchange rate known; amount left unconverted");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&conversion)?);
    } else {
        println!(
            "{}",
            format_conversion(&conversion, amount, precision, converter.base_currency())
        );
    }
    Ok(())
}

pub fn format_conversion(
    conversion: &Conversion,
    amount: f64,
    precision: &PrecisionConfig,
    base_currency: &str,
) -> String {
    let places = precision.amount as usize;
    let mut output = format!(
        "{amount:.places$} {} = {}",
        conversion.from,
        ui::style_text(
            &format!("{:.places$} {}", conversion.amount, conversion.to),
            ui::StyleType::TotalValue
        )
    );

    let rate_places = precision.rate as usize;
    output.push_str(&format!(
        "\n{}",
        ui::style_text(
            &format!(
                "1 {} = {:.rate_places$} {} ({})",
                conversion.from,
                conversion.path.rate(),
                conversion.to,
                describe_path(&conversion.path, &conversion.from, &conversion.to, base_currency)
            ),
            ui::StyleType::Subtle
        )
    ));

    if !conversion.is_exact() {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "Warning: no exchange rate known for this pair, amount shown unconverted",
                ui::StyleType::Warning
            )
        ));
    }
    output
}

pub fn describe_path(path: &RatePath, from: &str, to: &str, base_currency: &str) -> String {
    match path {
        RatePath::Identity => "same currency".to_string(),
        RatePath::Direct { .. } => "direct rate".to_string(),
        RatePath::CrossViaBase { to_base, from_base } => format!(
            "via {base_currency}: {from}->{base_currency} {}, {base_currency}->{to} {}",
            describe_leg(to_base),
            describe_leg(from_base)
        ),
        RatePath::Unavailable => "rate unavailable".to_string(),
    }
}

fn describe_leg(leg: &Leg) -> &'static str {
    match leg {
        Leg::Direct(_) => "quoted",
        Leg::Inverse(_) => "inverted",
        Leg::Assumed => "assumed 1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateTable;

    fn table() -> RateTable {
        RateTable::from_pairs([("USD", "EUR", 0.85), ("USD", "JPY", 110.0), ("EUR", "USD", 1.18)])
            .unwrap()
    }

    #[test]
    fn test_run_rejects_negative_amounts() {
        let table = table();
        let converter = RateConverter::new(&table, "USD");
        let precision = PrecisionConfig::default();

        let err = run(&converter, -1.0, "USD", "EUR", &precision, false, false).unwrap_err();
        assert!(err.to_string().contains("non-negative"));
        assert!(run(&converter, f64::NAN, "USD", "EUR", &precision, false, false).is_err());
        assert!(run(&converter, 1.0, " ", "EUR", &precision, false, false).is_err());
    }

    #[test]
    fn test_run_strict_fails_without_rate() {
        let table = table();
        let converter = RateConverter::new(&table, "USD");
        let precision = PrecisionConfig::default();

        assert!(run(&converter, 10.0, "jpy", "usd", &precision, true, false).is_err());
        assert!(run(&converter, 10.0, "jpy", "usd", &precision, false, false).is_ok());
        assert!(run(&converter, 10.0, "usd", "eur", &precision, true, true).is_ok());
    }

    #[test]
    fn test_format_direct_conversion() {
        console::set_colors_enabled(false);
        let table = table();
        let converter = RateConverter::new(&table, "USD");
        let conversion = converter.resolve(100.0, "USD", "EUR").rounded(2);

        let text = format_conversion(&conversion, 100.0, &PrecisionConfig::default(), "USD");
        assert!(text.contains("100.00 USD = 85.00 EUR"));
        assert!(text.contains("1 USD = 0.8500 EUR (direct rate)"));
        assert!(!text.contains("Warning"));
    }

    #[test]
    fn test_format_degraded_conversion_warns() {
        console::set_colors_enabled(false);
        let table = table();
        let converter = RateConverter::new(&table, "USD");
        let conversion = converter.resolve(5.0, "JPY", "USD").rounded(2);

        let text = format_conversion(&conversion, 5.0, &PrecisionConfig::default(), "USD");
        assert!(text.contains("5.00 JPY = 5.00 USD"));
        assert!(text.contains("rate unavailable"));
        assert!(text.contains("Warning"));
    }

    #[test]
    fn test_describe_cross_path() {
        let path = RatePath::CrossViaBase {
            to_base: Leg::Direct(1.18),
            from_base: Leg::Assumed,
        };
        assert_eq!(
            describe_path(&path, "EUR", "CHF", "USD"),
            "via USD: EUR->USD quoted, USD->CHF assumed 1"
        );
    }
}
