pub mod cli;
pub mod core;

use crate::core::config::AppConfig;
use crate::core::{RateConverter, TableRateProvider};
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Convert {
        amount: f64,
        from: String,
        to: String,
        strict: bool,
        json: bool,
    },
    Rates {
        currencies: Vec<String>,
    },
    Search {
        query: String,
        category: String,
        json: bool,
    },
    Browse {
        category: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Cards2Cash starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let rate_table = Arc::new(config.rate_table());

    match command {
        AppCommand::Convert {
            amount,
            from,
            to,
            strict,
            json,
        } => {
            let converter = RateConverter::new(&rate_table, &config.base_currency);
            cli::convert::run(
                &converter,
                amount,
                &from,
                &to,
                &config.precision,
                strict,
                json,
            )
        }
        AppCommand::Rates { currencies } => {
            let currencies: Vec<String> = if currencies.is_empty() {
                rate_table
                    .currencies()
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            } else {
                currencies.iter().map(|c| c.trim().to_uppercase()).collect()
            };
            let provider = TableRateProvider::new(Arc::clone(&rate_table), &config.base_currency);
            cli::rates::run(&provider, &currencies, config.precision.rate).await
        }
        AppCommand::Search {
            query,
            category,
            json,
        } => {
            let catalog = config.catalog()?;
            cli::search::run(&catalog, &query, &cli::search::parse_category(&category), json)
        }
        AppCommand::Browse { category } => {
            let catalog = config.catalog()?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            cli::search::browse(
                stdin,
                &catalog,
                &cli::search::parse_category(&category),
                &config.search,
            )
            .await?;
            Ok(())
        }
    }
}
