//! Currency rate tables and the rate provider abstraction

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

use super::conversion::{RateConverter, RatePath};

pub const DEFAULT_BASE_CURRENCY: &str = "USD";

type RateMap = BTreeMap<String, BTreeMap<String, f64>>;

/// Directed multipliers between currency pairs.
///
/// Only the pairs present are valid direct conversions; the table is neither
/// symmetric nor transitive. Every multiplier is finite and strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RateMap", into = "RateMap")]
pub struct RateTable {
    rates: RateMap,
}

impl RateTable {
    pub fn from_map(rates: RateMap) -> Result<Self> {
        for (from, targets) in &rates {
            if from.is_empty() {
                bail!("Currency code must not be empty");
            }
            for (to, rate) in targets {
                if to.is_empty() {
                    bail!("Currency code must not be empty (source {from})");
                }
                if !rate.is_finite() || *rate <= 0.0 {
                    bail!("Invalid rate {rate} for {from} -> {to}: must be positive");
                }
            }
        }
        debug!("Built rate table with {} source currencies", rates.len());
        Ok(Self { rates })
    }

    /// Builds a table from `(from, to, rate)` triples.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        Self::from_map(collect_pairs(pairs))
    }

    /// Demo rates quoted against USD, with a few reverse quotes.
    pub fn builtin() -> Self {
        let pairs = [
            ("USD", "EUR", 0.85),
            ("USD", "GBP", 0.73),
            ("USD", "NGN", 1550.0),
            ("USD", "GHS", 12.5),
            ("USD", "KES", 129.0),
            ("USD", "JPY", 110.0),
            ("USD", "CAD", 1.25),
            ("USD", "BTC", 0.000023),
            ("USD", "ETH", 0.00031),
            ("EUR", "USD", 1.18),
            ("EUR", "GBP", 0.86),
            ("GBP", "USD", 1.37),
            ("NGN", "USD", 0.00065),
        ];
        Self {
            rates: collect_pairs(pairs),
        }
    }

    pub fn get(&self, from: &str, to: &str) -> Option<f64> {
        self.rates.get(from).and_then(|targets| targets.get(to)).copied()
    }

    /// Every currency code appearing on either side of a pair.
    pub fn currencies(&self) -> BTreeSet<&str> {
        self.rates
            .iter()
            .flat_map(|(from, targets)| {
                std::iter::once(from.as_str()).chain(targets.keys().map(String::as_str))
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.values().all(BTreeMap::is_empty)
    }
}

fn collect_pairs<'a, I>(pairs: I) -> RateMap
where
    I: IntoIterator<Item = (&'a str, &'a str, f64)>,
{
    let mut rates = RateMap::new();
    for (from, to, rate) in pairs {
        rates
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string(), rate);
    }
    rates
}

impl Default for RateTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TryFrom<RateMap> for RateTable {
    type Error = anyhow::Error;

    fn try_from(rates: RateMap) -> Result<Self> {
        Self::from_map(rates)
    }
}

impl From<RateTable> for RateMap {
    fn from(table: RateTable) -> Self {
        table.rates
    }
}

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Serves rates out of a static [`RateTable`].
///
/// Unlike [`RateConverter::convert`], a missing rate is reported as an error
/// rather than assumed to be 1.
#[derive(Debug, Clone)]
pub struct TableRateProvider {
    table: Arc<RateTable>,
    base_currency: String,
}

impl TableRateProvider {
    pub fn new(table: Arc<RateTable>, base_currency: &str) -> Self {
        Self {
            table,
            base_currency: base_currency.to_string(),
        }
    }
}

#[async_trait]
impl CurrencyRateProvider for TableRateProvider {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let converter = RateConverter::new(&self.table, &self.base_currency);
        let conversion = converter.resolve(1.0, from, to);
        match conversion.path {
            RatePath::Unavailable => Err(anyhow!("Rate not found for {} to {}", from, to)),
            path if !path.is_exact() => Err(anyhow!(
                "Rate not found for {} to {} via {}",
                from,
                to,
                self.base_currency
            )),
            _ => Ok(conversion.amount),
        }
    }
}
