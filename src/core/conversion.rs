//! Converts amounts between currencies using a [`RateTable`].
//!
//! A conversion uses the direct pair when the table has one, otherwise a
//! two-hop cross rate through the base currency. When neither is possible the
//! amount comes back unchanged; the returned [`RatePath`] records which of
//! these happened so callers can tell an exact result from a degraded one.
use anyhow::{Result, bail};
use rust_decimal::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::currency::{DEFAULT_BASE_CURRENCY, RateTable};

/// Decimal places used when displaying converted amounts.
pub const AMOUNT_PRECISION: u32 = 2;
/// Decimal places used when displaying a per-unit rate.
pub const RATE_PRECISION: u32 = 4;

/// One hop of a cross rate through the base currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "rate", rename_all = "snake_case")]
pub enum Leg {
    /// Quoted in the table in the needed direction.
    Direct(f64),
    /// Derived as the reciprocal of the opposite quote.
    Inverse(f64),
    /// Nothing quoted either way; treated as 1.
    Assumed,
}

impl Leg {
    pub fn rate(&self) -> f64 {
        match self {
            Leg::Direct(rate) | Leg::Inverse(rate) => *rate,
            Leg::Assumed => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RatePath {
    Identity,
    Direct { rate: f64 },
    CrossViaBase { to_base: Leg, from_base: Leg },
    /// No usable rate; the amount was passed through unchanged.
    Unavailable,
}

impl RatePath {
    /// Effective multiplier applied to the amount.
    pub fn rate(&self) -> f64 {
        match self {
            RatePath::Identity | RatePath::Unavailable => 1.0,
            RatePath::Direct { rate } => *rate,
            RatePath::CrossViaBase { to_base, from_base } => to_base.rate() * from_base.rate(),
        }
    }

    /// False when any part of the result relied on an assumed rate.
    pub fn is_exact(&self) -> bool {
        match self {
            RatePath::Identity | RatePath::Direct { .. } => true,
            RatePath::CrossViaBase { to_base, from_base } => {
                *to_base != Leg::Assumed && *from_base != Leg::Assumed
            }
            RatePath::Unavailable => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub amount: f64,
    pub from: String,
    pub to: String,
    pub path: RatePath,
}

impl Conversion {
    pub fn is_exact(&self) -> bool {
        self.path.is_exact()
    }

    pub fn rounded(mut self, precision: u32) -> Self {
        self.amount = round_to(self.amount, precision);
        self
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RateConverter<'a> {
    table: &'a RateTable,
    base_currency: &'a str,
}

impl<'a> RateConverter<'a> {
    pub fn new(table: &'a RateTable, base_currency: &'a str) -> Self {
        Self {
            table,
            base_currency,
        }
    }

    pub fn base_currency(&self) -> &str {
        self.base_currency
    }

    /// Converts `amount` and reports how the rate was obtained. Not rounded.
    pub fn resolve(&self, amount: f64, from: &str, to: &str) -> Conversion {
        let path = self.rate_path(from, to);
        debug!(from, to, ?path, "Resolved rate path");
        Conversion {
            amount: amount * path.rate(),
            from: from.to_string(),
            to: to.to_string(),
            path,
        }
    }

    /// Converts `amount`, rounded to `precision` decimal places.
    ///
    /// Missing rates never fail: the amount is returned unchanged. Use
    /// [`RateConverter::try_convert`] to reject such results.
    pub fn convert(&self, amount: f64, from: &str, to: &str, precision: u32) -> f64 {
        round_to(self.resolve(amount, from, to).amount, precision)
    }

    pub fn try_convert(
        &self,
        amount: f64,
        from: &str,
        to: &str,
        precision: u32,
    ) -> Result<Conversion> {
        let conversion = self.resolve(amount, from, to);
        if !conversion.is_exact() {
            bail!(
                "No exchange rate known for {} to {} (base currency {})",
                from,
                to,
                self.base_currency
            );
        }
        Ok(conversion.rounded(precision))
    }

    /// Value of one unit of `from` in `to`, at rate display precision.
    pub fn unit_rate(&self, from: &str, to: &str) -> f64 {
        self.convert(1.0, from, to, RATE_PRECISION)
    }

    fn rate_path(&self, from: &str, to: &str) -> RatePath {
        if from == to {
            return RatePath::Identity;
        }
        if let Some(rate) = self.table.get(from, to) {
            return RatePath::Direct { rate };
        }
        let base = self.base_currency;
        if from != base && to != base {
            return RatePath::CrossViaBase {
                to_base: self.leg(from, base),
                from_base: self.leg(base, to),
            };
        }
        RatePath::Unavailable
    }

    fn leg(&self, from: &str, to: &str) -> Leg {
        if let Some(rate) = self.table.get(from, to) {
            Leg::Direct(rate)
        } else if let Some(rate) = self.table.get(to, from) {
            Leg::Inverse(1.0 / rate)
        } else {
            Leg::Assumed
        }
    }
}

/// Converts with the default base currency. See [`RateConverter::convert`].
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable, precision: u32) -> f64 {
    RateConverter::new(table, DEFAULT_BASE_CURRENCY).convert(amount, from, to, precision)
}

/// Rounds half away from zero. Values that can't be represented as a
/// decimal (NaN, infinities, huge magnitudes) are returned as is.
pub fn round_to(value: f64, precision: u32) -> f64 {
    Decimal::from_f64(value)
        .map(|d| d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(value)
}
