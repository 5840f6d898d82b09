//! Economic registry - inflation series and exchange rates per currency
//!
//! Rate tables may have gaps. A missing year is always reported with the
//! currency and year named; it never defaults to zero.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use eunits_core::{closest_matches, EnergyError, EnergyResult, Value};
use eunits_units::parse_unit_expr;

use crate::data::{EconomicTable, Series, BASE_CURRENCY, BUILTIN};

const SUGGESTIONS: usize = 3;

/// First and last year present in each series of a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearCoverage {
    pub inflation: Option<(i32, i32)>,
    pub exchange: Option<(i32, i32)>,
}

#[derive(Debug, Clone)]
pub struct EconomicRegistry {
    base_currency: String,
    inflation: BTreeMap<String, Series>,
    exchange: BTreeMap<String, Series>,
}

impl Default for EconomicRegistry {
    fn default() -> Self {
        EconomicRegistry {
            base_currency: BASE_CURRENCY.to_string(),
            inflation: BTreeMap::new(),
            exchange: BTreeMap::new(),
        }
    }
}

fn span(series: &Series) -> Option<(i32, i32)> {
    Some((*series.keys().next()?, *series.keys().next_back()?))
}

impl EconomicRegistry {
    /// Empty registry with USD as base currency
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default tables
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.merge(BUILTIN.clone());
        registry
    }

    pub fn from_table(table: EconomicTable) -> EnergyResult<Self> {
        let mut registry = Self::new();
        registry.extend(table)?;
        Ok(registry)
    }

    // ========== Overlay / edits ==========

    /// Overlay a fragment, last write wins per (currency, year).
    ///
    /// The base currency can only change while no exchange rates are
    /// loaded, since stored rates are quoted against the old base.
    pub fn extend(&mut self, table: EconomicTable) -> EnergyResult<()> {
        if let Some(base) = &table.base_currency {
            if *base != self.base_currency && !self.exchange.is_empty() {
                return Err(EnergyError::InvalidData(format!(
                    "cannot change base currency from {} to {}: exchange rates are already quoted against {}",
                    self.base_currency, base, self.base_currency
                )));
            }
        }
        for (currency, series) in &table.inflation {
            for (year, rate) in series {
                check_inflation(currency, *year, *rate)?;
            }
        }
        for (currency, series) in &table.exchange_rates {
            for (year, rate) in series {
                check_exchange(currency, *year, *rate)?;
            }
        }
        self.merge(table);
        Ok(())
    }

    fn merge(&mut self, table: EconomicTable) {
        let counts = (table.inflation.len(), table.exchange_rates.len());
        if let Some(base) = table.base_currency {
            self.base_currency = base;
        }
        for (currency, series) in table.inflation {
            self.inflation.entry(currency).or_default().extend(series);
        }
        for (currency, series) in table.exchange_rates {
            self.exchange.entry(currency).or_default().extend(series);
        }
        debug!(
            inflation_currencies = counts.0,
            exchange_currencies = counts.1,
            base = %self.base_currency,
            "economic table merged"
        );
    }

    pub fn set_inflation_rate(&mut self, currency: &str, year: i32, percent: f64) -> EnergyResult<()> {
        check_inflation(currency, year, percent)?;
        self.inflation
            .entry(currency.to_string())
            .or_default()
            .insert(year, percent);
        Ok(())
    }

    pub fn set_exchange_rate(&mut self, currency: &str, year: i32, rate: f64) -> EnergyResult<()> {
        check_exchange(currency, year, rate)?;
        self.exchange
            .entry(currency.to_string())
            .or_default()
            .insert(year, rate);
        Ok(())
    }

    // ========== Inflation ==========

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    fn unknown(&self, currency: &str) -> EnergyError {
        let known = self.supported_currencies();
        EnergyError::UnknownCurrency {
            currency: currency.to_string(),
            suggestions: closest_matches(currency, known, SUGGESTIONS),
        }
    }

    /// Cumulative price-level factor from `from_year` to `to_year`.
    ///
    /// Compounds `1 + rate/100` over `[min, max)`; the reciprocal when
    /// going back in time.
    pub fn inflation_factor(&self, currency: &str, from_year: i32, to_year: i32) -> EnergyResult<f64> {
        let series = self
            .inflation
            .get(currency)
            .ok_or_else(|| self.unknown(currency))?;

        let (lo, hi) = (from_year.min(to_year), from_year.max(to_year));
        let mut factor = 1.0;
        for year in lo..hi {
            let rate = series.get(&year).ok_or_else(|| EnergyError::MissingRateData {
                series: "inflation",
                currency: currency.to_string(),
                year,
                available: span(series),
            })?;
            factor *= 1.0 + rate / 100.0;
        }

        Ok(if to_year < from_year { 1.0 / factor } else { factor })
    }

    // ========== Exchange rates ==========

    /// Units of `currency` per 1 base currency in `year`, exact year only
    pub fn exchange_rate(&self, currency: &str, year: i32) -> EnergyResult<f64> {
        if currency == self.base_currency {
            return Ok(1.0);
        }
        let series = self
            .exchange
            .get(currency)
            .ok_or_else(|| self.unknown(currency))?;
        series
            .get(&year)
            .copied()
            .ok_or_else(|| EnergyError::MissingRateData {
                series: "exchange rate",
                currency: currency.to_string(),
                year,
                available: span(series),
            })
    }

    /// Multiplier turning an amount in `from` into `to`.
    ///
    /// Without a year, the latest year both currencies have a rate for.
    pub fn conversion_factor(&self, from: &str, to: &str, year: Option<i32>) -> EnergyResult<f64> {
        if from == to {
            return Ok(1.0);
        }
        let year = match year {
            Some(y) => y,
            None => self.latest_common_year(from, to)?,
        };
        Ok(self.exchange_rate(to, year)? / self.exchange_rate(from, year)?)
    }

    /// `value / rate(from) × rate(to)` with the rates of `year`
    pub fn convert(&self, value: &Value, from: &str, to: &str, year: i32) -> EnergyResult<Value> {
        Ok(value.scale(self.conversion_factor(from, to, Some(year))?))
    }

    /// Most recent year with an exchange rate for both currencies
    pub fn latest_common_year(&self, a: &str, b: &str) -> EnergyResult<i32> {
        let years = |c: &str| -> EnergyResult<Option<BTreeSet<i32>>> {
            if c == self.base_currency {
                return Ok(None);
            }
            let series = self.exchange.get(c).ok_or_else(|| self.unknown(c))?;
            Ok(Some(series.keys().copied().collect()))
        };

        let latest = match (years(a)?, years(b)?) {
            (Some(x), Some(y)) => x.intersection(&y).max().copied(),
            (Some(x), None) | (None, Some(x)) => x.last().copied(),
            (None, None) => None,
        };
        latest.ok_or_else(|| {
            EnergyError::UnsupportedConversion(format!(
                "no year with exchange rates for both {} and {}",
                a, b
            ))
        })
    }

    // ========== Composite ==========

    /// Inflate within `from` currency to `to_year`, then convert at `to_year` rates.
    ///
    /// This order is the convention for combined adjustments. Converting
    /// first and inflating in the target currency gives a different number.
    pub fn inflate_then_convert(
        &self,
        value: &Value,
        from: &str,
        from_year: i32,
        to: &str,
        to_year: i32,
    ) -> EnergyResult<Value> {
        Ok(value.scale(self.inflate_then_convert_factor(from, from_year, to, to_year)?))
    }

    /// Multiplier of [`inflate_then_convert`](Self::inflate_then_convert)
    pub fn inflate_then_convert_factor(
        &self,
        from: &str,
        from_year: i32,
        to: &str,
        to_year: i32,
    ) -> EnergyResult<f64> {
        let inflation = self.inflation_factor(from, from_year, to_year)?;
        let exchange = self.conversion_factor(from, to, Some(to_year))?;
        info!(
            from,
            from_year,
            to,
            to_year,
            "inflating in source currency, then converting at target-year rate"
        );
        Ok(inflation * exchange)
    }

    // ========== Discovery ==========

    pub fn available_years(&self, currency: &str) -> EnergyResult<YearCoverage> {
        let inflation = self.inflation.get(currency);
        let exchange = self.exchange.get(currency);
        if inflation.is_none() && exchange.is_none() && currency != self.base_currency {
            return Err(self.unknown(currency));
        }
        Ok(YearCoverage {
            inflation: inflation.and_then(span),
            exchange: exchange.and_then(span),
        })
    }

    /// Every currency with any data, plus the base, sorted
    pub fn supported_currencies(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .inflation
            .keys()
            .chain(self.exchange.keys())
            .map(String::as_str)
            .chain(std::iter::once(self.base_currency.as_str()))
            .collect();
        set.into_iter().collect()
    }

    /// Currency code appearing in a unit expression ("EUR/MWh" → EUR)
    pub fn detect_currency(&self, unit: &str) -> Option<String> {
        let supported = self.supported_currencies();
        if let Ok(expr) = parse_unit_expr(unit) {
            let found = expr
                .numerator
                .iter()
                .chain(expr.denominator.iter())
                .find(|s| supported.contains(&s.as_str()));
            if let Some(code) = found {
                return Some(code.clone());
            }
        }
        if unit.contains('$') && supported.contains(&"USD") {
            return Some("USD".to_string());
        }
        None
    }
}

fn check_inflation(currency: &str, year: i32, rate: f64) -> EnergyResult<()> {
    if !rate.is_finite() || rate <= -100.0 {
        return Err(EnergyError::InvalidData(format!(
            "inflation rate {} for {} in {} is not usable",
            rate, currency, year
        )));
    }
    Ok(())
}

fn check_exchange(currency: &str, year: i32, rate: f64) -> EnergyResult<()> {
    if !rate.is_finite() || rate <= 0.0 {
        return Err(EnergyError::InvalidData(format!(
            "exchange rate {} for {} in {} must be positive",
            rate, currency, year
        )));
    }
    Ok(())
}
