//! Built-in rate tables
//!
//! Inflation: annual CPI change in percent, actuals through 2023 and
//! projections to 2030. Exchange rates: annual average units of currency
//! per 1 USD.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Year → value series
pub type Series = BTreeMap<i32, f64>;

/// Economic table fragment: the default tables or a caller overlay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicTable {
    /// Currency → year → inflation rate (%)
    pub inflation: BTreeMap<String, Series>,
    /// Currency → year → units of currency per 1 base currency
    pub exchange_rates: BTreeMap<String, Series>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_currency: Option<String>,
}

impl EconomicTable {
    pub fn is_empty(&self) -> bool {
        self.inflation.is_empty() && self.exchange_rates.is_empty() && self.base_currency.is_none()
    }
}

pub const BASE_CURRENCY: &str = "USD";

const FIRST_INFLATION_YEAR: i32 = 2010;
const FIRST_EXCHANGE_YEAR: i32 = 2010;

#[rustfmt::skip]
const INFLATION: [(&str, [f64; 21]); 5] = [
    //        2010   2011  2012  2013  2014  2015  2016  2017  2018  2019  2020  2021  2022  2023  2024  2025  2026  2027  2028  2029  2030
    ("USD", [1.50, 3.10, 2.07, 1.46, 0.12, 0.12, 1.26, 2.13, 2.44, 1.81, 1.23, 4.70, 8.00, 4.12, 3.15, 2.50, 2.30, 2.20, 2.10, 2.00, 2.00]),
    ("EUR", [1.60, 2.70, 2.50, 1.40, 0.40, 0.00, 0.20, 1.50, 1.80, 1.20, 0.30, 2.60, 8.40, 5.40, 2.80, 2.20, 2.10, 2.00, 2.00, 2.00, 2.00]),
    ("GBP", [3.30, 4.50, 2.80, 2.60, 1.50, 0.00, 0.70, 2.70, 2.50, 1.80, 0.90, 2.60, 9.10, 7.30, 2.50, 2.40, 2.10, 2.00, 2.00, 2.00, 2.00]),
    ("JPY", [-0.70, -0.30, 0.00, 0.40, 2.80, 0.80, -0.10, 0.50, 1.00, 0.50, 0.00, -0.20, 2.50, 3.30, 2.70, 2.00, 1.80, 1.50, 1.50, 1.50, 1.50]),
    ("CNY", [3.30, 5.40, 2.60, 2.60, 2.00, 1.40, 2.00, 1.60, 2.10, 2.90, 2.50, 0.90, 2.00, 0.20, 0.20, 1.00, 1.50, 2.00, 2.00, 2.00, 2.00]),
];

#[rustfmt::skip]
const EXCHANGE_RATES: [(&str, [f64; 16]); 4] = [
    //        2010    2011    2012    2013    2014    2015    2016    2017    2018    2019    2020    2021    2022    2023    2024    2025
    ("EUR", [0.7543, 0.7184, 0.7783, 0.7530, 0.7527, 0.9013, 0.9034, 0.8852, 0.8467, 0.8933, 0.8755, 0.8455, 0.9497, 0.9248, 0.9239, 0.9259]),
    ("GBP", [0.6469, 0.6236, 0.6330, 0.6397, 0.6074, 0.6544, 0.7407, 0.7765, 0.7500, 0.7836, 0.7800, 0.7271, 0.8116, 0.8043, 0.7826, 0.7692]),
    ("JPY", [87.78, 79.81, 79.79, 97.60, 105.94, 121.04, 108.79, 112.17, 110.42, 109.01, 106.77, 109.75, 131.50, 140.49, 151.48, 150.00]),
    ("CNY", [6.770, 6.461, 6.312, 6.196, 6.161, 6.284, 6.644, 6.759, 6.616, 6.908, 6.900, 6.449, 6.737, 7.084, 7.189, 7.200]),
];

/// The default economic tables
pub static BUILTIN: LazyLock<EconomicTable> = LazyLock::new(|| EconomicTable {
    inflation: series_table(&INFLATION, FIRST_INFLATION_YEAR),
    exchange_rates: series_table(&EXCHANGE_RATES, FIRST_EXCHANGE_YEAR),
    base_currency: Some(BASE_CURRENCY.to_string()),
});

fn series_table<const N: usize>(rows: &[(&str, [f64; N])], first_year: i32) -> BTreeMap<String, Series> {
    rows.iter()
        .map(|(currency, values)| {
            let series = values
                .iter()
                .enumerate()
                .map(|(i, v)| (first_year + i as i32, *v))
                .collect();
            (currency.to_string(), series)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_coverage() {
        let usd = &BUILTIN.inflation["USD"];
        assert_eq!(usd.keys().next(), Some(&2010));
        assert_eq!(usd.keys().last(), Some(&2030));
        assert_eq!(usd[&2022], 8.00);
        assert_eq!(BUILTIN.exchange_rates["EUR"][&2015], 0.9013);
        assert!(!BUILTIN.exchange_rates.contains_key("USD"));
    }

    #[test]
    fn test_table_json_shape() {
        let t: EconomicTable = serde_json::from_str(
            r#"{"inflation": {"EUR": {"2015": 20.0}}, "exchange_rates": {"EUR": {"2016": 0.8}}}"#,
        )
        .unwrap();
        assert_eq!(t.inflation["EUR"][&2015], 20.0);
        assert_eq!(t.exchange_rates["EUR"][&2016], 0.8);
        assert!(t.base_currency.is_none());
    }
}
