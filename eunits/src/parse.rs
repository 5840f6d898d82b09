//! Quantity literals
//!
//! ```text
//! 50 EUR/MWh
//! 1000 kg coal
//! 30 USD/MWh natural_gas HHV @2020
//! [1, 2, 3] MWh
//! ```
//!
//! The number (or bracketed array) comes first, then the unit. After that,
//! in any order: a basis (`HHV`/`LHV`), a reference year (`@2020`) and a
//! substance id, optionally preceded by `of`.

use eunits_core::{Basis, EnergyError, EnergyResult, Value};

use crate::{Quantity, Registry};

impl<'r> Quantity<'r> {
    pub fn parse(input: &str, registry: &'r Registry) -> EnergyResult<Self> {
        let input = input.trim();
        let (value, rest) = parse_value(input)?;

        let mut tokens = rest.split_whitespace().peekable();
        let unit = match tokens.peek() {
            Some(t) if !t.starts_with('@') => tokens.next().unwrap_or_default(),
            _ => "",
        };
        let mut quantity = Quantity::new(value, unit, registry)?;

        for token in tokens {
            if let Some(year) = token.strip_prefix('@') {
                let year = year
                    .parse::<i32>()
                    .map_err(|_| EnergyError::Parse(format!("invalid reference year '{}'", token)))?;
                quantity.reference_year = Some(year);
            } else if let Ok(basis) = token.parse::<Basis>() {
                quantity.basis = Some(basis);
            } else if token == "of" {
                continue;
            } else if let Some(existing) = &quantity.substance {
                return Err(EnergyError::Parse(format!(
                    "two substances in '{}': {} and {}",
                    input, existing, token
                )));
            } else {
                quantity = quantity.with_substance(token)?;
            }
        }
        Ok(quantity)
    }
}

fn parse_value(input: &str) -> EnergyResult<(Value, &str)> {
    if let Some(body) = input.strip_prefix('[') {
        let end = body
            .find(']')
            .ok_or_else(|| EnergyError::Parse(format!("unclosed '[' in '{}'", input)))?;
        let values = body[..end]
            .split(',')
            .map(|s| number(s.trim(), input))
            .collect::<EnergyResult<Vec<f64>>>()?;
        return Ok((Value::Array(values), &body[end + 1..]));
    }

    let end = input.find(char::is_whitespace).unwrap_or(input.len());
    let value = number(&input[..end], input)?;
    Ok((Value::Scalar(value), &input[end..]))
}

fn number(s: &str, input: &str) -> EnergyResult<f64> {
    s.replace('_', "")
        .parse::<f64>()
        .map_err(|_| EnergyError::Parse(format!("invalid number '{}' in '{}'", s, input)))
}
