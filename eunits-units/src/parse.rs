//! Unit expression parsing - split strings like "USD/kW/a" into atoms
//!
//! Supported formats:
//! - Simple: "MWh", "kg", "USD"
//! - Quotients: "USD/MWh", "kg/m3", "USD/kW/a"
//! - Products: "MW·h", "MW*h", "USD·h/MWh"
//! - Reciprocals: "1/h"
//! - Dimensionless: "" or "1"

use eunits_core::{EnergyError, EnergyResult};

use crate::unit::Atom;

/// Symbols of a unit expression, before lookup
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnitExpr {
    pub numerator: Vec<String>,
    pub denominator: Vec<String>,
}

impl UnitExpr {
    pub fn is_dimensionless(&self) -> bool {
        self.numerator.is_empty() && self.denominator.is_empty()
    }
}

/// Parse a unit string into numerator and denominator symbols
pub fn parse_unit_expr(s: &str) -> EnergyResult<UnitExpr> {
    let s = s.trim();
    let mut expr = UnitExpr::default();

    if s.is_empty() || s == "1" {
        return Ok(expr);
    }

    for (i, segment) in s.split('/').enumerate() {
        let segment = segment.trim();
        if segment.is_empty() {
            return Err(EnergyError::Parse(format!("empty unit segment in '{}'", s)));
        }
        if i == 0 && segment == "1" {
            continue;
        }
        for factor in split_product(segment) {
            if factor.is_empty() {
                return Err(EnergyError::Parse(format!("empty unit factor in '{}'", s)));
            }
            if factor.chars().any(char::is_whitespace) {
                return Err(EnergyError::Parse(format!("unexpected space in unit '{}'", s)));
            }
            if i == 0 {
                expr.numerator.push(factor.to_string());
            } else {
                expr.denominator.push(factor.to_string());
            }
        }
    }

    Ok(expr)
}

fn split_product(segment: &str) -> impl Iterator<Item = &str> {
    segment.split(|c| c == '*' || c == '·').map(str::trim)
}

/// Canonical string for a list of atoms: "num·num/den/den"
pub fn render(atoms: &[Atom]) -> String {
    let num: Vec<&str> = atoms
        .iter()
        .filter(|a| a.exponent > 0)
        .map(|a| a.symbol.as_str())
        .collect();
    let den: Vec<&str> = atoms
        .iter()
        .filter(|a| a.exponent < 0)
        .map(|a| a.symbol.as_str())
        .collect();

    let mut out = if num.is_empty() {
        if den.is_empty() {
            return String::new();
        }
        "1".to_string()
    } else {
        num.join("·")
    };
    for d in den {
        out.push('/');
        out.push_str(d);
    }
    out
}
