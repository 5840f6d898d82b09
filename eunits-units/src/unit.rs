//! Unit definitions and resolved unit handles

use serde::{Deserialize, Serialize};

use crate::Dimension;

/// A registered unit: `1 symbol = factor × base unit of dimension`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDef {
    pub symbol: String,
    pub dimension: Dimension,
    #[serde(alias = "factor_to_base_unit")]
    pub factor: f64,
}

impl UnitDef {
    pub fn new(symbol: &str, dimension: Dimension, factor: f64) -> Self {
        UnitDef {
            symbol: symbol.to_string(),
            dimension,
            factor,
        }
    }
}

/// One registered unit inside a unit expression, with exponent +1 or -1
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    pub symbol: String,
    pub dimension: Dimension,
    pub factor: f64,
    pub exponent: i32,
}

impl Atom {
    pub fn inverted(&self) -> Atom {
        Atom {
            exponent: -self.exponent,
            ..self.clone()
        }
    }

    /// Whether this atom and `other` cancel as numerator/denominator.
    ///
    /// Currencies only cancel against the same currency: there is no unit
    /// factor between USD and EUR.
    pub fn cancels(&self, other: &Atom) -> bool {
        if self.exponent.signum() == other.exponent.signum() || self.dimension != other.dimension {
            return false;
        }
        self.dimension != Dimension::CURRENCY || self.symbol == other.symbol
    }
}

/// A unit expression resolved against a registry.
///
/// Simple units have one atom; compound units such as `USD/MWh` have one
/// atom per registered symbol. Dimensionless has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    /// Canonical rendering of the expression
    pub symbol: String,
    pub dimension: Dimension,
    /// Multiplier to the product of the atoms' base units
    pub factor: f64,
    pub atoms: Vec<Atom>,
}

impl Unit {
    pub fn dimensionless() -> Self {
        Unit {
            symbol: String::new(),
            dimension: Dimension::DIMENSIONLESS,
            factor: 1.0,
            atoms: Vec::new(),
        }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimension.is_dimensionless()
    }

    pub fn is_compound(&self) -> bool {
        self.atoms.len() > 1 || self.atoms.iter().any(|a| a.exponent < 0)
    }

    /// Currency atoms of the expression
    pub fn currencies(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.iter().filter(|a| a.dimension == Dimension::CURRENCY)
    }

    /// Net exponent of `dimension` across the atoms
    pub fn exponent_of(&self, dimension: &Dimension) -> i32 {
        self.atoms
            .iter()
            .filter(|a| a.dimension == *dimension)
            .map(|a| a.exponent)
            .sum()
    }

    /// Net count of heating-value-bearing atoms (ENERGY and POWER).
    ///
    /// Rebasing HHV/LHV scales a value by `ratio^k` with this `k`: an energy
    /// amount has k = 1, a price per MWh has k = -1.
    pub fn energy_exponent(&self) -> i32 {
        self.exponent_of(&Dimension::ENERGY) + self.exponent_of(&Dimension::POWER)
    }

    /// Currency symbols appearing with a non-zero net exponent
    pub fn currency_symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = Vec::new();
        for atom in self.currencies() {
            if !symbols.contains(&atom.symbol.as_str()) {
                symbols.push(&atom.symbol);
            }
        }
        symbols.retain(|s| {
            self.currencies()
                .filter(|a| a.symbol == *s)
                .map(|a| a.exponent)
                .sum::<i32>()
                != 0
        });
        symbols
    }

    /// Same expression with every currency atom replaced by `currency`
    pub fn with_currency(&self, currency: &str) -> String {
        let atoms: Vec<Atom> = self
            .atoms
            .iter()
            .map(|a| {
                if a.dimension == Dimension::CURRENCY {
                    Atom {
                        symbol: currency.to_string(),
                        ..a.clone()
                    }
                } else {
                    a.clone()
                }
            })
            .collect();
        crate::parse::render(&atoms)
    }
}
