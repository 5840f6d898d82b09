//! Quantity type - a value with unit, substance, basis and price year

use std::fmt;
use std::sync::Arc;

use eunits_core::{approx_eq, Basis, EnergyError, EnergyResult, Value};
use eunits_units::{symbols, Dimension, Unit};
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::{MetadataWarning, Registry};

/// Relative tolerance of `==` between quantities
const EQ_TOLERANCE: f64 = 1e-9;

/// An immutable amount: numeric payload, unit and optional metadata.
///
/// Built through a [`Registry`], which resolves the unit expression once.
/// Every operation returns a new `Quantity` tied to the same registry; the
/// dimension is read from the resolved unit, never stored separately.
#[derive(Clone)]
pub struct Quantity<'r> {
    pub(crate) registry: &'r Registry,
    pub(crate) value: Value,
    pub(crate) unit: Arc<Unit>,
    pub(crate) substance: Option<String>,
    pub(crate) basis: Option<Basis>,
    pub(crate) reference_year: Option<i32>,
    pub(crate) warnings: Vec<MetadataWarning>,
}

impl<'r> Quantity<'r> {
    /// Create a quantity; fails on an unknown unit
    pub fn new(value: impl Into<Value>, unit: &str, registry: &'r Registry) -> EnergyResult<Self> {
        let unit = registry.units().resolve(unit)?;
        Ok(Quantity {
            registry,
            value: value.into(),
            unit,
            substance: None,
            basis: None,
            reference_year: None,
            warnings: Vec::new(),
        })
    }

    /// Tag with a registered substance
    pub fn with_substance(mut self, substance: &str) -> EnergyResult<Self> {
        self.registry.substances().properties(substance)?;
        self.substance = Some(substance.to_string());
        Ok(self)
    }

    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = Some(basis);
        self
    }

    /// Year whose price level a currency amount is expressed in
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value when it is a single number
    pub fn scalar(&self) -> Option<f64> {
        self.value.as_scalar()
    }

    /// Canonical unit symbol
    pub fn unit(&self) -> &str {
        &self.unit.symbol
    }

    pub fn resolved_unit(&self) -> &Unit {
        &self.unit
    }

    pub fn dimension(&self) -> &Dimension {
        &self.unit.dimension
    }

    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_dimensionless()
    }

    pub fn substance(&self) -> Option<&str> {
        self.substance.as_deref()
    }

    pub fn basis(&self) -> Option<Basis> {
        self.basis
    }

    pub fn reference_year(&self) -> Option<i32> {
        self.reference_year
    }

    /// First currency of the unit expression (`EUR/MWh` → `EUR`)
    pub fn currency(&self) -> Option<&str> {
        self.unit.currency_symbols().first().copied()
    }

    /// Metadata dropped on the way to this quantity, oldest first.
    ///
    /// Arithmetic appends its own conflicts to those of both operands;
    /// conversions pass them through unchanged.
    pub fn warnings(&self) -> &[MetadataWarning] {
        &self.warnings
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Same quantity with another payload, unit and metadata unchanged
    pub(crate) fn with_value(&self, value: Value) -> Self {
        Quantity {
            value,
            ..self.clone()
        }
    }

    // ========== Power / energy ==========

    /// Energy delivered by this power over `hours` (MW → MWh)
    pub fn for_duration(&self, hours: f64) -> EnergyResult<Quantity<'r>> {
        self.expect_dimension(&Dimension::POWER, "integrate over time")?;
        let duration = Quantity::new(hours, symbols::H, self.registry)?;
        self.mul(&duration)
    }

    /// Mean power of this energy spread over `hours` (MWh → MW)
    pub fn average_power(&self, hours: f64) -> EnergyResult<Quantity<'r>> {
        self.expect_dimension(&Dimension::ENERGY, "average over time")?;
        let duration = Quantity::new(hours, symbols::H, self.registry)?;
        self.div(&duration)
    }

    fn expect_dimension(&self, dimension: &Dimension, operation: &'static str) -> EnergyResult<()> {
        if self.unit.dimension == *dimension {
            Ok(())
        } else {
            Err(EnergyError::incompatible(
                operation,
                &self.unit.symbol,
                &self.unit.dimension,
                symbols::H,
                Dimension::TIME,
            ))
        }
    }
}

impl fmt::Display for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if !self.unit.symbol.is_empty() {
            write!(f, " {}", self.unit.symbol)?;
        }
        if let Some(substance) = &self.substance {
            write!(f, " of {}", substance)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Quantity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({}, '{}'", self.value, self.unit.symbol)?;
        if let Some(substance) = &self.substance {
            write!(f, ", '{}'", substance)?;
        }
        if let Some(basis) = self.basis {
            write!(f, ", basis='{}'", basis)?;
        }
        if let Some(year) = self.reference_year {
            write!(f, ", reference_year={}", year)?;
        }
        write!(f, ")")
    }
}

/// Equal amounts: same dimension and currency, values within a relative
/// 1e-9 after converting to the left unit. Metadata is not compared.
impl PartialEq for Quantity<'_> {
    fn eq(&self, other: &Self) -> bool {
        if self.unit.dimension != other.unit.dimension {
            return false;
        }
        match self
            .registry
            .units()
            .conversion_factor(&other.unit.symbol, &self.unit.symbol)
        {
            Ok(factor) => self
                .value
                .all_pairs(&other.value, |a, b| approx_eq(a, b * factor, EQ_TOLERANCE))
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

impl Serialize for Quantity<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Quantity", 6)?;
        s.serialize_field("value", &self.value)?;
        s.serialize_field("unit", &self.unit.symbol)?;
        s.serialize_field("dimension", &self.unit.dimension)?;
        s.serialize_field("substance", &self.substance)?;
        s.serialize_field("basis", &self.basis)?;
        s.serialize_field("reference_year", &self.reference_year)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eunits_core::codes;

    #[test]
    fn test_new_resolves_unit() {
        let r = Registry::builtin();
        let q = Quantity::new(5.0, "tonne", &r).unwrap();
        assert_eq!(q.unit(), "t");
        assert_eq!(q.dimension(), &Dimension::MASS);
        assert_eq!(q.scalar(), Some(5.0));
    }

    #[test]
    fn test_unknown_unit_suggests() {
        let r = Registry::builtin();
        match Quantity::new(1.0, "MWH", &r).unwrap_err() {
            EnergyError::UnknownUnit { suggestions, .. } => {
                assert!(suggestions.contains(&"MWh".to_string()))
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_substance_rejected() {
        let r = Registry::builtin();
        let err = Quantity::new(1.0, "kg", &r)
            .unwrap()
            .with_substance("kole")
            .unwrap_err();
        assert_eq!(err.code(), codes::UNKNOWN_SUBSTANCE);
    }

    #[test]
    fn test_compound_dimension_and_currency() {
        let r = Registry::builtin();
        let q = Quantity::new(50.0, "EUR/MWh", &r).unwrap();
        assert_eq!(q.dimension().as_str(), "CURRENCY_PER_ENERGY");
        assert_eq!(q.currency(), Some("EUR"));
        assert_eq!(Quantity::new(1.0, "MWh", &r).unwrap().currency(), None);
    }

    #[test]
    fn test_display_and_debug() {
        let r = Registry::builtin();
        let q = Quantity::new(100.0, "t", &r)
            .unwrap()
            .with_substance("coal")
            .unwrap();
        assert_eq!(q.to_string(), "100 t of coal");

        let p = Quantity::new(30.0, "USD/MWh", &r)
            .unwrap()
            .with_substance("natural_gas")
            .unwrap()
            .with_basis(Basis::Hhv)
            .with_reference_year(2020);
        assert_eq!(
            format!("{:?}", p),
            "Quantity(30, 'USD/MWh', 'natural_gas', basis='HHV', reference_year=2020)"
        );
    }

    #[test]
    fn test_equality_across_units() {
        let r = Registry::builtin();
        assert_eq!(
            Quantity::new(1.0, "MWh", &r).unwrap(),
            Quantity::new(1000.0, "kWh", &r).unwrap()
        );
        assert_ne!(
            Quantity::new(1.0, "MWh", &r).unwrap(),
            Quantity::new(1.0, "t", &r).unwrap()
        );
        assert_ne!(
            Quantity::new(1.0, "USD", &r).unwrap(),
            Quantity::new(1.0, "EUR", &r).unwrap()
        );
    }

    #[test]
    fn test_for_duration_and_average_power() {
        let r = Registry::builtin();
        let e = Quantity::new(100.0, "MW", &r).unwrap().for_duration(24.0).unwrap();
        assert_eq!(e.unit(), "MWh");
        assert_eq!(e.scalar(), Some(2400.0));

        let p = Quantity::new(2400.0, "kWh", &r).unwrap().average_power(24.0).unwrap();
        assert_eq!(p.unit(), "kW");
        assert_eq!(p.scalar(), Some(100.0));

        let err = Quantity::new(1.0, "kg", &r).unwrap().for_duration(1.0).unwrap_err();
        assert_eq!(err.code(), codes::INCOMPATIBLE_DIMENSION);
    }

    #[test]
    fn test_serialize_includes_dimension() {
        let r = Registry::builtin();
        let q = Quantity::new(vec![1.0, 2.0], "MWh", &r)
            .unwrap()
            .with_basis(Basis::Lhv);
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": [1.0, 2.0],
                "unit": "MWh",
                "dimension": "ENERGY",
                "substance": null,
                "basis": "LHV",
                "reference_year": null
            })
        );
    }
}
