//! Arithmetic and comparison between quantities
//!
//! `add`/`sub` need matching dimensions (or a dimensionless operand) and
//! express the result in the left unit. `mul`/`div` take the result unit
//! from the unit registry's composition rules. Substance, basis and
//! reference year survive when at most one operand sets them or both
//! agree; a disagreement goes through the registry's metadata policy and,
//! when it is only a warning, is recorded on the result.

use std::fmt;
use std::sync::Arc;

use eunits_core::{Basis, EnergyError, EnergyResult, Value};
use eunits_units::{Product, Unit};
use serde::Serialize;

use crate::Quantity;

/// A metadata field dropped because the operands disagreed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataWarning {
    pub field: &'static str,
    pub left: String,
    pub right: String,
}

impl fmt::Display for MetadataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflicting {} ('{}' vs '{}'), dropped from result",
            self.field, self.left, self.right
        )
    }
}

struct Metadata {
    substance: Option<String>,
    basis: Option<Basis>,
    reference_year: Option<i32>,
    warnings: Vec<MetadataWarning>,
}

impl<'r> Quantity<'r> {
    pub fn add(&self, other: &Quantity<'_>) -> EnergyResult<Quantity<'r>> {
        self.additive(other, "add", |a, b| a + b)
    }

    pub fn sub(&self, other: &Quantity<'_>) -> EnergyResult<Quantity<'r>> {
        self.additive(other, "subtract", |a, b| a - b)
    }

    pub fn mul(&self, other: &Quantity<'_>) -> EnergyResult<Quantity<'r>> {
        let product = self
            .registry
            .units()
            .multiply(&self.unit.symbol, &other.unit.symbol)?;
        let value = self.value.zip_with(&other.value, |a, b| a * b)?;
        self.composed(value, product, other)
    }

    pub fn div(&self, other: &Quantity<'_>) -> EnergyResult<Quantity<'r>> {
        if other.value.as_slice().contains(&0.0) {
            return Err(EnergyError::DivisionByZero { divisor: other.to_string() });
        }
        let product = self
            .registry
            .units()
            .divide(&self.unit.symbol, &other.unit.symbol)?;
        let value = self.value.zip_with(&other.value, |a, b| a / b)?;
        self.composed(value, product, other)
    }

    /// Multiply by a plain number, metadata unchanged
    pub fn scale(&self, k: f64) -> Quantity<'r> {
        self.with_value(self.value.scale(k))
    }

    fn additive(
        &self,
        other: &Quantity<'_>,
        operation: &'static str,
        f: impl Fn(f64, f64) -> f64,
    ) -> EnergyResult<Quantity<'r>> {
        let (unit, rhs) = if self.unit.dimension == other.unit.dimension {
            let factor = self
                .registry
                .units()
                .conversion_factor(&other.unit.symbol, &self.unit.symbol)?;
            (Arc::clone(&self.unit), other.value.scale(factor))
        } else if other.is_dimensionless() {
            (Arc::clone(&self.unit), other.value.clone())
        } else if self.is_dimensionless() {
            (self.registry.units().resolve(&other.unit.symbol)?, other.value.clone())
        } else {
            return Err(EnergyError::incompatible(
                operation,
                &self.unit.symbol,
                &self.unit.dimension,
                &other.unit.symbol,
                &other.unit.dimension,
            ));
        };

        let value = self.value.zip_with(&rhs, f)?;
        let meta = self.merge_metadata(other)?;
        Ok(self.rebuilt(value, unit, meta))
    }

    fn composed(&self, value: Value, product: Product, other: &Quantity<'_>) -> EnergyResult<Quantity<'r>> {
        let unit = self.registry.units().resolve(&product.unit)?;
        let meta = self.merge_metadata(other)?;
        Ok(self.rebuilt(value.scale(product.scale), unit, meta))
    }

    fn rebuilt(&self, value: Value, unit: Arc<Unit>, meta: Metadata) -> Quantity<'r> {
        Quantity {
            registry: self.registry,
            value,
            unit,
            substance: meta.substance,
            basis: meta.basis,
            reference_year: meta.reference_year,
            warnings: meta.warnings,
        }
    }

    fn merge_metadata(&self, other: &Quantity<'_>) -> EnergyResult<Metadata> {
        let mut warnings: Vec<MetadataWarning> =
            self.warnings.iter().chain(&other.warnings).cloned().collect();
        Ok(Metadata {
            substance: self.reconcile(
                "substance",
                self.substance.clone(),
                other.substance.clone(),
                &mut warnings,
            )?,
            basis: self.reconcile("basis", self.basis, other.basis, &mut warnings)?,
            reference_year: self.reconcile(
                "reference_year",
                self.reference_year,
                other.reference_year,
                &mut warnings,
            )?,
            warnings,
        })
    }

    fn reconcile<T: PartialEq + fmt::Display>(
        &self,
        field: &'static str,
        left: Option<T>,
        right: Option<T>,
        warnings: &mut Vec<MetadataWarning>,
    ) -> EnergyResult<Option<T>> {
        match (left, right) {
            (Some(l), Some(r)) if l != r => {
                warnings.push(self.registry.metadata_conflict(MetadataWarning {
                    field,
                    left: l.to_string(),
                    right: r.to_string(),
                })?);
                Ok(None)
            }
            (l, r) => Ok(l.or(r)),
        }
    }

    // ========== Comparison ==========

    pub fn lt(&self, other: &Quantity<'_>) -> EnergyResult<bool> {
        self.compare(other, |a, b| a < b)
    }

    pub fn le(&self, other: &Quantity<'_>) -> EnergyResult<bool> {
        self.compare(other, |a, b| a <= b)
    }

    pub fn gt(&self, other: &Quantity<'_>) -> EnergyResult<bool> {
        self.compare(other, |a, b| a > b)
    }

    pub fn ge(&self, other: &Quantity<'_>) -> EnergyResult<bool> {
        self.compare(other, |a, b| a >= b)
    }

    /// Values within relative tolerance `rel`, element-wise
    pub fn approx_eq(&self, other: &Quantity<'_>, rel: f64) -> EnergyResult<bool> {
        self.compare(other, |a, b| eunits_core::approx_eq(a, b, rel))
    }

    /// `pred(self, other)` for every element, `other` in this unit
    fn compare(&self, other: &Quantity<'_>, pred: impl Fn(f64, f64) -> bool) -> EnergyResult<bool> {
        if self.unit.dimension != other.unit.dimension {
            return Err(EnergyError::incompatible(
                "compare",
                &self.unit.symbol,
                &self.unit.dimension,
                &other.unit.symbol,
                &other.unit.dimension,
            ));
        }
        let factor = self
            .registry
            .units()
            .conversion_factor(&other.unit.symbol, &self.unit.symbol)?;
        self.value.all_pairs(&other.value.scale(factor), pred)
    }
}
