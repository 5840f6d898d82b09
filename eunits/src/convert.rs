//! The conversion pipeline behind `Quantity::to`
//!
//! A request may change any of four axes. They are applied in a fixed
//! order, each stage a separate step:
//!
//! 1. substance: fuel → combustion product, or tag an untagged amount
//! 2. basis: HHV ↔ LHV, scaling by `ratio^k` for `k` energy atoms
//! 3. unit: factor scaling, or a substance bridge across dimensions
//! 4. economic: inflation and/or exchange rate, inflate-then-convert
//!
//! Unset axes are left alone.

use std::sync::Arc;

use eunits_core::{Basis, EnergyError, EnergyResult};
use eunits_substance::CombustionProduct;
use eunits_units::{symbols, Dimension, Unit};
use tracing::debug;

use crate::Quantity;

/// Target of a conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversion {
    pub unit: Option<String>,
    pub basis: Option<Basis>,
    pub substance: Option<String>,
    pub reference_year: Option<i32>,
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    pub fn basis(mut self, basis: Basis) -> Self {
        self.basis = Some(basis);
        self
    }

    pub fn substance(mut self, substance: &str) -> Self {
        self.substance = Some(substance.to_string());
        self
    }

    pub fn reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.unit.is_none()
            && self.basis.is_none()
            && self.substance.is_none()
            && self.reference_year.is_none()
    }
}

impl From<&str> for Conversion {
    fn from(unit: &str) -> Self {
        Conversion::new().unit(unit)
    }
}

impl From<Basis> for Conversion {
    fn from(basis: Basis) -> Self {
        Conversion::new().basis(basis)
    }
}

impl<'r> Quantity<'r> {
    /// Convert along any combination of unit, basis, substance and year.
    ///
    /// ```ignore
    /// let co2 = coal.to(Conversion::new().substance("CO2").unit("t"))?;
    /// let mwh = gas.to("MWh")?;
    /// ```
    pub fn to(&self, target: impl Into<Conversion>) -> EnergyResult<Quantity<'r>> {
        let target = target.into();
        let mut q = self.clone();

        let mut basis = target.basis;
        if let Some(substance) = target.substance.as_deref() {
            let derives_product = CombustionProduct::from_id(substance).is_some()
                && q.substance.as_deref() != Some(substance);
            q = q.convert_substance(substance)?;
            // a product mass carries no heating-value basis
            if derives_product {
                basis = None;
            }
        }

        if let Some(basis) = basis {
            q = q.convert_basis(basis)?;
        }

        let source = Arc::clone(&q.unit);
        if let Some(unit) = target.unit.as_deref() {
            q = q.convert_unit(unit)?;
        }

        q.convert_economic(&source, target.reference_year)
    }

    pub fn to_lhv(&self) -> EnergyResult<Quantity<'r>> {
        self.to(Basis::Lhv)
    }

    pub fn to_hhv(&self) -> EnergyResult<Quantity<'r>> {
        self.to(Basis::Hhv)
    }

    /// CO2 from burning this fuel amount, in tonnes
    pub fn emissions(&self) -> EnergyResult<Quantity<'r>> {
        self.to(Conversion::new().substance(CombustionProduct::Co2.id()))
    }

    // ========== Stages ==========

    fn convert_substance(self, target: &str) -> EnergyResult<Self> {
        if self.substance.as_deref() == Some(target) {
            return Ok(self);
        }
        let registry = self.registry;

        let Some(product) = CombustionProduct::from_id(target) else {
            registry.substances().properties(target)?;
            if let Some(current) = &self.substance {
                return Err(EnergyError::UnsupportedConversion(format!(
                    "cannot convert {} into {}, only combustion products (CO2, H2O, ash) derive from a fuel",
                    current, target
                )));
            }
            debug!(substance = target, "substance stage: tagging untagged amount");
            return Ok(Quantity {
                substance: Some(target.to_string()),
                ..self
            });
        };

        let Some(fuel) = self.substance.as_deref() else {
            return Err(EnergyError::SubstanceRequired {
                from: self.unit.symbol.clone(),
                from_dim: self.unit.dimension.to_string(),
                to: product.id().to_string(),
                to_dim: Dimension::MASS.to_string(),
            });
        };
        let basis = self.basis.unwrap_or(registry.settings().default_basis);
        let value = registry.bridge().combustion_product(
            &self.value,
            &self.unit.symbol,
            fuel,
            basis,
            product,
            symbols::T,
        )?;
        debug!(fuel, product = product.id(), %basis, "substance stage: combustion product");

        Ok(Quantity {
            value,
            unit: registry.units().resolve(symbols::T)?,
            substance: Some(product.id().to_string()),
            basis: None,
            ..self
        })
    }

    fn convert_basis(self, target: Basis) -> EnergyResult<Self> {
        if self.basis == Some(target) {
            return Ok(self);
        }
        let registry = self.registry;
        let exponent = self.unit.energy_exponent();

        let Some(substance) = self.substance.as_deref() else {
            if let Some(current) = self.basis.filter(|_| exponent != 0) {
                return Err(EnergyError::SubstanceRequired {
                    from: format!("{} {}", self.unit.symbol, current),
                    from_dim: self.unit.dimension.to_string(),
                    to: format!("{} {}", self.unit.symbol, target),
                    to_dim: self.unit.dimension.to_string(),
                });
            }
            return Ok(Quantity {
                basis: Some(target),
                ..self
            });
        };

        if exponent == 0 {
            // selects the heating value for a later cross-dimension hop
            debug!(substance, basis = %target, "basis stage: tagging");
            return Ok(Quantity {
                basis: Some(target),
                ..self
            });
        }

        let from = self.basis.unwrap_or(registry.settings().default_basis);
        let ratio = registry.substances().basis_ratio(substance, from, target)?;
        debug!(substance, %from, to = %target, ratio, exponent, "basis stage");

        Ok(Quantity {
            value: self.value.scale(ratio.powi(exponent)),
            basis: Some(target),
            ..self
        })
    }

    fn convert_unit(self, target: &str) -> EnergyResult<Self> {
        let registry = self.registry;
        let to = registry.units().resolve(target)?;
        if to.symbol == self.unit.symbol {
            return Ok(self);
        }

        let mut basis = self.basis;
        let factor = if to.dimension == self.unit.dimension {
            registry.units().scale_factor(&self.unit.symbol, &to.symbol)?
        } else if self.unit.is_compound() || to.is_compound() {
            return Err(EnergyError::incompatible(
                "convert",
                &self.unit.symbol,
                &self.unit.dimension,
                &to.symbol,
                &to.dimension,
            ));
        } else {
            let used = self.basis.unwrap_or(registry.settings().default_basis);
            if self.unit.dimension == Dimension::ENERGY || to.dimension == Dimension::ENERGY {
                basis = Some(used);
            }
            registry
                .bridge()
                .factor(&self.unit.symbol, &to.symbol, self.substance.as_deref(), used)?
        };
        debug!(from = %self.unit.symbol, to = %to.symbol, factor, "unit stage");

        Ok(Quantity {
            value: self.value.scale(factor),
            unit: to,
            basis,
            ..self
        })
    }

    fn convert_economic(self, source: &Unit, target_year: Option<i32>) -> EnergyResult<Self> {
        let from = single_currency(source)?;
        let to = single_currency(&self.unit)?;
        let year_change = target_year.filter(|y| self.reference_year != Some(*y));

        let (from, to) = match (from, to) {
            (Some(from), Some(to)) => (from, to),
            (None, None) => {
                return match year_change {
                    Some(year) => Err(EnergyError::UnsupportedConversion(format!(
                        "{} is not a currency amount, it has no price level to adjust to {}",
                        display_unit(&self.unit),
                        year
                    ))),
                    None => Ok(self),
                };
            }
            _ => {
                return Err(EnergyError::UnsupportedConversion(format!(
                    "cannot convert {} to {}",
                    display_unit(source),
                    display_unit(&self.unit)
                )))
            }
        };

        let economics = self.registry.economics();
        let factor = match year_change {
            None if from == to => return Ok(self),
            None => economics.conversion_factor(from, to, self.reference_year)?,
            Some(to_year) => {
                let from_year = self.reference_year.ok_or_else(|| EnergyError::ReferenceYearRequired {
                    unit: self.unit.symbol.clone(),
                    target: to_year,
                })?;
                if from == to {
                    economics.inflation_factor(from, from_year, to_year)?
                } else {
                    economics.inflate_then_convert_factor(from, from_year, to, to_year)?
                }
            }
        };
        let exponent = self.unit.exponent_of(&Dimension::CURRENCY);
        debug!(from, to, ?year_change, factor, exponent, "economic stage");

        Ok(Quantity {
            value: self.value.scale(factor.powi(exponent)),
            reference_year: target_year.or(self.reference_year),
            ..self
        })
    }
}

/// The one currency of a unit expression; several is ambiguous
fn single_currency(unit: &Unit) -> EnergyResult<Option<&str>> {
    match unit.currency_symbols().as_slice() {
        [] => Ok(None),
        [one] => Ok(Some(*one)),
        many => Err(EnergyError::AmbiguousConversion(format!(
            "{} mixes currencies {}, convert each part separately",
            unit.symbol,
            many.join(" and ")
        ))),
    }
}

fn display_unit(unit: &Unit) -> &str {
    if unit.symbol.is_empty() {
        "dimensionless"
    } else {
        &unit.symbol
    }
}
