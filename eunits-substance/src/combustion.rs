//! Combustion products of a fuel amount
//!
//! CO2 prefers the fuel's carbon intensity, applied to LHV energy in GJ;
//! without one it falls back to stoichiometry on the carbon content
//! (C + O2 → CO2, 44/12). H2O comes from the hydrogen content (18/2) and
//! ash from the ash content.

use std::fmt;
use std::str::FromStr;

use eunits_core::{Basis, EnergyError, EnergyResult, Value};
use eunits_units::{symbols, Dimension};
use tracing::debug;

use crate::{Bridge, Property};

/// CO2/C molar mass ratio
pub const CO2_PER_C: f64 = 44.0 / 12.0;
/// H2O/H2 molar mass ratio
pub const H2O_PER_H2: f64 = 18.0 / 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombustionProduct {
    Co2,
    H2o,
    Ash,
}

impl CombustionProduct {
    /// Substance id of the product
    pub fn id(&self) -> &'static str {
        match self {
            CombustionProduct::Co2 => "CO2",
            CombustionProduct::H2o => "H2O",
            CombustionProduct::Ash => "ash",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "CO2" => Some(CombustionProduct::Co2),
            "H2O" => Some(CombustionProduct::H2o),
            "ash" => Some(CombustionProduct::Ash),
            _ => None,
        }
    }
}

impl fmt::Display for CombustionProduct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for CombustionProduct {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CombustionProduct::from_id(s).ok_or_else(|| {
            EnergyError::UnsupportedConversion(format!("'{}' is not a combustion product", s))
        })
    }
}

impl<'a> Bridge<'a> {
    /// Amount of `product` from burning `value` `unit` of `fuel`, in `target` unit.
    ///
    /// `basis` is the heating-value basis of an energy-denominated fuel
    /// amount; it is rebased to LHV before a carbon intensity applies.
    pub fn combustion_product(
        &self,
        value: &Value,
        unit: &str,
        fuel: &str,
        basis: Basis,
        product: CombustionProduct,
        target: &str,
    ) -> EnergyResult<Value> {
        let fuel_record = self.substances.properties(fuel)?;
        let fuel_dim = self.units.dimension_of(unit)?;

        let kg_per_unit = match product {
            CombustionProduct::Co2 => {
                let lhv_reachable = fuel_dim == Dimension::ENERGY || fuel_record.lhv.is_some();
                match (fuel_record.carbon_intensity, fuel_record.carbon_content) {
                    (Some(intensity), content) if lhv_reachable || content.is_none() => {
                        let gj_lhv = self.lhv_energy_gj(unit, &fuel_dim, fuel, basis)?;
                        debug!(fuel, intensity, "CO2 from carbon intensity");
                        gj_lhv * intensity
                    }
                    (_, Some(content)) => {
                        debug!(fuel, content, "CO2 from carbon content");
                        self.fuel_kg(unit, fuel, basis)? * content * CO2_PER_C
                    }
                    (None, None) => {
                        return Err(EnergyError::missing_property(
                            fuel,
                            Property::CarbonIntensity.name(),
                            "CO2 emission calculation",
                        ))
                    }
                    // The first arm's guard always holds when content is None.
                    (Some(_), None) => unreachable!(),
                }
            }
            CombustionProduct::H2o => {
                let h = self
                    .substances
                    .require(fuel, Property::HydrogenContent, "H2O calculation")?;
                self.fuel_kg(unit, fuel, basis)? * h * H2O_PER_H2
            }
            CombustionProduct::Ash => {
                let ash = self
                    .substances
                    .require(fuel, Property::AshContent, "ash calculation")?;
                self.fuel_kg(unit, fuel, basis)? * ash
            }
        };

        let to_target = self.factor(symbols::KG, target, Some(product.id()), Basis::Lhv)?;
        Ok(value.scale(kg_per_unit * to_target))
    }

    /// GJ (LHV) per one `unit` of fuel
    fn lhv_energy_gj(&self, unit: &str, dim: &Dimension, fuel: &str, basis: Basis) -> EnergyResult<f64> {
        if *dim == Dimension::ENERGY {
            let ratio = self.substances.basis_ratio(fuel, basis, Basis::Lhv)?;
            Ok(self.units.scale_factor(unit, symbols::GJ)? * ratio)
        } else {
            self.factor(unit, symbols::GJ, Some(fuel), Basis::Lhv)
        }
    }

    /// kg of fuel per one `unit`
    fn fuel_kg(&self, unit: &str, fuel: &str, basis: Basis) -> EnergyResult<f64> {
        self.factor(unit, symbols::KG, Some(fuel), basis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Substance, SubstanceRegistry};
    use eunits_units::UnitRegistry;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn test_coal() -> SubstanceRegistry {
        let mut substances = SubstanceRegistry::builtin();
        substances
            .update(
                "coal",
                Substance::default()
                    .with(Property::Hhv, 26.0)
                    .with(Property::Lhv, 25.0)
                    .with(Property::CarbonIntensity, 95.0),
            )
            .unwrap();
        substances
    }

    #[test]
    fn test_co2_from_mass_uses_intensity() {
        let units = UnitRegistry::builtin();
        let substances = test_coal();
        let bridge = Bridge::new(&units, &substances);
        let co2 = bridge
            .combustion_product(&Value::from(1000.0), "kg", "coal", Basis::Lhv, CombustionProduct::Co2, "t")
            .unwrap();
        assert_close(co2.as_scalar().unwrap(), 2.375);
    }

    #[test]
    fn test_co2_from_hhv_energy_is_rebased_to_lhv() {
        let units = UnitRegistry::builtin();
        let substances = test_coal();
        let bridge = Bridge::new(&units, &substances);
        // 26 GJ HHV of this coal is 25 GJ LHV
        let co2 = bridge
            .combustion_product(&Value::from(26.0), "GJ", "coal", Basis::Hhv, CombustionProduct::Co2, "kg")
            .unwrap();
        assert_close(co2.as_scalar().unwrap(), 25.0 * 95.0);

        let lhv = bridge
            .combustion_product(&Value::from(26.0), "GJ", "coal", Basis::Lhv, CombustionProduct::Co2, "kg")
            .unwrap();
        assert_close(lhv.as_scalar().unwrap(), 26.0 * 95.0);
    }

    #[test]
    fn test_co2_falls_back_to_carbon_content() {
        let units = UnitRegistry::builtin();
        let mut substances = SubstanceRegistry::new();
        substances
            .add("char", Substance::default().with(Property::CarbonContent, 0.9))
            .unwrap();
        substances
            .add("CO2", Substance::default().with(Property::Density, 1.98))
            .unwrap();
        let bridge = Bridge::new(&units, &substances);
        let co2 = bridge
            .combustion_product(&Value::from(12.0), "kg", "char", Basis::Lhv, CombustionProduct::Co2, "kg")
            .unwrap();
        assert_close(co2.as_scalar().unwrap(), 12.0 * 0.9 * 44.0 / 12.0);
    }

    #[test]
    fn test_co2_without_carbon_data_fails() {
        let units = UnitRegistry::builtin();
        let mut substances = SubstanceRegistry::builtin();
        substances
            .add("mystery", Substance::default().with(Property::Lhv, 10.0))
            .unwrap();
        let bridge = Bridge::new(&units, &substances);
        let err = bridge
            .combustion_product(&Value::from(1.0), "t", "mystery", Basis::Lhv, CombustionProduct::Co2, "t")
            .unwrap_err();
        assert_eq!(err.code(), eunits_core::codes::MISSING_PROPERTY);
    }

    #[test]
    fn test_zero_carbon_energy_emits_nothing() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let co2 = bridge
            .combustion_product(&Value::from(100.0), "MWh", "wind", Basis::Lhv, CombustionProduct::Co2, "t")
            .unwrap();
        assert_eq!(co2.as_scalar().unwrap(), 0.0);
    }

    #[test]
    fn test_water_and_ash() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let water = bridge
            .combustion_product(&Value::from(1.0), "t", "coal", Basis::Lhv, CombustionProduct::H2o, "t")
            .unwrap();
        assert_close(water.as_scalar().unwrap(), 0.05 * 9.0);
        let ash = bridge
            .combustion_product(&Value::from(vec![1.0, 2.0]), "t", "coal", Basis::Lhv, CombustionProduct::Ash, "kg")
            .unwrap();
        assert!(ash.approx_eq(&Value::from(vec![100.0, 200.0]), 1e-9));
    }

    #[test]
    fn test_product_as_volume() {
        let units = UnitRegistry::builtin();
        let substances = test_coal();
        let bridge = Bridge::new(&units, &substances);
        let co2 = bridge
            .combustion_product(&Value::from(1000.0), "kg", "coal", Basis::Lhv, CombustionProduct::Co2, "m3")
            .unwrap();
        assert_close(co2.as_scalar().unwrap(), 2375.0 / 1.98);
    }

    #[test]
    fn test_product_parse() {
        assert_eq!("CO2".parse::<CombustionProduct>().unwrap(), CombustionProduct::Co2);
        assert!("diesel".parse::<CombustionProduct>().is_err());
    }
}
