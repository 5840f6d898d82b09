//! Cross-dimension conversion through substance properties
//!
//! The routes are fixed:
//! - MASS ↔ ENERGY through the heating value (kg ↔ MJ)
//! - VOLUME ↔ MASS through the density (m3 ↔ kg)
//! - VOLUME ↔ ENERGY as the two hops above, in that order
//!
//! There is no path search. A substance missing a property needed by a hop
//! fails with that property named.

use eunits_core::{Basis, EnergyError, EnergyResult};
use eunits_units::{symbols, Dimension, UnitRegistry};

use crate::SubstanceRegistry;

/// Unit and substance registries seen together
#[derive(Debug, Clone, Copy)]
pub struct Bridge<'a> {
    pub units: &'a UnitRegistry,
    pub substances: &'a SubstanceRegistry,
}

impl<'a> Bridge<'a> {
    pub fn new(units: &'a UnitRegistry, substances: &'a SubstanceRegistry) -> Self {
        Bridge { units, substances }
    }

    /// Factor converting an amount in `from` into `to`.
    ///
    /// Same-dimension requests are plain unit scaling and ignore the
    /// substance; anything else needs one.
    pub fn factor(&self, from: &str, to: &str, substance: Option<&str>, basis: Basis) -> EnergyResult<f64> {
        let from_dim = self.units.dimension_of(from)?;
        let to_dim = self.units.dimension_of(to)?;

        if from_dim == to_dim {
            return self.units.scale_factor(from, to);
        }

        let Some(id) = substance else {
            return Err(EnergyError::SubstanceRequired {
                from: from.to_string(),
                from_dim: from_dim.to_string(),
                to: to.to_string(),
                to_dim: to_dim.to_string(),
            });
        };
        self.substances.properties(id)?;

        let route = (from_dim.as_str(), to_dim.as_str());
        let (energy, mass, volume) = (
            Dimension::ENERGY.as_str(),
            Dimension::MASS.as_str(),
            Dimension::VOLUME.as_str(),
        );

        if route == (mass, energy) {
            Ok(self.units.scale_factor(from, symbols::KG)?
                * self.mass_to_energy(id, basis, "MASS to ENERGY conversion")?
                * self.units.scale_factor(symbols::MJ, to)?)
        } else if route == (energy, mass) {
            Ok(self.units.scale_factor(from, symbols::MJ)?
                / self.mass_to_energy(id, basis, "ENERGY to MASS conversion")?
                * self.units.scale_factor(symbols::KG, to)?)
        } else if route == (volume, mass) {
            Ok(self.units.scale_factor(from, symbols::M3)?
                * self.density(id, "VOLUME to MASS conversion")?
                * self.units.scale_factor(symbols::KG, to)?)
        } else if route == (mass, volume) {
            Ok(self.units.scale_factor(from, symbols::KG)?
                / self.density(id, "MASS to VOLUME conversion")?
                * self.units.scale_factor(symbols::M3, to)?)
        } else if route == (volume, energy) {
            let density = self.density(id, "VOLUME to MASS hop of VOLUME to ENERGY conversion")?;
            let heating = self.mass_to_energy(id, basis, "MASS to ENERGY hop of VOLUME to ENERGY conversion")?;
            Ok(self.units.scale_factor(from, symbols::M3)?
                * density
                * heating
                * self.units.scale_factor(symbols::MJ, to)?)
        } else if route == (energy, volume) {
            let heating = self.mass_to_energy(id, basis, "ENERGY to MASS hop of ENERGY to VOLUME conversion")?;
            let density = self.density(id, "MASS to VOLUME hop of ENERGY to VOLUME conversion")?;
            Ok(self.units.scale_factor(from, symbols::MJ)?
                / heating
                / density
                * self.units.scale_factor(symbols::M3, to)?)
        } else {
            Err(EnergyError::incompatible("convert", from, &from_dim, to, &to_dim))
        }
    }

    /// MJ per kg on `basis`, with the purpose recorded for error messages
    fn mass_to_energy(&self, id: &str, basis: Basis, purpose: &str) -> EnergyResult<f64> {
        let property = match basis {
            Basis::Hhv => crate::Property::Hhv,
            Basis::Lhv => crate::Property::Lhv,
        };
        self.substances.require(id, property, purpose)
    }

    fn density(&self, id: &str, purpose: &str) -> EnergyResult<f64> {
        self.substances.require(id, crate::Property::Density, purpose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Property, Substance};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_mass_to_energy() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        // 1 t coal at LHV 27.8 MJ/kg = 27 800 MJ = 7.7222 MWh
        let f = bridge.factor("t", "MWh", Some("coal"), Basis::Lhv).unwrap();
        assert_close(f, 27_800.0 / 3600.0);
        let back = bridge.factor("MWh", "t", Some("coal"), Basis::Lhv).unwrap();
        assert_close(f * back, 1.0);
    }

    #[test]
    fn test_volume_to_mass() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let f = bridge.factor("barrel", "kg", Some("crude_oil"), Basis::Lhv).unwrap();
        assert_close(f, 0.159 * 870.0);
    }

    #[test]
    fn test_volume_to_energy_two_hops() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let f = bridge.factor("m3", "GJ", Some("diesel"), Basis::Hhv).unwrap();
        assert_close(f, 840.0 * 45.7 / 1000.0);
    }

    #[test]
    fn test_partial_properties_fail_naming_the_hop() {
        let units = UnitRegistry::builtin();
        let mut substances = SubstanceRegistry::builtin();
        substances
            .add("slurry", Substance::default().with(Property::Density, 1200.0))
            .unwrap();
        let bridge = Bridge::new(&units, &substances);

        let err = bridge.factor("m3", "MWh", Some("slurry"), Basis::Lhv).unwrap_err();
        match err {
            EnergyError::MissingProperty { property, purpose, .. } => {
                assert_eq!(property, "lhv");
                assert!(purpose.contains("MASS to ENERGY hop"));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_wind_has_no_heating_value() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let err = bridge.factor("kg", "MWh", Some("wind"), Basis::Lhv).unwrap_err();
        assert!(matches!(err, EnergyError::MissingProperty { .. }));
    }

    #[test]
    fn test_cross_dimension_needs_substance() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        let err = bridge.factor("kg", "MWh", None, Basis::Lhv).unwrap_err();
        assert!(matches!(err, EnergyError::SubstanceRequired { .. }));
        let err = bridge.factor("kg", "h", Some("coal"), Basis::Lhv).unwrap_err();
        assert!(matches!(err, EnergyError::IncompatibleDimension { .. }));
    }

    #[test]
    fn test_same_dimension_ignores_substance() {
        let units = UnitRegistry::builtin();
        let substances = SubstanceRegistry::builtin();
        let bridge = Bridge::new(&units, &substances);
        assert_close(bridge.factor("MWh", "GJ", Some("wind"), Basis::Lhv).unwrap(), 3.6);
    }
}
