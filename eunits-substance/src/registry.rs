//! Substance registry - property lookups keyed by substance id

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use eunits_core::{closest_matches, Basis, EnergyError, EnergyResult};

use crate::catalogue::{SubstanceTable, BUILTIN};
use crate::{Property, Substance};

const SUGGESTIONS: usize = 3;

/// Data-quality findings for one substance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub substance: String,
    pub issues: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubstanceRegistry {
    substances: BTreeMap<String, Substance>,
}

impl SubstanceRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default catalogue
    pub fn builtin() -> Self {
        SubstanceRegistry {
            substances: BUILTIN.clone(),
        }
    }

    pub fn from_table(table: SubstanceTable) -> EnergyResult<Self> {
        let mut registry = Self::new();
        registry.extend(table)?;
        Ok(registry)
    }

    /// Overlay a fragment: known ids are updated field-wise, new ids added
    pub fn extend(&mut self, table: SubstanceTable) -> EnergyResult<()> {
        for (id, record) in &table {
            check_numbers(id, record)?;
            if !self.substances.contains_key(id) && record.is_empty() {
                return Err(empty_record(id));
            }
        }

        let count = table.len();
        for (id, record) in table {
            match self.substances.get_mut(&id) {
                Some(existing) => existing.merge(record),
                None => {
                    self.substances.insert(id, record);
                }
            }
        }
        debug!(substances = count, "substance table merged");
        Ok(())
    }

    // ========== Lookup ==========

    /// Full record of a substance
    pub fn properties(&self, id: &str) -> EnergyResult<&Substance> {
        self.substances.get(id).ok_or_else(|| self.unknown(id))
    }

    fn unknown(&self, id: &str) -> EnergyError {
        EnergyError::UnknownSubstance {
            substance: id.to_string(),
            suggestions: closest_matches(id, self.substances.keys().map(String::as_str), SUGGESTIONS),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.substances.contains_key(id)
    }

    /// A property value, failing with the property name when absent
    pub fn require(&self, id: &str, property: Property, purpose: &str) -> EnergyResult<f64> {
        self.properties(id)?
            .get(property)
            .ok_or_else(|| EnergyError::missing_property(id, property.name(), purpose))
    }

    /// Heating value in MJ/kg on the given basis
    pub fn energy_per_mass(&self, id: &str, basis: Basis) -> EnergyResult<f64> {
        let property = match basis {
            Basis::Hhv => Property::Hhv,
            Basis::Lhv => Property::Lhv,
        };
        self.require(id, property, "mass/energy conversion")
    }

    /// Density in kg/m3
    pub fn mass_per_volume(&self, id: &str) -> EnergyResult<f64> {
        self.require(id, Property::Density, "volume/mass conversion")
    }

    /// Factor turning an energy amount on `from` basis into `to` basis
    pub fn basis_ratio(&self, id: &str, from: Basis, to: Basis) -> EnergyResult<f64> {
        let substance = self.properties(id)?;
        if from == to {
            return Ok(1.0);
        }
        let hhv = substance
            .hhv
            .ok_or_else(|| EnergyError::missing_property(id, "hhv", "HHV/LHV conversion"))?;
        let lhv = substance
            .lhv
            .ok_or_else(|| EnergyError::missing_property(id, "lhv", "HHV/LHV conversion"))?;
        Ok(match (from, to) {
            (Basis::Hhv, Basis::Lhv) => lhv / hhv,
            _ => hhv / lhv,
        })
    }

    // ========== Edits ==========

    /// Add or replace a substance; a record with no properties is rejected
    pub fn add(&mut self, id: &str, record: Substance) -> EnergyResult<()> {
        if record.is_empty() {
            return Err(empty_record(id));
        }
        check_numbers(id, &record)?;
        let mut record = record;
        if record.name.is_none() {
            record.name = Some(id.to_string());
        }
        self.substances.insert(id.to_string(), record);
        Ok(())
    }

    /// Overlay fields onto an existing substance
    pub fn update(&mut self, id: &str, fields: Substance) -> EnergyResult<()> {
        check_numbers(id, &fields)?;
        match self.substances.get_mut(id) {
            Some(existing) => {
                existing.merge(fields);
                Ok(())
            }
            None => Err(self.unknown(id)),
        }
    }

    pub fn remove(&mut self, id: &str) -> EnergyResult<Substance> {
        self.substances.remove(id).ok_or_else(|| self.unknown(id))
    }

    // ========== Discovery ==========

    /// Substance ids, optionally only those defining `property`
    pub fn list(&self, has_property: Option<Property>) -> Vec<&str> {
        self.search(|s| has_property.map_or(true, |p| s.has(p)))
    }

    /// Ids of substances matching `predicate`, sorted
    pub fn search(&self, predicate: impl Fn(&Substance) -> bool) -> Vec<&str> {
        self.substances
            .iter()
            .filter(|(_, s)| predicate(s))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Check a record for physically implausible values.
    ///
    /// Nothing is enforced at load time; this only reports.
    pub fn validate(&self, id: &str) -> EnergyResult<ValidationReport> {
        let s = self.properties(id)?;
        let mut issues = Vec::new();

        if let (Some(hhv), Some(lhv)) = (s.hhv, s.lhv) {
            if lhv > hhv {
                issues.push(format!("lhv {} exceeds hhv {}", lhv, hhv));
            }
        }
        for (property, value) in [(Property::Hhv, s.hhv), (Property::Lhv, s.lhv), (Property::Density, s.density)] {
            if let Some(v) = value {
                if v <= 0.0 {
                    issues.push(format!("{} must be positive, got {}", property, v));
                }
            }
        }
        let fractions = [
            (Property::CarbonContent, s.carbon_content),
            (Property::HydrogenContent, s.hydrogen_content),
            (Property::AshContent, s.ash_content),
        ];
        for (property, value) in fractions {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    issues.push(format!("{} must be within 0..1, got {}", property, v));
                }
            }
        }
        let total: f64 = fractions.iter().filter_map(|(_, v)| *v).sum();
        if total > 1.0 + 1e-9 {
            issues.push(format!("mass fractions sum to {}", total));
        }
        if let Some(ci) = s.carbon_intensity {
            if ci < 0.0 {
                issues.push(format!("carbon_intensity must not be negative, got {}", ci));
            }
        }

        Ok(ValidationReport {
            substance: id.to_string(),
            issues,
        })
    }
}

fn empty_record(id: &str) -> EnergyError {
    EnergyError::InvalidData(format!("substance '{}' has no properties", id))
}

fn check_numbers(id: &str, record: &Substance) -> EnergyResult<()> {
    for property in Property::ALL {
        if let Some(v) = record.get(property) {
            if !v.is_finite() {
                return Err(EnergyError::InvalidData(format!(
                    "substance '{}' has non-finite {}",
                    id, property
                )));
            }
        }
    }
    Ok(())
}
