//! The registry bundle every quantity is built against
//!
//! `Registry` owns the unit, substance and economic registries plus the
//! engine settings. Overlays need `&mut self`, so the borrow checker keeps
//! them from interleaving with live quantities, which borrow the registry.

use eunits_core::{EnergyError, EnergyResult, Value};
use eunits_econ::EconomicRegistry;
use eunits_substance::{Bridge, Property, SubstanceRegistry};
use eunits_units::{Dimension, UnitRegistry};
use tracing::{debug, warn};

use crate::{DataSource, DataTables, MetadataPolicy, MetadataWarning, Quantity, Settings};

#[derive(Debug, Clone, Default)]
pub struct Registry {
    units: UnitRegistry,
    substances: SubstanceRegistry,
    economics: EconomicRegistry,
    settings: Settings,
}

impl Registry {
    /// Registry over the default tables
    pub fn builtin() -> Self {
        Registry {
            units: UnitRegistry::builtin(),
            substances: SubstanceRegistry::builtin(),
            economics: EconomicRegistry::builtin(),
            settings: Settings::default(),
        }
    }

    /// Registry holding only what `source` supplies
    pub fn from_source(source: &impl DataSource) -> EnergyResult<Self> {
        let mut registry = Registry::default();
        registry.extend(source)?;
        Ok(registry)
    }

    /// Overlay another source, last write wins per key.
    ///
    /// All-or-nothing: a fragment that fails validation leaves the registry
    /// as it was.
    pub fn extend(&mut self, source: &impl DataSource) -> EnergyResult<()> {
        let tables = source.tables()?;
        let mut next = self.clone();
        next.apply(tables)?;
        *self = next;
        Ok(())
    }

    fn apply(&mut self, tables: DataTables) -> EnergyResult<()> {
        if let Some(units) = tables.units {
            debug!(units = units.units.len(), rules = units.composition.len(), "overlaying unit table");
            self.units.extend(units)?;
        }
        if let Some(substances) = tables.substances {
            debug!(substances = substances.len(), "overlaying substance table");
            self.substances.extend(substances)?;
        }
        if let Some(economics) = tables.economics {
            debug!(
                inflation = economics.inflation.len(),
                exchange = economics.exchange_rates.len(),
                "overlaying economic table"
            );
            self.economics.extend(economics)?;
            self.register_currency_units()?;
        }
        if let Some(settings) = tables.settings {
            debug!(?settings, "replacing settings");
            self.settings = settings;
        }
        Ok(())
    }

    /// Currencies with rate data are usable as units
    fn register_currency_units(&mut self) -> EnergyResult<()> {
        let missing: Vec<String> = self
            .economics
            .supported_currencies()
            .into_iter()
            .filter(|c| !self.units.contains(c))
            .map(str::to_string)
            .collect();
        for code in missing {
            debug!(currency = %code, "registering currency unit");
            self.units.add_unit(&code, Dimension::CURRENCY, 1.0)?;
        }
        Ok(())
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    // ========== Accessors ==========

    pub fn units(&self) -> &UnitRegistry {
        &self.units
    }

    pub fn units_mut(&mut self) -> &mut UnitRegistry {
        &mut self.units
    }

    pub fn substances(&self) -> &SubstanceRegistry {
        &self.substances
    }

    pub fn substances_mut(&mut self) -> &mut SubstanceRegistry {
        &mut self.substances
    }

    pub fn economics(&self) -> &EconomicRegistry {
        &self.economics
    }

    pub fn economics_mut(&mut self) -> &mut EconomicRegistry {
        &mut self.economics
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bridge(&self) -> Bridge<'_> {
        Bridge::new(&self.units, &self.substances)
    }

    // ========== Quantities ==========

    pub fn quantity(&self, value: impl Into<Value>, unit: &str) -> EnergyResult<Quantity<'_>> {
        Quantity::new(value, unit, self)
    }

    /// Parse a literal such as `"30 USD/MWh natural_gas HHV @2020"`
    pub fn parse(&self, input: &str) -> EnergyResult<Quantity<'_>> {
        Quantity::parse(input, self)
    }

    // ========== Metadata warnings ==========

    /// Apply the metadata policy to a conflict found by arithmetic.
    ///
    /// Under `Warn` the conflict is logged and handed back so the result
    /// quantity can carry it.
    pub(crate) fn metadata_conflict(&self, warning: MetadataWarning) -> EnergyResult<MetadataWarning> {
        match self.settings.metadata_policy {
            MetadataPolicy::Strict => Err(EnergyError::MetadataConflict {
                field: warning.field,
                left: warning.left,
                right: warning.right,
            }),
            MetadataPolicy::Warn => {
                warn!(
                    field = warning.field,
                    left = %warning.left,
                    right = %warning.right,
                    "conflicting metadata dropped from result"
                );
                Ok(warning)
            }
        }
    }

    // ========== Discovery ==========

    pub fn list_units(&self, dimension: Option<&Dimension>) -> Vec<&str> {
        self.units.list_units(dimension)
    }

    pub fn list_dimensions(&self) -> Vec<Dimension> {
        self.units.list_dimensions()
    }

    pub fn list_substances(&self, has_property: Option<Property>) -> Vec<&str> {
        self.substances.list(has_property)
    }

    pub fn list_currencies(&self) -> Vec<&str> {
        self.economics.supported_currencies()
    }
}
