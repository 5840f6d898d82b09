//! Unit tables - the built-in energy-domain units and the overlay shape

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::compose::{default_rules, CompositionRule};
use crate::{Dimension, UnitDef};

/// A unit table fragment: the default table or a caller overlay.
///
/// Every field is optional in serialized form so an overlay can carry only
/// the entries it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTable {
    pub units: Vec<UnitDef>,
    pub base_units: BTreeMap<Dimension, String>,
    pub composition: Vec<CompositionRule>,
    pub corresponding: BTreeMap<String, String>,
    pub aliases: BTreeMap<String, String>,
}

impl UnitTable {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
            && self.base_units.is_empty()
            && self.composition.is_empty()
            && self.corresponding.is_empty()
            && self.aliases.is_empty()
    }

    pub fn register(&mut self, symbol: &str, dimension: Dimension, factor: f64) {
        self.units.push(UnitDef::new(symbol, dimension, factor));
    }

    pub fn base(&mut self, dimension: Dimension, symbol: &str) {
        self.base_units.insert(dimension, symbol.to_string());
    }

    /// Pair a power unit with its energy unit, both directions
    pub fn correspond(&mut self, power: &str, energy: &str) {
        self.corresponding.insert(power.to_string(), energy.to_string());
        self.corresponding.insert(energy.to_string(), power.to_string());
    }

    pub fn alias(&mut self, alias: &str, symbol: &str) {
        self.aliases.insert(alias.to_string(), symbol.to_string());
    }
}

/// Default unit table
pub fn builtin_table() -> UnitTable {
    let mut t = UnitTable::default();
    register_energy_units(&mut t);
    register_power_units(&mut t);
    register_mass_units(&mut t);
    register_volume_units(&mut t);
    register_time_units(&mut t);
    register_currency_units(&mut t);
    t.composition = default_rules();
    t
}

// Base: MWh
fn register_energy_units(t: &mut UnitTable) {
    t.base(Dimension::ENERGY, "MWh");

    // Joule family (1 MWh = 3600 MJ)
    t.register("J", Dimension::ENERGY, 1e-9 / 3.6);
    t.register("kJ", Dimension::ENERGY, 1e-6 / 3.6);
    t.register("MJ", Dimension::ENERGY, 1e-3 / 3.6);
    t.register("GJ", Dimension::ENERGY, 1.0 / 3.6);
    t.register("TJ", Dimension::ENERGY, 1e3 / 3.6);
    t.register("PJ", Dimension::ENERGY, 1e6 / 3.6);
    t.register("EJ", Dimension::ENERGY, 1e9 / 3.6);

    // Watt-hour family
    t.register("Wh", Dimension::ENERGY, 1e-6);
    t.register("kWh", Dimension::ENERGY, 1e-3);
    t.register("MWh", Dimension::ENERGY, 1.0);
    t.register("GWh", Dimension::ENERGY, 1e3);
    t.register("TWh", Dimension::ENERGY, 1e6);
    t.register("PWh", Dimension::ENERGY, 1e9);

    t.register("MMBTU", Dimension::ENERGY, 0.293071);
    t.alias("MMBtu", "MMBTU");
}

// Base: MW
fn register_power_units(t: &mut UnitTable) {
    t.base(Dimension::POWER, "MW");

    t.register("W", Dimension::POWER, 1e-6);
    t.register("kW", Dimension::POWER, 1e-3);
    t.register("MW", Dimension::POWER, 1.0);
    t.register("GW", Dimension::POWER, 1e3);
    t.register("TW", Dimension::POWER, 1e6);

    t.correspond("W", "Wh");
    t.correspond("kW", "kWh");
    t.correspond("MW", "MWh");
    t.correspond("GW", "GWh");
    t.correspond("TW", "TWh");
}

// Base: t
fn register_mass_units(t: &mut UnitTable) {
    t.base(Dimension::MASS, "t");

    t.register("g", Dimension::MASS, 1e-6);
    t.register("kg", Dimension::MASS, 1e-3);
    t.register("t", Dimension::MASS, 1.0);
    t.register("Mt", Dimension::MASS, 1e6);
    t.register("Gt", Dimension::MASS, 1e9);
    t.alias("tonne", "t");
}

// Base: m3
fn register_volume_units(t: &mut UnitTable) {
    t.base(Dimension::VOLUME, "m3");

    t.register("m3", Dimension::VOLUME, 1.0);
    t.register("L", Dimension::VOLUME, 1e-3);
    t.register("barrel", Dimension::VOLUME, 0.159);
    t.alias("m³", "m3");
    t.alias("l", "L");
    t.alias("bbl", "barrel");
}

// Base: h
fn register_time_units(t: &mut UnitTable) {
    t.base(Dimension::TIME, "h");

    t.register("s", Dimension::TIME, 1.0 / 3600.0);
    t.register("min", Dimension::TIME, 1.0 / 60.0);
    t.register("h", Dimension::TIME, 1.0);
    t.register("a", Dimension::TIME, 8760.0);
    t.alias("yr", "a");
    t.alias("year", "a");
}

// Currencies never convert through unit factors; exchange rates do that.
fn register_currency_units(t: &mut UnitTable) {
    t.base(Dimension::CURRENCY, "USD");

    for code in ["USD", "EUR", "GBP", "JPY", "CNY"] {
        t.register(code, Dimension::CURRENCY, 1.0);
    }
}
