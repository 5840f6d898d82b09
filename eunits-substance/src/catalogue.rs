//! Built-in substance catalogue
//!
//! Heating values in MJ/kg, density in kg/m3, carbon intensity in
//! kg CO2/GJ on an LHV basis. Zero-carbon sources carry no heating value:
//! converting their mass to energy is an error, not a zero.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::Substance;

/// Substance fragment: id → (partial) record
pub type SubstanceTable = BTreeMap<String, Substance>;

/// The default catalogue
pub static BUILTIN: LazyLock<SubstanceTable> = LazyLock::new(|| {
    let mut table = SubstanceTable::new();

    // === COAL ===
    fuel(&mut table, "coal", "Coal (generic)", [29.3, 27.8, 833.0], 340.0, [0.75, 0.05, 0.10]);
    fuel(&mut table, "lignite", "Lignite Coal", [15.0, 14.0, 700.0], 400.0, [0.65, 0.04, 0.15]);
    fuel(&mut table, "bituminous", "Bituminous Coal", [30.0, 28.5, 833.0], 330.0, [0.80, 0.05, 0.08]);
    fuel(&mut table, "anthracite", "Anthracite Coal", [32.5, 31.5, 1000.0], 320.0, [0.85, 0.04, 0.05]);

    // === GAS ===
    fuel(&mut table, "natural_gas", "Natural Gas", [55.0, 49.5, 0.75], 200.0, [0.75, 0.25, 0.0]);
    fuel(&mut table, "lng", "Liquefied Natural Gas", [55.0, 49.5, 450.0], 210.0, [0.75, 0.25, 0.0]);
    fuel(&mut table, "methane", "Methane", [55.5, 50.0, 0.68], 200.0, [0.75, 0.25, 0.0]);

    // === OIL ===
    fuel(&mut table, "crude_oil", "Crude Oil", [45.0, 42.5, 870.0], 270.0, [0.85, 0.13, 0.001]);
    fuel(&mut table, "oil", "Oil (generic)", [45.0, 42.5, 870.0], 270.0, [0.85, 0.13, 0.001]);
    fuel(&mut table, "fuel_oil", "Heavy Fuel Oil", [43.0, 40.5, 950.0], 285.0, [0.87, 0.11, 0.005]);
    fuel(&mut table, "diesel", "Diesel", [45.7, 42.8, 840.0], 265.0, [0.86, 0.14, 0.0]);
    fuel(&mut table, "gasoline", "Gasoline", [47.3, 44.0, 750.0], 255.0, [0.85, 0.15, 0.0]);

    // === BIOMASS ===
    fuel(&mut table, "wood_pellets", "Wood Pellets", [20.0, 18.5, 650.0], 20.0, [0.50, 0.06, 0.01]);
    fuel(&mut table, "wood_chips", "Wood Chips", [19.0, 16.0, 350.0], 25.0, [0.48, 0.06, 0.02]);

    // === OTHER FUELS ===
    fuel(&mut table, "hydrogen", "Hydrogen", [142.0, 120.0, 0.09], 0.0, [0.0, 1.0, 0.0]);
    fuel(&mut table, "methanol", "Methanol", [22.7, 19.9, 795.0], 240.0, [0.375, 0.125, 0.0]);

    // === ZERO-CARBON SOURCES ===
    for (id, name) in [
        ("wind", "Wind Energy"),
        ("solar", "Solar Energy"),
        ("hydro", "Hydro Energy"),
        ("nuclear", "Nuclear Energy"),
    ] {
        table.insert(
            id.to_string(),
            Substance {
                name: Some(name.to_string()),
                carbon_intensity: Some(0.0),
                carbon_content: Some(0.0),
                hydrogen_content: Some(0.0),
                ash_content: Some(0.0),
                ..Default::default()
            },
        );
    }

    // === COMBUSTION PRODUCTS ===
    product(&mut table, "CO2", "Carbon Dioxide", 1.98, [0.273, 0.0, 0.0]);
    product(&mut table, "H2O", "Water", 1000.0, [0.0, 0.111, 0.0]);
    product(&mut table, "ash", "Ash", 1500.0, [0.0, 0.0, 1.0]);

    table
});

/// `[hhv, lhv, density]`, intensity in kg CO2/MWh, `[carbon, hydrogen, ash]`
fn fuel(
    table: &mut SubstanceTable,
    id: &str,
    name: &str,
    [hhv, lhv, density]: [f64; 3],
    kg_co2_per_mwh: f64,
    [carbon, hydrogen, ash]: [f64; 3],
) {
    table.insert(
        id.to_string(),
        Substance {
            name: Some(name.to_string()),
            hhv: Some(hhv),
            lhv: Some(lhv),
            density: Some(density),
            // 1 MWh = 3.6 GJ
            carbon_intensity: Some(kg_co2_per_mwh / 3.6),
            carbon_content: Some(carbon),
            hydrogen_content: Some(hydrogen),
            ash_content: Some(ash),
        },
    );
}

fn product(table: &mut SubstanceTable, id: &str, name: &str, density: f64, [carbon, hydrogen, ash]: [f64; 3]) {
    table.insert(
        id.to_string(),
        Substance {
            name: Some(name.to_string()),
            density: Some(density),
            carbon_content: Some(carbon),
            hydrogen_content: Some(hydrogen),
            ash_content: Some(ash),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_carbon_sources_have_no_heating_value() {
        for id in ["wind", "solar", "hydro", "nuclear"] {
            let s = &BUILTIN[id];
            assert!(s.hhv.is_none() && s.lhv.is_none(), "{}", id);
            assert_eq!(s.carbon_intensity, Some(0.0));
        }
    }

    #[test]
    fn test_carbon_intensity_is_per_gj() {
        let coal = &BUILTIN["coal"];
        assert!((coal.carbon_intensity.unwrap() - 340.0 / 3.6).abs() < 1e-9);
    }

    #[test]
    fn test_fuels_have_lhv_not_above_hhv() {
        for (id, s) in BUILTIN.iter() {
            if let (Some(hhv), Some(lhv)) = (s.hhv, s.lhv) {
                assert!(lhv <= hhv, "{}", id);
            }
        }
    }
}
