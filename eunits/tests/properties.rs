//! Round-trip and invariance properties over the default tables

use eunits::{Basis, Conversion, Dimension, Property, Registry};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-12)
}

const DIMENSIONS: [Dimension; 5] = [
    Dimension::ENERGY,
    Dimension::POWER,
    Dimension::MASS,
    Dimension::VOLUME,
    Dimension::TIME,
];

proptest! {
    #[test]
    fn unit_round_trip(x in -1e9_f64..1e9_f64, d in 0usize..5, i in 0usize..32, j in 0usize..32) {
        let registry = Registry::builtin();
        let units = registry.list_units(Some(&DIMENSIONS[d]));
        let (u, v) = (units[i % units.len()], units[j % units.len()]);

        let there = registry.quantity(x, u).unwrap().to(v).unwrap();
        let back = there.to(u).unwrap();
        prop_assert!(close(back.scalar().unwrap(), x), "{} {} -> {} -> {}", x, u, v, back);
    }

    #[test]
    fn basis_round_trip(x in 1e-3_f64..1e9_f64, i in 0usize..64, unit in prop::sample::select(vec!["MWh", "GJ", "USD/MWh"])) {
        let registry = Registry::builtin();
        let fuels: Vec<&str> = registry
            .list_substances(Some(Property::Hhv))
            .into_iter()
            .filter(|s| registry.substances().properties(s).unwrap().lhv.is_some())
            .collect();
        let fuel = fuels[i % fuels.len()];

        let hhv = registry
            .quantity(x, unit)
            .unwrap()
            .with_substance(fuel)
            .unwrap()
            .with_basis(Basis::Hhv);
        let back = hhv.to_lhv().unwrap().to_hhv().unwrap();
        prop_assert!(close(back.scalar().unwrap(), x));
        prop_assert_eq!(back.basis(), Some(Basis::Hhv));
    }

    #[test]
    fn inflation_idempotent(c in 0usize..5, year in 2010i32..2031) {
        let registry = Registry::builtin();
        let currency = registry.list_currencies()[c];
        prop_assert_eq!(registry.economics().inflation_factor(currency, year, year).unwrap(), 1.0);
    }

    #[test]
    fn inflation_inverse(c in 0usize..5, a in 2010i32..2031, b in 2010i32..2031) {
        let registry = Registry::builtin();
        let currency = registry.list_currencies()[c];
        let forward = registry.economics().inflation_factor(currency, a, b).unwrap();
        let backward = registry.economics().inflation_factor(currency, b, a).unwrap();
        prop_assert!(close(forward, 1.0 / backward));
    }

    #[test]
    fn price_year_round_trip(x in 1e-3_f64..1e6_f64, a in 2010i32..2031, b in 2010i32..2031) {
        let registry = Registry::builtin();
        let price = registry.quantity(x, "EUR/MWh").unwrap().with_reference_year(a);
        let back = price
            .to(Conversion::new().reference_year(b))
            .unwrap()
            .to(Conversion::new().reference_year(a))
            .unwrap();
        prop_assert!(close(back.scalar().unwrap(), x));
        prop_assert_eq!(back.reference_year(), Some(a));
    }
}
