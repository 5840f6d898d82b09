//! Unit registry - conversion factors, base units and composition rules
//!
//! Lookups resolve a unit string into a dimension-tagged [`Unit`] once and
//! memoise it. Every edit or overlay clears the memo so later lookups see
//! the new data.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::debug;

use eunits_core::{closest_matches, EnergyError, EnergyResult, Value};

use crate::compose::{compose_dimension, CompositionRule, Operator, UnitSource};
use crate::parse::{parse_unit_expr, render};
use crate::unit::Atom;
use crate::units::{builtin_table, UnitTable};
use crate::{Dimension, Unit, UnitDef};

/// Number of nearest matches reported for an unknown symbol
const SUGGESTIONS: usize = 3;

/// Result unit of a multiplication or division.
///
/// `result value = lhs value op rhs value × scale`, expressed in `unit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub unit: String,
    pub dimension: Dimension,
    pub scale: f64,
}

/// Everything the registry knows about one unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitInfo {
    pub symbol: String,
    pub dimension: Dimension,
    pub factor: f64,
    pub base_unit: Option<String>,
    pub is_base: bool,
    pub corresponding: Option<String>,
    pub is_compound: bool,
}

#[derive(Debug, Default)]
pub struct UnitRegistry {
    units: HashMap<String, UnitDef>,
    aliases: HashMap<String, String>,
    base_units: HashMap<Dimension, String>,
    corresponding: HashMap<String, String>,
    rules: Vec<CompositionRule>,
    cache: RwLock<HashMap<String, Arc<Unit>>>,
}

impl Clone for UnitRegistry {
    fn clone(&self) -> Self {
        UnitRegistry {
            units: self.units.clone(),
            aliases: self.aliases.clone(),
            base_units: self.base_units.clone(),
            corresponding: self.corresponding.clone(),
            rules: self.rules.clone(),
            cache: RwLock::new(HashMap::new()),
        }
    }
}

impl UnitRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the default energy-domain table
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.merge(builtin_table());
        registry
    }

    pub fn from_table(table: UnitTable) -> EnergyResult<Self> {
        let mut registry = Self::new();
        registry.extend(table)?;
        Ok(registry)
    }

    // ========== Overlay / edits ==========

    /// Overlay a table fragment, last write wins per key
    pub fn extend(&mut self, table: UnitTable) -> EnergyResult<()> {
        for def in &table.units {
            validate_def(def)?;
        }
        self.merge(table);
        Ok(())
    }

    fn merge(&mut self, table: UnitTable) {
        let counts = (
            table.units.len(),
            table.base_units.len(),
            table.composition.len(),
            table.corresponding.len(),
        );

        for (dimension, symbol) in table.base_units {
            self.base_units.insert(dimension, symbol);
        }
        for def in table.units {
            self.insert_unit(def);
        }
        for rule in table.composition {
            self.insert_rule(rule);
        }
        for (unit, other) in table.corresponding {
            self.corresponding.insert(unit, other);
        }
        for (alias, symbol) in table.aliases {
            self.aliases.insert(alias, symbol);
        }

        self.invalidate();
        debug!(
            units = counts.0,
            base_units = counts.1,
            rules = counts.2,
            corresponding = counts.3,
            "unit table merged"
        );
    }

    /// Register a unit; the first unit of a new dimension becomes its base
    pub fn add_unit(&mut self, symbol: &str, dimension: Dimension, factor: f64) -> EnergyResult<()> {
        let def = UnitDef::new(symbol, dimension, factor);
        validate_def(&def)?;
        self.insert_unit(def);
        self.invalidate();
        Ok(())
    }

    /// Register `symbol` as `1 symbol = value × reference`
    pub fn add_unit_with_reference(
        &mut self,
        symbol: &str,
        dimension: Dimension,
        value: f64,
        reference: &str,
    ) -> EnergyResult<()> {
        let reference_def = self.definition(reference)?;
        if reference_def.dimension != dimension {
            return Err(EnergyError::incompatible(
                "define",
                symbol,
                &dimension,
                reference,
                &reference_def.dimension,
            ));
        }
        let factor = value * reference_def.factor;
        self.add_unit(symbol, dimension, factor)
    }

    /// Pair two units in both directions (e.g. a power unit with its energy unit)
    pub fn add_corresponding_unit(&mut self, a: &str, b: &str) -> EnergyResult<()> {
        let a = self.definition(a)?.symbol.clone();
        let b = self.definition(b)?.symbol.clone();
        self.corresponding.insert(a.clone(), b.clone());
        self.corresponding.insert(b, a);
        self.invalidate();
        Ok(())
    }

    /// Withdraw a unit together with its aliases and correspondences.
    ///
    /// A dimension's base unit cannot be removed: every other factor of the
    /// dimension is expressed against it.
    pub fn remove_unit(&mut self, symbol: &str) -> EnergyResult<()> {
        let def = self.definition(symbol)?;
        let symbol = def.symbol.clone();
        if self.base_units.get(&def.dimension) == Some(&symbol) {
            return Err(EnergyError::BaseUnitInUse {
                unit: symbol,
                dimension: def.dimension.to_string(),
            });
        }

        self.units.remove(&symbol);
        if let Some(other) = self.corresponding.remove(&symbol) {
            if self.corresponding.get(&other) == Some(&symbol) {
                self.corresponding.remove(&other);
            }
        }
        self.aliases.retain(|_, target| *target != symbol);
        self.invalidate();
        debug!(unit = %symbol, "unit removed");
        Ok(())
    }

    /// Add or replace the rule for a (lhs, op, rhs) triple
    pub fn add_rule(&mut self, rule: CompositionRule) {
        self.insert_rule(rule);
        self.invalidate();
    }

    fn insert_unit(&mut self, mut def: UnitDef) {
        if !self.base_units.contains_key(&def.dimension) {
            debug!(unit = %def.symbol, dimension = %def.dimension, "new dimension, unit becomes its base");
            self.base_units.insert(def.dimension.clone(), def.symbol.clone());
            def.factor = 1.0;
        }

        self.units.insert(def.symbol.clone(), def);
    }

    fn insert_rule(&mut self, rule: CompositionRule) {
        self.rules.retain(|r| !r.matches(&rule.lhs, &rule.rhs, rule.op));
        self.rules.push(rule);
    }

    fn invalidate(&mut self) {
        self.cache
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    // ========== Lookup ==========

    fn canonical<'a>(&'a self, symbol: &'a str) -> &'a str {
        if self.units.contains_key(symbol) {
            symbol
        } else {
            self.aliases.get(symbol).map(String::as_str).unwrap_or(symbol)
        }
    }

    fn definition(&self, symbol: &str) -> EnergyResult<&UnitDef> {
        self.units
            .get(self.canonical(symbol))
            .ok_or_else(|| self.unknown(symbol))
    }

    fn unknown(&self, symbol: &str) -> EnergyError {
        EnergyError::UnknownUnit {
            unit: symbol.to_string(),
            suggestions: closest_matches(symbol, self.units.keys().map(String::as_str), SUGGESTIONS),
        }
    }

    /// Resolve a unit expression into a dimension-tagged handle
    pub fn resolve(&self, symbol: &str) -> EnergyResult<Arc<Unit>> {
        {
            let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(unit) = cache.get(symbol) {
                return Ok(Arc::clone(unit));
            }
        }

        let unit = Arc::new(self.build(symbol)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(symbol.to_string(), Arc::clone(&unit));
        Ok(unit)
    }

    fn build(&self, symbol: &str) -> EnergyResult<Unit> {
        let expr = parse_unit_expr(symbol)?;

        let mut atoms = Vec::with_capacity(expr.numerator.len() + expr.denominator.len());
        for s in &expr.numerator {
            atoms.push(self.atom(s, 1)?);
        }
        for s in &expr.denominator {
            atoms.push(self.atom(s, -1)?);
        }
        Ok(self.assemble(atoms))
    }

    fn atom(&self, symbol: &str, exponent: i32) -> EnergyResult<Atom> {
        let def = self.definition(symbol)?;
        Ok(Atom {
            symbol: def.symbol.clone(),
            dimension: def.dimension.clone(),
            factor: def.factor,
            exponent,
        })
    }

    fn assemble(&self, atoms: Vec<Atom>) -> Unit {
        let factor = atoms.iter().fold(1.0, |acc, a| {
            if a.exponent > 0 {
                acc * a.factor
            } else {
                acc / a.factor
            }
        });
        let dimension = self.atoms_dimension(&atoms);
        Unit {
            symbol: render(&atoms),
            dimension,
            factor,
            atoms,
        }
    }

    fn atoms_dimension(&self, atoms: &[Atom]) -> Dimension {
        let mut numerator: Option<Dimension> = None;
        for atom in atoms.iter().filter(|a| a.exponent > 0) {
            numerator = Some(match numerator {
                None => atom.dimension.clone(),
                Some(d) => self.compose_dimension(&d, &atom.dimension, Operator::Multiply).0,
            });
        }
        let mut dimension = numerator.unwrap_or(Dimension::DIMENSIONLESS);
        for atom in atoms.iter().filter(|a| a.exponent < 0) {
            dimension = self.compose_dimension(&dimension, &atom.dimension, Operator::Divide).0;
        }
        dimension
    }

    pub fn dimension_of(&self, symbol: &str) -> EnergyResult<Dimension> {
        Ok(self.resolve(symbol)?.dimension.clone())
    }

    /// Multiplier from `symbol` to its dimension's base unit
    pub fn factor(&self, symbol: &str) -> EnergyResult<f64> {
        Ok(self.resolve(symbol)?.factor)
    }

    pub fn base_unit(&self, dimension: &Dimension) -> Option<&str> {
        self.base_units.get(dimension).map(String::as_str)
    }

    pub fn corresponding_unit(&self, symbol: &str) -> Option<&str> {
        self.corresponding
            .get(self.canonical(symbol))
            .map(String::as_str)
    }

    pub fn rules(&self) -> &[CompositionRule] {
        &self.rules
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.resolve(symbol).is_ok()
    }

    // ========== Conversion ==========

    /// Factor `f(from) / f(to)` for two units of the same dimension.
    ///
    /// Currency atoms are not compared: callers that change currency apply
    /// exchange rates themselves.
    pub fn scale_factor(&self, from: &str, to: &str) -> EnergyResult<f64> {
        let from_unit = self.resolve(from)?;
        let to_unit = self.resolve(to)?;
        if from_unit.dimension != to_unit.dimension {
            return Err(EnergyError::incompatible(
                "convert",
                &from_unit.symbol,
                &from_unit.dimension,
                &to_unit.symbol,
                &to_unit.dimension,
            ));
        }
        Ok(from_unit.factor / to_unit.factor)
    }

    /// Unit-factor conversion; rejects currency changes
    pub fn conversion_factor(&self, from: &str, to: &str) -> EnergyResult<f64> {
        let factor = self.scale_factor(from, to)?;
        let from_unit = self.resolve(from)?;
        let to_unit = self.resolve(to)?;
        if from_unit.currency_symbols() != to_unit.currency_symbols() {
            return Err(EnergyError::CurrencyMismatch {
                from: from_unit.symbol.clone(),
                to: to_unit.symbol.clone(),
            });
        }
        Ok(factor)
    }

    /// Convert a value between two units of the same dimension
    pub fn convert(&self, value: &Value, from: &str, to: &str) -> EnergyResult<Value> {
        let factor = self.conversion_factor(from, to)?;
        Ok(value.scale(factor))
    }

    // ========== Composition ==========

    pub fn compose_dimension(
        &self,
        a: &Dimension,
        b: &Dimension,
        op: Operator,
    ) -> (Dimension, Option<UnitSource>) {
        compose_dimension(&self.rules, a, b, op)
    }

    pub fn multiply(&self, lhs: &str, rhs: &str) -> EnergyResult<Product> {
        self.combine(lhs, rhs, Operator::Multiply)
    }

    pub fn divide(&self, lhs: &str, rhs: &str) -> EnergyResult<Product> {
        self.combine(lhs, rhs, Operator::Divide)
    }

    fn combine(&self, lhs: &str, rhs: &str, op: Operator) -> EnergyResult<Product> {
        let lhs = self.resolve(lhs)?;
        let rhs = self.resolve(rhs)?;

        if rhs.is_dimensionless() {
            return Ok(product_of(&lhs, 1.0));
        }
        if lhs.is_dimensionless() && op == Operator::Multiply {
            return Ok(product_of(&rhs, 1.0));
        }

        let mut atoms = lhs.atoms.clone();
        atoms.extend(rhs.atoms.iter().map(|a| match op {
            Operator::Multiply => a.clone(),
            Operator::Divide => a.inverted(),
        }));

        // Matching numerator/denominator atoms cancel (USD/kW × MW → USD)
        let (atoms, scale, cancelled) = cancel_atoms(atoms);
        if cancelled {
            let unit = self.assemble(atoms);
            return Ok(product_of(&unit, scale));
        }

        if let Some(rule) = self
            .rules
            .iter()
            .rev()
            .find(|r| r.matches(&lhs.dimension, &rhs.dimension, op))
        {
            let preferred = match rule.unit_source {
                UnitSource::Lhs => self.corresponding_unit(&lhs.symbol),
                UnitSource::Rhs => self.corresponding_unit(&rhs.symbol),
                UnitSource::Base => None,
            }
            .filter(|s| self.units.get(*s).is_some_and(|d| d.dimension == rule.result));

            let symbol = preferred
                .or_else(|| self.base_unit(&rule.result))
                .ok_or_else(|| {
                    EnergyError::InvalidData(format!("dimension {} has no base unit", rule.result))
                })?;
            let target = self.resolve(symbol)?;
            let raw = match op {
                Operator::Multiply => lhs.factor * rhs.factor,
                Operator::Divide => lhs.factor / rhs.factor,
            };
            return Ok(product_of(&target, raw / target.factor));
        }

        Ok(product_of(&self.assemble(atoms), 1.0))
    }

    // ========== Discovery ==========

    pub fn unit_info(&self, symbol: &str) -> EnergyResult<UnitInfo> {
        let unit = self.resolve(symbol)?;
        let base_unit = self.base_unit(&unit.dimension).map(str::to_string);
        Ok(UnitInfo {
            symbol: unit.symbol.clone(),
            dimension: unit.dimension.clone(),
            factor: unit.factor,
            is_base: base_unit.as_deref() == Some(unit.symbol.as_str()),
            base_unit,
            corresponding: self.corresponding_unit(&unit.symbol).map(str::to_string),
            is_compound: unit.is_compound(),
        })
    }

    /// Registered symbols, optionally restricted to one dimension, sorted
    pub fn list_units(&self, dimension: Option<&Dimension>) -> Vec<&str> {
        let mut symbols: Vec<&str> = self
            .units
            .values()
            .filter(|d| dimension.map_or(true, |dim| d.dimension == *dim))
            .map(|d| d.symbol.as_str())
            .collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn list_dimensions(&self) -> Vec<Dimension> {
        let dims: BTreeSet<Dimension> = self
            .units
            .values()
            .map(|d| d.dimension.clone())
            .chain(self.base_units.keys().cloned())
            .collect();
        dims.into_iter().collect()
    }

    /// Consistency problems in the current table, empty when sound
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for dimension in self.list_dimensions() {
            match self.base_units.get(&dimension) {
                None => issues.push(format!("dimension {} has no base unit", dimension)),
                Some(base) => match self.units.get(base) {
                    None => issues.push(format!(
                        "base unit '{}' of {} is not registered",
                        base, dimension
                    )),
                    Some(def) if def.dimension != dimension => issues.push(format!(
                        "base unit '{}' of {} belongs to {}",
                        base, dimension, def.dimension
                    )),
                    Some(def) if def.factor != 1.0 => issues.push(format!(
                        "base unit '{}' of {} has factor {}",
                        base, dimension, def.factor
                    )),
                    Some(_) => {}
                },
            }
        }

        let mut pairs: Vec<(&String, &String)> = self.corresponding.iter().collect();
        pairs.sort();
        for (a, b) in pairs {
            if !self.units.contains_key(a) || !self.units.contains_key(b) {
                issues.push(format!("orphaned correspondence {} -> {}", a, b));
            } else if self.corresponding.get(b) != Some(a) {
                issues.push(format!("one-way correspondence {} -> {}", a, b));
            }
        }

        issues
    }
}

fn product_of(unit: &Unit, scale: f64) -> Product {
    Product {
        unit: unit.symbol.clone(),
        dimension: unit.dimension.clone(),
        scale,
    }
}

/// Cancel numerator atoms against denominator atoms of the same dimension.
///
/// Returns the remaining atoms, the accumulated factor ratio and whether
/// anything cancelled.
fn cancel_atoms(mut atoms: Vec<Atom>) -> (Vec<Atom>, f64, bool) {
    let mut scale = 1.0;
    let mut cancelled = false;

    loop {
        let pair = atoms.iter().enumerate().find_map(|(i, p)| {
            if p.exponent <= 0 {
                return None;
            }
            atoms.iter().position(|n| p.cancels(n)).map(|j| (i, j))
        });

        let Some((i, j)) = pair else { break };
        scale *= atoms[i].factor / atoms[j].factor;
        cancelled = true;
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        atoms.remove(hi);
        atoms.remove(lo);
    }

    (atoms, scale, cancelled)
}

fn validate_def(def: &UnitDef) -> EnergyResult<()> {
    let symbol = &def.symbol;
    if symbol.is_empty()
        || symbol == "1"
        || symbol.contains(['/', '*', '·'])
        || symbol.chars().any(char::is_whitespace)
    {
        return Err(EnergyError::InvalidData(format!(
            "invalid unit symbol '{}'",
            symbol
        )));
    }
    if !def.factor.is_finite() || def.factor <= 0.0 {
        return Err(EnergyError::InvalidData(format!(
            "unit '{}' has non-positive factor {}",
            symbol, def.factor
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use eunits_core::{approx_eq, codes};

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            approx_eq(actual, expected, 1e-9),
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn registry() -> UnitRegistry {
        UnitRegistry::builtin()
    }

    #[test]
    fn test_dimension_of() {
        let r = registry();
        assert_eq!(r.dimension_of("MWh").unwrap(), Dimension::ENERGY);
        assert_eq!(r.dimension_of("kg").unwrap(), Dimension::MASS);
        assert_eq!(r.dimension_of("USD").unwrap(), Dimension::CURRENCY);
        assert_eq!(r.dimension_of("").unwrap(), Dimension::DIMENSIONLESS);
    }

    #[test]
    fn test_unknown_unit_has_suggestions() {
        let err = registry().dimension_of("MWH").unwrap_err();
        match err {
            EnergyError::UnknownUnit { unit, suggestions } => {
                assert_eq!(unit, "MWH");
                assert!(suggestions.contains(&"MWh".to_string()));
                assert!(suggestions.len() <= 3);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_convert_energy() {
        let r = registry();
        let v = r.convert(&Value::from(1.0), "MWh", "GJ").unwrap();
        assert_close(v.as_scalar().unwrap(), 3.6);
        let v = r.convert(&Value::from(1.0), "kWh", "MJ").unwrap();
        assert_close(v.as_scalar().unwrap(), 3.6);
    }

    #[test]
    fn test_convert_array() {
        let r = registry();
        let v = r.convert(&Value::from(vec![1.0, 2.0]), "t", "kg").unwrap();
        assert!(v.approx_eq(&Value::from(vec![1000.0, 2000.0]), 1e-12));
    }

    #[test]
    fn test_convert_incompatible() {
        let err = registry().convert(&Value::from(1.0), "MWh", "kg").unwrap_err();
        assert!(matches!(err, EnergyError::IncompatibleDimension { .. }));
    }

    #[test]
    fn test_convert_currency_rejected() {
        let err = registry().convert(&Value::from(1.0), "USD", "EUR").unwrap_err();
        assert!(matches!(err, EnergyError::CurrencyMismatch { .. }));
        // scale_factor ignores currency
        assert_eq!(registry().scale_factor("USD", "EUR").unwrap(), 1.0);
    }

    #[test]
    fn test_compound_units() {
        let r = registry();
        let unit = r.resolve("USD/MWh").unwrap();
        assert_eq!(unit.dimension.as_str(), "CURRENCY_PER_ENERGY");
        assert_close(r.scale_factor("USD/MWh", "USD/kWh").unwrap(), 1e-3);
        assert_eq!(r.dimension_of("MWh/h").unwrap(), Dimension::POWER);
        assert_eq!(r.dimension_of("kg/m3").unwrap().as_str(), "MASS_PER_VOLUME");
        assert_close(r.factor("USD/kW/a").unwrap(), 1.0 / (1e-3 * 8760.0));
    }

    #[test]
    fn test_aliases_resolve_to_canonical() {
        let r = registry();
        assert_eq!(r.resolve("tonne").unwrap().symbol, "t");
        assert_eq!(r.resolve("USD / MWh").unwrap().symbol, "USD/MWh");
    }

    #[test]
    fn test_multiply_power_time_uses_corresponding_unit() {
        let r = registry();
        let p = r.multiply("MW", "h").unwrap();
        assert_eq!(p.unit, "MWh");
        assert_close(p.scale, 1.0);

        let p = r.multiply("h", "kW").unwrap();
        assert_eq!(p.unit, "kWh");
        assert_close(p.scale, 1.0);

        let p = r.multiply("kW", "a").unwrap();
        assert_eq!(p.unit, "kWh");
        assert_close(p.scale, 8760.0);
    }

    #[test]
    fn test_divide_energy_by_time_and_power() {
        let r = registry();
        let p = r.divide("GWh", "h").unwrap();
        assert_eq!(p.unit, "GW");
        assert_close(p.scale, 1.0);

        let p = r.divide("MWh", "MW").unwrap();
        assert_eq!(p.unit, "h");
        assert_eq!(p.dimension, Dimension::TIME);
    }

    #[test]
    fn test_cancellation() {
        let r = registry();
        let p = r.multiply("USD/kW", "MW").unwrap();
        assert_eq!(p.unit, "USD");
        assert_close(p.scale, 1000.0);

        let p = r.multiply("MW", "USD/kW").unwrap();
        assert_eq!(p.unit, "USD");
        assert_close(p.scale, 1000.0);

        let p = r.divide("MWh", "kWh").unwrap();
        assert_eq!(p.unit, "");
        assert!(p.dimension.is_dimensionless());
        assert_close(p.scale, 1000.0);
    }

    #[test]
    fn test_literal_product() {
        let r = registry();
        let p = r.multiply("MWh", "kg").unwrap();
        assert_eq!(p.unit, "MWh·kg");
        assert_eq!(p.dimension.as_str(), "ENERGY·MASS");
        assert_close(p.scale, 1.0);

        let p = r.divide("USD", "MWh").unwrap();
        assert_eq!(p.unit, "USD/MWh");
    }

    #[test]
    fn test_add_unit_overlay_clears_cache() {
        let mut r = registry();
        assert!(r.resolve("quad").is_err());
        r.add_unit_with_reference("quad", Dimension::ENERGY, 1e9, "MMBTU").unwrap();
        assert_close(r.factor("quad").unwrap(), 0.293071e9);

        // cached compound picks up the redefinition
        assert_close(r.factor("USD/MMBTU").unwrap(), 1.0 / 0.293071);
        r.add_unit("MMBTU", Dimension::ENERGY, 0.3).unwrap();
        assert_close(r.factor("USD/MMBTU").unwrap(), 1.0 / 0.3);
    }

    #[test]
    fn test_add_unit_new_dimension_becomes_base() {
        let mut r = registry();
        r.add_unit("tCO2e", Dimension::new("EMISSIONS"), 5.0).unwrap();
        assert_eq!(r.base_unit(&Dimension::new("EMISSIONS")), Some("tCO2e"));
        assert_eq!(r.factor("tCO2e").unwrap(), 1.0);
    }

    #[test]
    fn test_add_unit_rejects_bad_input() {
        let mut r = registry();
        assert!(r.add_unit("a/b", Dimension::ENERGY, 1.0).is_err());
        assert!(r.add_unit("x", Dimension::ENERGY, 0.0).is_err());
        assert!(r.add_unit("y", Dimension::ENERGY, f64::NAN).is_err());
    }

    #[test]
    fn test_add_corresponding_unit() {
        let mut r = registry();
        r.add_unit("PW", Dimension::POWER, 1e9).unwrap();
        r.add_corresponding_unit("PW", "PWh").unwrap();
        assert_eq!(r.corresponding_unit("PWh"), Some("PW"));
        let p = r.multiply("PW", "h").unwrap();
        assert_eq!(p.unit, "PWh");
        assert!(r.add_corresponding_unit("PW", "nope").is_err());
    }

    #[test]
    fn test_remove_unit() {
        let mut r = registry();
        r.add_unit("PW", Dimension::POWER, 1e9).unwrap();
        r.add_corresponding_unit("PW", "PWh").unwrap();
        assert_eq!(r.factor("PW").unwrap(), 1e9);

        r.remove_unit("PW").unwrap();
        assert!(!r.contains("PW"));
        assert!(!r.list_units(Some(&Dimension::POWER)).contains(&"PW"));
        assert_eq!(r.corresponding_unit("PWh"), None);
        assert!(r.validate().is_empty());
        assert_eq!(r.remove_unit("PW").unwrap_err().code(), codes::UNKNOWN_UNIT);
    }

    #[test]
    fn test_remove_unit_drops_cached_compounds() {
        let mut r = registry();
        assert!(r.contains("USD/MMBTU"));
        r.remove_unit("MMBTU").unwrap();
        assert!(!r.contains("USD/MMBTU"));
        assert!(!r.contains("MMBTU"));
    }

    #[test]
    fn test_cannot_remove_base_unit() {
        let mut r = registry();
        let err = r.remove_unit("MWh").unwrap_err();
        assert_eq!(err.code(), codes::BASE_UNIT_IN_USE);
        assert!(err.to_string().contains("ENERGY"));
        assert!(r.contains("MWh"));
    }

    #[test]
    fn test_overlay_rule_last_write_wins() {
        let mut r = registry();
        r.add_rule(CompositionRule::new(
            Dimension::POWER,
            Operator::Multiply,
            Dimension::TIME,
            Dimension::ENERGY,
            UnitSource::Base,
        ));
        assert_eq!(r.rules().len(), 4);
        let p = r.multiply("kW", "h").unwrap();
        assert_eq!(p.unit, "MWh");
        assert_close(p.scale, 1e-3);
    }

    #[test]
    fn test_unit_info() {
        let info = registry().unit_info("MW").unwrap();
        assert_eq!(info.dimension, Dimension::POWER);
        assert!(info.is_base);
        assert_eq!(info.corresponding.as_deref(), Some("MWh"));
        assert!(!info.is_compound);
    }

    #[test]
    fn test_list_units_and_dimensions() {
        let r = registry();
        let power = r.list_units(Some(&Dimension::POWER));
        assert_eq!(power, vec!["GW", "MW", "TW", "W", "kW"]);
        let dims = r.list_dimensions();
        assert!(dims.contains(&Dimension::CURRENCY));
        assert_eq!(dims.len(), 6);
    }

    #[test]
    fn test_validate() {
        let mut r = registry();
        assert!(r.validate().is_empty());
        r.extend(UnitTable {
            corresponding: [("kg".to_string(), "barrel".to_string())].into(),
            ..Default::default()
        })
        .unwrap();
        let issues = r.validate();
        assert!(issues.iter().any(|i| i.contains("one-way")));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use eunits_core::approx_eq;
    use proptest::prelude::*;

    const ENERGY: [&str; 14] = [
        "J", "kJ", "MJ", "GJ", "TJ", "PJ", "EJ", "Wh", "kWh", "MWh", "GWh", "TWh", "PWh", "MMBTU",
    ];

    proptest! {
        #[test]
        fn same_dimension_round_trip(
            x in -1e9_f64..1e9_f64,
            i in 0..ENERGY.len(),
            j in 0..ENERGY.len(),
        ) {
            let r = UnitRegistry::builtin();
            let there = r.convert(&Value::from(x), ENERGY[i], ENERGY[j]).unwrap();
            let back = r.convert(&there, ENERGY[j], ENERGY[i]).unwrap();
            let back = back.as_scalar().unwrap();
            prop_assert!(approx_eq(back, x, 1e-9) || (back - x).abs() < 1e-9);
        }
    }
}
