//! Eunits Units - Dimension table and unit registry
//!
//! Maps unit symbols to dimensions and conversion factors, and decides what
//! multiplying or dividing two units produces.
//!
//! Categories (base unit in parentheses):
//! - Energy (MWh): J…EJ, Wh…PWh, MMBTU
//! - Power (MW): W…TW
//! - Mass (t): g, kg, t, Mt, Gt
//! - Volume (m3): m3, L, barrel
//! - Time (h): s, min, h, a
//! - Currency (USD): USD, EUR, GBP, JPY, CNY
//!
//! Compound expressions such as `USD/MWh` or `USD/kW/a` resolve from these.

mod compose;
mod dimension;
mod parse;
mod registry;
mod unit;
mod units;

pub mod symbols;

pub use compose::{compose_dimension, default_rules, CompositionRule, Operator, UnitSource};
pub use dimension::Dimension;
pub use parse::{parse_unit_expr, UnitExpr};
pub use registry::{Product, UnitInfo, UnitRegistry};
pub use unit::{Atom, Unit, UnitDef};
pub use units::{builtin_table, UnitTable};
