//! Eunits Econ - Inflation and exchange rates
//!
//! Time-indexed inflation series and exchange rates per currency, with the
//! inflate-then-convert convention for combined year and currency changes.
//! Exchange rates are units of currency per 1 base currency (USD by default).

mod data;
mod registry;

pub use data::{EconomicTable, Series, BASE_CURRENCY, BUILTIN};
pub use registry::{EconomicRegistry, YearCoverage};
