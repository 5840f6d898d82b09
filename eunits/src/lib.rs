//! Eunits - Energy quantities with dimensional analysis
//!
//! A [`Quantity`] is a value with a unit and optional substance, heating
//! value basis and price year. One entry point converts along any of
//! those axes:
//!
//! ```ignore
//! use eunits::{Conversion, Registry};
//!
//! let registry = Registry::builtin();
//! let coal = registry.parse("1000 kg coal")?;
//! let energy = coal.to("MWh")?;
//! let co2 = coal.to(Conversion::new().substance("CO2").unit("t"))?;
//! let price = registry.parse("50 EUR/MWh @2015")?
//!     .to(Conversion::new().unit("USD/MWh").reference_year(2024))?;
//! ```
//!
//! Arithmetic picks result units from composition rules (`MW × h → MWh`)
//! and records a [`MetadataWarning`] when operands disagree on metadata.

mod arith;
mod convert;
mod parse;
mod quantity;
mod registry;
mod settings;
mod source;

use std::sync::LazyLock;

pub use arith::MetadataWarning;
pub use convert::Conversion;
pub use quantity::Quantity;
pub use registry::Registry;
pub use settings::{MetadataPolicy, Settings};
pub use source::{BuiltinData, DataSource, DataTables, JsonData};

pub use eunits_core::{codes, Basis, EnergyError, EnergyResult, Value};
pub use eunits_econ::{EconomicRegistry, EconomicTable, YearCoverage};
pub use eunits_substance::{CombustionProduct, Property, Substance, SubstanceRegistry, SubstanceTable};
pub use eunits_units::{symbols, CompositionRule, Dimension, Operator, UnitRegistry, UnitSource, UnitTable};

static SHARED: LazyLock<Registry> = LazyLock::new(Registry::builtin);

/// Process-wide registry over the default tables.
///
/// Built on first use and never modified; build your own [`Registry`] to
/// apply overlays.
pub fn shared() -> &'static Registry {
    &SHARED
}

/// Quantity against the shared registry
pub fn quantity(value: impl Into<Value>, unit: &str) -> EnergyResult<Quantity<'static>> {
    Quantity::new(value, unit, shared())
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{shared, Basis, Conversion, EnergyError, EnergyResult, Quantity, Registry};
}
