//! Eunits Substance - Fuel and material properties
//!
//! Provides:
//! - `SubstanceRegistry`: heating values, density and carbon data per substance
//! - `Bridge`: MASS/VOLUME/ENERGY conversion through those properties
//! - `CombustionProduct`: CO2, H2O and ash from a fuel amount

mod bridge;
mod catalogue;
mod combustion;
mod registry;
mod substance;

pub use bridge::Bridge;
pub use catalogue::{SubstanceTable, BUILTIN};
pub use combustion::{CombustionProduct, CO2_PER_C, H2O_PER_H2};
pub use registry::{SubstanceRegistry, ValidationReport};
pub use substance::{Property, Substance};
