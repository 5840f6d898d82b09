//! Eunits Core - Fundamental types
//!
//! This crate provides the core types shared by every eunits crate:
//! - `Value`: Numeric payload (scalar or array) with broadcasting
//! - `Basis`: Heating-value convention (HHV / LHV)
//! - `EnergyError`: Structured errors with codes and suggestions

mod basis;
mod error;
mod suggest;
mod value;

pub use basis::Basis;
pub use error::{codes, EnergyError, EnergyResult};
pub use suggest::{closest_matches, levenshtein};
pub use value::{approx_eq, Value};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::codes;
    pub use crate::{Basis, EnergyError, EnergyResult, Value};
}
