//! Heating-value basis tag

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::EnergyError;

/// Which heating-value convention an energy amount is denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Basis {
    /// Higher heating value (latent heat of water vapour recovered)
    Hhv,
    /// Lower heating value
    Lhv,
}

impl Basis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basis::Hhv => "HHV",
            Basis::Lhv => "LHV",
        }
    }

    /// Property name of the heating value for this basis
    pub fn property(&self) -> &'static str {
        match self {
            Basis::Hhv => "hhv",
            Basis::Lhv => "lhv",
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Basis {
    type Err = EnergyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HHV" => Ok(Basis::Hhv),
            "LHV" => Ok(Basis::Lhv),
            other => Err(EnergyError::Parse(format!(
                "invalid basis '{}', expected HHV or LHV",
                other
            ))),
        }
    }
}
