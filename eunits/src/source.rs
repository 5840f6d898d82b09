//! Where registry tables come from
//!
//! A `DataSource` hands over table fragments; `Registry` merges them with
//! last-write-wins per key. Reading files is the caller's business: load the
//! text yourself and wrap it in `JsonData`.

use eunits_core::{EnergyError, EnergyResult};
use eunits_econ::EconomicTable;
use eunits_substance::SubstanceTable;
use eunits_units::{builtin_table, UnitTable};
use serde::{Deserialize, Serialize};

use crate::Settings;

/// Table fragments supplied by a source; absent parts are left untouched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataTables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<UnitTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub substances: Option<SubstanceTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub economics: Option<EconomicTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

/// Supplier of unit, substance and economic tables
pub trait DataSource: Send + Sync {
    fn tables(&self) -> EnergyResult<DataTables>;
}

/// The default tables compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinData;

impl DataSource for BuiltinData {
    fn tables(&self) -> EnergyResult<DataTables> {
        Ok(DataTables {
            units: Some(builtin_table()),
            substances: Some(eunits_substance::BUILTIN.clone()),
            economics: Some(eunits_econ::BUILTIN.clone()),
            settings: None,
        })
    }
}

/// A JSON document shaped like [`DataTables`]
#[derive(Debug, Clone)]
pub struct JsonData {
    document: String,
}

impl JsonData {
    pub fn new(document: impl Into<String>) -> Self {
        JsonData {
            document: document.into(),
        }
    }
}

impl DataSource for JsonData {
    fn tables(&self) -> EnergyResult<DataTables> {
        serde_json::from_str(&self.document)
            .map_err(|e| EnergyError::InvalidData(format!("overlay document: {}", e)))
    }
}

impl DataSource for DataTables {
    fn tables(&self) -> EnergyResult<DataTables> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MetadataPolicy;

    #[test]
    fn test_builtin_has_every_table() {
        let t = BuiltinData.tables().unwrap();
        assert!(t.units.is_some_and(|u| !u.is_empty()));
        assert!(t.substances.is_some_and(|s| s.contains_key("coal")));
        assert!(t.economics.is_some_and(|e| e.inflation.contains_key("USD")));
        assert!(t.settings.is_none());
    }

    #[test]
    fn test_json_fragment() {
        let t = JsonData::new(
            r#"{
                "substances": {"peat": {"hhv": 10.0, "lhv": 8.5}},
                "settings": {"metadata_policy": "strict"}
            }"#,
        )
        .tables()
        .unwrap();
        assert!(t.units.is_none());
        assert!(t.economics.is_none());
        assert_eq!(t.substances.unwrap()["peat"].lhv, Some(8.5));
        assert_eq!(t.settings.unwrap().metadata_policy, MetadataPolicy::Strict);
    }

    #[test]
    fn test_malformed_json() {
        let err = JsonData::new("{ not json").tables().unwrap_err();
        assert_eq!(err.code(), eunits_core::codes::INVALID_DATA);
    }
}
