//! Structured errors for the conversion engine
//!
//! Every failure is local and synchronous: it names the unit, substance,
//! property or rate year that is missing so the caller can fix the input
//! or the data. Nothing here is retryable.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_UNIT: &str = "UNKNOWN_UNIT";
    pub const UNKNOWN_SUBSTANCE: &str = "UNKNOWN_SUBSTANCE";
    pub const UNKNOWN_CURRENCY: &str = "UNKNOWN_CURRENCY";
    pub const INCOMPATIBLE_DIMENSION: &str = "INCOMPATIBLE_DIMENSION";
    pub const MISSING_PROPERTY: &str = "MISSING_PROPERTY";
    pub const MISSING_RATE_DATA: &str = "MISSING_RATE_DATA";
    pub const AMBIGUOUS_CONVERSION: &str = "AMBIGUOUS_CONVERSION";
    pub const SUBSTANCE_REQUIRED: &str = "SUBSTANCE_REQUIRED";
    pub const REFERENCE_YEAR_REQUIRED: &str = "REFERENCE_YEAR_REQUIRED";
    pub const CURRENCY_MISMATCH: &str = "CURRENCY_MISMATCH";
    pub const UNSUPPORTED_CONVERSION: &str = "UNSUPPORTED_CONVERSION";
    pub const SHAPE_MISMATCH: &str = "SHAPE_MISMATCH";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const BASE_UNIT_IN_USE: &str = "BASE_UNIT_IN_USE";
    pub const METADATA_CONFLICT: &str = "METADATA_CONFLICT";
    pub const INVALID_DATA: &str = "INVALID_DATA";
    pub const PARSE_ERROR: &str = "PARSE_ERROR";
}

pub type EnergyResult<T> = Result<T, EnergyError>;

/// Error type for every lookup and conversion in eunits
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnergyError {
    #[error("unknown unit '{unit}'{}", did_you_mean(.suggestions))]
    UnknownUnit {
        unit: String,
        suggestions: Vec<String>,
    },

    #[error("unknown substance '{substance}'{}", did_you_mean(.suggestions))]
    UnknownSubstance {
        substance: String,
        suggestions: Vec<String>,
    },

    #[error("unknown currency '{currency}'{}", did_you_mean(.suggestions))]
    UnknownCurrency {
        currency: String,
        suggestions: Vec<String>,
    },

    #[error("cannot {operation} {left} ({left_dim}) and {right} ({right_dim}): incompatible dimensions")]
    IncompatibleDimension {
        operation: &'static str,
        left: String,
        left_dim: String,
        right: String,
        right_dim: String,
    },

    #[error("substance '{substance}' has no {property} value, needed for {purpose}")]
    MissingProperty {
        substance: String,
        property: &'static str,
        purpose: String,
    },

    #[error("no {series} data for {currency} in year {year}{}", available_range(.available))]
    MissingRateData {
        series: &'static str,
        currency: String,
        year: i32,
        available: Option<(i32, i32)>,
    },

    #[error("ambiguous conversion: {0}")]
    AmbiguousConversion(String),

    #[error("a substance is required to convert {from} ({from_dim}) to {to} ({to_dim})")]
    SubstanceRequired {
        from: String,
        from_dim: String,
        to: String,
        to_dim: String,
    },

    #[error("{unit} amount has no reference year, cannot adjust it to {target}")]
    ReferenceYearRequired { unit: String, target: i32 },

    #[error("cannot convert {from} to {to} with unit factors, currency changes need exchange rates")]
    CurrencyMismatch { from: String, to: String },

    #[error("unsupported conversion: {0}")]
    UnsupportedConversion(String),

    #[error("array length mismatch: {left} vs {right}")]
    ShapeMismatch { left: usize, right: usize },

    #[error("division by zero: {divisor} has a zero element")]
    DivisionByZero { divisor: String },

    #[error("cannot remove {unit}: it is the base unit of {dimension}")]
    BaseUnitInUse { unit: String, dimension: String },

    #[error("conflicting {field}: '{left}' vs '{right}'")]
    MetadataConflict {
        field: &'static str,
        left: String,
        right: String,
    },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("parse error: {0}")]
    Parse(String),
}

fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" (did you mean: {}?)", suggestions.join(", "))
    }
}

fn available_range(available: &Option<(i32, i32)>) -> String {
    match available {
        Some((first, last)) => format!(" (available: {}-{})", first, last),
        None => String::new(),
    }
}

impl EnergyError {
    /// Machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            EnergyError::UnknownUnit { .. } => codes::UNKNOWN_UNIT,
            EnergyError::UnknownSubstance { .. } => codes::UNKNOWN_SUBSTANCE,
            EnergyError::UnknownCurrency { .. } => codes::UNKNOWN_CURRENCY,
            EnergyError::IncompatibleDimension { .. } => codes::INCOMPATIBLE_DIMENSION,
            EnergyError::MissingProperty { .. } => codes::MISSING_PROPERTY,
            EnergyError::MissingRateData { .. } => codes::MISSING_RATE_DATA,
            EnergyError::AmbiguousConversion(_) => codes::AMBIGUOUS_CONVERSION,
            EnergyError::SubstanceRequired { .. } => codes::SUBSTANCE_REQUIRED,
            EnergyError::ReferenceYearRequired { .. } => codes::REFERENCE_YEAR_REQUIRED,
            EnergyError::CurrencyMismatch { .. } => codes::CURRENCY_MISMATCH,
            EnergyError::UnsupportedConversion(_) => codes::UNSUPPORTED_CONVERSION,
            EnergyError::ShapeMismatch { .. } => codes::SHAPE_MISMATCH,
            EnergyError::DivisionByZero { .. } => codes::DIV_ZERO,
            EnergyError::BaseUnitInUse { .. } => codes::BASE_UNIT_IN_USE,
            EnergyError::MetadataConflict { .. } => codes::METADATA_CONFLICT,
            EnergyError::InvalidData(_) => codes::INVALID_DATA,
            EnergyError::Parse(_) => codes::PARSE_ERROR,
        }
    }

    /// Suggestion for fixing the input or the data
    pub fn suggestion(&self) -> Option<String> {
        match self {
            EnergyError::UnknownUnit { suggestions, .. }
            | EnergyError::UnknownSubstance { suggestions, .. }
            | EnergyError::UnknownCurrency { suggestions, .. }
                if !suggestions.is_empty() =>
            {
                Some(format!("Did you mean '{}'?", suggestions[0]))
            }
            EnergyError::UnknownUnit { .. } => Some("Use list_units() to see registered units".into()),
            EnergyError::UnknownSubstance { .. } => {
                Some("Use list_substances() to see registered substances".into())
            }
            EnergyError::MissingProperty { substance, property, .. } => Some(format!(
                "Add '{}' for '{}' through a substance overlay",
                property, substance
            )),
            EnergyError::MissingRateData { currency, year, .. } => Some(format!(
                "Load rate data for {} covering {} or pick a year with data",
                currency, year
            )),
            EnergyError::SubstanceRequired { .. } => {
                Some("Attach a substance to the quantity before converting".into())
            }
            EnergyError::ReferenceYearRequired { .. } => {
                Some("Attach a reference year to the quantity".into())
            }
            EnergyError::CurrencyMismatch { .. } => {
                Some("Convert through Quantity::to so exchange rates are applied".into())
            }
            _ => None,
        }
    }

    /// Shorthand for dimension errors
    pub fn incompatible(
        operation: &'static str,
        left: impl Into<String>,
        left_dim: impl ToString,
        right: impl Into<String>,
        right_dim: impl ToString,
    ) -> Self {
        EnergyError::IncompatibleDimension {
            operation,
            left: left.into(),
            left_dim: left_dim.to_string(),
            right: right.into(),
            right_dim: right_dim.to_string(),
        }
    }

    /// Shorthand for a missing substance property
    pub fn missing_property(
        substance: impl Into<String>,
        property: &'static str,
        purpose: impl Into<String>,
    ) -> Self {
        EnergyError::MissingProperty {
            substance: substance.into(),
            property,
            purpose: purpose.into(),
        }
    }
}
