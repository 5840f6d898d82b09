//! Dimension tags
//!
//! A dimension is an opaque tag. The built-in tags cover the energy domain;
//! compound tags are derived by name (`CURRENCY_PER_ENERGY`,
//! `ENERGY·MASS`) whenever no composition rule names the result.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical or economic category of a unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dimension(Cow<'static, str>);

impl Dimension {
    /// Pure number (ratios, cancelled units)
    pub const DIMENSIONLESS: Dimension = Dimension(Cow::Borrowed("DIMENSIONLESS"));
    pub const ENERGY: Dimension = Dimension(Cow::Borrowed("ENERGY"));
    pub const POWER: Dimension = Dimension(Cow::Borrowed("POWER"));
    pub const MASS: Dimension = Dimension(Cow::Borrowed("MASS"));
    pub const VOLUME: Dimension = Dimension(Cow::Borrowed("VOLUME"));
    pub const TIME: Dimension = Dimension(Cow::Borrowed("TIME"));
    pub const CURRENCY: Dimension = Dimension(Cow::Borrowed("CURRENCY"));

    pub fn new(tag: impl Into<String>) -> Self {
        Dimension(Cow::Owned(tag.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_dimensionless(&self) -> bool {
        *self == Dimension::DIMENSIONLESS
    }

    /// Literal quotient tag: `A_PER_B`
    pub fn per(&self, other: &Dimension) -> Dimension {
        if self.is_dimensionless() {
            Dimension::new(format!("PER_{}", other))
        } else {
            Dimension::new(format!("{}_PER_{}", self, other))
        }
    }

    /// Literal product tag: `A·B`
    pub fn times(&self, other: &Dimension) -> Dimension {
        Dimension::new(format!("{}·{}", self, other))
    }

    /// Split a literal quotient tag into (numerator, denominator) at the last `_PER_`
    pub fn split_per(&self) -> Option<(Dimension, Dimension)> {
        let idx = self.0.rfind("_PER_")?;
        let (num, den) = self.0.split_at(idx);
        Some((Dimension::new(num), Dimension::new(&den["_PER_".len()..])))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Dimension {
    fn from(s: &str) -> Self {
        Dimension::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_compare_with_owned() {
        assert_eq!(Dimension::new("ENERGY"), Dimension::ENERGY);
        assert_ne!(Dimension::ENERGY, Dimension::POWER);
    }

    #[test]
    fn test_literal_tags() {
        assert_eq!(Dimension::CURRENCY.per(&Dimension::ENERGY).as_str(), "CURRENCY_PER_ENERGY");
        assert_eq!(Dimension::ENERGY.times(&Dimension::MASS).as_str(), "ENERGY·MASS");
        assert_eq!(Dimension::DIMENSIONLESS.per(&Dimension::TIME).as_str(), "PER_TIME");
    }

    #[test]
    fn test_split_per() {
        let d = Dimension::CURRENCY.per(&Dimension::POWER).per(&Dimension::TIME);
        let (num, den) = d.split_per().unwrap();
        assert_eq!(num.as_str(), "CURRENCY_PER_POWER");
        assert_eq!(den, Dimension::TIME);
        assert!(Dimension::ENERGY.split_per().is_none());
    }

    #[test]
    fn test_serde_transparent() {
        let d: Dimension = serde_json::from_str("\"MASS\"").unwrap();
        assert_eq!(d, Dimension::MASS);
        assert_eq!(serde_json::to_string(&Dimension::TIME).unwrap(), "\"TIME\"");
    }
}
