//! Substance records and their optional physical properties

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical properties of one substance, every field optional.
///
/// Units: `hhv`/`lhv` MJ/kg, `density` kg/m3, `carbon_intensity`
/// kg CO2/GJ (LHV basis), the `*_content` fields are mass fractions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Substance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hhv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lhv: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_content: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_intensity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hydrogen_content: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ash_content: Option<f64>,
}

/// Numeric property of a substance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Hhv,
    Lhv,
    Density,
    CarbonContent,
    CarbonIntensity,
    HydrogenContent,
    AshContent,
}

impl Property {
    pub const ALL: [Property; 7] = [
        Property::Hhv,
        Property::Lhv,
        Property::Density,
        Property::CarbonContent,
        Property::CarbonIntensity,
        Property::HydrogenContent,
        Property::AshContent,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Property::Hhv => "hhv",
            Property::Lhv => "lhv",
            Property::Density => "density",
            Property::CarbonContent => "carbon_content",
            Property::CarbonIntensity => "carbon_intensity",
            Property::HydrogenContent => "hydrogen_content",
            Property::AshContent => "ash_content",
        }
    }

    pub fn from_name(name: &str) -> Option<Property> {
        Property::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Substance {
    pub fn get(&self, property: Property) -> Option<f64> {
        match property {
            Property::Hhv => self.hhv,
            Property::Lhv => self.lhv,
            Property::Density => self.density,
            Property::CarbonContent => self.carbon_content,
            Property::CarbonIntensity => self.carbon_intensity,
            Property::HydrogenContent => self.hydrogen_content,
            Property::AshContent => self.ash_content,
        }
    }

    pub fn has(&self, property: Property) -> bool {
        self.get(property).is_some()
    }

    /// True when no numeric property is set
    pub fn is_empty(&self) -> bool {
        Property::ALL.iter().all(|p| !self.has(*p))
    }

    /// Overlay the fields set in `other`, keeping the rest
    pub fn merge(&mut self, other: Substance) {
        if other.name.is_some() {
            self.name = other.name;
        }
        let fields = [
            (&mut self.hhv, other.hhv),
            (&mut self.lhv, other.lhv),
            (&mut self.density, other.density),
            (&mut self.carbon_content, other.carbon_content),
            (&mut self.carbon_intensity, other.carbon_intensity),
            (&mut self.hydrogen_content, other.hydrogen_content),
            (&mut self.ash_content, other.ash_content),
        ];
        for (slot, value) in fields {
            if value.is_some() {
                *slot = value;
            }
        }
    }

    /// Set one property
    pub fn with(mut self, property: Property, value: f64) -> Self {
        let slot = match property {
            Property::Hhv => &mut self.hhv,
            Property::Lhv => &mut self.lhv,
            Property::Density => &mut self.density,
            Property::CarbonContent => &mut self.carbon_content,
            Property::CarbonIntensity => &mut self.carbon_intensity,
            Property::HydrogenContent => &mut self.hydrogen_content,
            Property::AshContent => &mut self.ash_content,
        };
        *slot = Some(value);
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut coal = Substance::default()
            .with(Property::Hhv, 29.3)
            .with(Property::Lhv, 27.8);
        coal.merge(Substance::default().with(Property::Lhv, 25.0));
        assert_eq!(coal.hhv, Some(29.3));
        assert_eq!(coal.lhv, Some(25.0));
    }

    #[test]
    fn test_is_empty_ignores_name() {
        assert!(Substance::default().named("nothing").is_empty());
        assert!(!Substance::default().with(Property::Density, 1.0).is_empty());
    }

    #[test]
    fn test_property_names_round_trip() {
        for p in Property::ALL {
            assert_eq!(Property::from_name(p.name()), Some(p));
        }
        assert_eq!(Property::from_name("color"), None);
    }

    #[test]
    fn test_serde_partial_record() {
        let s: Substance = serde_json::from_str(r#"{"lhv": 25.0, "carbon_intensity": 95.0}"#).unwrap();
        assert_eq!(s.lhv, Some(25.0));
        assert_eq!(s.hhv, None);
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("hhv"));
    }
}
