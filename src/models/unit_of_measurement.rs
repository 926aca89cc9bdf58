use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// Units an inventory amount can be measured in.
///
/// Serialized by code (`"CUP"`, `"GALLON"`, ...), which is also the key the
/// inventory service stores on each record.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum UnitOfMeasurement {
    Cup,
    Gallon,
    Ounce,
    Pint,
    Pound,
    Quart,
}

impl UnitOfMeasurement {
    /// Human readable name shown in lists and pickers.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Cup => "Cup",
            Self::Gallon => "Gallon",
            Self::Ounce => "Ounce",
            Self::Pint => "Pint",
            Self::Pound => "Pound",
            Self::Quart => "Quart",
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Cup => "c",
            Self::Gallon => "gal",
            Self::Ounce => "oz",
            Self::Pint => "pt",
            Self::Pound => "lb",
            Self::Quart => "qt",
        }
    }

    pub fn code(self) -> &'static str {
        self.into()
    }

    /// Looks up a unit by its catalog code. Codes are case sensitive.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::from_str(code).ok()
    }

    /// Resolves either a code (`POUND`) or an abbreviation (`lb`).
    pub fn parse_loose(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::from_code(value)
            .or_else(|| Self::iter().find(|unit| unit.abbreviation() == value))
    }

    /// True when `code` is a key of the catalog.
    pub fn contains(code: &str) -> bool {
        Self::from_code(code).is_some()
    }

    /// All `(code, name)` pairs in catalog order.
    pub fn catalog() -> impl Iterator<Item = (&'static str, &'static str)> {
        Self::iter().map(|unit| (unit.code(), unit.display_name()))
    }
}

/// Display name for a stored unit code, falling back to the raw code when the
/// catalog does not know it.
pub fn unit_display_name(code: &str) -> &str {
    UnitOfMeasurement::from_code(code).map_or(code, |unit| unit.display_name())
}
