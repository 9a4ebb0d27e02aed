//! Atmospheric reading locations and the composite key addressing them.
//!
//! A visit records temperature/RH at a variable set of spots: outside,
//! an unaffected area, each containment chamber's interior, and each
//! dehumidifier's exhaust. The form keeps one flat map from key to input
//! pair, so the key has to carry (location, chamber?, equipment?) and
//! still work as a JSON object key, hence the string codec on top of a
//! structured value type.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum AtmoLocation {
    Outside,
    Unaffected,
    ChamberInterior,
    DehuExhaust,
}

impl AtmoLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AtmoLocation::Outside => "outside",
            AtmoLocation::Unaffected => "unaffected",
            AtmoLocation::ChamberInterior => "chamberInterior",
            AtmoLocation::DehuExhaust => "dehuExhaust",
        }
    }
}

impl FromStr for AtmoLocation {
    type Err = AtmoKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "outside" => Ok(AtmoLocation::Outside),
            "unaffected" => Ok(AtmoLocation::Unaffected),
            "chamberInterior" => Ok(AtmoLocation::ChamberInterior),
            "dehuExhaust" => Ok(AtmoLocation::DehuExhaust),
            other => Err(AtmoKeyParseError::UnknownLocation(other.to_string())),
        }
    }
}

/// Composite address of one temperature/RH input on the form.
///
/// Equality and hashing are structural, so this is the in-memory map key.
/// The wire format is `location|chamberId|equipmentId` with empty-string
/// placeholders, so the shape stays stable whether or not the optional parts
/// are present, and `decode(encode(k)) == k` for every valid key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AtmoKey {
    pub location: AtmoLocation,
    pub chamber_id: Option<String>,
    pub equipment_id: Option<String>,
}

impl AtmoKey {
    pub fn outside() -> AtmoKey {
        AtmoKey {
            location: AtmoLocation::Outside,
            chamber_id: None,
            equipment_id: None,
        }
    }

    pub fn unaffected() -> AtmoKey {
        AtmoKey {
            location: AtmoLocation::Unaffected,
            chamber_id: None,
            equipment_id: None,
        }
    }

    pub fn chamber(chamber_id: &str) -> AtmoKey {
        AtmoKey {
            location: AtmoLocation::ChamberInterior,
            chamber_id: Some(chamber_id.to_string()),
            equipment_id: None,
        }
    }

    /// Exhaust readings are the only ones tied to a specific unit.
    pub fn dehu_exhaust(chamber_id: Option<&str>, equipment_id: &str) -> AtmoKey {
        AtmoKey {
            location: AtmoLocation::DehuExhaust,
            chamber_id: chamber_id.map(|c| c.to_string()),
            equipment_id: Some(equipment_id.to_string()),
        }
    }
}

impl fmt::Display for AtmoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}|{}|{}",
            self.location.as_str(),
            self.chamber_id.as_deref().unwrap_or(""),
            self.equipment_id.as_deref().unwrap_or("")
        )
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AtmoKeyParseError {
    UnknownLocation(String),
    BadShape(String),
}

impl fmt::Display for AtmoKeyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtmoKeyParseError::UnknownLocation(loc) => {
                write!(f, "unknown atmospheric location: {}", loc)
            }
            AtmoKeyParseError::BadShape(key) => {
                write!(f, "atmospheric key is not location|chamber|equipment: {}", key)
            }
        }
    }
}

impl std::error::Error for AtmoKeyParseError {}

impl FromStr for AtmoKey {
    type Err = AtmoKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('|');
        let (location, chamber, equipment) = match (parts.next(), parts.next(), parts.next()) {
            (Some(l), Some(c), Some(e)) if parts.next().is_none() => (l, c, e),
            _ => return Err(AtmoKeyParseError::BadShape(s.to_string())),
        };

        let non_empty = |part: &str| {
            if part.is_empty() {
                None
            } else {
                Some(part.to_string())
            }
        };

        Ok(AtmoKey {
            location: location.parse()?,
            chamber_id: non_empty(chamber),
            equipment_id: non_empty(equipment),
        })
    }
}

// Serialized through the string codec so the key can address JSON maps.
impl Serialize for AtmoKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for AtmoKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
