use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::atmo::AtmoLocation;

/// Drying-material classes a reference point can be tagged with. Each class
/// carries a default dry-standard baseline, overridable per point.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MaterialClass {
    Drywall,
    Carpet,
    CarpetPad,
    Subfloor,
    Hardwood,
    Concrete,
    Insulation,
}

impl MaterialClass {
    /// Default moisture baseline (meter scale) a point of this material is
    /// considered dry at.
    pub fn default_baseline(&self) -> f64 {
        match self {
            MaterialClass::Drywall => 0.5,
            MaterialClass::Carpet => 11.0,
            MaterialClass::CarpetPad => 11.0,
            MaterialClass::Subfloor => 12.0,
            MaterialClass::Hardwood => 9.0,
            MaterialClass::Concrete => 3.5,
            MaterialClass::Insulation => 1.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePoint {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub label: String,
    pub material: MaterialClass,
    /// Org-specific override of the material default.
    pub baseline_override: Option<f64>,
    /// Denormalized copy of the most recent saved reading.
    pub latest_reading: Option<f64>,
}

impl ReferencePoint {
    pub fn baseline(&self) -> f64 {
        self.baseline_override
            .unwrap_or_else(|| self.material.default_baseline())
    }

    pub fn at_goal(&self) -> bool {
        match self.latest_reading {
            Some(reading) => reading <= self.baseline(),
            None => false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentUnit {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Free-form type from the equipment catalog ("LGR dehumidifier",
    /// "air mover", ...).
    pub equipment_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ContainmentType {
    Full,
    Partial,
    None,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Chamber {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub project_id: ObjectId,
    pub name: String,
    pub containment_type: ContainmentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub project_id: ObjectId,
    pub name: String,
    pub chamber_id: Option<ObjectId>,
    pub reference_points: Vec<ReferencePoint>,
    pub equipment: Vec<EquipmentUnit>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One temperature/RH observation inside a saved daily log. GPP is derived
/// and recomputed whenever both inputs are present; it is stored for display
/// history only.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AtmosphericReading {
    pub location: AtmoLocation,
    pub chamber_id: Option<ObjectId>,
    pub equipment_id: Option<ObjectId>,
    pub temperature_f: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub gpp: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PointReading {
    pub point_id: ObjectId,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentCount {
    pub equipment_id: ObjectId,
    pub count: i32,
}

/// Per-room slice of a daily log. Only values actually entered that day are
/// carried; absence means "not measured", never zero.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomEntry {
    pub room_id: ObjectId,
    pub readings: Vec<PointReading>,
    pub equipment_counts: Vec<EquipmentCount>,
}

/// The aggregate persisted once per (project, visit date). Saving replaces
/// the whole document; there is no partial patch.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub project_id: ObjectId,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub atmospheric_readings: Vec<AtmosphericReading>,
    pub room_entries: Vec<RoomEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(material: MaterialClass, baseline_override: Option<f64>, latest: Option<f64>) -> ReferencePoint {
        ReferencePoint {
            id: ObjectId::new(),
            label: "RP-1".to_string(),
            material,
            baseline_override,
            latest_reading: latest,
        }
    }

    #[test]
    fn baseline_prefers_override() {
        let p = point(MaterialClass::Drywall, Some(1.2), None);
        assert_eq!(p.baseline(), 1.2);
        let p = point(MaterialClass::Drywall, None, None);
        assert_eq!(p.baseline(), MaterialClass::Drywall.default_baseline());
    }

    #[test]
    fn at_goal_needs_a_reading_at_or_under_baseline() {
        assert!(!point(MaterialClass::Hardwood, None, None).at_goal());
        assert!(!point(MaterialClass::Hardwood, None, Some(14.0)).at_goal());
        assert!(point(MaterialClass::Hardwood, None, Some(9.0)).at_goal());
    }
}
