//! Daily entry form state.
//!
//! One explicit value holds everything editable for a visit date: the
//! atmospheric map, per-reference-point readings, per-unit equipment counts
//! and the notes field. Edits go through methods that mark the form dirty
//! and keep derived GPP in sync; nothing else mutates it. Saving flattens
//! the form into the room-partitioned [`DailyLog`] aggregate.

use std::collections::HashMap;

use bson::oid::ObjectId;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::atmo::AtmoKey;
use crate::models::{
    AtmosphericReading, DailyLog, EquipmentCount, PointReading, Room, RoomEntry,
};
use crate::psychro::{self, DryingCondition};

/// One editable temperature/RH pair. GPP and its condition tier are derived,
/// never entered.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtmoInput {
    pub temperature_f: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub gpp: Option<f64>,
    pub condition: Option<DryingCondition>,
}

impl AtmoInput {
    /// Neither side entered. Flattening drops these keys entirely.
    pub fn is_empty(&self) -> bool {
        self.temperature_f.is_none() && self.relative_humidity.is_none()
    }

    fn recompute(&mut self) {
        self.gpp = psychro::gpp_opt(self.temperature_f, self.relative_humidity);
        self.condition = self.gpp.map(psychro::classify);
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct DayEntryForm {
    pub date: NaiveDate,
    pub notes: Option<String>,
    /// Flat map addressed by [`AtmoKey`], serialized with string keys.
    pub atmospherics: HashMap<AtmoKey, AtmoInput>,
    /// Reference point id (hex) -> entered moisture reading.
    pub readings: HashMap<String, f64>,
    /// Equipment unit id (hex) -> entered count.
    pub equipment_counts: HashMap<String, i32>,
    #[serde(skip)]
    has_changes: bool,
    #[serde(skip)]
    save_in_flight: bool,
}

impl DayEntryForm {
    /// Empty form for a date with no saved log and no prior visit.
    pub fn new(date: NaiveDate) -> DayEntryForm {
        DayEntryForm {
            date,
            notes: None,
            atmospherics: HashMap::new(),
            readings: HashMap::new(),
            equipment_counts: HashMap::new(),
            has_changes: false,
            save_in_flight: false,
        }
    }

    /// Seed from the saved log for this date. Notes, atmospherics, readings
    /// and counts all come from the one aggregate; GPP is recomputed rather
    /// than trusted from storage.
    pub fn from_saved(log: &DailyLog) -> DayEntryForm {
        let mut form = DayEntryForm::new(log.date);
        form.notes = log.notes.clone();

        for reading in &log.atmospheric_readings {
            let key = AtmoKey {
                location: reading.location,
                chamber_id: reading.chamber_id.map(|id| id.to_hex()),
                equipment_id: reading.equipment_id.map(|id| id.to_hex()),
            };
            let mut input = AtmoInput {
                temperature_f: reading.temperature_f,
                relative_humidity: reading.relative_humidity,
                ..AtmoInput::default()
            };
            input.recompute();
            form.atmospherics.insert(key, input);
        }

        for entry in &log.room_entries {
            for reading in &entry.readings {
                form.readings.insert(reading.point_id.to_hex(), reading.value);
            }
            for count in &entry.equipment_counts {
                form.equipment_counts
                    .insert(count.equipment_id.to_hex(), count.count);
            }
        }

        form
    }

    /// Seed a brand-new visit from the nearest prior one: equipment that did
    /// not move between visits should not have to be re-entered, so counts
    /// carry forward. Everything else starts empty.
    pub fn carry_forward(date: NaiveDate, prior: &DailyLog) -> DayEntryForm {
        let mut form = DayEntryForm::new(date);
        for entry in &prior.room_entries {
            for count in &entry.equipment_counts {
                form.equipment_counts
                    .insert(count.equipment_id.to_hex(), count.count);
            }
        }
        form
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|n| !n.trim().is_empty());
        self.has_changes = true;
    }

    /// Setting either side of an atmospheric pair recomputes GPP right away
    /// so condition coloring stays live on every keystroke.
    pub fn set_atmo_temperature(&mut self, key: &AtmoKey, value: Option<f64>) {
        let input = self.atmospherics.entry(key.clone()).or_default();
        input.temperature_f = value;
        input.recompute();
        self.has_changes = true;
    }

    pub fn set_atmo_humidity(&mut self, key: &AtmoKey, value: Option<f64>) {
        let input = self.atmospherics.entry(key.clone()).or_default();
        input.relative_humidity = value;
        input.recompute();
        self.has_changes = true;
    }

    pub fn set_reading(&mut self, point_id: &str, value: Option<f64>) {
        match value {
            Some(v) => {
                self.readings.insert(point_id.to_string(), v);
            }
            None => {
                self.readings.remove(point_id);
            }
        }
        self.has_changes = true;
    }

    pub fn set_equipment_count(&mut self, equipment_id: &str, count: Option<i32>) {
        match count {
            Some(c) => {
                self.equipment_counts.insert(equipment_id.to_string(), c);
            }
            None => {
                self.equipment_counts.remove(equipment_id);
            }
        }
        self.has_changes = true;
    }

    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    /// At least one value is actually entered somewhere on the form.
    pub fn has_values(&self) -> bool {
        self.atmospherics.values().any(|input| !input.is_empty())
            || !self.readings.is_empty()
            || !self.equipment_counts.is_empty()
            || self.notes.as_deref().map_or(false, |n| !n.trim().is_empty())
    }

    /// Save is gated on dirty + something entered + no save in flight. A
    /// second submit while one is pending is refused, not queued.
    pub fn can_save(&self) -> bool {
        self.has_changes && self.has_values() && !self.save_in_flight
    }

    pub fn begin_save(&mut self) -> bool {
        if !self.can_save() {
            return false;
        }
        self.save_in_flight = true;
        true
    }

    pub fn save_succeeded(&mut self) {
        self.save_in_flight = false;
        self.has_changes = false;
    }

    /// Failure keeps the form dirty so the operator can retry.
    pub fn save_failed(&mut self) {
        self.save_in_flight = false;
    }

    /// Flatten into the aggregate saved for this date (replace semantics).
    ///
    /// Atmospheric keys with neither input, reference points and equipment
    /// with no entered value, and rooms with nothing entered at all are
    /// omitted; absence means "not measured".
    pub fn flatten(
        &self,
        project_id: ObjectId,
        rooms: &[Room],
    ) -> Result<DailyLog, bson::oid::Error> {
        // Sorted by encoded key so output order is stable.
        let mut keys: Vec<&AtmoKey> = self
            .atmospherics
            .iter()
            .filter(|(_, input)| !input.is_empty())
            .map(|(key, _)| key)
            .collect();
        keys.sort_by_key(|key| key.to_string());

        let mut atmospheric_readings = Vec::with_capacity(keys.len());
        for key in keys {
            let input = &self.atmospherics[key];
            let chamber_id = match &key.chamber_id {
                Some(raw) => Some(ObjectId::parse_str(raw)?),
                None => None,
            };
            let equipment_id = match &key.equipment_id {
                Some(raw) => Some(ObjectId::parse_str(raw)?),
                None => None,
            };
            atmospheric_readings.push(AtmosphericReading {
                location: key.location,
                chamber_id,
                equipment_id,
                temperature_f: input.temperature_f,
                relative_humidity: input.relative_humidity,
                gpp: psychro::gpp_opt(input.temperature_f, input.relative_humidity),
            });
        }

        let mut room_entries = Vec::new();
        for room in rooms {
            let readings: Vec<PointReading> = room
                .reference_points
                .iter()
                .filter_map(|point| {
                    self.readings.get(&point.id.to_hex()).map(|value| PointReading {
                        point_id: point.id,
                        value: *value,
                    })
                })
                .collect();

            let equipment_counts: Vec<EquipmentCount> = room
                .equipment
                .iter()
                .filter_map(|unit| {
                    self.equipment_counts
                        .get(&unit.id.to_hex())
                        .map(|count| EquipmentCount {
                            equipment_id: unit.id,
                            count: *count,
                        })
                })
                .collect();

            if readings.is_empty() && equipment_counts.is_empty() {
                continue;
            }

            room_entries.push(RoomEntry {
                room_id: room.id,
                readings,
                equipment_counts,
            });
        }

        let now = Utc::now();
        Ok(DailyLog {
            id: None,
            project_id,
            date: self.date,
            notes: self
                .notes
                .as_ref()
                .filter(|n| !n.trim().is_empty())
                .cloned(),
            atmospheric_readings,
            room_entries,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EquipmentUnit, MaterialClass, ReferencePoint};

    fn visit_date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn reference_point(label: &str) -> ReferencePoint {
        ReferencePoint {
            id: ObjectId::new(),
            label: label.to_string(),
            material: MaterialClass::Drywall,
            baseline_override: None,
            latest_reading: None,
        }
    }

    fn room(name: &str, points: Vec<ReferencePoint>, equipment: Vec<EquipmentUnit>) -> Room {
        let now = Utc::now();
        Room {
            id: ObjectId::new(),
            project_id: ObjectId::new(),
            name: name.to_string(),
            chamber_id: None,
            reference_points: points,
            equipment,
            created_at: now,
            updated_at: now,
        }
    }

    fn dehu(equipment_type: &str) -> EquipmentUnit {
        EquipmentUnit {
            id: ObjectId::new(),
            equipment_type: equipment_type.to_string(),
        }
    }

    fn saved_log(project_id: ObjectId, date: NaiveDate, entries: Vec<RoomEntry>) -> DailyLog {
        let now = Utc::now();
        DailyLog {
            id: Some(ObjectId::new()),
            project_id,
            date,
            notes: None,
            atmospheric_readings: Vec::new(),
            room_entries: entries,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn brand_new_date_with_no_history_is_clean_and_unsaveable() {
        let form = DayEntryForm::new(visit_date(1));
        assert!(!form.has_changes());
        assert!(!form.has_values());
        assert!(!form.can_save());
    }

    #[test]
    fn carry_forward_pre_populates_equipment_counts() {
        let unit_a = ObjectId::new();
        let unit_b = ObjectId::new();
        let prior = saved_log(
            ObjectId::new(),
            visit_date(1),
            vec![RoomEntry {
                room_id: ObjectId::new(),
                readings: Vec::new(),
                equipment_counts: vec![
                    EquipmentCount { equipment_id: unit_a, count: 2 },
                    EquipmentCount { equipment_id: unit_b, count: 1 },
                ],
            }],
        );

        let form = DayEntryForm::carry_forward(visit_date(2), &prior);
        assert_eq!(form.equipment_counts.get(&unit_a.to_hex()), Some(&2));
        assert_eq!(form.equipment_counts.get(&unit_b.to_hex()), Some(&1));
        assert!(form.readings.is_empty());
        // Seeding is not an edit.
        assert!(!form.has_changes());
    }

    #[test]
    fn every_edit_kind_marks_the_form_dirty() {
        let point_id = ObjectId::new().to_hex();
        let unit_id = ObjectId::new().to_hex();

        let mut form = DayEntryForm::new(visit_date(3));
        form.set_reading(&point_id, Some(14.5));
        assert!(form.has_changes());

        let mut form = DayEntryForm::new(visit_date(3));
        form.set_atmo_temperature(&AtmoKey::outside(), Some(70.0));
        assert!(form.has_changes());

        let mut form = DayEntryForm::new(visit_date(3));
        form.set_equipment_count(&unit_id, Some(3));
        assert!(form.has_changes());

        let mut form = DayEntryForm::new(visit_date(3));
        form.set_notes(Some("day two of dry-down".to_string()));
        assert!(form.has_changes());
    }

    #[test]
    fn gpp_recomputes_on_each_input_edit() {
        let mut form = DayEntryForm::new(visit_date(3));
        let key = AtmoKey::outside();

        form.set_atmo_temperature(&key, Some(70.0));
        assert!(form.atmospherics[&key].gpp.is_none());

        form.set_atmo_humidity(&key, Some(50.0));
        let first = form.atmospherics[&key].gpp.unwrap();
        assert_eq!(
            form.atmospherics[&key].condition,
            Some(crate::psychro::DryingCondition::Moderate)
        );

        form.set_atmo_humidity(&key, Some(80.0));
        let second = form.atmospherics[&key].gpp.unwrap();
        assert!(second > first);
        assert_eq!(
            form.atmospherics[&key].condition,
            Some(crate::psychro::DryingCondition::Poor)
        );

        form.set_atmo_temperature(&key, None);
        assert!(form.atmospherics[&key].gpp.is_none());
        assert!(form.atmospherics[&key].condition.is_none());
    }

    #[test]
    fn save_lifecycle_gates_and_clears_dirty() {
        let log = saved_log(ObjectId::new(), visit_date(4), Vec::new());
        let mut form = DayEntryForm::from_saved(&log);
        assert!(!form.has_changes());
        assert!(!form.can_save());

        form.set_notes(Some("north wall still wet".to_string()));
        assert!(form.can_save());

        assert!(form.begin_save());
        // Duplicate submit while one is pending is refused.
        assert!(!form.begin_save());

        form.save_failed();
        assert!(form.has_changes(), "failed save keeps the form dirty");
        assert!(form.can_save());

        assert!(form.begin_save());
        form.save_succeeded();
        assert!(!form.has_changes());
        assert!(!form.can_save());
    }

    #[test]
    fn from_saved_recomputes_gpp_instead_of_trusting_storage() {
        let mut log = saved_log(ObjectId::new(), visit_date(5), Vec::new());
        log.atmospheric_readings.push(AtmosphericReading {
            location: crate::atmo::AtmoLocation::Outside,
            chamber_id: None,
            equipment_id: None,
            temperature_f: Some(70.0),
            relative_humidity: Some(50.0),
            gpp: Some(9999.0),
        });

        let form = DayEntryForm::from_saved(&log);
        let gpp = form.atmospherics[&AtmoKey::outside()].gpp.unwrap();
        assert!(gpp < 100.0, "stored gpp must be recomputed, got {}", gpp);
    }

    #[test]
    fn flatten_keeps_only_entered_values_and_drops_empty_rooms() {
        let wet_point = reference_point("RP-1");
        let dry_point = reference_point("RP-2");
        let unit = dehu("LGR dehumidifier");
        let measured = room("Kitchen", vec![wet_point.clone(), dry_point], vec![unit.clone()]);
        let untouched = room("Hallway", vec![reference_point("RP-3")], vec![dehu("air mover")]);

        let mut form = DayEntryForm::new(visit_date(6));
        form.set_reading(&wet_point.id.to_hex(), Some(22.0));
        form.set_equipment_count(&unit.id.to_hex(), Some(2));
        form.set_atmo_temperature(&AtmoKey::outside(), Some(70.0));
        form.set_atmo_humidity(&AtmoKey::outside(), Some(50.0));
        // A key someone tabbed through but never filled in.
        form.set_atmo_temperature(&AtmoKey::unaffected(), None);

        let log = form
            .flatten(ObjectId::new(), &[measured.clone(), untouched])
            .unwrap();

        assert_eq!(log.room_entries.len(), 1, "untouched room must be omitted");
        let entry = &log.room_entries[0];
        assert_eq!(entry.room_id, measured.id);
        assert_eq!(entry.readings.len(), 1);
        assert_eq!(entry.readings[0].point_id, wet_point.id);
        assert_eq!(entry.equipment_counts.len(), 1);
        assert_eq!(entry.equipment_counts[0].count, 2);

        assert_eq!(log.atmospheric_readings.len(), 1, "empty atmo key must be skipped");
        assert!(log.atmospheric_readings[0].gpp.is_some());
        assert!(log.notes.is_none());
    }

    #[test]
    fn flatten_round_trips_through_from_saved() {
        let point = reference_point("RP-1");
        let unit = dehu("LGR dehumidifier");
        let the_room = room("Kitchen", vec![point.clone()], vec![unit.clone()]);

        let mut form = DayEntryForm::new(visit_date(7));
        form.set_reading(&point.id.to_hex(), Some(17.0));
        form.set_equipment_count(&unit.id.to_hex(), Some(1));
        form.set_notes(Some("demo scheduled".to_string()));

        let log = form.flatten(ObjectId::new(), &[the_room]).unwrap();
        let reopened = DayEntryForm::from_saved(&log);

        assert_eq!(reopened.readings.get(&point.id.to_hex()), Some(&17.0));
        assert_eq!(reopened.equipment_counts.get(&unit.id.to_hex()), Some(&1));
        assert_eq!(reopened.notes.as_deref(), Some("demo scheduled"));
        assert!(!reopened.has_changes());
    }
}
