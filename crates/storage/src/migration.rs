//! Migration of persisted state
//!
//! Persisted data is not trusted. Records that cannot be interpreted are dropped instead of
//! failing the whole migration. The performance memory is brought into schema version 2, in
//! which every remembered set is keyed by exercise, category, set type and order. The legacy
//! shape grouped the records by exercise and set type and counted the order from 0.

use std::collections::{BTreeMap, btree_map};

use chrono::{DateTime, Utc};
use liftlog_domain as domain;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::snapshot::{
    KEY_EXERCISES, KEY_PERFORMANCE_MEMORY, PatternMemoryEntry, PerformanceMemory, PersonalRecord,
    SCHEMA_VERSION, TRANSIENT_KEYS, parse_category, parse_set_type,
};

/// Brings a merged persisted state into the current shape.
#[must_use]
pub fn migrate_state_snapshot(mut snapshot: Map<String, Value>) -> Map<String, Value> {
    for key in TRANSIENT_KEYS {
        if snapshot.remove(key).is_some() {
            debug!("dropped transient field {key}");
        }
    }

    let categories = exercise_categories(snapshot.get(KEY_EXERCISES));
    let memory = migrate_performance_memory(snapshot.get(KEY_PERFORMANCE_MEMORY), &categories);
    match serde_json::to_value(memory) {
        Ok(memory) => {
            snapshot.insert(KEY_PERFORMANCE_MEMORY.to_string(), memory);
        }
        Err(err) => {
            warn!("failed to serialize migrated performance memory: {err}");
            snapshot.remove(KEY_PERFORMANCE_MEMORY);
        }
    }
    snapshot
}

/// Categories of the exercises in a persisted catalog. Exercises without a valid category are
/// left out.
#[must_use]
pub fn exercise_categories(exercises: Option<&Value>) -> BTreeMap<String, domain::Category> {
    exercises
        .and_then(Value::as_object)
        .map(|exercises| {
            exercises
                .iter()
                .filter_map(|(key, exercise)| {
                    let category = parse_category(exercise.get("category")?.as_str()?).ok()?;
                    let id = exercise.get("id").and_then(Value::as_str).unwrap_or(key);
                    Some((id.to_string(), category))
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Converts a persisted performance memory of any known shape into schema version 2.
#[must_use]
pub fn migrate_performance_memory(
    memory: Option<&Value>,
    categories: &BTreeMap<String, domain::Category>,
) -> PerformanceMemory {
    let Some(memory) = memory.and_then(Value::as_object) else {
        return PerformanceMemory::default();
    };

    let mut migration = Migration::default();
    if memory.get("schemaVersion").and_then(Value::as_f64) == Some(f64::from(SCHEMA_VERSION)) {
        migration.revalidate(memory);
    } else if memory.contains_key("memories") {
        migration.convert_legacy(memory, categories);
    } else {
        debug!("no known performance memory shape, starting empty");
    }
    migration.personal_records(memory.get("personalRecords"));
    migration.finish()
}

#[derive(Default)]
struct Migration {
    pattern_memory: BTreeMap<String, PatternMemoryEntry>,
    personal_records: BTreeMap<String, PersonalRecord>,
    dropped: usize,
}

impl Migration {
    fn revalidate(&mut self, memory: &Map<String, Value>) {
        let entries = memory.get("patternMemory").and_then(Value::as_object);
        for value in entries.into_iter().flat_map(Map::values) {
            self.insert(parse_pattern_memory_entry(value));
        }
    }

    fn convert_legacy(
        &mut self,
        memory: &Map<String, Value>,
        categories: &BTreeMap<String, domain::Category>,
    ) {
        let exercises = memory.get("memories").and_then(Value::as_object);
        for (exercise_id, set_types) in exercises.into_iter().flatten() {
            let Some(category) = categories.get(exercise_id) else {
                self.dropped += count_records(set_types);
                continue;
            };
            let Some(set_types) = set_types.as_object() else {
                self.dropped += 1;
                continue;
            };
            for (set_type, records) in set_types {
                let Ok(set_type) = parse_set_type(set_type) else {
                    self.dropped += records.as_array().map_or(1, Vec::len);
                    continue;
                };
                let Some(records) = records.as_array() else {
                    self.dropped += 1;
                    continue;
                };
                for record in records {
                    let entry = record
                        .get("typeOrder")
                        .and_then(parse_type_order)
                        .and_then(|order| {
                            pattern_memory_entry(exercise_id, *category, set_type, order, record)
                        });
                    self.insert(entry);
                }
            }
        }
    }

    fn personal_records(&mut self, records: Option<&Value>) {
        for (exercise_id, record) in records.and_then(Value::as_object).into_iter().flatten() {
            let parsed = record
                .get("updatedAt")
                .and_then(parse_timestamp)
                .map(|updated_at| PersonalRecord {
                    max_weight: number(record, "maxWeight"),
                    max_reps: number(record, "maxReps"),
                    max_time: number(record, "maxTime"),
                    max_distance: number(record, "maxDistance"),
                    updated_at,
                });
            match parsed {
                Some(record) if !exercise_id.is_empty() => {
                    self.personal_records.insert(exercise_id.clone(), record);
                }
                _ => self.dropped += 1,
            }
        }
    }

    /// Keeps the most recent entry if several records end up with the same key.
    fn insert(&mut self, entry: Option<PatternMemoryEntry>) {
        let Some(entry) = entry else {
            self.dropped += 1;
            return;
        };
        match self.pattern_memory.entry(entry.key()) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            btree_map::Entry::Occupied(mut slot) => {
                if entry.performed_at > slot.get().performed_at {
                    slot.insert(entry);
                }
            }
        }
    }

    fn finish(self) -> PerformanceMemory {
        if self.dropped > 0 {
            warn!("dropped {} invalid performance memory records", self.dropped);
        }
        PerformanceMemory {
            schema_version: SCHEMA_VERSION,
            pattern_memory: self.pattern_memory,
            personal_records: self.personal_records,
        }
    }
}

fn parse_pattern_memory_entry(value: &Value) -> Option<PatternMemoryEntry> {
    pattern_memory_entry(
        value.get("exerciseId")?.as_str()?,
        parse_category(value.get("category")?.as_str()?).ok()?,
        parse_set_type(value.get("setType")?.as_str()?).ok()?,
        parse_order(value.get("order")?)?,
        value,
    )
}

fn pattern_memory_entry(
    exercise_id: &str,
    category: domain::Category,
    set_type: domain::SetType,
    order: u32,
    value: &Value,
) -> Option<PatternMemoryEntry> {
    if exercise_id.is_empty() {
        return None;
    }
    Some(PatternMemoryEntry {
        exercise_id: exercise_id.to_string(),
        category: category.to_string(),
        set_type: set_type.to_string(),
        order,
        performed_at: parse_timestamp(value.get("performedAt")?)?,
        weight: number(value, "weight"),
        reps: number(value, "reps"),
        time: number(value, "time"),
        distance: number(value, "distance"),
        rest_time: number(value, "restTime"),
    })
}

fn count_records(set_types: &Value) -> usize {
    set_types
        .as_object()
        .map_or(1, |set_types| {
            set_types
                .values()
                .map(|records| records.as_array().map_or(1, Vec::len))
                .sum()
        })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_whole_number(value: &Value) -> Option<u32> {
    let number = value.as_f64()?;
    (number.is_finite() && number >= 0.0 && number.fract() == 0.0 && number < f64::from(u32::MAX))
        .then_some(number as u32)
}

fn parse_order(value: &Value) -> Option<u32> {
    parse_whole_number(value).filter(|order| *order > 0)
}

/// The legacy order was counted from 0.
fn parse_type_order(value: &Value) -> Option<u32> {
    parse_whole_number(value).map(|order| order + 1)
}

fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.as_str()?)
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Utc))
}

fn number(value: &Value, key: &str) -> Option<f64> {
    value
        .get(key)
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
}
