//! Performance memory
//!
//! Completed sets are remembered per exercise, category, set type and ordinal. The ordinal is
//! the 1-based position of a set among the sets of the same type within one exercise of a
//! workout. Each slot holds only the most recent values, which are used to prefill new sets.
//! In addition, the best value ever recorded for weight, reps, time and distance is kept per
//! exercise.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, Utc};
use log::debug;

use crate::{Category, ExerciseID, SetData, SetField, SetType};

pub const EMPTY_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PatternKey {
    pub exercise_id: ExerciseID,
    pub category: Category,
    pub set_type: SetType,
    pub order: u32,
}

impl fmt::Display for PatternKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}|{}|{}",
            self.exercise_id, self.category, self.set_type, self.order
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatternMemoryEntry {
    pub performed_at: DateTime<Utc>,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub time: Option<f64>,
    pub distance: Option<f64>,
    pub rest_time: Option<f64>,
}

impl PatternMemoryEntry {
    #[must_use]
    pub fn new(performed_at: DateTime<Utc>, set: &SetData) -> Self {
        Self {
            performed_at,
            weight: set.weight,
            reps: set.reps,
            time: set.time,
            distance: set.distance,
            rest_time: set.rest_time,
        }
    }

    #[must_use]
    pub fn get(&self, field: SetField) -> Option<f64> {
        match field {
            SetField::Weight => self.weight,
            SetField::Reps => self.reps,
            SetField::Time => self.time,
            SetField::Distance => self.distance,
            SetField::RestTime => self.rest_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PersonalRecord {
    pub max_weight: Option<f64>,
    pub max_reps: Option<f64>,
    pub max_time: Option<f64>,
    pub max_distance: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl PersonalRecord {
    fn new(updated_at: DateTime<Utc>) -> Self {
        Self {
            max_weight: None,
            max_reps: None,
            max_time: None,
            max_distance: None,
            updated_at,
        }
    }

    /// Raises every maximum the set improves on. Returns whether anything changed.
    fn improve(&mut self, set: &SetData) -> bool {
        let mut improved = false;
        for (max, value) in [
            (&mut self.max_weight, set.weight),
            (&mut self.max_reps, set.reps),
            (&mut self.max_time, set.time),
            (&mut self.max_distance, set.distance),
        ] {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };
            if max.is_none_or(|m| value > m) {
                *max = Some(value);
                improved = true;
            }
        }
        improved
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedExercise {
    pub exercise_id: ExerciseID,
    pub category: Category,
    pub sets: Vec<SetData>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletedWorkout {
    pub completed_at: DateTime<Utc>,
    pub exercises: Vec<CompletedExercise>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceholderQuery {
    pub exercise_id: Option<ExerciseID>,
    pub category: Option<Category>,
    pub set_type: Option<SetType>,
    pub order: u32,
}

impl PlaceholderQuery {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, category: Category, set_type: SetType, order: u32) -> Self {
        Self {
            exercise_id: Some(exercise_id),
            category: Some(category),
            set_type: Some(set_type),
            order,
        }
    }

    fn key(&self) -> Option<PatternKey> {
        if self.order == 0 {
            return None;
        }
        Some(PatternKey {
            exercise_id: self.exercise_id.clone()?,
            category: self.category?,
            set_type: self.set_type?,
            order: self.order,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetPlaceholders {
    pub reps: String,
    pub weight: String,
    pub time: String,
    pub distance: String,
    pub rest_time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviousSetData {
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub time: Option<f64>,
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceMemory {
    pattern_memory: BTreeMap<PatternKey, PatternMemoryEntry>,
    personal_records: BTreeMap<ExerciseID, PersonalRecord>,
}

impl PerformanceMemory {
    #[must_use]
    pub fn from_parts(
        pattern_memory: BTreeMap<PatternKey, PatternMemoryEntry>,
        personal_records: BTreeMap<ExerciseID, PersonalRecord>,
    ) -> Self {
        Self {
            pattern_memory,
            personal_records,
        }
    }

    #[must_use]
    pub fn pattern_memory(&self) -> &BTreeMap<PatternKey, PatternMemoryEntry> {
        &self.pattern_memory
    }

    #[must_use]
    pub fn personal_records(&self) -> &BTreeMap<ExerciseID, PersonalRecord> {
        &self.personal_records
    }

    pub fn record_completed_workout(&mut self, workout: &CompletedWorkout) {
        for exercise in &workout.exercises {
            let mut orders: BTreeMap<SetType, u32> = BTreeMap::new();
            for set in &exercise.sets {
                let order = orders.entry(set.set_type).or_insert(0);
                *order += 1;
                self.pattern_memory.insert(
                    PatternKey {
                        exercise_id: exercise.exercise_id.clone(),
                        category: exercise.category,
                        set_type: set.set_type,
                        order: *order,
                    },
                    PatternMemoryEntry::new(workout.completed_at, set),
                );
            }
            self.update_personal_record(
                &exercise.exercise_id,
                &exercise.sets,
                workout.completed_at,
            );
        }
        debug!(
            "recorded {} exercises completed at {}",
            workout.exercises.len(),
            workout.completed_at
        );
    }

    fn update_personal_record(
        &mut self,
        exercise_id: &ExerciseID,
        sets: &[SetData],
        completed_at: DateTime<Utc>,
    ) {
        let mut record = self
            .personal_records
            .get(exercise_id)
            .cloned()
            .unwrap_or_else(|| PersonalRecord::new(completed_at));
        let mut improved = false;
        for set in sets {
            improved |= record.improve(set);
        }
        if improved {
            record.updated_at = completed_at;
            self.personal_records.insert(exercise_id.clone(), record);
        }
    }

    #[must_use]
    pub fn get_placeholder_for_field(&self, query: &PlaceholderQuery, field: SetField) -> String {
        query
            .key()
            .and_then(|key| self.pattern_memory.get(&key))
            .and_then(|entry| entry.get(field))
            .map_or_else(|| EMPTY_PLACEHOLDER.to_string(), |value| value.to_string())
    }

    #[must_use]
    pub fn get_placeholders_for_set(&self, query: &PlaceholderQuery) -> SetPlaceholders {
        SetPlaceholders {
            reps: self.get_placeholder_for_field(query, SetField::Reps),
            weight: self.get_placeholder_for_field(query, SetField::Weight),
            time: self.get_placeholder_for_field(query, SetField::Time),
            distance: self.get_placeholder_for_field(query, SetField::Distance),
            rest_time: self.get_placeholder_for_field(query, SetField::RestTime),
        }
    }

    #[must_use]
    pub fn get_previous_set_data(&self, query: &PlaceholderQuery) -> Option<PreviousSetData> {
        let entry = self.pattern_memory.get(&query.key()?)?;
        Some(PreviousSetData {
            weight: entry.weight,
            reps: entry.reps,
            time: entry.time,
            distance: entry.distance,
        })
    }

    #[must_use]
    pub fn get_personal_record(&self, exercise_id: &ExerciseID) -> Option<&PersonalRecord> {
        self.personal_records.get(exercise_id)
    }
}
