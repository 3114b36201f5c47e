use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{ExerciseID, Name, SetData, SetType, WorkoutSession};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutTemplate {
    pub id: TemplateID,
    pub name: Name,
    /// Exercises of the routine in prescribed order.
    pub exercise_ids: Vec<ExerciseID>,
    /// Set data captured from sessions. Empty until a session is stored into the template.
    pub exercises: Vec<TemplateExercise>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl WorkoutTemplate {
    /// Stored sets of the `occurrence`-th entry of an exercise (counted from 0), if any.
    #[must_use]
    pub fn stored_sets(
        &self,
        exercise_id: &ExerciseID,
        occurrence: usize,
    ) -> Option<&[TemplateSet]> {
        self.exercises
            .iter()
            .filter(|e| &e.exercise_id == exercise_id)
            .nth(occurrence)
            .map(|e| e.sets.as_slice())
            .filter(|sets| !sets.is_empty())
    }

    /// Overwrites exercises and sets with the content of the session.
    pub fn sync_from_session(&mut self, session: &WorkoutSession, now: DateTime<Utc>) {
        self.exercise_ids = session.exercise_ids();
        self.exercises = session.template_exercises();
        self.last_used_at = Some(now);
    }

    /// Replaces the exercise list. Stored set data is kept for exercises remaining in the
    /// routine.
    pub fn replace_exercises(&mut self, exercise_ids: Vec<ExerciseID>) {
        let mut previous = std::mem::take(&mut self.exercises);
        self.exercises = exercise_ids
            .iter()
            .filter_map(|id| {
                let position = previous.iter().position(|e| &e.exercise_id == id)?;
                Some(previous.remove(position))
            })
            .collect();
        self.exercise_ids = exercise_ids;
    }

    fn set_counts(&self) -> BTreeMap<&ExerciseID, usize> {
        let mut counts = BTreeMap::new();
        for exercise in &self.exercises {
            *counts.entry(&exercise.exercise_id).or_insert(0) += exercise.sets.len();
        }
        counts
    }

    /// Differences between the session and the template.
    ///
    /// Exercises present in both are compared by set count. If the template has no stored
    /// sets for an exercise, one set is assumed, since a session started from such a template
    /// contains one default set per exercise.
    #[must_use]
    pub fn update_summary(&self, session: &WorkoutSession) -> TemplateUpdateSummary {
        let template_ids = &self.exercise_ids;
        let session_ids = session.exercise_ids();

        let mut session_counts: BTreeMap<&ExerciseID, usize> = BTreeMap::new();
        for exercise in &session.exercises {
            *session_counts.entry(&exercise.exercise_id).or_insert(0) += exercise.sets.len();
        }
        let template_counts = self.set_counts();

        let mut summary = TemplateUpdateSummary {
            added_exercises: dedup(session_ids.iter().filter(|id| !template_ids.contains(id))),
            removed_exercises: dedup(template_ids.iter().filter(|id| !session_ids.contains(id))),
            added_sets: 0,
            removed_sets: 0,
        };

        for id in dedup(template_ids.iter().filter(|id| session_ids.contains(id))) {
            let baseline = template_counts
                .get(&id)
                .copied()
                .filter(|count| *count > 0)
                .unwrap_or(1);
            let current = session_counts.get(&id).copied().unwrap_or(0);
            summary.added_sets += current.saturating_sub(baseline);
            summary.removed_sets += baseline.saturating_sub(current);
        }

        summary
    }
}

fn dedup<'a>(ids: impl Iterator<Item = &'a ExerciseID>) -> Vec<ExerciseID> {
    let mut result: Vec<ExerciseID> = vec![];
    for id in ids {
        if !result.contains(id) {
            result.push(id.clone());
        }
    }
    result
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TemplateID(Uuid);

impl TemplateID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for TemplateID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for TemplateID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateExercise {
    pub exercise_id: ExerciseID,
    pub sets: Vec<TemplateSet>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateSet {
    pub set_type: SetType,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub time: Option<f64>,
    pub distance: Option<f64>,
    pub rest_time: Option<f64>,
}

impl From<&SetData> for TemplateSet {
    fn from(value: &SetData) -> Self {
        Self {
            set_type: value.set_type,
            weight: value.weight,
            reps: value.reps,
            time: value.time,
            distance: value.distance,
            rest_time: value.rest_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateUpdateSummary {
    pub added_exercises: Vec<ExerciseID>,
    pub removed_exercises: Vec<ExerciseID>,
    pub added_sets: usize,
    pub removed_sets: usize,
}

impl TemplateUpdateSummary {
    #[must_use]
    pub fn has_changes(&self) -> bool {
        !self.added_exercises.is_empty()
            || !self.removed_exercises.is_empty()
            || self.added_sets > 0
            || self.removed_sets > 0
    }
}
