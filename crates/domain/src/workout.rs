use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    CompletedExercise, CompletedWorkout, ExerciseCatalog, ExerciseID, ExerciseSet, SetID,
    TemplateExercise, TemplateID, TemplateSet,
};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: SessionID,
    pub exercises: Vec<WorkoutExercise>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub template_id: Option<TemplateID>,
}

impl WorkoutSession {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, template_id: Option<TemplateID>) -> Self {
        Self {
            id: SessionID::random(),
            exercises: vec![],
            started_at,
            completed_at: None,
            template_id,
        }
    }

    #[must_use]
    pub fn exercise_ids(&self) -> Vec<ExerciseID> {
        self.exercises
            .iter()
            .map(|e| e.exercise_id.clone())
            .collect()
    }

    #[must_use]
    pub fn workout_exercise(&self, id: WorkoutExerciseID) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn workout_exercise_mut(&mut self, id: WorkoutExerciseID) -> Option<&mut WorkoutExercise> {
        self.exercises.iter_mut().find(|e| e.id == id)
    }

    fn sets(&self) -> impl Iterator<Item = &ExerciseSet> {
        self.exercises.iter().flat_map(|e| e.sets.iter())
    }

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.sets().map(|s| s.data.volume()).sum()
    }

    #[must_use]
    pub fn completed_volume(&self) -> f64 {
        self.sets()
            .filter(|s| s.is_done)
            .map(|s| s.data.volume())
            .sum()
    }

    #[must_use]
    pub fn total_sets_count(&self) -> usize {
        self.sets().count()
    }

    #[must_use]
    pub fn completed_sets_count(&self) -> usize {
        self.sets().filter(|s| s.is_done).count()
    }

    /// Done sets grouped by exercise. Exercises without done sets and exercises that are no
    /// longer part of the catalog are left out.
    #[must_use]
    pub fn completed_workout(
        &self,
        catalog: &ExerciseCatalog,
        completed_at: DateTime<Utc>,
    ) -> CompletedWorkout {
        CompletedWorkout {
            completed_at,
            exercises: self
                .exercises
                .iter()
                .filter_map(|e| {
                    let category = catalog.get_exercise(&e.exercise_id)?.category;
                    let sets = e
                        .sets
                        .iter()
                        .filter(|s| s.is_done)
                        .map(|s| s.data)
                        .collect::<Vec<_>>();
                    if sets.is_empty() {
                        return None;
                    }
                    Some(CompletedExercise {
                        exercise_id: e.exercise_id.clone(),
                        category,
                        sets,
                    })
                })
                .collect(),
        }
    }

    /// All exercises and sets of the session as template data.
    #[must_use]
    pub fn template_exercises(&self) -> Vec<TemplateExercise> {
        self.exercises
            .iter()
            .map(|e| TemplateExercise {
                exercise_id: e.exercise_id.clone(),
                sets: e.sets.iter().map(|s| TemplateSet::from(&s.data)).collect(),
            })
            .collect()
    }

    /// Copy of the session for the history. Notes only live as long as the session.
    #[must_use]
    pub fn archived(&self, completed_at: DateTime<Utc>) -> Self {
        let mut session = self.clone();
        session.completed_at = Some(completed_at);
        for exercise in &mut session.exercises {
            exercise.notes.clear();
        }
        session
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionID(Uuid);

impl SessionID {
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

impl From<Uuid> for SessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutExercise {
    pub id: WorkoutExerciseID,
    pub exercise_id: ExerciseID,
    pub notes: String,
    pub sets: Vec<ExerciseSet>,
}

impl WorkoutExercise {
    #[must_use]
    pub fn new(exercise_id: ExerciseID, sets: Vec<ExerciseSet>) -> Self {
        Self {
            id: WorkoutExerciseID::random(),
            exercise_id,
            notes: String::new(),
            sets,
        }
    }

    #[must_use]
    pub fn set(&self, id: SetID) -> Option<&ExerciseSet> {
        self.sets.iter().find(|s| s.id == id)
    }

    fn set_position(&self, id: SetID) -> Option<usize> {
        self.sets.iter().position(|s| s.id == id)
    }

    pub(crate) fn replace_set(&mut self, set: ExerciseSet) -> bool {
        match self.set_position(set.id) {
            Some(position) => {
                self.sets[position] = set;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_set(&mut self, id: SetID) -> bool {
        match self.set_position(id) {
            Some(position) => {
                self.sets.remove(position);
                true
            }
            None => false,
        }
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkoutExerciseID(Uuid);

impl WorkoutExerciseID {
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

impl From<Uuid> for WorkoutExerciseID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use crate::{Category, SetData, SetField, SetType};

    use super::*;

    static STARTED_AT: std::sync::LazyLock<DateTime<Utc>> =
        std::sync::LazyLock::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap());

    fn set(set_type: SetType, weight: f64, reps: f64, is_done: bool) -> ExerciseSet {
        ExerciseSet {
            is_done,
            ..ExerciseSet::new(
                SetData::new(set_type)
                    .with(SetField::Weight, weight)
                    .with(SetField::Reps, reps),
            )
        }
    }

    fn session() -> WorkoutSession {
        let mut session = WorkoutSession::new(*STARTED_AT, None);
        session.exercises = vec![
            WorkoutExercise {
                notes: "Felt heavy".to_string(),
                ..WorkoutExercise::new(
                    "bench-press".into(),
                    vec![
                        set(SetType::Warmup, 40.0, 10.0, true),
                        set(SetType::Working, 82.5, 5.0, true),
                        set(SetType::Working, 82.5, 4.0, false),
                    ],
                )
            },
            WorkoutExercise::new("squat".into(), vec![set(SetType::Working, 100.0, 5.0, false)]),
            WorkoutExercise::new(
                "deleted".into(),
                vec![set(SetType::Working, 10.0, 10.0, true)],
            ),
        ];
        session
    }

    #[test]
    fn test_workout_session_volume() {
        let session = session();
        assert_approx_eq!(session.total_volume(), 400.0 + 412.5 + 330.0 + 500.0 + 100.0);
        assert_approx_eq!(session.completed_volume(), 400.0 + 412.5 + 100.0);
    }

    #[test]
    fn test_workout_session_sets_count() {
        let session = session();
        assert_eq!(session.total_sets_count(), 5);
        assert_eq!(session.completed_sets_count(), 3);
    }

    #[test]
    fn test_workout_session_completed_workout() {
        let catalog = ExerciseCatalog::new();
        let session = session();
        let completed_at = *STARTED_AT + chrono::Duration::hours(1);
        assert_eq!(
            session.completed_workout(&catalog, completed_at),
            CompletedWorkout {
                completed_at,
                exercises: vec![CompletedExercise {
                    exercise_id: "bench-press".into(),
                    category: Category::Strength,
                    sets: vec![
                        session.exercises[0].sets[0].data,
                        session.exercises[0].sets[1].data,
                    ],
                }],
            }
        );
    }

    #[test]
    fn test_workout_session_template_exercises() {
        let session = session();
        let exercises = session.template_exercises();
        assert_eq!(
            exercises.iter().map(|e| e.exercise_id.clone()).collect::<Vec<_>>(),
            session.exercise_ids()
        );
        assert_eq!(
            exercises[0].sets,
            vec![
                TemplateSet::from(&session.exercises[0].sets[0].data),
                TemplateSet::from(&session.exercises[0].sets[1].data),
                TemplateSet::from(&session.exercises[0].sets[2].data),
            ]
        );
    }

    #[test]
    fn test_workout_session_archived() {
        let session = session();
        let completed_at = *STARTED_AT + chrono::Duration::hours(1);
        let archived = session.archived(completed_at);
        assert_eq!(archived.completed_at, Some(completed_at));
        assert!(archived.exercises.iter().all(|e| e.notes.is_empty()));
        assert_eq!(archived.exercises[0].sets, session.exercises[0].sets);
        assert_eq!(session.exercises[0].notes, "Felt heavy");
    }

    #[test]
    fn test_workout_exercise_replace_and_remove_set() {
        let mut exercise = session().exercises[0].clone();
        let mut replacement = exercise.sets[2].clone();
        replacement.is_done = true;
        assert!(exercise.replace_set(replacement.clone()));
        assert_eq!(exercise.set(replacement.id), Some(&replacement));
        assert!(!exercise.replace_set(ExerciseSet::new(SetData::default())));
        assert!(exercise.remove_set(replacement.id));
        assert!(!exercise.remove_set(replacement.id));
        assert_eq!(exercise.sets.len(), 2);
    }

    #[test]
    fn test_session_id_nil() {
        assert!(SessionID::nil().is_nil());
        assert_eq!(SessionID::nil(), SessionID::default());
        assert!(WorkoutExerciseID::nil().is_nil());
        assert_eq!(WorkoutExerciseID::nil(), WorkoutExerciseID::default());
    }
}
