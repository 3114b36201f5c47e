use crate::{
    ExerciseCatalog, ExerciseID, PerformanceMemory, SetData, SetID, SetPatch, TemplateID,
    WorkoutExerciseID, WorkoutStore,
};

/// Root of the application state.
///
/// The workout store does not own the catalog and the performance memory, so operations that
/// need them are provided here. The pending exercise selection and the auth token are never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub catalog: ExerciseCatalog,
    pub memory: PerformanceMemory,
    pub workouts: WorkoutStore,
    pub pending_exercise_selection: Option<ExerciseID>,
    pub auth_token: Option<String>,
}

impl AppState {
    /// Creates a state with the built-in exercises and without any workouts.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(
            ExerciseCatalog::new(),
            PerformanceMemory::default(),
            WorkoutStore::default(),
        )
    }

    #[must_use]
    pub fn from_parts(
        catalog: ExerciseCatalog,
        memory: PerformanceMemory,
        workouts: WorkoutStore,
    ) -> Self {
        Self {
            catalog,
            memory,
            workouts,
            pending_exercise_selection: None,
            auth_token: None,
        }
    }

    pub fn select_exercise(&mut self, exercise_id: ExerciseID) {
        self.pending_exercise_selection = Some(exercise_id);
    }

    pub fn take_pending_exercise_selection(&mut self) -> Option<ExerciseID> {
        self.pending_exercise_selection.take()
    }

    pub fn start_session_from_template(&mut self, template_id: TemplateID) -> bool {
        self.workouts.start_session_from_template(&self.catalog, template_id)
    }

    pub fn add_exercise_to_session(
        &mut self,
        exercise_id: &ExerciseID,
    ) -> Option<WorkoutExerciseID> {
        self.workouts.add_exercise_to_session(&self.catalog, exercise_id)
    }

    pub fn add_set_to_workout_exercise(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
        set_data: SetData,
    ) -> bool {
        self.workouts
            .add_set_to_workout_exercise(&self.catalog, workout_exercise_id, set_data)
    }

    pub fn update_set_in_workout_exercise(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
        set_id: SetID,
        patch: &SetPatch,
    ) -> bool {
        self.workouts.update_set_in_workout_exercise(
            &self.catalog,
            workout_exercise_id,
            set_id,
            patch,
        )
    }

    pub fn complete_session(&mut self, skip_template_update: bool) -> bool {
        self.workouts
            .complete_session(&self.catalog, &mut self.memory, skip_template_update)
    }

    pub fn create_template(
        &mut self,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> Option<TemplateID> {
        self.workouts.create_template(&self.catalog, name, exercise_ids)
    }

    pub fn create_template_from_session(&mut self, name: &str) -> Option<TemplateID> {
        self.workouts.create_template_from_session(&self.catalog, name)
    }

    pub fn update_template(
        &mut self,
        template_id: TemplateID,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> bool {
        self.workouts
            .update_template(&self.catalog, template_id, name, exercise_ids)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{Category, PlaceholderQuery, SetField, SetType};

    use super::*;

    #[test]
    fn test_new() {
        let state = AppState::new();
        assert!(state.catalog.is_seeded());
        assert_eq!(state.catalog.len(), 7);
        assert_eq!(state.memory, PerformanceMemory::default());
        assert_eq!(state.workouts, WorkoutStore::default());
        assert_eq!(state.pending_exercise_selection, None);
        assert_eq!(state.auth_token, None);
    }

    #[test]
    fn test_pending_exercise_selection() {
        let mut state = AppState::new();
        state.select_exercise("squat".into());
        assert_eq!(
            state.take_pending_exercise_selection(),
            Some(ExerciseID::from("squat"))
        );
        assert_eq!(state.take_pending_exercise_selection(), None);
    }

    #[test]
    fn test_workout() {
        let mut state = AppState::new();
        assert!(state.workouts.start_new_session());
        let id = state.add_exercise_to_session(&"deadlift".into()).unwrap();
        assert!(state.add_set_to_workout_exercise(
            id,
            SetData::new(SetType::Working)
                .with(SetField::Weight, 140.0)
                .with(SetField::Reps, 3.0)
        ));
        let set_ids = state.workouts.current_session().unwrap().exercises[0]
            .sets
            .iter()
            .map(|s| s.id)
            .collect::<Vec<_>>();
        for set_id in set_ids {
            assert!(state.update_set_in_workout_exercise(id, set_id, &SetPatch::done()));
        }
        let template_id = state.create_template_from_session("Pull").unwrap();
        assert!(state.complete_session(false));

        assert_eq!(
            state
                .memory
                .get_previous_set_data(&PlaceholderQuery::new(
                    "deadlift".into(),
                    Category::Strength,
                    SetType::Working,
                    2
                ))
                .and_then(|previous| previous.weight),
            Some(140.0)
        );

        assert!(state.start_session_from_template(template_id));
        assert_eq!(
            state.workouts.current_session().unwrap().exercises[0].sets.len(),
            2
        );
        assert!(state.update_template(template_id, "Back", vec!["pull-up".into()]));
        assert_eq!(
            state.workouts.template(template_id).unwrap().name.as_ref(),
            "Back"
        );
        assert_eq!(state.create_template("Empty", vec!["curl".into()]), None);
    }
}
