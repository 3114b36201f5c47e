//! Workout store
//!
//! Owns the active session, the session history and the templates. Every mutating operation
//! either applies completely or leaves the store untouched. Failures are not returned to the
//! caller but kept as the last error, and the operation returns `false` or `None`.

use std::{cmp::Reverse, collections::BTreeMap};

use chrono::{DateTime, Utc};
use log::{debug, warn};

use crate::{
    Category, ExerciseCatalog, ExerciseID, ExerciseSet, Name, PerformanceMemory, SetData, SetID,
    SetPatch, SetType, TemplateID, TemplateUpdateSummary, WorkoutError, WorkoutExercise,
    WorkoutExerciseID, WorkoutSession, WorkoutTemplate, validate_set_data,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutStore {
    current_session: Option<WorkoutSession>,
    session_history: Vec<WorkoutSession>,
    templates: BTreeMap<TemplateID, WorkoutTemplate>,
    last_error: Option<WorkoutError>,
}

impl WorkoutStore {
    #[must_use]
    pub fn from_parts(
        current_session: Option<WorkoutSession>,
        session_history: Vec<WorkoutSession>,
        templates: impl IntoIterator<Item = WorkoutTemplate>,
    ) -> Self {
        Self {
            current_session,
            session_history,
            templates: templates.into_iter().map(|t| (t.id, t)).collect(),
            last_error: None,
        }
    }

    #[must_use]
    pub fn current_session(&self) -> Option<&WorkoutSession> {
        self.current_session.as_ref()
    }

    #[must_use]
    pub fn session_history(&self) -> &[WorkoutSession] {
        &self.session_history
    }

    pub fn templates(&self) -> impl Iterator<Item = &WorkoutTemplate> {
        self.templates.values()
    }

    #[must_use]
    pub fn template(&self, id: TemplateID) -> Option<&WorkoutTemplate> {
        self.templates.get(&id)
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&WorkoutError> {
        self.last_error.as_ref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    fn report<T>(&mut self, operation: &str, result: Result<T, WorkoutError>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(err) => {
                warn!("{operation} failed: {err}");
                self.last_error = Some(err);
                None
            }
        }
    }

    fn ensure_no_session(&self) -> Result<(), WorkoutError> {
        if self.current_session.is_some() {
            return Err(WorkoutError::SessionAlreadyActive);
        }
        Ok(())
    }

    fn session_mut(&mut self) -> Result<&mut WorkoutSession, WorkoutError> {
        self.current_session
            .as_mut()
            .ok_or(WorkoutError::NoActiveSession)
    }

    fn workout_exercise_mut(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
    ) -> Result<&mut WorkoutExercise, WorkoutError> {
        self.session_mut()?
            .workout_exercise_mut(workout_exercise_id)
            .ok_or(WorkoutError::UnknownWorkoutExercise)
    }

    // Sessions

    pub fn start_new_session(&mut self) -> bool {
        let result = self.try_start_new_session();
        self.report("start session", result).is_some()
    }

    fn try_start_new_session(&mut self) -> Result<(), WorkoutError> {
        self.ensure_no_session()?;
        let session = WorkoutSession::new(Utc::now(), None);
        debug!("started session {}", *session.id);
        self.current_session = Some(session);
        Ok(())
    }

    /// Starts a session containing the exercises of the template.
    ///
    /// Set types are taken from the sets stored in the template, while all values start at
    /// zero. Exercises without stored sets get one working set.
    pub fn start_session_from_template(
        &mut self,
        catalog: &ExerciseCatalog,
        template_id: TemplateID,
    ) -> bool {
        let result = self.try_start_session_from_template(catalog, template_id);
        self.report("start session from template", result).is_some()
    }

    fn try_start_session_from_template(
        &mut self,
        catalog: &ExerciseCatalog,
        template_id: TemplateID,
    ) -> Result<(), WorkoutError> {
        self.ensure_no_session()?;
        let template = self
            .templates
            .get(&template_id)
            .ok_or(WorkoutError::UnknownTemplate)?;
        let now = Utc::now();
        let session = session_from_template(catalog, template, now)?;

        if let Some(template) = self.templates.get_mut(&template_id) {
            template.last_used_at = Some(now);
        }
        debug!(
            "started session {} from template {}",
            *session.id, *template_id
        );
        self.current_session = Some(session);
        Ok(())
    }

    /// Appends the exercise with one default working set and returns the ID of the new
    /// workout exercise.
    pub fn add_exercise_to_session(
        &mut self,
        catalog: &ExerciseCatalog,
        exercise_id: &ExerciseID,
    ) -> Option<WorkoutExerciseID> {
        let result = self.try_add_exercise_to_session(catalog, exercise_id);
        self.report("add exercise", result)
    }

    fn try_add_exercise_to_session(
        &mut self,
        catalog: &ExerciseCatalog,
        exercise_id: &ExerciseID,
    ) -> Result<WorkoutExerciseID, WorkoutError> {
        let session = self.session_mut()?;
        let exercise = catalog
            .get_exercise(exercise_id)
            .ok_or_else(|| WorkoutError::UnknownExercise(exercise_id.clone()))?;
        let workout_exercise = WorkoutExercise::new(
            exercise_id.clone(),
            vec![ExerciseSet::new(
                exercise.category.default_set_data(SetType::Working),
            )],
        );
        let id = workout_exercise.id;
        session.exercises.push(workout_exercise);
        Ok(id)
    }

    pub fn remove_exercise_from_session(&mut self, workout_exercise_id: WorkoutExerciseID) -> bool {
        let result = self.try_remove_exercise_from_session(workout_exercise_id);
        self.report("remove exercise", result).is_some()
    }

    fn try_remove_exercise_from_session(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
    ) -> Result<(), WorkoutError> {
        let session = self.session_mut()?;
        let position = session
            .exercises
            .iter()
            .position(|e| e.id == workout_exercise_id)
            .ok_or(WorkoutError::UnknownWorkoutExercise)?;
        session.exercises.remove(position);
        Ok(())
    }

    pub fn add_set_to_workout_exercise(
        &mut self,
        catalog: &ExerciseCatalog,
        workout_exercise_id: WorkoutExerciseID,
        set_data: SetData,
    ) -> bool {
        let result = self.try_add_set_to_workout_exercise(catalog, workout_exercise_id, set_data);
        self.report("add set", result).is_some()
    }

    fn try_add_set_to_workout_exercise(
        &mut self,
        catalog: &ExerciseCatalog,
        workout_exercise_id: WorkoutExerciseID,
        set_data: SetData,
    ) -> Result<(), WorkoutError> {
        let exercise = self.workout_exercise_mut(workout_exercise_id)?;
        validate_set_data(catalog, &exercise.exercise_id, Some(&set_data))?;
        exercise.sets.push(ExerciseSet::new(set_data));
        Ok(())
    }

    /// Applies the patch to the set. The merged set must be valid as a whole, otherwise the
    /// set stays unchanged.
    pub fn update_set_in_workout_exercise(
        &mut self,
        catalog: &ExerciseCatalog,
        workout_exercise_id: WorkoutExerciseID,
        set_id: SetID,
        patch: &SetPatch,
    ) -> bool {
        let result =
            self.try_update_set_in_workout_exercise(catalog, workout_exercise_id, set_id, patch);
        self.report("update set", result).is_some()
    }

    fn try_update_set_in_workout_exercise(
        &mut self,
        catalog: &ExerciseCatalog,
        workout_exercise_id: WorkoutExerciseID,
        set_id: SetID,
        patch: &SetPatch,
    ) -> Result<(), WorkoutError> {
        let exercise = self.workout_exercise_mut(workout_exercise_id)?;
        let set = exercise.set(set_id).ok_or(WorkoutError::SetNotFound)?;
        let merged = patch.apply(set);
        validate_set_data(catalog, &exercise.exercise_id, Some(&merged.data))?;
        exercise.replace_set(merged);
        Ok(())
    }

    pub fn delete_set_from_workout_exercise(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
        set_id: SetID,
    ) -> bool {
        let result = self.try_delete_set_from_workout_exercise(workout_exercise_id, set_id);
        self.report("delete set", result).is_some()
    }

    fn try_delete_set_from_workout_exercise(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
        set_id: SetID,
    ) -> Result<(), WorkoutError> {
        if self.workout_exercise_mut(workout_exercise_id)?.remove_set(set_id) {
            Ok(())
        } else {
            Err(WorkoutError::SetNotFound)
        }
    }

    pub fn update_workout_exercise_notes(
        &mut self,
        workout_exercise_id: WorkoutExerciseID,
        notes: &str,
    ) -> bool {
        let result = self
            .workout_exercise_mut(workout_exercise_id)
            .map(|exercise| exercise.notes = notes.to_string());
        self.report("update notes", result).is_some()
    }

    pub fn discard_session(&mut self) -> bool {
        let result = match self.current_session.take() {
            Some(session) => {
                debug!("discarded session {}", *session.id);
                Ok(())
            }
            None => Err(WorkoutError::NoActiveSession),
        };
        self.report("discard session", result).is_some()
    }

    /// Finishes the active session.
    ///
    /// Done sets are recorded in the performance memory. Unless skipped, the template the
    /// session was started from is overwritten with all exercises and sets of the session.
    /// The session is moved to the history without its notes.
    pub fn complete_session(
        &mut self,
        catalog: &ExerciseCatalog,
        memory: &mut PerformanceMemory,
        skip_template_update: bool,
    ) -> bool {
        let result = self.try_complete_session(catalog, memory, skip_template_update, Utc::now());
        self.report("complete session", result).is_some()
    }

    fn try_complete_session(
        &mut self,
        catalog: &ExerciseCatalog,
        memory: &mut PerformanceMemory,
        skip_template_update: bool,
        now: DateTime<Utc>,
    ) -> Result<(), WorkoutError> {
        let session = self
            .current_session
            .take()
            .ok_or(WorkoutError::NoActiveSession)?;

        memory.record_completed_workout(&session.completed_workout(catalog, now));

        if let Some(template_id) = session.template_id.filter(|_| !skip_template_update) {
            match self.templates.get_mut(&template_id) {
                Some(template) => template.sync_from_session(&session, now),
                None => warn!("template {} of completed session no longer exists", *template_id),
            }
        }

        debug!("completed session {}", *session.id);
        self.session_history.push(session.archived(now));
        Ok(())
    }

    // Templates

    /// Creates an empty template for the given exercises.
    pub fn create_template(
        &mut self,
        catalog: &ExerciseCatalog,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> Option<TemplateID> {
        let result = self.try_create_template(catalog, name, exercise_ids);
        self.report("create template", result)
    }

    fn try_create_template(
        &mut self,
        catalog: &ExerciseCatalog,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> Result<TemplateID, WorkoutError> {
        let name = Name::new(name)?;
        ensure_exercises_exist(catalog, &exercise_ids)?;
        let id = self.unused_template_id();
        self.templates.insert(
            id,
            WorkoutTemplate {
                id,
                name,
                exercise_ids,
                exercises: vec![],
                last_used_at: Some(Utc::now()),
            },
        );
        debug!("created template {}", *id);
        Ok(id)
    }

    fn unused_template_id(&self) -> TemplateID {
        loop {
            let id = TemplateID::random();
            if !self.templates.contains_key(&id) {
                return id;
            }
        }
    }

    /// Creates a template containing the exercises and sets of the active session.
    pub fn create_template_from_session(
        &mut self,
        catalog: &ExerciseCatalog,
        name: &str,
    ) -> Option<TemplateID> {
        let result = self.try_create_template_from_session(catalog, name);
        self.report("create template from session", result)
    }

    fn try_create_template_from_session(
        &mut self,
        catalog: &ExerciseCatalog,
        name: &str,
    ) -> Result<TemplateID, WorkoutError> {
        let session = self
            .current_session
            .as_ref()
            .ok_or(WorkoutError::NoActiveSession)?;
        let exercise_ids = session.exercise_ids();
        let exercises = session.template_exercises();
        let id = self.try_create_template(catalog, name, exercise_ids)?;
        if let Some(template) = self.templates.get_mut(&id) {
            template.exercises = exercises;
        }
        Ok(id)
    }

    pub fn update_template_from_current_session(&mut self, template_id: TemplateID) -> bool {
        let result = self.try_update_template_from_current_session(template_id);
        self.report("update template from session", result)
            .is_some()
    }

    fn try_update_template_from_current_session(
        &mut self,
        template_id: TemplateID,
    ) -> Result<(), WorkoutError> {
        let session = self
            .current_session
            .as_ref()
            .ok_or(WorkoutError::NoActiveSession)?;
        let template = self
            .templates
            .get_mut(&template_id)
            .ok_or(WorkoutError::UnknownTemplate)?;
        template.sync_from_session(session, Utc::now());
        Ok(())
    }

    /// Renames the template and replaces its exercises. Stored sets of exercises that remain in
    /// the template are kept.
    pub fn update_template(
        &mut self,
        catalog: &ExerciseCatalog,
        template_id: TemplateID,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> bool {
        let result = self.try_update_template(catalog, template_id, name, exercise_ids);
        self.report("update template", result).is_some()
    }

    fn try_update_template(
        &mut self,
        catalog: &ExerciseCatalog,
        template_id: TemplateID,
        name: &str,
        exercise_ids: Vec<ExerciseID>,
    ) -> Result<(), WorkoutError> {
        let name = Name::new(name)?;
        ensure_exercises_exist(catalog, &exercise_ids)?;
        let template = self
            .templates
            .get_mut(&template_id)
            .ok_or(WorkoutError::UnknownTemplate)?;
        template.name = name;
        template.replace_exercises(exercise_ids);
        Ok(())
    }

    pub fn delete_template(&mut self, template_id: TemplateID) -> bool {
        let result = self
            .templates
            .remove(&template_id)
            .map(|_| ())
            .ok_or(WorkoutError::UnknownTemplate);
        self.report("delete template", result).is_some()
    }

    /// Differences between the active session and the template, if both exist.
    #[must_use]
    pub fn get_template_update_summary(
        &self,
        template_id: TemplateID,
    ) -> Option<TemplateUpdateSummary> {
        let session = self.current_session.as_ref()?;
        Some(self.templates.get(&template_id)?.update_summary(session))
    }

    // Derived views

    #[must_use]
    pub fn total_volume(&self) -> f64 {
        self.current_session
            .as_ref()
            .map_or(0.0, WorkoutSession::total_volume)
    }

    #[must_use]
    pub fn completed_volume_kg(&self) -> f64 {
        self.current_session
            .as_ref()
            .map_or(0.0, WorkoutSession::completed_volume)
    }

    #[must_use]
    pub fn total_sets_count(&self) -> usize {
        self.current_session
            .as_ref()
            .map_or(0, WorkoutSession::total_sets_count)
    }

    #[must_use]
    pub fn completed_sets_count(&self) -> usize {
        self.current_session
            .as_ref()
            .map_or(0, WorkoutSession::completed_sets_count)
    }

    /// Template the active session was started from.
    #[must_use]
    pub fn current_template(&self) -> Option<&WorkoutTemplate> {
        self.templates
            .get(&self.current_session.as_ref()?.template_id?)
    }

    /// All templates, most recently used first. Templates never used are treated as used at
    /// the Unix epoch.
    #[must_use]
    pub fn recent_templates(&self) -> Vec<&WorkoutTemplate> {
        let mut templates = self.templates.values().collect::<Vec<_>>();
        templates.sort_by_key(|t| Reverse(t.last_used_at.unwrap_or(DateTime::UNIX_EPOCH)));
        templates
    }
}

fn session_from_template(
    catalog: &ExerciseCatalog,
    template: &WorkoutTemplate,
    now: DateTime<Utc>,
) -> Result<WorkoutSession, WorkoutError> {
    let categories = template
        .exercise_ids
        .iter()
        .map(|id| {
            catalog
                .get_exercise(id)
                .map(|e| e.category)
                .ok_or_else(|| WorkoutError::UnknownExercise(id.clone()))
        })
        .collect::<Result<Vec<Category>, _>>()?;

    let mut session = WorkoutSession::new(now, Some(template.id));
    let mut occurrences: BTreeMap<&ExerciseID, usize> = BTreeMap::new();
    for (exercise_id, category) in template.exercise_ids.iter().zip(categories) {
        let occurrence = occurrences.entry(exercise_id).or_insert(0);
        let sets = match template.stored_sets(exercise_id, *occurrence) {
            Some(stored) => stored
                .iter()
                .map(|s| category.default_set_data(s.set_type))
                .collect::<Vec<_>>(),
            None => vec![category.default_set_data(SetType::Working)],
        };
        *occurrence += 1;
        for set in &sets {
            validate_set_data(catalog, exercise_id, Some(set))?;
        }
        session.exercises.push(WorkoutExercise::new(
            exercise_id.clone(),
            sets.into_iter().map(ExerciseSet::new).collect(),
        ));
    }
    Ok(session)
}

fn ensure_exercises_exist(
    catalog: &ExerciseCatalog,
    exercise_ids: &[ExerciseID],
) -> Result<(), WorkoutError> {
    match exercise_ids.iter().find(|id| !catalog.has_exercise(id)) {
        Some(id) => Err(WorkoutError::UnknownExercise(id.clone())),
        None => Ok(()),
    }
}
