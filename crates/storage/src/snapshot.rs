use std::{collections::BTreeMap, str::FromStr};

use chrono::{DateTime, Utc};
use liftlog_domain as domain;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SCHEMA_VERSION: u32 = 2;

pub const KEY_EXERCISES: &str = "exercises";
pub const KEY_SEEDED: &str = "seeded";
pub const KEY_PERFORMANCE_MEMORY: &str = "performanceMemory";
pub const KEY_WORKOUTS: &str = "workouts";
pub const KEY_PENDING_EXERCISE_SELECTION: &str = "pendingExerciseSelection";
pub const KEY_AUTH_TOKEN: &str = "authToken";

/// Fields that are never persisted.
pub const TRANSIENT_KEYS: [&str; 2] = [KEY_PENDING_EXERCISE_SELECTION, KEY_AUTH_TOKEN];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSnapshot {
    pub exercises: BTreeMap<String, Exercise>,
    pub seeded: bool,
    pub performance_memory: PerformanceMemory,
    pub workouts: Workouts,
}

impl StateSnapshot {
    /// Part of the state that goes to the plain store. Performance memory and workouts are
    /// left empty.
    #[must_use]
    pub fn public_part(&self) -> Self {
        Self {
            exercises: self.exercises.clone(),
            seeded: self.seeded,
            performance_memory: PerformanceMemory::default(),
            workouts: Workouts::default(),
        }
    }

    /// Part of the state that goes to the encrypted store.
    #[must_use]
    pub fn private_part(&self) -> PrivateSnapshot {
        PrivateSnapshot {
            performance_memory: self.performance_memory.clone(),
            workouts: self.workouts.clone(),
        }
    }
}

impl From<&domain::AppState> for StateSnapshot {
    fn from(value: &domain::AppState) -> Self {
        Self {
            exercises: value
                .catalog
                .exercises()
                .map(|e| (e.id.to_string(), Exercise::from(e)))
                .collect(),
            seeded: value.catalog.is_seeded(),
            performance_memory: PerformanceMemory::from(&value.memory),
            workouts: Workouts::from(&value.workouts),
        }
    }
}

impl TryFrom<StateSnapshot> for domain::AppState {
    type Error = SnapshotError;

    fn try_from(value: StateSnapshot) -> Result<Self, Self::Error> {
        let exercises = value
            .exercises
            .into_values()
            .map(domain::Exercise::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_parts(
            domain::ExerciseCatalog::from_parts(exercises, value.seeded),
            domain::PerformanceMemory::try_from(value.performance_memory)?,
            domain::WorkoutStore::try_from(value.workouts)?,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrivateSnapshot {
    pub performance_memory: PerformanceMemory,
    pub workouts: Workouts,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&domain::Exercise> for Exercise {
    fn from(value: &domain::Exercise) -> Self {
        Self {
            id: value.id.to_string(),
            name: value.name.to_string(),
            category: value.category.to_string(),
            muscle_groups: value.muscle_groups.clone(),
            instructions: value.instructions.clone(),
            image_url: value.image_url.as_ref().map(ToString::to_string),
        }
    }
}

impl TryFrom<Exercise> for domain::Exercise {
    type Error = SnapshotError;

    fn try_from(value: Exercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            category: parse_category(&value.category)?,
            muscle_groups: domain::sanitize_muscle_groups(&value.muscle_groups),
            instructions: value
                .instructions
                .as_deref()
                .and_then(domain::sanitize_instructions),
            image_url: value
                .image_url
                .as_deref()
                .map(domain::sanitize_image_url)
                .transpose()?
                .flatten(),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Workouts {
    pub current_session: Option<WorkoutSession>,
    pub session_history: Vec<WorkoutSession>,
    pub templates: BTreeMap<String, WorkoutTemplate>,
}

impl From<&domain::WorkoutStore> for Workouts {
    fn from(value: &domain::WorkoutStore) -> Self {
        Self {
            current_session: value.current_session().map(WorkoutSession::from),
            session_history: value
                .session_history()
                .iter()
                .map(WorkoutSession::from)
                .collect(),
            templates: value
                .templates()
                .map(|t| (t.id.to_string(), WorkoutTemplate::from(t)))
                .collect(),
        }
    }
}

impl TryFrom<Workouts> for domain::WorkoutStore {
    type Error = SnapshotError;

    fn try_from(value: Workouts) -> Result<Self, Self::Error> {
        Ok(Self::from_parts(
            value
                .current_session
                .map(domain::WorkoutSession::try_from)
                .transpose()?,
            value
                .session_history
                .into_iter()
                .map(domain::WorkoutSession::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            value
                .templates
                .into_values()
                .map(domain::WorkoutTemplate::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: Uuid,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub template_id: Option<Uuid>,
}

impl From<&domain::WorkoutSession> for WorkoutSession {
    fn from(value: &domain::WorkoutSession) -> Self {
        Self {
            id: *value.id,
            exercises: value.exercises.iter().map(WorkoutExercise::from).collect(),
            started_at: value.started_at,
            completed_at: value.completed_at,
            template_id: value.template_id.map(|id| *id),
        }
    }
}

impl TryFrom<WorkoutSession> for domain::WorkoutSession {
    type Error = SnapshotError;

    fn try_from(value: WorkoutSession) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::WorkoutExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            started_at: value.started_at,
            completed_at: value.completed_at,
            template_id: value.template_id.map(domain::TemplateID::from),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: Uuid,
    pub exercise_id: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
}

impl From<&domain::WorkoutExercise> for WorkoutExercise {
    fn from(value: &domain::WorkoutExercise) -> Self {
        Self {
            id: *value.id,
            exercise_id: value.exercise_id.to_string(),
            notes: value.notes.clone(),
            sets: value.sets.iter().map(ExerciseSet::from).collect(),
        }
    }
}

impl TryFrom<WorkoutExercise> for domain::WorkoutExercise {
    type Error = SnapshotError;

    fn try_from(value: WorkoutExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            exercise_id: value.exercise_id.into(),
            notes: value.notes,
            sets: value
                .sets
                .into_iter()
                .map(domain::ExerciseSet::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseSet {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: SetData,
    #[serde(default)]
    pub is_done: bool,
}

impl From<&domain::ExerciseSet> for ExerciseSet {
    fn from(value: &domain::ExerciseSet) -> Self {
        Self {
            id: *value.id,
            data: SetData::from(&value.data),
            is_done: value.is_done,
        }
    }
}

impl TryFrom<ExerciseSet> for domain::ExerciseSet {
    type Error = SnapshotError;

    fn try_from(value: ExerciseSet) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            data: domain::SetData::try_from(value.data)?,
            is_done: value.is_done,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SetData {
    pub set_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<f64>,
}

impl From<&domain::SetData> for SetData {
    fn from(value: &domain::SetData) -> Self {
        Self {
            set_type: value.set_type.to_string(),
            weight: value.weight,
            reps: value.reps,
            time: value.time,
            distance: value.distance,
            rest_time: value.rest_time,
        }
    }
}

impl TryFrom<SetData> for domain::SetData {
    type Error = SnapshotError;

    fn try_from(value: SetData) -> Result<Self, Self::Error> {
        Ok(Self {
            set_type: parse_set_type(&value.set_type)?,
            weight: value.weight,
            reps: value.reps,
            time: value.time,
            distance: value.distance,
            rest_time: value.rest_time,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutTemplate {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub exercise_ids: Vec<String>,
    #[serde(default)]
    pub exercises: Vec<TemplateExercise>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

impl From<&domain::WorkoutTemplate> for WorkoutTemplate {
    fn from(value: &domain::WorkoutTemplate) -> Self {
        Self {
            id: *value.id,
            name: value.name.to_string(),
            exercise_ids: value.exercise_ids.iter().map(ToString::to_string).collect(),
            exercises: value.exercises.iter().map(TemplateExercise::from).collect(),
            last_used_at: value.last_used_at,
        }
    }
}

impl TryFrom<WorkoutTemplate> for domain::WorkoutTemplate {
    type Error = SnapshotError;

    fn try_from(value: WorkoutTemplate) -> Result<Self, Self::Error> {
        Ok(Self {
            id: value.id.into(),
            name: domain::Name::new(&value.name)?,
            exercise_ids: value
                .exercise_ids
                .into_iter()
                .map(domain::ExerciseID::from)
                .collect(),
            exercises: value
                .exercises
                .into_iter()
                .map(domain::TemplateExercise::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            last_used_at: value.last_used_at,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateExercise {
    pub exercise_id: String,
    #[serde(default)]
    pub sets: Vec<SetData>,
}

impl From<&domain::TemplateExercise> for TemplateExercise {
    fn from(value: &domain::TemplateExercise) -> Self {
        Self {
            exercise_id: value.exercise_id.to_string(),
            sets: value
                .sets
                .iter()
                .map(|s| SetData {
                    set_type: s.set_type.to_string(),
                    weight: s.weight,
                    reps: s.reps,
                    time: s.time,
                    distance: s.distance,
                    rest_time: s.rest_time,
                })
                .collect(),
        }
    }
}

impl TryFrom<TemplateExercise> for domain::TemplateExercise {
    type Error = SnapshotError;

    fn try_from(value: TemplateExercise) -> Result<Self, Self::Error> {
        Ok(Self {
            exercise_id: value.exercise_id.into(),
            sets: value
                .sets
                .into_iter()
                .map(|s| {
                    domain::SetData::try_from(s).map(|data| domain::TemplateSet::from(&data))
                })
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMemory {
    pub schema_version: u32,
    #[serde(default)]
    pub pattern_memory: BTreeMap<String, PatternMemoryEntry>,
    #[serde(default)]
    pub personal_records: BTreeMap<String, PersonalRecord>,
}

impl Default for PerformanceMemory {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            pattern_memory: BTreeMap::new(),
            personal_records: BTreeMap::new(),
        }
    }
}

impl From<&domain::PerformanceMemory> for PerformanceMemory {
    fn from(value: &domain::PerformanceMemory) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            pattern_memory: value
                .pattern_memory()
                .iter()
                .map(|(key, entry)| (key.to_string(), PatternMemoryEntry::new(key, entry)))
                .collect(),
            personal_records: value
                .personal_records()
                .iter()
                .map(|(id, record)| (id.to_string(), PersonalRecord::from(record)))
                .collect(),
        }
    }
}

impl TryFrom<PerformanceMemory> for domain::PerformanceMemory {
    type Error = SnapshotError;

    fn try_from(value: PerformanceMemory) -> Result<Self, Self::Error> {
        if value.schema_version != SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedSchemaVersion(value.schema_version));
        }
        Ok(Self::from_parts(
            value
                .pattern_memory
                .into_values()
                .map(PatternMemoryEntry::into_domain)
                .collect::<Result<BTreeMap<_, _>, _>>()?,
            value
                .personal_records
                .into_iter()
                .map(|(id, record)| (domain::ExerciseID::from(id), record.into()))
                .collect(),
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatternMemoryEntry {
    pub exercise_id: String,
    pub category: String,
    pub set_type: String,
    pub order: u32,
    pub performed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_time: Option<f64>,
}

impl PatternMemoryEntry {
    fn new(key: &domain::PatternKey, entry: &domain::PatternMemoryEntry) -> Self {
        Self {
            exercise_id: key.exercise_id.to_string(),
            category: key.category.to_string(),
            set_type: key.set_type.to_string(),
            order: key.order,
            performed_at: entry.performed_at,
            weight: entry.weight,
            reps: entry.reps,
            time: entry.time,
            distance: entry.distance,
            rest_time: entry.rest_time,
        }
    }

    /// Key of the entry in the snapshot map.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{}::{}|{}|{}",
            self.exercise_id, self.category, self.set_type, self.order
        )
    }

    fn into_domain(
        self,
    ) -> Result<(domain::PatternKey, domain::PatternMemoryEntry), SnapshotError> {
        if self.order == 0 {
            return Err(SnapshotError::InvalidOrder);
        }
        Ok((
            domain::PatternKey {
                exercise_id: self.exercise_id.into(),
                category: parse_category(&self.category)?,
                set_type: parse_set_type(&self.set_type)?,
                order: self.order,
            },
            domain::PatternMemoryEntry {
                performed_at: self.performed_at,
                weight: self.weight,
                reps: self.reps,
                time: self.time,
                distance: self.distance,
                rest_time: self.rest_time,
            },
        ))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonalRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_reps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_distance: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl From<&domain::PersonalRecord> for PersonalRecord {
    fn from(value: &domain::PersonalRecord) -> Self {
        Self {
            max_weight: value.max_weight,
            max_reps: value.max_reps,
            max_time: value.max_time,
            max_distance: value.max_distance,
            updated_at: value.updated_at,
        }
    }
}

impl From<PersonalRecord> for domain::PersonalRecord {
    fn from(value: PersonalRecord) -> Self {
        Self {
            max_weight: value.max_weight,
            max_reps: value.max_reps,
            max_time: value.max_time,
            max_distance: value.max_distance,
            updated_at: value.updated_at,
        }
    }
}

pub fn parse_category(value: &str) -> Result<domain::Category, SnapshotError> {
    domain::Category::from_str(value).map_err(|_| SnapshotError::InvalidCategory(value.to_string()))
}

pub fn parse_set_type(value: &str) -> Result<domain::SetType, SnapshotError> {
    domain::SetType::parse(value).map_err(|_| SnapshotError::InvalidSetType(value.to_string()))
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    #[error(transparent)]
    InvalidName(#[from] domain::NameError),
    #[error(transparent)]
    InvalidExercise(#[from] domain::ExerciseError),
    #[error("invalid category: {0}")]
    InvalidCategory(String),
    #[error("invalid set type: {0}")]
    InvalidSetType(String),
    #[error("invalid pattern memory order")]
    InvalidOrder,
    #[error("unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u32),
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn state() -> domain::AppState {
        let mut state = domain::AppState::new();
        let mut input = domain::ExerciseInput::new("Farmer's Walk", domain::Category::Timed);
        input.muscle_groups = vec!["Grip".to_string()];
        input.image_url = Some("https://example.com/walk.png".to_string());
        state.catalog.add_exercise(input).unwrap();
        assert!(state.workouts.start_new_session());
        let id = state.add_exercise_to_session(&"squat".into()).unwrap();
        let set_id = state.workouts.current_session().unwrap().exercises[0].sets[0].id;
        assert!(state.update_set_in_workout_exercise(
            id,
            set_id,
            &domain::SetPatch {
                weight: Some(100.0),
                reps: Some(5.0),
                is_done: Some(true),
                ..domain::SetPatch::default()
            }
        ));
        assert!(state.workouts.update_workout_exercise_notes(id, "Deep"));
        let template_id = state.create_template_from_session("Legs").unwrap();
        assert!(state.complete_session(false));
        assert!(state.start_session_from_template(template_id));
        state.select_exercise("plank".into());
        state.auth_token = Some("secret".to_string());
        state
    }

    #[test]
    fn test_state_snapshot() {
        let state = state();
        let snapshot = StateSnapshot::from(&state);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains(KEY_PENDING_EXERCISE_SELECTION));

        let restored =
            domain::AppState::try_from(serde_json::from_str::<StateSnapshot>(&json).unwrap())
                .unwrap();
        assert_eq!(restored.catalog, state.catalog);
        assert_eq!(restored.memory, state.memory);
        assert_eq!(
            restored.workouts.current_session(),
            state.workouts.current_session()
        );
        assert_eq!(
            restored.workouts.session_history(),
            state.workouts.session_history()
        );
        assert_eq!(
            restored.workouts.templates().collect::<Vec<_>>(),
            state.workouts.templates().collect::<Vec<_>>()
        );
        assert_eq!(restored.pending_exercise_selection, None);
        assert_eq!(restored.auth_token, None);
    }

    #[test]
    fn test_state_snapshot_split() {
        let snapshot = StateSnapshot::from(&state());
        let public = snapshot.public_part();
        assert_eq!(public.exercises, snapshot.exercises);
        assert_eq!(public.performance_memory, PerformanceMemory::default());
        assert_eq!(public.workouts, Workouts::default());

        let private = snapshot.private_part();
        assert_eq!(private.performance_memory, snapshot.performance_memory);
        assert_eq!(private.workouts, snapshot.workouts);
        assert!(!private.performance_memory.pattern_memory.is_empty());
    }

    #[test]
    fn test_performance_memory_schema() {
        let performed_at = Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0).unwrap();
        let mut memory = domain::PerformanceMemory::default();
        memory.record_completed_workout(&domain::CompletedWorkout {
            completed_at: performed_at,
            exercises: vec![domain::CompletedExercise {
                exercise_id: "plank".into(),
                category: domain::Category::Timed,
                sets: vec![
                    domain::SetData::new(domain::SetType::Warmup).with(domain::SetField::Time, 45.0),
                ],
            }],
        });

        assert_eq!(
            serde_json::to_value(PerformanceMemory::from(&memory)).unwrap(),
            serde_json::json!({
                "schemaVersion": 2,
                "patternMemory": {
                    "plank::TIMED|warmup|1": {
                        "exerciseId": "plank",
                        "category": "TIMED",
                        "setType": "warmup",
                        "order": 1,
                        "performedAt": "2024-03-01T18:00:00Z",
                        "time": 45.0
                    }
                },
                "personalRecords": {
                    "plank": {
                        "maxTime": 45.0,
                        "updatedAt": "2024-03-01T18:00:00Z"
                    }
                }
            })
        );
    }

    #[rstest]
    #[case::invalid_set_type(
        SetData { set_type: "superset".to_string(), weight: None, reps: None, time: None, distance: None, rest_time: None },
        SnapshotError::InvalidSetType("superset".to_string())
    )]
    fn test_set_data_invalid(#[case] set_data: SetData, #[case] error: SnapshotError) {
        assert_eq!(domain::SetData::try_from(set_data), Err(error));
    }

    #[rstest]
    #[case::invalid_name(
        Exercise { id: "x".to_string(), name: " ".to_string(), category: "STRENGTH".to_string(), muscle_groups: vec![], instructions: None, image_url: None },
        SnapshotError::InvalidName(domain::NameError::Empty)
    )]
    #[case::invalid_category(
        Exercise { id: "x".to_string(), name: "X".to_string(), category: "strength".to_string(), muscle_groups: vec![], instructions: None, image_url: None },
        SnapshotError::InvalidCategory("strength".to_string())
    )]
    #[case::invalid_image_url(
        Exercise { id: "x".to_string(), name: "X".to_string(), category: "CARDIO".to_string(), muscle_groups: vec![], instructions: None, image_url: Some("ftp://x".to_string()) },
        SnapshotError::InvalidExercise(domain::ExerciseError::InvalidImageUrl)
    )]
    fn test_exercise_invalid(#[case] exercise: Exercise, #[case] error: SnapshotError) {
        assert_eq!(domain::Exercise::try_from(exercise), Err(error));
    }

    #[test]
    fn test_performance_memory_unsupported_schema_version() {
        assert_eq!(
            domain::PerformanceMemory::try_from(PerformanceMemory {
                schema_version: 1,
                ..PerformanceMemory::default()
            }),
            Err(SnapshotError::UnsupportedSchemaVersion(1))
        );
    }
}
