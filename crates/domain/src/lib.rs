#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod catalog;
mod error;
mod exercise;
mod memory;
mod name;
mod set;
mod state;
mod store;
mod template;
mod workout;

pub use catalog::ExerciseCatalog;
pub use error::WorkoutError;
pub use exercise::{
    Category, Exercise, ExerciseError, ExerciseID, ExerciseInput, ExercisePatch, ImageUrl,
    MAX_IMAGE_URL_LENGTH, MAX_INSTRUCTIONS_LENGTH, sanitize_image_url, sanitize_instructions,
    sanitize_muscle_groups,
};
pub use memory::{
    CompletedExercise, CompletedWorkout, EMPTY_PLACEHOLDER, PatternKey, PatternMemoryEntry,
    PerformanceMemory, PersonalRecord, PlaceholderQuery, PreviousSetData, SetPlaceholders,
};
pub use name::{MAX_NAME_LENGTH, Name, NameError, collapse_whitespace};
pub use set::{
    ExerciseSet, SetData, SetField, SetID, SetPatch, SetType, SetValidationError,
    validate_set_data,
};
pub use state::AppState;
pub use store::WorkoutStore;
pub use template::{
    TemplateExercise, TemplateID, TemplateSet, TemplateUpdateSummary, WorkoutTemplate,
};
pub use workout::{SessionID, WorkoutExercise, WorkoutExerciseID, WorkoutSession};
