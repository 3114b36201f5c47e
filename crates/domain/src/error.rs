use crate::{ExerciseID, NameError, SetValidationError};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WorkoutError {
    #[error("No active session")]
    NoActiveSession,
    #[error("Session already active")]
    SessionAlreadyActive,
    #[error("Exercise not found: {0}")]
    UnknownExercise(ExerciseID),
    #[error("Template not found")]
    UnknownTemplate,
    #[error("Workout exercise not found")]
    UnknownWorkoutExercise,
    #[error("Set not found")]
    SetNotFound,
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error(transparent)]
    InvalidSet(#[from] SetValidationError),
}
