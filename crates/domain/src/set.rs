use derive_more::Deref;
use uuid::Uuid;

use crate::{Category, ExerciseCatalog, ExerciseID};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum SetType {
    Warmup,
    #[default]
    Working,
    Dropset,
    Failure,
}

impl SetType {
    pub fn parse(value: &str) -> Result<Self, SetValidationError> {
        value
            .parse::<SetType>()
            .map_err(|_| SetValidationError::InvalidSetType)
    }
}

/// Numeric fields tracked per set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "camelCase")]
pub enum SetField {
    Weight,
    Reps,
    Time,
    Distance,
    RestTime,
}

impl SetField {
    pub const ALL: [SetField; 5] = [
        SetField::Weight,
        SetField::Reps,
        SetField::Time,
        SetField::Distance,
        SetField::RestTime,
    ];

    /// Inclusive range of allowed values.
    #[must_use]
    pub fn range(self) -> (f64, f64) {
        match self {
            SetField::Weight => (0.0, 500.0),
            SetField::Reps => (0.0, 100.0),
            SetField::Time => (0.0, 86_400.0),
            SetField::Distance => (0.0, 100_000.0),
            SetField::RestTime => (0.0, 3600.0),
        }
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        let (min, max) = self.range();
        (min..=max).contains(&value)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetData {
    pub set_type: SetType,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub time: Option<f64>,
    pub distance: Option<f64>,
    pub rest_time: Option<f64>,
}

impl SetData {
    #[must_use]
    pub fn new(set_type: SetType) -> Self {
        Self {
            set_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with(mut self, field: SetField, value: f64) -> Self {
        *self.field_mut(field) = Some(value);
        self
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

    fn field_mut(&mut self, field: SetField) -> &mut Option<f64> {
        match field {
            SetField::Weight => &mut self.weight,
            SetField::Reps => &mut self.reps,
            SetField::Time => &mut self.time,
            SetField::Distance => &mut self.distance,
            SetField::RestTime => &mut self.rest_time,
        }
    }

    /// Weight times reps, counting absent values as zero.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.weight.unwrap_or_default() * self.reps.unwrap_or_default()
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetID(Uuid);

impl SetID {
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

impl From<Uuid> for SetID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseSet {
    pub id: SetID,
    pub data: SetData,
    pub is_done: bool,
}

impl ExerciseSet {
    #[must_use]
    pub fn new(data: SetData) -> Self {
        Self {
            id: SetID::random(),
            data,
            is_done: false,
        }
    }
}

/// Field-level update of a set. Only fields given as `Some` replace the stored values.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SetPatch {
    pub set_type: Option<SetType>,
    pub weight: Option<f64>,
    pub reps: Option<f64>,
    pub time: Option<f64>,
    pub distance: Option<f64>,
    pub rest_time: Option<f64>,
    pub is_done: Option<bool>,
}

impl SetPatch {
    #[must_use]
    pub fn done() -> Self {
        Self {
            is_done: Some(true),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn apply(&self, set: &ExerciseSet) -> ExerciseSet {
        ExerciseSet {
            id: set.id,
            data: SetData {
                set_type: self.set_type.unwrap_or(set.data.set_type),
                weight: self.weight.or(set.data.weight),
                reps: self.reps.or(set.data.reps),
                time: self.time.or(set.data.time),
                distance: self.distance.or(set.data.distance),
                rest_time: self.rest_time.or(set.data.rest_time),
            },
            is_done: self.is_done.unwrap_or(set.is_done),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SetValidationError {
    #[error("Set data is required")]
    Missing,
    #[error("Invalid setType")]
    InvalidSetType,
    #[error("Invalid exerciseId")]
    UnknownExercise,
    #[error("{0} is required")]
    Required(SetField),
    #[error("{0} must be a number")]
    NotANumber(SetField),
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: SetField, min: f64, max: f64 },
}

/// Checks a set payload against the field requirements of the exercise's category.
///
/// The exercise is resolved through the catalog, so a reference to a removed exercise is
/// rejected. Every tracked field is checked in a fixed order and the first violation is
/// returned.
pub fn validate_set_data(
    catalog: &ExerciseCatalog,
    exercise_id: &ExerciseID,
    set_data: Option<&SetData>,
) -> Result<(), SetValidationError> {
    let Some(set_data) = set_data else {
        return Err(SetValidationError::Missing);
    };

    let Some(exercise) = catalog.get_exercise(exercise_id) else {
        return Err(SetValidationError::UnknownExercise);
    };

    validate_fields(exercise.category, set_data)
}

fn validate_fields(category: Category, set_data: &SetData) -> Result<(), SetValidationError> {
    for field in SetField::ALL {
        let required = category.is_required(field);
        match set_data.get(field) {
            None if required => return Err(SetValidationError::Required(field)),
            None => {}
            Some(value) if !value.is_finite() => {
                return Err(if required {
                    SetValidationError::Required(field)
                } else {
                    SetValidationError::NotANumber(field)
                });
            }
            Some(value) if !field.contains(value) => {
                let (min, max) = field.range();
                return Err(SetValidationError::OutOfRange { field, min, max });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use crate::ExerciseInput;

    use super::*;

    fn catalog() -> ExerciseCatalog {
        let mut catalog = ExerciseCatalog::default();
        for (id, category) in [
            ("bench-press", Category::Strength),
            ("pull-up", Category::Bodyweight),
            ("plank", Category::Timed),
            ("running", Category::Cardio),
        ] {
            catalog
                .add_exercise(ExerciseInput {
                    id: Some(id.to_string()),
                    ..ExerciseInput::new(id, category)
                })
                .unwrap();
        }
        catalog
    }

    fn data(set_type: SetType, fields: &[(SetField, f64)]) -> SetData {
        fields
            .iter()
            .fold(SetData::new(set_type), |d, (f, v)| d.with(*f, *v))
    }

    #[rstest]
    #[case("warmup", Ok(SetType::Warmup))]
    #[case("working", Ok(SetType::Working))]
    #[case("dropset", Ok(SetType::Dropset))]
    #[case("failure", Ok(SetType::Failure))]
    #[case("Working", Err(SetValidationError::InvalidSetType))]
    #[case("amrap", Err(SetValidationError::InvalidSetType))]
    fn test_set_type_parse(
        #[case] value: &str,
        #[case] expected: Result<SetType, SetValidationError>,
    ) {
        assert_eq!(SetType::parse(value), expected);
    }

    #[test]
    fn test_set_field_names() {
        assert_eq!(
            SetField::iter().map(|f| f.to_string()).collect::<Vec<_>>(),
            vec!["weight", "reps", "time", "distance", "restTime"]
        );
        assert_eq!(SetField::iter().collect::<Vec<_>>(), SetField::ALL.to_vec());
    }

    #[rstest]
    #[case(SetField::Weight, 0.0, true)]
    #[case(SetField::Weight, 500.0, true)]
    #[case(SetField::Weight, 500.5, false)]
    #[case(SetField::Weight, -0.5, false)]
    #[case(SetField::Reps, 100.0, true)]
    #[case(SetField::Reps, 101.0, false)]
    #[case(SetField::Time, 86_400.0, true)]
    #[case(SetField::Time, 86_401.0, false)]
    #[case(SetField::Distance, 100_000.0, true)]
    #[case(SetField::Distance, 100_001.0, false)]
    #[case(SetField::RestTime, 3600.0, true)]
    #[case(SetField::RestTime, 3601.0, false)]
    fn test_set_field_contains(
        #[case] field: SetField,
        #[case] value: f64,
        #[case] expected: bool,
    ) {
        assert_eq!(field.contains(value), expected);
    }

    #[test]
    fn test_set_data_volume() {
        assert_eq!(
            data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0)]).volume(),
            500.0
        );
        assert_eq!(data(SetType::Working, &[(SetField::Reps, 5.0)]).volume(), 0.0);
    }

    #[test]
    fn test_set_patch_apply() {
        let set = ExerciseSet::new(data(
            SetType::Working,
            &[(SetField::Weight, 100.0), (SetField::Reps, 5.0)],
        ));
        let patched = SetPatch {
            reps: Some(8.0),
            is_done: Some(true),
            ..SetPatch::default()
        }
        .apply(&set);
        assert_eq!(patched.id, set.id);
        assert_eq!(
            patched.data,
            data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 8.0)])
        );
        assert!(patched.is_done);
    }

    #[rstest]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0)]), Ok(()))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 501.0), (SetField::Reps, 5.0)]), Err(SetValidationError::OutOfRange { field: SetField::Weight, min: 0.0, max: 500.0 }))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Reps, 5.0)]), Err(SetValidationError::Required(SetField::Weight)))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0)]), Err(SetValidationError::Required(SetField::Reps)))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0), (SetField::RestTime, 90.0)]), Ok(()))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0), (SetField::RestTime, 4000.0)]), Err(SetValidationError::OutOfRange { field: SetField::RestTime, min: 0.0, max: 3600.0 }))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0), (SetField::Distance, 200_000.0)]), Err(SetValidationError::OutOfRange { field: SetField::Distance, min: 0.0, max: 100_000.0 }))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, f64::NAN), (SetField::Reps, 5.0)]), Err(SetValidationError::Required(SetField::Weight)))]
    #[case("bench-press", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0), (SetField::RestTime, f64::INFINITY)]), Err(SetValidationError::NotANumber(SetField::RestTime)))]
    #[case("pull-up", data(SetType::Warmup, &[(SetField::Reps, 12.0)]), Ok(()))]
    #[case("pull-up", data(SetType::Warmup, &[(SetField::Reps, 120.0)]), Err(SetValidationError::OutOfRange { field: SetField::Reps, min: 0.0, max: 100.0 }))]
    #[case("plank", data(SetType::Working, &[(SetField::Time, 60.0)]), Ok(()))]
    #[case("plank", data(SetType::Working, &[]), Err(SetValidationError::Required(SetField::Time)))]
    #[case("running", data(SetType::Working, &[(SetField::Time, 1800.0), (SetField::Distance, 5000.0)]), Ok(()))]
    #[case("running", data(SetType::Dropset, &[(SetField::Time, 1800.0)]), Ok(()))]
    #[case("deadlift", data(SetType::Working, &[(SetField::Weight, 100.0), (SetField::Reps, 5.0)]), Err(SetValidationError::UnknownExercise))]
    fn test_validate_set_data(
        #[case] exercise_id: &str,
        #[case] set_data: SetData,
        #[case] expected: Result<(), SetValidationError>,
    ) {
        assert_eq!(
            validate_set_data(&catalog(), &exercise_id.into(), Some(&set_data)),
            expected
        );
    }

    #[test]
    fn test_validate_set_data_missing() {
        assert_eq!(
            validate_set_data(&catalog(), &"bench-press".into(), None),
            Err(SetValidationError::Missing)
        );
    }

    // Failure sets are accepted like every other set type, although the set type list of the
    // validator once excluded them.
    #[test]
    fn test_validate_set_data_accepts_failure_sets() {
        assert_eq!(
            validate_set_data(
                &catalog(),
                &"bench-press".into(),
                Some(&data(
                    SetType::Failure,
                    &[(SetField::Weight, 80.0), (SetField::Reps, 12.0)]
                ))
            ),
            Ok(())
        );
    }

    #[test]
    fn test_validate_set_data_rejects_removed_exercise() {
        let mut catalog = catalog();
        catalog.remove_exercise(&"plank".into());
        assert_eq!(
            validate_set_data(
                &catalog,
                &"plank".into(),
                Some(&data(SetType::Working, &[(SetField::Time, 60.0)]))
            ),
            Err(SetValidationError::UnknownExercise)
        );
    }

    #[rstest]
    #[case(SetValidationError::Missing, "Set data is required")]
    #[case(SetValidationError::InvalidSetType, "Invalid setType")]
    #[case(SetValidationError::UnknownExercise, "Invalid exerciseId")]
    #[case(SetValidationError::Required(SetField::RestTime), "restTime is required")]
    #[case(SetValidationError::NotANumber(SetField::Distance), "distance must be a number")]
    #[case(
        SetValidationError::OutOfRange { field: SetField::Weight, min: 0.0, max: 500.0 },
        "weight must be between 0 and 500"
    )]
    fn test_set_validation_error_display(#[case] error: SetValidationError, #[case] message: &str) {
        assert_eq!(error.to_string(), message);
    }
}
