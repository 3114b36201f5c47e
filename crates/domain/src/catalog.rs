use std::collections::BTreeMap;

use log::{debug, error};

use crate::{
    Category, Exercise, ExerciseError, ExerciseID, ExerciseInput, ExercisePatch, Name, NameError,
    SetField, sanitize_image_url, sanitize_instructions, sanitize_muscle_groups,
};

struct BuiltinExercise {
    id: &'static str,
    name: &'static str,
    category: Category,
    muscle_groups: &'static [&'static str],
    instructions: &'static str,
}

impl TryFrom<&BuiltinExercise> for Exercise {
    type Error = NameError;

    fn try_from(value: &BuiltinExercise) -> Result<Self, Self::Error> {
        Ok(Exercise {
            id: value.id.into(),
            name: Name::new(value.name)?,
            category: value.category,
            muscle_groups: value
                .muscle_groups
                .iter()
                .map(ToString::to_string)
                .collect(),
            instructions: Some(value.instructions.to_string()),
            image_url: None,
        })
    }
}

const BUILTIN_EXERCISES: [BuiltinExercise; 7] = [
    BuiltinExercise {
        id: "bench-press",
        name: "Bench Press",
        category: Category::Strength,
        muscle_groups: &["Chest", "Triceps", "Shoulders"],
        instructions: "Lower the bar to the mid chest and press it back up until the arms are locked out.",
    },
    BuiltinExercise {
        id: "squat",
        name: "Squat",
        category: Category::Strength,
        muscle_groups: &["Quads", "Glutes", "Hamstrings"],
        instructions: "Sit down between the heels until the hips are below the knees, then stand back up.",
    },
    BuiltinExercise {
        id: "deadlift",
        name: "Deadlift",
        category: Category::Strength,
        muscle_groups: &["Back", "Glutes", "Hamstrings"],
        instructions: "Lift the bar from the floor with a neutral spine until hips and knees are extended.",
    },
    BuiltinExercise {
        id: "pull-up",
        name: "Pull-up",
        category: Category::Bodyweight,
        muscle_groups: &["Back", "Biceps"],
        instructions: "Hang from the bar and pull until the chin is above it.",
    },
    BuiltinExercise {
        id: "push-up",
        name: "Push-up",
        category: Category::Bodyweight,
        muscle_groups: &["Chest", "Triceps", "Shoulders"],
        instructions: "Lower the chest to the floor with a rigid torso and push back up.",
    },
    BuiltinExercise {
        id: "plank",
        name: "Plank",
        category: Category::Timed,
        muscle_groups: &["Core"],
        instructions: "Hold a straight line from head to heels on forearms and toes.",
    },
    BuiltinExercise {
        id: "running",
        name: "Running",
        category: Category::Cardio,
        muscle_groups: &["Legs", "Cardio"],
        instructions: "Run at a steady pace.",
    },
];

/// Exercise definitions keyed by ID.
///
/// The built-in exercises are added at most once per catalog. The `seeded` flag is part of the
/// persisted state, so exercises removed by the user are not restored on the next start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExerciseCatalog {
    exercises: BTreeMap<ExerciseID, Exercise>,
    seeded: bool,
}

impl ExerciseCatalog {
    /// Creates a catalog containing the built-in exercises.
    #[must_use]
    pub fn new() -> Self {
        let mut catalog = Self::default();
        catalog.seed_builtin_exercises();
        catalog
    }

    #[must_use]
    pub fn from_parts(exercises: impl IntoIterator<Item = Exercise>, seeded: bool) -> Self {
        Self {
            exercises: exercises.into_iter().map(|e| (e.id.clone(), e)).collect(),
            seeded,
        }
    }

    /// Adds the built-in exercises unless that already happened. Existing exercises with the
    /// same ID are kept. Returns the number of added exercises.
    pub fn seed_builtin_exercises(&mut self) -> usize {
        if self.seeded {
            return 0;
        }
        let mut added = 0;
        for builtin in &BUILTIN_EXERCISES {
            let id = ExerciseID::from(builtin.id);
            if self.exercises.contains_key(&id) {
                continue;
            }
            match Exercise::try_from(builtin) {
                Ok(exercise) => {
                    self.exercises.insert(id, exercise);
                    added += 1;
                }
                Err(err) => error!("failed to seed exercise {id}: {err}"),
            }
        }
        self.seeded = true;
        debug!("seeded {added} built-in exercises");
        added
    }

    #[must_use]
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    #[must_use]
    pub fn has_exercise(&self, id: &ExerciseID) -> bool {
        self.exercises.contains_key(id)
    }

    #[must_use]
    pub fn get_exercise(&self, id: &ExerciseID) -> Option<&Exercise> {
        self.exercises.get(id)
    }

    pub fn exercises(&self) -> impl Iterator<Item = &Exercise> {
        self.exercises.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    pub fn add_exercise(&mut self, input: ExerciseInput) -> Result<ExerciseID, ExerciseError> {
        let name = Name::new(&input.name)?;
        let image_url = match input.image_url {
            Some(ref url) => sanitize_image_url(url)?,
            None => None,
        };

        let id = match input.id.as_deref().map(str::trim) {
            Some(requested) if !requested.is_empty() => self.unique_id(requested),
            _ => self.random_id(),
        };

        self.exercises.insert(
            id.clone(),
            Exercise {
                id: id.clone(),
                name,
                category: input.category,
                muscle_groups: sanitize_muscle_groups(&input.muscle_groups),
                instructions: input.instructions.as_deref().and_then(sanitize_instructions),
                image_url,
            },
        );
        debug!("added exercise {id}");

        Ok(id)
    }

    /// Applies a partial update. Returns `Ok(false)` if the exercise does not exist. Nothing is
    /// changed if any field is invalid.
    pub fn update_exercise(
        &mut self,
        id: &ExerciseID,
        patch: ExercisePatch,
    ) -> Result<bool, ExerciseError> {
        let Some(exercise) = self.exercises.get_mut(id) else {
            return Ok(false);
        };

        let name = patch.name.as_deref().map(Name::new).transpose()?;
        let image_url = patch.image_url.as_deref().map(sanitize_image_url).transpose()?;

        if let Some(name) = name {
            exercise.name = name;
        }
        if let Some(category) = patch.category {
            exercise.category = category;
        }
        if let Some(muscle_groups) = patch.muscle_groups {
            exercise.muscle_groups = sanitize_muscle_groups(&muscle_groups);
        }
        if let Some(instructions) = patch.instructions {
            exercise.instructions = sanitize_instructions(&instructions);
        }
        if let Some(image_url) = image_url {
            exercise.image_url = image_url;
        }

        Ok(true)
    }

    /// Removes the exercise without touching sessions or templates referencing it.
    pub fn remove_exercise(&mut self, id: &ExerciseID) -> bool {
        self.exercises.remove(id).is_some()
    }

    #[must_use]
    pub fn search_exercises(&self, query: &str) -> Vec<&Exercise> {
        self.exercises
            .values()
            .filter(|e| e.matches_query(query))
            .collect()
    }

    #[must_use]
    pub fn get_exercises_by_category(&self, category: Category) -> Vec<&Exercise> {
        self.exercises
            .values()
            .filter(|e| e.category == category)
            .collect()
    }

    #[must_use]
    pub fn get_required_fields_for_exercise(&self, id: &ExerciseID) -> &'static [SetField] {
        self.exercises
            .get(id)
            .map(Exercise::required_fields)
            .unwrap_or_default()
    }

    fn unique_id(&self, requested: &str) -> ExerciseID {
        let mut id = ExerciseID::from(requested);
        let mut suffix = 1;
        while self.exercises.contains_key(&id) {
            id = ExerciseID::from(format!("{requested}-{suffix}"));
            suffix += 1;
        }
        id
    }

    fn random_id(&self) -> ExerciseID {
        loop {
            let id = ExerciseID::random();
            if !self.exercises.contains_key(&id) {
                return id;
            }
        }
    }
}
