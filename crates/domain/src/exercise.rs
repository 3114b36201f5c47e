use derive_more::{AsRef, Deref, Display};
use uuid::Uuid;

use crate::{Name, NameError, SetData, SetField, SetType, collapse_whitespace};

pub const MAX_INSTRUCTIONS_LENGTH: usize = 2000;
pub const MAX_IMAGE_URL_LENGTH: usize = 2048;

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub category: Category,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub image_url: Option<ImageUrl>,
}

impl Exercise {
    #[must_use]
    pub fn required_fields(&self) -> &'static [SetField] {
        self.category.required_fields()
    }

    fn matches(&self, query: &str) -> bool {
        self.name.as_ref().to_lowercase().contains(query)
            || self.category.to_string().to_lowercase().contains(query)
            || self
                .muscle_groups
                .iter()
                .any(|m| m.to_lowercase().contains(query))
    }

    pub(crate) fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty() || self.matches(&query)
    }
}

/// Identifier of an exercise.
///
/// Other entities hold exercise IDs as plain references. Removing an exercise from the catalog
/// leaves those references dangling, so every consumer has to resolve them against the catalog.
#[derive(AsRef, Deref, Display, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[as_ref(str)]
pub struct ExerciseID(String);

impl ExerciseID {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl From<&str> for ExerciseID {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ExerciseID {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[derive(
    Debug,
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
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Strength,
    Bodyweight,
    Timed,
    Cardio,
}

impl Category {
    #[must_use]
    pub fn required_fields(self) -> &'static [SetField] {
        match self {
            Category::Strength => &[SetField::Weight, SetField::Reps],
            Category::Bodyweight => &[SetField::Reps],
            Category::Timed | Category::Cardio => &[SetField::Time],
        }
    }

    #[must_use]
    pub fn optional_fields(self) -> &'static [SetField] {
        match self {
            Category::Strength | Category::Bodyweight | Category::Timed => &[SetField::RestTime],
            Category::Cardio => &[SetField::Distance],
        }
    }

    #[must_use]
    pub fn is_required(self, field: SetField) -> bool {
        self.required_fields().contains(&field)
    }

    /// Set data with every required field of the category set to zero.
    #[must_use]
    pub fn default_set_data(self, set_type: SetType) -> SetData {
        self.required_fields()
            .iter()
            .fold(SetData::new(set_type), |data, field| data.with(*field, 0.0))
    }
}

#[derive(AsRef, Deref, Display, Debug, Clone, PartialEq, Eq)]
#[as_ref(str)]
pub struct ImageUrl(String);

impl ImageUrl {
    pub fn new(url: &str) -> Result<Self, ExerciseError> {
        let url = url.trim();

        if url.chars().count() > MAX_IMAGE_URL_LENGTH
            || !(url.starts_with("http://") || url.starts_with("https://"))
            || url.chars().any(char::is_whitespace)
        {
            return Err(ExerciseError::InvalidImageUrl);
        }

        Ok(Self(url.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseInput {
    pub id: Option<String>,
    pub name: String,
    pub category: Category,
    pub muscle_groups: Vec<String>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
}

impl ExerciseInput {
    #[must_use]
    pub fn new(name: &str, category: Category) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            category,
            muscle_groups: vec![],
            instructions: None,
            image_url: None,
        }
    }
}

/// Partial update of an exercise. Fields left as `None` are not touched. An empty
/// `instructions` or `image_url` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub category: Option<Category>,
    pub muscle_groups: Option<Vec<String>>,
    pub instructions: Option<String>,
    pub image_url: Option<String>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ExerciseError {
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("Invalid image URL")]
    InvalidImageUrl,
}

#[must_use]
pub fn sanitize_muscle_groups(muscle_groups: &[String]) -> Vec<String> {
    muscle_groups
        .iter()
        .map(|m| collapse_whitespace(m))
        .filter(|m| !m.is_empty())
        .collect()
}

#[must_use]
pub fn sanitize_instructions(instructions: &str) -> Option<String> {
    let trimmed = instructions.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_INSTRUCTIONS_LENGTH).collect())
}

pub fn sanitize_image_url(image_url: &str) -> Result<Option<ImageUrl>, ExerciseError> {
    if image_url.trim().is_empty() {
        return Ok(None);
    }
    ImageUrl::new(image_url).map(Some)
}
