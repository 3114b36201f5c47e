use derive_more::{AsRef, Display};

pub const MAX_NAME_LENGTH: usize = 80;

#[derive(AsRef, Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    /// Collapses runs of whitespace into single spaces and truncates the result to
    /// [`MAX_NAME_LENGTH`] characters.
    pub fn new(name: &str) -> Result<Self, NameError> {
        let collapsed = collapse_whitespace(name);

        if collapsed.is_empty() {
            return Err(NameError::Empty);
        }

        let truncated = collapsed.chars().take(MAX_NAME_LENGTH).collect::<String>();

        Ok(Name(truncated.trim_end().to_string()))
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NameError {
    #[error("Name must not be empty")]
    Empty,
}

#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
