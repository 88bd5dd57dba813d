//! Question and answer body text

use kernel::error::app_error::{AppError, AppResult};
use serde::Serialize;

/// Upper bound on question/answer text, in characters
pub const POST_TEXT_MAX_LENGTH: usize = 500;

/// Non-blank text of at most [`POST_TEXT_MAX_LENGTH`] characters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostText(String);

impl PostText {
    /// `field` names the parameter in error messages.
    pub fn new(field: &str, text: impl Into<String>) -> AppResult<Self> {
        let text = text.into();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            return Err(AppError::bad_request(format!("'{field}' is required.")));
        }

        if trimmed.chars().count() > POST_TEXT_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "'{field}' must be at most {POST_TEXT_MAX_LENGTH} characters."
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn from_db(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PostText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
