//! Validated text scalars for names, titles and comment bodies.

use super::TrackerDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trims `raw` and checks it is non-empty and within `max` characters.
fn validated(
    field: &'static str,
    raw: String,
    max: Option<usize>,
) -> Result<String, TrackerDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackerDomainError::BlankField { field });
    }
    let actual = trimmed.chars().count();
    if let Some(limit) = max.filter(|limit| actual > *limit) {
        return Err(TrackerDomainError::FieldTooLong {
            field,
            max: limit,
            actual,
        });
    }
    Ok(trimmed.to_owned())
}

/// Project name, unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
    /// Longest accepted project name, in characters.
    pub const MAX_CHARS: usize = 200;

    /// Creates a validated project name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::BlankField`] for blank input or
    /// [`TrackerDomainError::FieldTooLong`] beyond [`Self::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        validated("project name", value.into(), Some(Self::MAX_CHARS)).map(Self)
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Label name, unique per owner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelName(String);

impl LabelName {
    /// Longest accepted label name, in characters.
    pub const MAX_CHARS: usize = 50;

    /// Creates a validated label name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::BlankField`] for blank input or
    /// [`TrackerDomainError::FieldTooLong`] beyond [`Self::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        validated("label name", value.into(), Some(Self::MAX_CHARS)).map(Self)
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Longest accepted task title, in characters.
    pub const MAX_CHARS: usize = 200;

    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::BlankField`] for blank input or
    /// [`TrackerDomainError::FieldTooLong`] beyond [`Self::MAX_CHARS`].
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        validated("task title", value.into(), Some(Self::MAX_CHARS)).map(Self)
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentContent(String);

impl CommentContent {
    /// Creates validated comment content.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerDomainError::BlankField`] for blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, TrackerDomainError> {
        validated("comment content", value.into(), None).map(Self)
    }

    /// Returns the content as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! text_display {
    ($($name:ident),+) => {
        $(
            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str {
                    self.as_str()
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(&self.0)
                }
            }
        )+
    };
}

text_display!(ProjectName, LabelName, TaskTitle, CommentContent);
