use regex::Regex;
use serde::{Deserialize, Serialize};

use std::{fmt, sync::LazyLock};

/// Shortest message the form accepts, counted in Unicode scalar values. A
/// browser's `String.length` counts UTF-16 units instead, so a message of five
/// emoji is 10 long there and 5 long here.
pub const MIN_MESSAGE_LEN: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern must compile"));

/// A field of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Message,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Name, Self::Email, Self::Message];
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        })
    }
}

/// Category of a validation failure, independent of the field it occurred on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorKind {
    Required,
    Format,
    TooShort,
}

/// A field-level validation failure. The `Display` text is what the form
/// shows next to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Email is required")]
    EmailRequired,

    #[error("Please enter a valid email")]
    EmailFormat,

    #[error("Message is required")]
    MessageRequired,

    #[error("Message must be at least 10 characters")]
    MessageTooShort,
}

impl ValidationError {
    pub const fn field(self) -> Field {
        match self {
            Self::EmailRequired | Self::EmailFormat => Field::Email,
            Self::MessageRequired | Self::MessageTooShort => Field::Message,
        }
    }

    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::EmailRequired | Self::MessageRequired => ErrorKind::Required,
            Self::EmailFormat => ErrorKind::Format,
            Self::MessageTooShort => ErrorKind::TooShort,
        }
    }
}

/// Checks a single field value. Called when a field loses focus and again for
/// every field right before a submission is sent.
pub fn validate(field: Field, value: &str) -> Option<ValidationError> {
    match field {
        Field::Name => None,
        Field::Email => {
            if value.is_empty() {
                Some(ValidationError::EmailRequired)
            } else if !EMAIL_PATTERN.is_match(value) {
                Some(ValidationError::EmailFormat)
            } else {
                None
            }
        }
        Field::Message => {
            if value.is_empty() {
                Some(ValidationError::MessageRequired)
            } else if value.chars().count() < MIN_MESSAGE_LEN {
                Some(ValidationError::MessageTooShort)
            } else {
                None
            }
        }
    }
}
