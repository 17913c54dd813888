use serde::{Deserialize, Serialize};

use crate::validation::{Field, ValidationError, validate};

/// Name used in place of an absent or empty submitter name.
pub const ANONYMOUS: &str = "Anonymous";

/// One contact form submission, as sent over the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

impl Submission {
    /// Builds a submission from raw form values. An empty name is dropped.
    pub fn new(name: impl Into<String>, email: impl Into<String>, message: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            name: (!name.is_empty()).then_some(name),
            email: email.into(),
            message: message.into(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(ANONYMOUS)
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => self.name.as_deref().unwrap_or_default(),
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    /// Runs every field rule and returns the first failure.
    pub fn validate(&self) -> Result<(), ValidationError> {
        Field::ALL
            .into_iter()
            .find_map(|field| validate(field, self.value(field)))
            .map_or(Ok(()), Err)
    }
}
