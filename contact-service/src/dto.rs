use serde::{Deserialize, Serialize};

pub use contact_core::Submission as ContactRequest;

pub const SENT: &str = "Message sent successfully";
pub const FAILED: &str = "Failed to send message";
pub const INVALID_BODY: &str = "Invalid request body";

/// Body of every response from the contact endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub message: String,
}

impl ContactResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn sent() -> Self {
        Self::new(SENT)
    }

    pub fn failed() -> Self {
        Self::new(FAILED)
    }
}
