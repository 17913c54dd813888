//! Shared model for the contact form: the submission sent from the form to the
//! relay endpoint, and the field rules both sides enforce.

mod submission;
mod validation;

pub use submission::{ANONYMOUS, Submission};
pub use validation::{ErrorKind, Field, MIN_MESSAGE_LEN, ValidationError, validate};

/// Path of the relay endpoint, relative to the service root.
pub const CONTACT_PATH: &str = "/api/contact";
