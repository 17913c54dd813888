//! Client side of the contact form: field state, validation on blur and on
//! submit, and a single POST to the relay endpoint per submission.

pub mod api;
pub mod controller;
pub mod form;

pub use api::{ContactApi, HttpContactApi, SubmitError};
pub use contact_core::{Field, Submission, ValidationError};
pub use controller::{FormController, SUCCESS_DISMISS_DELAY, SubmitOutcome};
pub use form::{FieldErrors, FormState, Notice, Phase};
