use contact_core::{Field, Submission, ValidationError, validate};

use std::fmt;

use crate::controller::SubmitOutcome;

/// Failure message shown after a submission did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The endpoint answered with a non-success status
    Rejected,
    /// The request never completed
    Unreachable,
}

impl Notice {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Rejected => "Failed to send message. Please try again later.",
            Self::Unreachable => "An error occurred. Please try again later.",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Where the form is in its `Idle -> Submitting -> Success | Failure -> Idle`
/// cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Success,
    Failure(Notice),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<ValidationError>,
    pub message: Option<ValidationError>,
}

impl FieldErrors {
    pub const fn get(&self, field: Field) -> Option<ValidationError> {
        match field {
            Field::Name => None,
            Field::Email => self.email,
            Field::Message => self.message,
        }
    }

    fn set(&mut self, field: Field, error: Option<ValidationError>) {
        match field {
            Field::Name => {}
            Field::Email => self.email = error,
            Field::Message => self.message = error,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.message.is_none()
    }
}

/// Everything the form renders from. Each change produces a new snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub email: String,
    pub message: String,
    pub errors: FieldErrors,
    pub submitting: bool,
    pub submitted: bool,
    pub notice: Option<Notice>,
}

impl FormState {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Message => &self.message,
        }
    }

    pub fn edit(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Message => self.message = value,
        }
    }

    /// The field lost focus: re-check it and record the result.
    pub fn blur(&mut self, field: Field) -> Option<ValidationError> {
        let error = validate(field, self.value(field));
        self.errors.set(field, error);
        error
    }

    /// Re-checks every field. Returns whether the form is free of errors.
    pub fn validate_all(&mut self) -> bool {
        for field in Field::ALL {
            self.blur(field);
        }
        self.errors.is_empty()
    }

    pub const fn can_submit(&self) -> bool {
        !self.submitting && self.errors.is_empty()
    }

    pub const fn phase(&self) -> Phase {
        if self.submitting {
            Phase::Submitting
        } else if self.submitted {
            Phase::Success
        } else if let Some(notice) = self.notice {
            Phase::Failure(notice)
        } else {
            Phase::Idle
        }
    }

    pub fn submission(&self) -> Submission {
        Submission::new(&self.name, &self.email, &self.message)
    }

    pub fn acknowledge_notice(&mut self) {
        self.notice = None;
    }

    /// Starts a submission. A new submission ends any success panel still on
    /// screen, so its own outcome is what the phase reports.
    pub(crate) fn begin_submit(&mut self) -> Result<Submission, SubmitOutcome> {
        if self.submitting {
            return Err(SubmitOutcome::Busy);
        }
        self.validate_all();
        if !self.can_submit() {
            return Err(SubmitOutcome::Invalid);
        }

        self.submitting = true;
        self.submitted = false;
        self.notice = None;
        Ok(self.submission())
    }

    pub(crate) fn succeed(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
        self.errors = FieldErrors::default();
        self.submitted = true;
    }

    pub(crate) fn fail(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub(crate) fn dismiss_success(&mut self) {
        self.submitted = false;
    }
}
