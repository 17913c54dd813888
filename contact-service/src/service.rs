use contact_core::{Submission, ValidationError};
use lettre::{Address, message::Mailbox};

use std::sync::Arc;

use crate::{
    dto::ContactResponse,
    relay::{DispatchError, MailRelay, OutboundEmail},
};

pub struct ContactService {
    relay: Arc<dyn MailRelay>,
    sender: Mailbox,
    recipient: Mailbox,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    #[error("Invalid submission: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Invalid email address format: {0}")]
    AddressFormat(#[from] lettre::address::AddressError),

    #[error("Failed to dispatch email: {0}")]
    Dispatch(#[from] DispatchError),
}

impl ContactService {
    pub fn new(relay: Arc<dyn MailRelay>, sender: Mailbox, recipient: Mailbox) -> Self {
        Self {
            relay,
            sender,
            recipient,
        }
    }

    /// Turns a submission into the email sent to the site owner.
    pub fn compose(&self, submission: &Submission) -> Result<OutboundEmail, ContactServiceError> {
        let name = submission.display_name();
        let reply_to = Mailbox::new(None, submission.email.parse::<Address>()?);

        Ok(OutboundEmail {
            from: self.sender.clone(),
            to: self.recipient.clone(),
            reply_to,
            subject: format!("New message from {name}"),
            text: format!(
                "Name: {name}\nEmail: {}\n\nMessage:\n{}",
                submission.email, submission.message
            ),
            html: format!(
                "<p>Name: {}</p><p>Email: {}</p><p>Message: {}</p>",
                escape_html(name),
                escape_html(&submission.email),
                escape_html(&submission.message)
            ),
        })
    }

    pub async fn send_message(
        &self,
        submission: Submission,
    ) -> Result<ContactResponse, ContactServiceError> {
        submission.validate()?;

        let email = self.compose(&submission)?;

        tracing::info!(
            "Relaying contact message to '{}' with subject '{}'",
            email.to,
            email.subject
        );

        self.relay.dispatch(email).await?;

        tracing::info!("Contact message relayed");
        tracing::debug!("Relayed contact message came from {}", submission.email);

        Ok(ContactResponse::sent())
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
