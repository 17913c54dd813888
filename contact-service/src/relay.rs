use futures::{FutureExt, future::BoxFuture};
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
};

use crate::config::{Config, SmtpTls};

/// A fully composed email, ready to hand to the relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: Mailbox,
    pub to: Mailbox,
    pub reply_to: Mailbox,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to build email message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    SmtpTransport(#[from] lettre::transport::smtp::Error),

    #[error("SMTP relay rejected message: {0}")]
    Rejected(String),
}

/// The outbound mail service. One operation: send, and report whether it
/// worked.
#[cfg_attr(test, mockall::automock)]
pub trait MailRelay: Send + Sync + 'static {
    fn dispatch(&self, email: OutboundEmail) -> BoxFuture<'static, Result<(), DispatchError>>;
}

#[derive(Clone)]
pub struct SmtpRelay {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpRelay {
    pub fn new(config: &Config) -> Result<Self, lettre::transport::smtp::Error> {
        let mut builder = match config.smtp_tls {
            SmtpTls::Starttls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_relay)?
            }
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_relay)?,
            SmtpTls::None => {
                tracing::warn!(
                    "SMTP relay '{}' configured without TLS, credentials and mail travel in plain text",
                    config.smtp_relay
                );
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_relay)
            }
        };

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        if let (Some(username), Some(pass)) = (&config.smtp_username, &config.smtp_pass) {
            builder = builder.credentials(Credentials::new(username.clone(), pass.clone()));
        } else {
            tracing::info!("No SMTP credentials configured, relay will be used unauthenticated");
        }

        if config.smtp_timeout.is_some() {
            builder = builder.timeout(config.smtp_timeout);
        }

        Ok(Self {
            transport: builder.build(),
        })
    }

    fn build_message(email: OutboundEmail) -> Result<Message, lettre::error::Error> {
        Message::builder()
            .from(email.from)
            .reply_to(email.reply_to)
            .to(email.to)
            .subject(email.subject)
            .multipart(MultiPart::alternative_plain_html(email.text, email.html))
    }
}

impl MailRelay for SmtpRelay {
    fn dispatch(&self, email: OutboundEmail) -> BoxFuture<'static, Result<(), DispatchError>> {
        let transport = self.transport.clone();

        async move {
            let message = Self::build_message(email)?;
            let response = transport.send(message).await?;

            if response.is_positive() {
                Ok(())
            } else {
                Err(DispatchError::Rejected(format!(
                    "{} {}",
                    response.code(),
                    response
                        .message()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(" ")
                )))
            }
        }
        .boxed()
    }
}
