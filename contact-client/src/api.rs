use contact_core::{CONTACT_PATH, Submission};
use reqwest::StatusCode;

use std::{future::Future, time::Duration};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Contact endpoint responded with {0}")]
    Rejected(StatusCode),

    #[error("Failed to reach contact endpoint: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The contact endpoint as seen from the form.
#[cfg_attr(test, mockall::automock)]
pub trait ContactApi: Send + Sync + 'static {
    fn submit(
        &self,
        submission: Submission,
    ) -> impl Future<Output = Result<(), SubmitError>> + Send;
}

#[derive(Clone)]
pub struct HttpContactApi {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpContactApi {
    /// `base_url` is the service root, e.g. `http://127.0.0.1:8001`.
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CONTACT_PATH),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ContactApi for HttpContactApi {
    async fn submit(&self, submission: Submission) -> Result<(), SubmitError> {
        tracing::debug!("Posting contact submission to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&submission)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SubmitError::Rejected(status))
        }
    }
}
