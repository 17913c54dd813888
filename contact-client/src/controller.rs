use contact_core::{Field, ValidationError};
use tokio::{sync::watch, task::JoinHandle};

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use crate::{
    api::{ContactApi, SubmitError},
    form::{FormState, Notice},
};

/// How long the success panel stays up.
pub const SUCCESS_DISMISS_DELAY: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The endpoint accepted the submission
    Sent,
    /// Validation failed, nothing was sent
    Invalid,
    /// A submission is already in flight, nothing was sent
    Busy,
    /// The submission was sent and did not go through
    Failed(Notice),
}

/// Drives one form instance. Every state change is published as a fresh
/// `FormState` snapshot to subscribers.
pub struct FormController<A> {
    api: A,
    state: Arc<watch::Sender<FormState>>,
    dismiss_task: Mutex<Option<JoinHandle<()>>>,
}

/// Clears `submitting` when the submission ends, however it ends.
struct SubmittingGuard<'a>(&'a watch::Sender<FormState>);

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_modify(|state| state.submitting = false);
    }
}

impl<A: ContactApi> FormController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Arc::new(watch::Sender::new(FormState::default())),
            dismiss_task: Mutex::new(None),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> FormState {
        self.state.borrow().clone()
    }

    pub fn edit(&self, field: Field, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(|state| state.edit(field, value));
    }

    pub fn blur(&self, field: Field) -> Option<ValidationError> {
        let mut error = None;
        self.state.send_modify(|state| error = state.blur(field));
        error
    }

    pub fn acknowledge_notice(&self) {
        self.state.send_modify(FormState::acknowledge_notice);
    }

    /// Validates and, if the form is clean and idle, sends it once.
    pub async fn submit(&self) -> SubmitOutcome {
        let mut begun = Err(SubmitOutcome::Busy);
        self.state
            .send_modify(|state| begun = state.begin_submit());

        let submission = match begun {
            Ok(submission) => submission,
            Err(outcome) => {
                tracing::debug!("Submission blocked: {:?}", outcome);
                return outcome;
            }
        };

        self.cancel_dismiss();
        let _guard = SubmittingGuard(&self.state);

        match self.api.submit(submission).await {
            Ok(()) => {
                tracing::info!("Contact message sent");
                self.state.send_modify(FormState::succeed);
                self.schedule_dismiss();
                SubmitOutcome::Sent
            }
            Err(e) => {
                let notice = match e {
                    SubmitError::Rejected(_) => Notice::Rejected,
                    SubmitError::Transport(_) => Notice::Unreachable,
                };
                tracing::error!("Form submission failed: {e}");
                self.state.send_modify(|state| state.fail(notice));
                SubmitOutcome::Failed(notice)
            }
        }
    }

    fn schedule_dismiss(&self) {
        let state = Arc::clone(&self.state);

        let task = tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_DISMISS_DELAY).await;
            state.send_modify(FormState::dismiss_success);
        });

        self.cancel_dismiss();
        *self.dismiss_slot() = Some(task);
    }

    /// Stops a pending success dismissal; the next success starts a full
    /// countdown of its own.
    fn cancel_dismiss(&self) {
        if let Some(task) = self.dismiss_slot().take() {
            task.abort();
        }
    }

    fn dismiss_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.dismiss_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use futures::FutureExt;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;
    use tokio::time::Instant;

    use super::*;
    use crate::{api::MockContactApi, form::Phase};
    use contact_core::Submission;

    fn fill(controller: &FormController<impl ContactApi>) {
        controller.edit(Field::Name, "Ada");
        controller.edit(Field::Email, "ada@example.com");
        controller.edit(Field::Message, "Hello, this is a test message.");
    }

    fn expected() -> Submission {
        Submission::new("Ada", "ada@example.com", "Hello, this is a test message.")
    }

    #[tokio::test]
    async fn empty_form_makes_no_request() {
        let mut api = MockContactApi::new();
        api.expect_submit().never();
        let controller = FormController::new(api);

        assert_eq!(controller.submit().await, SubmitOutcome::Invalid);

        let state = controller.snapshot();
        assert_eq!(state.errors.email, Some(ValidationError::EmailRequired));
        assert_eq!(state.errors.message, Some(ValidationError::MessageRequired));
        assert!(!state.submitting);
    }

    #[tokio::test]
    async fn malformed_email_makes_no_request() {
        let mut api = MockContactApi::new();
        api.expect_submit().never();
        let controller = FormController::new(api);
        fill(&controller);
        controller.edit(Field::Email, "ada at example.com");

        assert_eq!(controller.submit().await, SubmitOutcome::Invalid);
        assert_eq!(
            controller.snapshot().errors.email,
            Some(ValidationError::EmailFormat)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn success_clears_form_and_dismisses_after_delay() {
        let mut api = MockContactApi::new();
        api.expect_submit()
            .once()
            .with(eq(expected()))
            .returning(|_| futures::future::ready(Ok(())).boxed());
        let controller = FormController::new(api);
        fill(&controller);

        let start = Instant::now();
        assert_eq!(controller.submit().await, SubmitOutcome::Sent);

        let state = controller.snapshot();
        assert_eq!(state.phase(), Phase::Success);
        assert_eq!(state.name, "");
        assert_eq!(state.email, "");
        assert_eq!(state.message, "");
        assert!(!state.submitting);

        let mut rx = controller.subscribe();
        let _ = rx.borrow_and_update();
        rx.changed().await.unwrap();

        assert_eq!(rx.borrow().phase(), Phase::Idle);
        assert!(start.elapsed() >= SUCCESS_DISMISS_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_during_success_panel_shows_failure() {
        let mut calls = 0;
        let mut api = MockContactApi::new();
        api.expect_submit().times(2).returning(move |_| {
            calls += 1;
            let result = if calls == 1 {
                Ok(())
            } else {
                Err(SubmitError::Rejected(StatusCode::INTERNAL_SERVER_ERROR))
            };
            futures::future::ready(result).boxed()
        });
        let controller = FormController::new(api);

        fill(&controller);
        assert_eq!(controller.submit().await, SubmitOutcome::Sent);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(controller.snapshot().phase(), Phase::Success);

        fill(&controller);
        assert_eq!(
            controller.submit().await,
            SubmitOutcome::Failed(Notice::Rejected)
        );

        let state = controller.snapshot();
        assert_eq!(state.phase(), Phase::Failure(Notice::Rejected));
        assert_eq!(state.email, "ada@example.com");

        // the first success's timer no longer fires
        tokio::time::sleep(SUCCESS_DISMISS_DELAY).await;
        assert_eq!(
            controller.snapshot().phase(),
            Phase::Failure(Notice::Rejected)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn later_success_gets_a_full_dismiss_delay() {
        let mut api = MockContactApi::new();
        api.expect_submit()
            .times(2)
            .returning(|_| futures::future::ready(Ok(())).boxed());
        let controller = FormController::new(api);

        fill(&controller);
        assert_eq!(controller.submit().await, SubmitOutcome::Sent);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        fill(&controller);
        assert_eq!(controller.submit().await, SubmitOutcome::Sent);

        // past the first success's deadline, inside the second's
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(controller.snapshot().phase(), Phase::Success);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(controller.snapshot().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn rejected_submission_keeps_fields() {
        let mut api = MockContactApi::new();
        api.expect_submit().once().returning(|_| {
            futures::future::ready(Err(SubmitError::Rejected(
                StatusCode::INTERNAL_SERVER_ERROR,
            )))
            .boxed()
        });
        let controller = FormController::new(api);
        fill(&controller);

        assert_eq!(
            controller.submit().await,
            SubmitOutcome::Failed(Notice::Rejected)
        );

        let state = controller.snapshot();
        assert_eq!(state.phase(), Phase::Failure(Notice::Rejected));
        assert!(!state.submitting);
        assert!(!state.submitted);
        assert_eq!(state.email, "ada@example.com");
        assert_eq!(state.message, "Hello, this is a test message.");

        controller.acknowledge_notice();
        assert_eq!(controller.snapshot().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn unreachable_endpoint_shows_error_notice() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let api = crate::api::HttpContactApi::new(&format!("http://{addr}")).unwrap();
        let controller = FormController::new(api);
        fill(&controller);

        assert_eq!(
            controller.submit().await,
            SubmitOutcome::Failed(Notice::Unreachable)
        );

        let state = controller.snapshot();
        assert!(!state.submitting);
        assert_eq!(state.name, "Ada");
    }

    #[tokio::test]
    async fn second_submit_while_in_flight_is_refused() {
        let (release, released) = tokio::sync::oneshot::channel::<()>();
        let mut api = MockContactApi::new();
        api.expect_submit().once().return_once(move |_| {
            async move {
                let _ = released.await;
                Ok(())
            }
            .boxed()
        });
        let controller = FormController::new(api);
        fill(&controller);

        let first = controller.submit();
        tokio::pin!(first);
        assert!(futures::poll!(&mut first).is_pending());
        assert!(controller.snapshot().submitting);

        assert_eq!(controller.submit().await, SubmitOutcome::Busy);

        release.send(()).unwrap();
        assert_eq!(first.await, SubmitOutcome::Sent);
        assert!(!controller.snapshot().submitting);
    }

    #[tokio::test]
    async fn dropped_submission_still_clears_submitting() {
        let mut api = MockContactApi::new();
        api.expect_submit()
            .once()
            .returning(|_| futures::future::pending().boxed());
        let controller = FormController::new(api);
        fill(&controller);

        {
            let submit = controller.submit();
            tokio::pin!(submit);
            assert!(futures::poll!(&mut submit).is_pending());
            assert!(controller.snapshot().submitting);
        }

        assert!(!controller.snapshot().submitting);
    }
}
