//! Submission gate: decides whether the contact form may be dispatched and
//! drives the `Idle -> Submitting -> {Success, Failed}` lifecycle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle};
use validator::{Validate, ValidationErrors};

use crate::{Captcha, Challenge, ContactForm, MailDispatch, Status};

pub const SUCCESS_DISPLAY: Duration = Duration::from_secs(3);

#[derive(Debug)]
pub enum Outcome {
    Accepted,
    RejectedValidation(ValidationErrors),
    RejectedChallenge,
    ProviderFailure,
    /// A submission is in flight or its result has not been cleared yet.
    Unavailable,
}

impl Outcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Message safe to show to the person filling the form.
    pub fn user_message(&self) -> &'static str {
        match self {
            Outcome::Accepted => "Message sent. Thank you for reaching out!",
            Outcome::RejectedValidation(_) => "Please fill in your name, email and message.",
            Outcome::RejectedChallenge => "The verification code does not match.",
            Outcome::ProviderFailure => "Your message could not be sent. Please try again.",
            Outcome::Unavailable => "A message is already being sent.",
        }
    }
}

struct Session {
    status: Status,
    form: ContactForm,
    captcha: Captcha,
    reset: Option<JoinHandle<()>>,
}

impl Session {
    fn is_editable(&self) -> bool {
        matches!(self.status, Status::Idle | Status::Failed)
    }
}

struct Inner<D> {
    dispatch: D,
    session: Mutex<Session>,
    status: watch::Sender<Status>,
    success_display: Duration,
}

pub struct SubmissionGate<D> {
    inner: Arc<Inner<D>>,
}

impl<D> Clone for SubmissionGate<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<D: MailDispatch + 'static> SubmissionGate<D> {
    pub fn new(dispatch: D) -> Self {
        Self::with_success_display(dispatch, SUCCESS_DISPLAY)
    }

    pub fn with_success_display(dispatch: D, success_display: Duration) -> Self {
        let (status, _) = watch::channel(Status::Idle);

        Self {
            inner: Arc::new(Inner {
                dispatch,
                session: Mutex::new(Session {
                    status: Status::Idle,
                    form: ContactForm::default(),
                    captcha: Captcha::new(),
                    reset: None,
                }),
                status,
                success_display,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn transition(&self, session: &mut Session, status: Status) {
        tracing::debug!(from = %session.status, to = %status, "contact status changed");
        session.status = status;
        self.inner.status.send_replace(status);
    }

    pub fn status(&self) -> Status {
        self.lock().status
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.inner.status.subscribe()
    }

    pub fn form(&self) -> ContactForm {
        self.lock().form.clone()
    }

    /// Applies `edit` to the form. Fields are locked while a submission is
    /// in flight or its success is displayed, and `false` is returned.
    pub fn edit_form(&self, edit: impl FnOnce(&mut ContactForm)) -> bool {
        let mut session = self.lock();
        if !session.is_editable() {
            return false;
        }

        edit(&mut session.form);

        true
    }

    pub fn challenge(&self) -> Challenge {
        self.lock().captcha.challenge().clone()
    }

    pub fn challenge_valid(&self) -> bool {
        self.lock().captcha.is_valid()
    }

    pub fn input_challenge(&self, text: impl Into<String>) -> bool {
        let mut session = self.lock();
        if !session.is_editable() {
            return session.captcha.is_valid();
        }

        session.captcha.input(text)
    }

    pub fn refresh_challenge(&self) -> Challenge {
        let mut session = self.lock();
        if !session.is_editable() {
            return session.captcha.challenge().clone();
        }

        session.captcha.refresh().clone()
    }

    pub fn can_submit(&self) -> bool {
        let session = self.lock();

        session.status == Status::Idle
            && crate::can_submit(&session.form, session.captcha.is_valid())
    }

    pub async fn submit(&self) -> Outcome {
        let params = {
            let mut session = self.lock();
            if session.status != Status::Idle {
                return Outcome::Unavailable;
            }

            if let Err(errors) = session.form.validate() {
                tracing::debug!("contact form incomplete");
                return Outcome::RejectedValidation(errors);
            }

            if !session.captcha.is_valid() {
                tracing::debug!("challenge response does not match");
                return Outcome::RejectedChallenge;
            }

            self.transition(&mut session, Status::Submitting);

            session.form.to_email_params()
        };

        tracing::info!(
            from_email = %params.from_email,
            service_type = params.service_type_or_default(),
            "Dispatching contact message"
        );

        let mut in_flight = InFlight {
            gate: self,
            answered: false,
        };
        let sent = self.inner.dispatch.send_email(params).await;
        in_flight.answered = true;

        let mut session = self.lock();
        // A challenge is good for one dispatch attempt only.
        session.captcha.refresh();

        if sent {
            self.transition(&mut session, Status::Success);
            self.schedule_reset(&mut session);

            Outcome::Accepted
        } else {
            tracing::warn!("contact message was not delivered");
            self.transition(&mut session, Status::Failed);

            Outcome::ProviderFailure
        }
    }

    /// Leaves the `Failed` state keeping the form so it can be retried.
    pub fn dismiss(&self) -> bool {
        let mut session = self.lock();
        if session.status != Status::Failed {
            return false;
        }

        self.transition(&mut session, Status::Idle);

        true
    }

    fn schedule_reset(&self, session: &mut Session) {
        if let Some(handle) = session.reset.take() {
            handle.abort();
        }

        let gate = self.clone();
        let delay = self.inner.success_display;

        session.reset = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            gate.finish_success();
        }));
    }

    fn finish_success(&self) {
        let mut session = self.lock();
        session.reset = None;
        if session.status != Status::Success {
            return;
        }

        session.form.clear();
        session.captcha.clear_response();
        self.transition(&mut session, Status::Idle);
    }
}

/// Releases the gate when `submit` is dropped before the provider answers.
struct InFlight<'a, D: MailDispatch + 'static> {
    gate: &'a SubmissionGate<D>,
    answered: bool,
}

impl<D: MailDispatch + 'static> Drop for InFlight<'_, D> {
    fn drop(&mut self) {
        if self.answered {
            return;
        }

        let mut session = self.gate.lock();
        if session.status != Status::Submitting {
            return;
        }

        tracing::warn!("contact submission cancelled before the provider answered");
        session.captcha.refresh();
        self.gate.transition(&mut session, Status::Idle);
    }
}
