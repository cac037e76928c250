use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
};

use folio_contact::{ContactForm, EmailParams, MailDispatch, SubmissionGate};
use tokio::sync::Semaphore;

#[derive(Default)]
pub struct RecordingDispatch {
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
    pub sent: Mutex<Vec<EmailParams>>,
    hold: Option<Arc<Semaphore>>,
}

#[allow(dead_code)]
impl RecordingDispatch {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        let dispatch = Self::default();
        dispatch.fail.store(true, Ordering::SeqCst);

        Arc::new(dispatch)
    }

    /// Every send waits for a permit on the returned semaphore.
    pub fn held() -> (Arc<Self>, Arc<Semaphore>) {
        let hold = Arc::new(Semaphore::new(0));
        let dispatch = Self {
            hold: Some(hold.clone()),
            ..Default::default()
        };

        (Arc::new(dispatch), hold)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<EmailParams> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MailDispatch for RecordingDispatch {
    async fn send_email(&self, params: EmailParams) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push(params);

        if let Some(hold) = &self.hold {
            hold.acquire().await.unwrap().forget();
        }

        !self.fail.load(Ordering::SeqCst)
    }
}

#[allow(dead_code)]
pub fn fill_ana(gate: &SubmissionGate<Arc<RecordingDispatch>>) {
    gate.edit_form(|form| *form = ContactForm::new("Ana", "a@b.com", "hi"));
}

#[allow(dead_code)]
pub fn solve(gate: &SubmissionGate<Arc<RecordingDispatch>>) -> bool {
    let text = gate.challenge().text().to_owned();

    gate.input_challenge(text)
}
