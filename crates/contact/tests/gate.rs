use std::time::Duration;

use folio_contact::{ContactForm, Outcome, ServiceType, Status, SubmissionGate};
use tokio::time::Instant;

mod helpers;

use helpers::{RecordingDispatch, fill_ana, solve};

#[tokio::test(start_paused = true)]
async fn test_accepted_submission_dispatches_form_fields() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::succeeding();
    let gate = SubmissionGate::new(dispatch.clone());
    fill_ana(&gate);
    assert!(solve(&gate));
    assert!(gate.can_submit());

    let outcome = gate.submit().await;

    assert!(outcome.is_accepted(), "{outcome:?}");
    assert_eq!(gate.status(), Status::Success);
    assert_eq!(dispatch.calls(), 1);

    let sent = dispatch.sent();
    assert_eq!(sent[0].from_name, "Ana");
    assert_eq!(sent[0].from_email, "a@b.com");
    assert_eq!(sent[0].message, "hi");
    assert_eq!(sent[0].service_type, None);

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_success_returns_to_idle_and_clears_form() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::succeeding();
    let gate = SubmissionGate::new(dispatch.clone());
    let mut status = gate.subscribe();
    fill_ana(&gate);
    solve(&gate);

    let started = Instant::now();
    assert!(gate.submit().await.is_accepted());

    tokio::time::sleep(Duration::from_millis(2900)).await;
    assert_eq!(gate.status(), Status::Success);
    assert_eq!(gate.form().name, "Ana");

    status.wait_for(|s| *s == Status::Idle).await?;
    assert!(started.elapsed() >= Duration::from_secs(3));
    assert_eq!(gate.form(), ContactForm::default());
    assert!(!gate.challenge_valid());
    assert!(!gate.can_submit());

    Ok(())
}

#[tokio::test]
async fn test_provider_failure_keeps_form() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::failing();
    let gate = SubmissionGate::new(dispatch.clone());
    fill_ana(&gate);
    solve(&gate);

    let outcome = gate.submit().await;

    assert!(matches!(outcome, Outcome::ProviderFailure));
    assert_eq!(gate.status(), Status::Failed);
    assert_eq!(gate.form(), ContactForm::new("Ana", "a@b.com", "hi"));

    assert!(matches!(gate.submit().await, Outcome::Unavailable));
    assert_eq!(dispatch.calls(), 1);

    assert!(gate.dismiss());
    assert_eq!(gate.status(), Status::Idle);
    assert_eq!(gate.form().name, "Ana");
    assert!(!gate.dismiss());

    // The used challenge was replaced; solving the new one allows a retry.
    assert!(!gate.challenge_valid());
    dispatch.fail.store(false, std::sync::atomic::Ordering::SeqCst);
    solve(&gate);
    assert!(gate.submit().await.is_accepted());
    assert_eq!(dispatch.calls(), 2);

    Ok(())
}

#[tokio::test]
async fn test_incomplete_form_never_dispatches() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::succeeding();
    let gate = SubmissionGate::new(dispatch.clone());
    solve(&gate);

    for form in [
        ContactForm::new("", "a@b.com", "hi"),
        ContactForm::new("Ana", "", "hi"),
        ContactForm::new("Ana", "a@b.com", ""),
    ] {
        gate.edit_form(|f| *f = form);
        assert!(!gate.can_submit());
        assert!(matches!(
            gate.submit().await,
            Outcome::RejectedValidation(_)
        ));
    }

    assert_eq!(gate.status(), Status::Idle);
    assert_eq!(dispatch.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_unsolved_challenge_never_dispatches() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::succeeding();
    let gate = SubmissionGate::new(dispatch.clone());
    fill_ana(&gate);

    assert!(!gate.can_submit());
    assert!(matches!(gate.submit().await, Outcome::RejectedChallenge));

    let wrong = format!("{}x", gate.challenge().text());
    assert!(!gate.input_challenge(wrong));
    assert!(matches!(gate.submit().await, Outcome::RejectedChallenge));

    solve(&gate);
    gate.refresh_challenge();
    assert!(matches!(gate.submit().await, Outcome::RejectedChallenge));

    assert_eq!(dispatch.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_second_submit_while_in_flight_is_ignored() -> anyhow::Result<()> {
    let (dispatch, hold) = RecordingDispatch::held();
    let gate = SubmissionGate::new(dispatch.clone());
    let mut status = gate.subscribe();
    gate.edit_form(|form| {
        *form = ContactForm::new("Ana", "a@b.com", "hi").service_type(ServiceType::Consulting)
    });
    solve(&gate);

    let first = tokio::spawn({
        let gate = gate.clone();
        async move { gate.submit().await }
    });

    status.wait_for(|s| *s == Status::Submitting).await?;
    assert!(!gate.can_submit());
    assert!(matches!(gate.submit().await, Outcome::Unavailable));
    assert!(!gate.edit_form(|form| form.name.clear()));

    hold.add_permits(1);
    assert!(first.await?.is_accepted());

    assert_eq!(dispatch.calls(), 1);
    assert_eq!(dispatch.sent()[0].service_type.as_deref(), Some("consulting"));

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_dropped_submit_releases_gate() -> anyhow::Result<()> {
    let (dispatch, hold) = RecordingDispatch::held();
    let gate = SubmissionGate::new(dispatch.clone());
    fill_ana(&gate);
    solve(&gate);

    let abandoned = tokio::time::timeout(Duration::from_millis(50), gate.submit()).await;

    assert!(abandoned.is_err());
    assert_eq!(dispatch.calls(), 1);
    assert_eq!(gate.status(), Status::Idle);
    assert_eq!(gate.form(), ContactForm::new("Ana", "a@b.com", "hi"));
    assert!(!gate.challenge_valid());
    assert!(gate.edit_form(|form| form.message = "hello again".to_owned()));

    hold.add_permits(1);
    assert!(solve(&gate));
    assert!(gate.submit().await.is_accepted());
    assert_eq!(dispatch.calls(), 2);
    assert_eq!(dispatch.sent()[1].message, "hello again");

    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_form_is_locked_while_success_is_displayed() -> anyhow::Result<()> {
    let dispatch = RecordingDispatch::succeeding();
    let gate = SubmissionGate::new(dispatch.clone());
    let mut status = gate.subscribe();
    fill_ana(&gate);
    solve(&gate);

    assert!(gate.submit().await.is_accepted());
    assert_eq!(gate.status(), Status::Success);

    assert!(!gate.edit_form(|form| form.name = "Bea".to_owned()));
    let challenge = gate.challenge();
    assert!(!gate.input_challenge(challenge.text()));
    assert_eq!(gate.refresh_challenge(), challenge);
    assert_eq!(gate.form().name, "Ana");

    status.wait_for(|s| *s == Status::Idle).await?;
    assert!(gate.edit_form(|form| form.name = "Bea".to_owned()));
    assert_eq!(gate.form().name, "Bea");

    Ok(())
}
