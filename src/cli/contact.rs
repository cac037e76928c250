use std::{sync::Arc, time::Duration};

use folio::{Config, Transport};
use folio_contact::{MailDispatch, Outcome, ServiceType, SubmissionGate};
use folio_notification::{ContactNotifier, EmailRelay, EmailService};
use folio_shared::Language;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use validator::Validate;

const MAX_CHALLENGE_ATTEMPTS: usize = 5;

pub struct ContactArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub service: Option<String>,
    pub transport: Option<Transport>,
    pub lang: Option<String>,
}

struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    async fn ask(&mut self, label: &str) -> anyhow::Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("{label}: ").as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = self.lines.next_line().await? else {
            anyhow::bail!("input closed");
        };

        Ok(line.trim().to_owned())
    }

    async fn value(&mut self, given: Option<String>, label: &str) -> anyhow::Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.ask(label).await,
        }
    }
}

fn dispatcher(config: &Config, args: &ContactArgs) -> anyhow::Result<Arc<dyn MailDispatch>> {
    let transport = args.transport.unwrap_or(config.contact.transport);

    let dispatch: Arc<dyn MailDispatch> = match transport {
        Transport::Relay => Arc::new(EmailRelay::new(config.relay.clone())),
        Transport::Smtp => {
            let lang = match &args.lang {
                Some(lang) => lang
                    .parse::<Language>()
                    .map_err(|_| folio_shared::Error::invalid_value("language", lang))?,
                None => config.contact.lang,
            };
            let service = EmailService::new(&config.email)?;
            let owner = config.email.contact_address().to_owned();

            Arc::new(ContactNotifier::new(service, owner).lang(lang))
        }
    };

    Ok(dispatch)
}

/// Runs the interactive contact form. Returns whether the message was sent.
pub async fn run(config: Config, args: ContactArgs) -> anyhow::Result<bool> {
    let service_type = args
        .service
        .as_deref()
        .filter(|value| !value.trim().is_empty())
        .map(ServiceType::parse)
        .transpose()?;

    let gate = SubmissionGate::with_success_display(
        dispatcher(&config, &args)?,
        Duration::from_millis(config.contact.success_display_ms),
    );

    let mut prompt = Prompt::new();
    let name = prompt.value(args.name, "Name").await?;
    let email = prompt.value(args.email, "Email").await?;
    let message = prompt.value(args.message, "Message").await?;

    gate.edit_form(|form| {
        form.name = name;
        form.email = email;
        form.message = message;
        form.service_type = service_type;
    });

    if let Err(errors) = gate.form().validate() {
        tracing::debug!(%errors, "contact form incomplete");
        println!("{}", Outcome::RejectedValidation(errors).user_message());
        return Ok(false);
    }

    loop {
        if !solve_challenge(&gate, &mut prompt).await? {
            println!("Too many attempts, please try again later.");
            return Ok(false);
        }

        let outcome = gate.submit().await;
        println!("{}", outcome.user_message());

        match outcome {
            Outcome::Accepted => return Ok(true),
            Outcome::ProviderFailure => {
                let answer = prompt.ask("Try again? [y/N]").await?;
                if !answer.eq_ignore_ascii_case("y") {
                    return Ok(false);
                }
                gate.dismiss();
            }
            Outcome::RejectedValidation(_)
            | Outcome::RejectedChallenge
            | Outcome::Unavailable => return Ok(false),
        }
    }
}

async fn solve_challenge<D: MailDispatch + 'static>(
    gate: &SubmissionGate<D>,
    prompt: &mut Prompt,
) -> anyhow::Result<bool> {
    for _ in 0..MAX_CHALLENGE_ATTEMPTS {
        println!("Verification code: {}", gate.challenge());
        let answer = prompt
            .ask("Type the code above (empty for a new one)")
            .await?;

        if answer.is_empty() {
            gate.refresh_challenge();
            continue;
        }

        if gate.input_challenge(answer) {
            println!("✓ Code accepted");
            return Ok(true);
        }

        println!("✗ Incorrect code");
    }

    Ok(false)
}
