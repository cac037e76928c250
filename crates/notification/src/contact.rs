//! Server-side delivery of contact messages: one notification to the site
//! owner and one acknowledgement to the sender.

use folio_contact::{EmailParams, MailDispatch, ServiceType};
use folio_shared::Language;
use time::{OffsetDateTime, format_description::well_known::Rfc2822};
use validator::Validate;

use crate::{
    Mailer,
    template::{Template, filters},
};

#[derive(Validate, Clone, Debug)]
pub struct ContactSubmission {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub service: Option<ServiceType>,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    pub lang: Language,
}

impl ContactSubmission {
    pub fn from_params(params: &EmailParams, lang: Language) -> Self {
        Self {
            name: params.from_name.to_owned(),
            email: params.from_email.to_owned(),
            service: params
                .service_type
                .as_deref()
                .and_then(|value| ServiceType::parse(value).ok()),
            message: params.message.to_owned(),
            lang,
        }
    }

    fn service_label(&self) -> String {
        let lang = self.lang.as_ref();
        match self.service {
            Some(service) => {
                let key = format!("contact.service.{service}");
                rust_i18n::t!(key.as_str(), locale = lang).to_string()
            }
            None => rust_i18n::t!("contact.service_not_specified", locale = lang).to_string(),
        }
    }
}

#[derive(askama::Template)]
#[template(path = "contact-owner.html")]
pub struct OwnerHtmlTemplate {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub sent_at: String,
}

#[derive(askama::Template)]
#[template(path = "contact-owner.txt")]
pub struct OwnerPlainTemplate {
    pub name: String,
    pub email: String,
    pub service: String,
    pub message: String,
    pub sent_at: String,
}

#[derive(askama::Template)]
#[template(path = "contact-ack.html")]
pub struct AckHtmlTemplate {
    pub name: String,
    pub email: String,
    pub service: String,
}

#[derive(askama::Template)]
#[template(path = "contact-ack.txt")]
pub struct AckPlainTemplate {
    pub name: String,
    pub email: String,
    pub service: String,
}

pub struct ContactNotifier<M> {
    mailer: M,
    owner_address: String,
    lang: Language,
}

impl<M: Mailer> ContactNotifier<M> {
    pub fn new(mailer: M, owner_address: impl Into<String>) -> Self {
        Self {
            mailer,
            owner_address: owner_address.into(),
            lang: Language::default(),
        }
    }

    /// Wording used when submissions arrive through [`MailDispatch`].
    pub fn lang(mut self, lang: Language) -> Self {
        self.lang = lang;
        self
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Sends both messages. Each is attempted even if the other fails; the
    /// first failure is reported.
    #[tracing::instrument(skip_all, fields(from = %submission.email))]
    pub async fn notify(&self, submission: ContactSubmission) -> folio_shared::Result<()> {
        submission.validate()?;

        let template = Template::new(submission.lang);
        let lang = submission.lang.as_ref();
        let service = submission.service_label();
        let sent_at = OffsetDateTime::now_utc()
            .format(&Rfc2822)
            .map_err(anyhow::Error::from)?;

        let owner_subject = rust_i18n::t!(
            "contact.owner.subject",
            locale = lang,
            name = submission.name
        )
        .to_string();
        let owner_html = template.render(OwnerHtmlTemplate {
            name: submission.name.to_owned(),
            email: submission.email.to_owned(),
            service: service.to_owned(),
            message: submission.message.to_owned(),
            sent_at: sent_at.to_owned(),
        })?;
        let owner_plain = template.render(OwnerPlainTemplate {
            name: submission.name.to_owned(),
            email: submission.email.to_owned(),
            service: service.to_owned(),
            message: submission.message.to_owned(),
            sent_at,
        })?;

        let ack_subject = rust_i18n::t!("contact.ack.subject", locale = lang).to_string();
        let ack_html = template.render(AckHtmlTemplate {
            name: submission.name.to_owned(),
            email: submission.email.to_owned(),
            service: service.to_owned(),
        })?;
        let ack_plain = template.render(AckPlainTemplate {
            name: submission.name.to_owned(),
            email: submission.email.to_owned(),
            service,
        })?;

        let owner = self
            .mailer
            .deliver(&self.owner_address, &owner_subject, owner_html, owner_plain)
            .await;
        let ack = self
            .mailer
            .deliver(&submission.email, &ack_subject, ack_html, ack_plain)
            .await;

        if let Err(err) = owner.and(ack) {
            tracing::error!(error = %err, "Error sending contact emails");
            folio_shared::bail!("{err}");
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl<M: Mailer> MailDispatch for ContactNotifier<M> {
    async fn send_email(&self, params: EmailParams) -> bool {
        let submission = ContactSubmission::from_params(&params, self.lang);

        match self.notify(submission).await {
            Ok(()) => true,
            Err(err) => {
                tracing::error!(error = %err, "Contact notification failed");
                false
            }
        }
    }
}
