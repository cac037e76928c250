//! Email notification service using lettre

use lettre::{
    Message, SmtpTransport, Transport, message::MultiPart,
    transport::smtp::authentication::Credentials,
};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
    /// Where contact messages are delivered; the sender address when empty.
    pub contact_address: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_address: "noreply@folio.localhost".to_string(),
            contact_address: String::new(),
        }
    }
}

impl EmailConfig {
    pub fn contact_address(&self) -> &str {
        if self.contact_address.is_empty() {
            &self.from_address
        } else {
            &self.contact_address
        }
    }
}

/// Outgoing mail transport.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(
        &self,
        to: &str,
        subject: &str,
        html: String,
        plain: String,
    ) -> anyhow::Result<()>;
}

/// Email service for sending notifications
#[derive(Clone)]
pub struct EmailService {
    mailer: SmtpTransport,
    from: String,
}

impl EmailService {
    /// Create a new email service from configuration
    pub fn new(config: &EmailConfig) -> anyhow::Result<Self> {
        let mailer = if config.smtp_username.is_empty() || config.smtp_password.is_empty() {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                "SMTP credentials not configured, using unauthenticated connection"
            );
            SmtpTransport::builder_dangerous(&config.smtp_host)
                .port(config.smtp_port)
                .build()
        } else {
            tracing::info!(
                smtp_host = %config.smtp_host,
                smtp_port = config.smtp_port,
                from = %config.from_address,
                "Email service initialized with authentication and TLS"
            );

            let creds =
                Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

            SmtpTransport::relay(&config.smtp_host)?
                .port(config.smtp_port)
                .credentials(creds)
                .build()
        };

        Ok(Self {
            mailer,
            from: config.from_address.clone(),
        })
    }

    pub async fn send(
        &self,
        to: impl Into<String>,
        subject: impl Into<String>,
        html: impl Into<String>,
        plain: impl Into<String>,
    ) -> anyhow::Result<()> {
        let to = to.into();
        let subject = subject.into();

        tracing::info!(to = %to, subject = %subject, "Sending email");

        let message = Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(plain.into(), html.into()))?;

        // The SMTP transport blocks.
        let mailer = self.mailer.clone();
        tokio::task::spawn_blocking(move || mailer.send(&message)).await??;

        Ok(())
    }
}

#[async_trait::async_trait]
impl Mailer for EmailService {
    async fn deliver(
        &self,
        to: &str,
        subject: &str,
        html: String,
        plain: String,
    ) -> anyhow::Result<()> {
        self.send(to, subject, html, plain).await
    }
}
