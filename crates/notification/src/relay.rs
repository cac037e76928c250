//! Client for the transactional mail relay REST API.

use folio_contact::{EmailParams, MailDispatch};
use serde::{Deserialize, Serialize};

pub const DEFAULT_RELAY_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            endpoint: default_endpoint(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_RELAY_ENDPOINT.to_string()
}

impl RelayConfig {
    /// Names of the credentials that are not set.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("service_id", &self.service_id),
            ("template_id", &self.template_id),
            ("public_key", &self.public_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Serialize)]
struct RelayRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

#[derive(Serialize)]
struct TemplateParams<'a> {
    from_name: &'a str,
    from_email: &'a str,
    message: &'a str,
    service_type: &'a str,
    to_name: &'a str,
}

/// Sends contact messages through the relay. Construction never fails;
/// without credentials every send is refused before any request is made.
pub struct EmailRelay {
    client: reqwest::Client,
    config: RelayConfig,
    missing: Vec<&'static str>,
}

impl EmailRelay {
    pub fn new(config: RelayConfig) -> Self {
        let missing = config.missing();

        if missing.is_empty() {
            tracing::info!(
                endpoint = %config.endpoint,
                service_id = %config.service_id,
                template_id = %config.template_id,
                "Mail relay configured"
            );
        } else {
            tracing::error!(
                missing = ?missing,
                "Mail relay configuration is missing, contact messages will not be sent"
            );
        }

        Self {
            client: reqwest::Client::new(),
            config,
            missing,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.missing.is_empty()
    }

    async fn try_send(&self, params: &EmailParams) -> anyhow::Result<()> {
        if !self.is_configured() {
            anyhow::bail!(
                "mail relay configuration is missing: {}",
                self.missing.join(", ")
            );
        }

        let request = RelayRequest {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams {
                from_name: &params.from_name,
                from_email: &params.from_email,
                message: &params.message,
                service_type: params.service_type_or_default(),
                to_name: params.to_name_or_default(),
            },
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail relay rejected the message ({status}): {body}");
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl MailDispatch for EmailRelay {
    async fn send_email(&self, params: EmailParams) -> bool {
        match self.try_send(&params).await {
            Ok(()) => {
                tracing::info!(from_email = %params.from_email, "Email sent successfully");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, "Error sending email");
                false
            }
        }
    }
}
