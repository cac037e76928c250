use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use folio_notification::{EmailConfig, RelayConfig};
use folio_shared::Language;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub contact: ContactConfig,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// How contact messages leave the process.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    /// Transactional mail relay API
    #[default]
    Relay,
    /// Owner notification and acknowledgement over SMTP
    Smtp,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContactConfig {
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub lang: Language,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            success_display_ms: default_success_display_ms(),
            transport: Transport::default(),
            lang: Language::default(),
        }
    }
}

fn default_success_display_ms() -> u64 {
    3000
}

#[derive(Debug, Deserialize, Clone)]
pub struct PreferencesConfig {
    #[serde(default = "default_preferences_path")]
    pub path: String,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            path: default_preferences_path(),
        }
    }
}

fn default_preferences_path() -> String {
    "data/preferences.json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (FOLIO__RELAY__SERVICE_ID, etc.)
    /// 2. Config file specified by path
    /// 3. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_file_path = config_path
            .or_else(|| env::var("CONFIG_PATH").ok())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Optional, ignored when absent
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .separator("__")
                .try_parsing(true),
        );

        // Also support the variable names used by earlier deployments
        for (var, key) in [
            ("EMAILJS_SERVICE_ID", "relay.service_id"),
            ("EMAILJS_TEMPLATE_ID", "relay.template_id"),
            ("EMAILJS_PUBLIC_KEY", "relay.public_key"),
            ("EMAIL_USER", "email.smtp_username"),
            ("EMAIL_USER", "email.from_address"),
            ("EMAIL_PASS", "email.smtp_password"),
            ("RECIPIENT_EMAIL", "email.contact_address"),
        ] {
            if let Ok(value) = env::var(var) {
                builder = builder.set_override(key, value)?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    ///
    /// Missing relay credentials are tolerated here; the relay refuses to
    /// send until they are provided.
    pub fn validate(&self) -> Result<(), String> {
        if self.contact.success_display_ms == 0 {
            return Err("Contact success_display_ms must be greater than 0".to_string());
        }
        if self.preferences.path.trim().is_empty() {
            return Err("Preferences path must not be empty".to_string());
        }
        if self.contact.transport == Transport::Smtp && self.email.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }
        Ok(())
    }
}
