use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString,
    Display,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ServiceType {
    WebDevelopment,
    MobileDevelopment,
    Consulting,
    Maintenance,
}

impl ServiceType {
    /// Parses a form value, rejecting anything outside the offered services.
    pub fn parse(value: &str) -> folio_shared::Result<Self> {
        Self::from_str(value.trim())
            .map_err(|_| folio_shared::Error::invalid_value("service type", value))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::WebDevelopment => "Web development",
            ServiceType::MobileDevelopment => "Mobile development",
            ServiceType::Consulting => "Consulting",
            ServiceType::Maintenance => "Maintenance",
        }
    }
}

/// Lifecycle of a contact submission.
#[derive(Display, Default, Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum Status {
    #[default]
    Idle,
    Submitting,
    Success,
    Failed,
}
