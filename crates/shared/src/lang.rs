use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Wording used for outgoing mails.
#[derive(
    EnumString,
    Display,
    VariantArray,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    Es,
    #[default]
    En,
}
