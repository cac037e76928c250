use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

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
    Serialize,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn parse(value: &str) -> folio_shared::Result<Self> {
        Self::from_str(value).map_err(|_| folio_shared::Error::invalid_value("theme", value))
    }
}

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
    Serialize,
    AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ColorScheme {
    #[default]
    DarkBlue,
    Grenadier,
    ForestGreen,
    Voodoo,
    Waterloo,
    Wattle,
}

impl ColorScheme {
    pub fn parse(value: &str) -> folio_shared::Result<Self> {
        Self::from_str(value)
            .map_err(|_| folio_shared::Error::invalid_value("color scheme", value))
    }

    /// Accent shade (600) of the palette.
    pub fn accent(&self) -> &'static str {
        match self {
            ColorScheme::DarkBlue => "#2b28ff",
            ColorScheme::Grenadier => "#d53810",
            ColorScheme::ForestGreen => "#15a808",
            ColorScheme::Voodoo => "#a653a3",
            ColorScheme::Waterloo => "#787aa1",
            ColorScheme::Wattle => "#b19c1d",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preference {
    pub theme: Theme,
    pub color_scheme: ColorScheme,
    pub is_transitioning: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreferenceEvent {
    ThemeChanged(Theme),
    ColorSchemeChanged(ColorScheme),
    TransitionStarted,
    TransitionEnded,
}
