//! Supported locales.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Language used for stopwords, stemming and reply text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    #[serde(alias = "en-us", alias = "english")]
    En,
    #[serde(alias = "pt-br", alias = "portuguese")]
    Pt,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pt => "pt",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0}")]
pub struct LocaleError(pub String);

impl FromStr for Locale {
    type Err = LocaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Self::En),
            "pt" | "pt-br" | "portuguese" => Ok(Self::Pt),
            other => Err(LocaleError(other.to_string())),
        }
    }
}
