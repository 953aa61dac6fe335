//! Language tags and two-language text.

use serde::{Deserialize, Serialize};

/// Display language for replies and labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Hi,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Hi];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Parse a language tag such as `"hi"` or `" EN "`. Unknown tags yield `None`.
    #[must_use]
    pub fn from_tag(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "hi" => Some(Self::Hi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text carried in both English and Hindi.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualText {
    pub en: String,
    pub hi: String,
}

impl BilingualText {
    #[must_use]
    pub fn new(en: impl Into<String>, hi: impl Into<String>) -> Self {
        Self { en: en.into(), hi: hi.into() }
    }

    /// Text in `lang`, falling back to English when the Hindi field is blank.
    #[must_use]
    pub fn get(&self, lang: Lang) -> &str {
        match lang {
            Lang::Hi if !self.hi.trim().is_empty() => &self.hi,
            _ => &self.en,
        }
    }

    /// Both languages carry non-blank text.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.en.trim().is_empty() && !self.hi.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "text_test.rs"]
mod tests;
