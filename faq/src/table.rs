//! Intent table loading and validation.
//!
//! DESIGN
//! ======
//! The table is declared in `data/faq.yaml` and compiled into every binary
//! that links this crate. Patterns are compiled once, case-insensitively, when
//! the table is built. After that the table is read-only and can be shared
//! across threads without locking.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::text::BilingualText;

/// YAML source of the bundled FAQ table.
pub const BUILTIN_FAQ_YAML: &str = include_str!("../data/faq.yaml");

static BUILTIN: LazyLock<IntentTable> =
    LazyLock::new(|| IntentTable::from_yaml(BUILTIN_FAQ_YAML).expect("bundled faq.yaml must be a valid intent table"));

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("faq table parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("missing english text for {field}")]
    EmptyText { field: String },
    #[error("intent `{intent}` has no patterns")]
    NoPatterns { intent: String },
    #[error("intent `{intent}` has invalid pattern `{pattern}`: {source}")]
    BadPattern {
        intent: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("duplicate intent id `{0}`")]
    DuplicateIntent(String),
}

// =============================================================================
// TYPES
// =============================================================================

/// One FAQ entry: a set of trigger patterns and the answer they select.
#[derive(Debug, Clone)]
pub struct Intent {
    id: String,
    patterns: Vec<Regex>,
    answer: BilingualText,
}

impl Intent {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn answer(&self) -> &BilingualText {
        &self.answer
    }

    /// Whether any pattern occurs anywhere in `text`.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// Ordered intents plus the fixed texts the chat path needs.
#[derive(Debug, Clone)]
pub struct IntentTable {
    intents: Vec<Intent>,
    fallback: BilingualText,
    suggestions: Vec<BilingualText>,
    greeting: BilingualText,
    apology: BilingualText,
}

impl IntentTable {
    /// The table bundled from `data/faq.yaml`, built on first use.
    #[must_use]
    pub fn builtin() -> &'static IntentTable {
        &BUILTIN
    }

    /// Build a table from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`TableError`] if the YAML is malformed, a pattern does not
    /// compile, an intent has no patterns, ids repeat, or English text is blank.
    pub fn from_yaml(src: &str) -> Result<Self, TableError> {
        let raw: RawTable = serde_yaml::from_str(src)?;

        let mut seen = HashSet::new();
        let mut intents = Vec::with_capacity(raw.intents.len());
        for intent in raw.intents {
            if !seen.insert(intent.id.clone()) {
                return Err(TableError::DuplicateIntent(intent.id));
            }
            intents.push(compile_intent(intent)?);
        }

        Ok(Self {
            intents,
            fallback: raw.fallback.into_text("fallback")?,
            suggestions: raw
                .suggestions
                .into_iter()
                .enumerate()
                .map(|(i, s)| s.into_text(&format!("suggestions[{i}]")))
                .collect::<Result<Vec<_>, _>>()?,
            greeting: raw.greeting.into_text("greeting")?,
            apology: raw.apology.into_text("apology")?,
        })
    }

    #[must_use]
    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    /// Answer used when no intent matches.
    #[must_use]
    pub fn fallback(&self) -> &BilingualText {
        &self.fallback
    }

    /// Quick-reply chips offered with the greeting and the fallback.
    #[must_use]
    pub fn suggestions(&self) -> &[BilingualText] {
        &self.suggestions
    }

    /// First bot message of a new conversation.
    #[must_use]
    pub fn greeting(&self) -> &BilingualText {
        &self.greeting
    }

    /// Reply shown when a remote answer could not be obtained.
    #[must_use]
    pub fn apology(&self) -> &BilingualText {
        &self.apology
    }
}

// =============================================================================
// YAML SHAPE
// =============================================================================

#[derive(Deserialize)]
struct RawTable {
    greeting: RawText,
    fallback: RawText,
    apology: RawText,
    #[serde(default)]
    suggestions: Vec<RawText>,
    #[serde(default)]
    intents: Vec<RawIntent>,
}

#[derive(Deserialize)]
struct RawIntent {
    id: String,
    #[serde(default)]
    patterns: Vec<String>,
    answer: RawText,
}

#[derive(Deserialize)]
struct RawText {
    en: String,
    #[serde(default)]
    hi: Option<String>,
}

impl RawText {
    /// Blank Hindi falls back to the English text.
    fn into_text(self, field: &str) -> Result<BilingualText, TableError> {
        if self.en.trim().is_empty() {
            return Err(TableError::EmptyText { field: field.to_owned() });
        }
        let hi = match self.hi {
            Some(hi) if !hi.trim().is_empty() => hi,
            _ => self.en.clone(),
        };
        Ok(BilingualText { en: self.en, hi })
    }
}

fn compile_intent(raw: RawIntent) -> Result<Intent, TableError> {
    if raw.patterns.is_empty() {
        return Err(TableError::NoPatterns { intent: raw.id });
    }

    let mut patterns = Vec::with_capacity(raw.patterns.len());
    for pattern in &raw.patterns {
        let re = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| TableError::BadPattern {
                intent: raw.id.clone(),
                pattern: pattern.clone(),
                source,
            })?;
        patterns.push(re);
    }

    let answer = raw.answer.into_text(&format!("intent `{}`", raw.id))?;
    Ok(Intent { id: raw.id, patterns, answer })
}

#[cfg(test)]
#[path = "table_test.rs"]
mod tests;
