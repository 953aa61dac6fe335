//! Intent matching.
//!
//! `Matcher` is the seam between the responder and whatever decides which
//! answer fits a message. `RuleMatcher` is the regex implementation over an
//! [`IntentTable`]; a model-backed classifier can implement the same trait.

use crate::table::{Intent, IntentTable};
use crate::text::BilingualText;

/// Confidence reported for a rule hit.
pub const RULE_CONFIDENCE: f32 = 1.0;

/// A matched intent and its answer.
#[derive(Clone, Debug, PartialEq)]
pub struct IntentMatch {
    pub intent: String,
    pub answer: BilingualText,
    pub confidence: f32,
}

/// Finds the answer for free-form user text.
pub trait Matcher: Send + Sync {
    /// Return the answer for `text`, or `None` when nothing fits.
    fn find(&self, text: &str) -> Option<IntentMatch>;
}

/// First-match regex matcher over an intent table.
#[derive(Clone, Copy, Debug)]
pub struct RuleMatcher<'t> {
    table: &'t IntentTable,
}

impl<'t> RuleMatcher<'t> {
    #[must_use]
    pub fn new(table: &'t IntentTable) -> Self {
        Self { table }
    }

    /// The first intent, in declared order, with any pattern occurring in `text`.
    /// Blank input never matches.
    #[must_use]
    pub fn first_match(&self, text: &str) -> Option<&'t Intent> {
        if text.trim().is_empty() {
            return None;
        }
        self.table.intents().iter().find(|intent| intent.is_match(text))
    }
}

impl RuleMatcher<'static> {
    /// Matcher over the bundled table.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(IntentTable::builtin())
    }
}

impl Matcher for RuleMatcher<'_> {
    fn find(&self, text: &str) -> Option<IntentMatch> {
        self.first_match(text).map(|intent| IntentMatch {
            intent: intent.id().to_owned(),
            answer: intent.answer().clone(),
            confidence: RULE_CONFIDENCE,
        })
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
