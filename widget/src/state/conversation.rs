//! Conversation state for the chat panel.
//!
//! DESIGN
//! ======
//! `Conversation` owns the message log and the status machine
//! `Idle -> Sending -> Idle`. A send is split into [`begin`]
//! (append the user message, enter `Sending`) and [`finish`] (apply the
//! adapter's outcome) so a front-end can render the typing indicator in
//! between; [`submit`] runs both around one adapter call.
//!
//! A failed send appends one apology, sets `last_error` and still ends in
//! `Idle`. The notice stays until the next submit or [`dismiss_error`] and
//! never blocks input. The log is a FIFO capped at `max_messages`; the
//! oldest entries go first.
//!
//! [`begin`]: Conversation::begin
//! [`finish`]: Conversation::finish
//! [`submit`]: Conversation::submit
//! [`dismiss_error`]: Conversation::dismiss_error

use std::collections::VecDeque;

use faq::{BilingualText, IntentTable, Lang};

use super::labels::Label;
use crate::net::adapter::{ChatAdapter, Outcome};

pub const DEFAULT_MAX_MESSAGES: usize = 50;
/// Longest accepted user message, in characters.
pub const MAX_INPUT_CHARS: usize = 300;

/// One entry in the log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatMessage {
    User { text: String },
    Bot { reply: BilingualText, suggestions: Vec<BilingualText> },
}

impl ChatMessage {
    /// Display text in `lang`. User text is shown as typed.
    #[must_use]
    pub fn text(&self, lang: Lang) -> &str {
        match self {
            Self::User { text } => text,
            Self::Bot { reply, .. } => reply.get(lang),
        }
    }

    #[must_use]
    pub fn suggestions(&self) -> &[BilingualText] {
        match self {
            Self::User { .. } => &[],
            Self::Bot { suggestions, .. } => suggestions,
        }
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        matches!(self, Self::User { .. })
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Sending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Bot,
}

/// A log entry rendered in the active language.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranscriptLine<'a> {
    pub speaker: Speaker,
    pub text: &'a str,
    pub chips: Vec<&'a str>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conversation {
    messages: VecDeque<ChatMessage>,
    lang: Lang,
    status: Status,
    last_error: Option<String>,
    max_messages: usize,
    apology: BilingualText,
}

impl Conversation {
    /// Conversation seeded from the built-in FAQ table.
    #[must_use]
    pub fn new(lang: Lang) -> Self {
        Self::with_table(IntentTable::builtin(), lang)
    }

    /// Conversation seeded with `table`'s greeting and suggestion chips.
    #[must_use]
    pub fn with_table(table: &IntentTable, lang: Lang) -> Self {
        let greeting = ChatMessage::Bot { reply: table.greeting().clone(), suggestions: table.suggestions().to_vec() };
        Self {
            messages: VecDeque::from([greeting]),
            lang,
            status: Status::Idle,
            last_error: None,
            max_messages: DEFAULT_MAX_MESSAGES,
            apology: table.apology().clone(),
        }
    }

    /// Cap the log at `max` entries (at least one).
    #[must_use]
    pub fn with_max_messages(mut self, max: usize) -> Self {
        self.max_messages = max.max(1);
        self.evict();
        self
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn messages(&self) -> &VecDeque<ChatMessage> {
        &self.messages
    }

    #[must_use]
    pub fn lang(&self) -> Lang {
        self.lang
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    /// Typing indicator text while a reply is pending.
    #[must_use]
    pub fn typing_label(&self) -> Option<&'static str> {
        (self.status == Status::Sending).then(|| Label::Typing.text(self.lang))
    }

    /// The log in the active language, oldest first.
    #[must_use]
    pub fn transcript(&self) -> Vec<TranscriptLine<'_>> {
        self.messages
            .iter()
            .map(|m| TranscriptLine {
                speaker: if m.is_user() { Speaker::User } else { Speaker::Bot },
                text: m.text(self.lang),
                chips: m.suggestions().iter().map(|s| s.get(self.lang)).collect(),
            })
            .collect()
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Switch the display language. History is not re-fetched.
    pub fn set_lang(&mut self, lang: Lang) {
        self.lang = lang;
    }

    /// Clear the error notice.
    pub fn dismiss_error(&mut self) {
        self.last_error = None;
    }

    /// Start sending `input`. Returns the text to send, or `None` when the
    /// trimmed input is empty or a send is already pending; the state is
    /// untouched in both cases.
    pub fn begin(&mut self, input: &str) -> Option<String> {
        if self.status == Status::Sending {
            return None;
        }
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }
        let text: String = trimmed.chars().take(MAX_INPUT_CHARS).collect();

        self.last_error = None;
        self.push(ChatMessage::User { text: text.clone() });
        self.status = Status::Sending;
        Some(text)
    }

    /// Apply the outcome of the pending send. Returns `false`, changing
    /// nothing, when no send is pending.
    pub fn finish(&mut self, outcome: &Outcome) -> bool {
        if self.status != Status::Sending {
            return false;
        }
        let reply = match outcome {
            Outcome::LocalAnswer { reply } => ChatMessage::Bot { reply: reply.clone(), suggestions: Vec::new() },
            Outcome::RemoteAnswer { reply, suggestions } => {
                ChatMessage::Bot { reply: reply.clone(), suggestions: suggestions.clone() }
            }
            Outcome::Timeout | Outcome::Network(_) | Outcome::NoAnswer => {
                self.last_error = outcome.error_text();
                ChatMessage::Bot { reply: self.apology.clone(), suggestions: Vec::new() }
            }
        };
        self.push(reply);
        self.status = Status::Idle;
        true
    }

    /// Send `input` through `adapter` and apply the result. `None` when the
    /// input was ignored.
    pub async fn submit(&mut self, adapter: &ChatAdapter, input: &str) -> Option<Outcome> {
        let text = self.begin(input)?;
        let outcome = adapter.send(&text, self.lang).await;
        self.finish(&outcome);
        Some(outcome)
    }

    /// Submit chip `chip` of message `message` in the active language.
    pub async fn choose_suggestion(&mut self, adapter: &ChatAdapter, message: usize, chip: usize) -> Option<Outcome> {
        let text = self.messages.get(message)?.suggestions().get(chip)?.get(self.lang).to_owned();
        self.submit(adapter, &text).await
    }

    fn push(&mut self, message: ChatMessage) {
        self.messages.push_back(message);
        self.evict();
    }

    fn evict(&mut self) {
        while self.messages.len() > self.max_messages {
            self.messages.pop_front();
        }
    }
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
