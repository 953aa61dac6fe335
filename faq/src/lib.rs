//! Shared bilingual FAQ model for the VEDA chat path.
//!
//! This crate owns the intent table used by both `veda` (the server
//! responder) and `widget` (the client's offline matcher). The table is a
//! single YAML asset embedded at compile time, so both sides always answer
//! the same questions with the same text.

pub mod matcher;
pub mod table;
pub mod text;
pub mod wire;

pub use matcher::{IntentMatch, Matcher, RULE_CONFIDENCE, RuleMatcher};
pub use table::{Intent, IntentTable, TableError};
pub use text::{BilingualText, Lang};
pub use wire::{CHAT_PATH, ChatRequest, ChatResponse, ResponseMeta};
