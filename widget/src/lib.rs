//! # widget
//!
//! Client side of the VEDA chat assistant, independent of any UI toolkit.
//!
//! `net` holds the remote client adapter: it answers from the embedded FAQ
//! table when it can and otherwise makes one bounded call to the server.
//! `state` holds the conversation model a front-end renders and the
//! bilingual UI labels.

pub mod net;
pub mod state;

pub use net::adapter::{ChatAdapter, DEFAULT_TIMEOUT, Outcome};
pub use net::transport::{ChatTransport, HttpTransport, TransportError};
pub use state::conversation::{
    ChatMessage, Conversation, DEFAULT_MAX_MESSAGES, MAX_INPUT_CHARS, Speaker, Status, TranscriptLine,
};
pub use state::labels::Label;
