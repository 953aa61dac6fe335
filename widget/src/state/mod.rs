//! Client-side state.
//!
//! DESIGN
//! ======
//! `conversation` is the message log and status machine a front-end renders;
//! `labels` holds the fixed bilingual UI strings. Neither performs I/O on its
//! own: the conversation calls the adapter it is handed.

pub mod conversation;
pub mod labels;
