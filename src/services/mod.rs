//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and collaborator I/O so route handlers
//! stay focused on protocol translation and auth plumbing. `chat` is pure;
//! the lecture pipeline talks to the compressor, object store and database
//! through the traits defined next to it.

pub mod chat;
pub mod compression;
pub mod lecture;
pub mod session;
pub mod storage;
