//! Domain logic for the tutor backend.
//!
//! Everything in this crate is pure: no database, network, or clock access
//! beyond id generation. The `db`, `llm` and `api` crates build on it.

pub mod admin_key;
pub mod answer;
pub mod chat;
pub mod error;
pub mod lesson_order;
pub mod progress;
pub mod step;
pub mod types;
