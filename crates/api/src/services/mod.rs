//! Domain services sitting between handlers and the store/gateway.
//!
//! - [`characters::CharacterService`] -- character reads and admin CRUD.
//! - [`chat::ChatService`] -- prompt composition and the bounded gateway call.
//! - [`lessons::LessonAdminService`] -- lesson CRUD under the position invariant.
//! - [`locks::LessonLocks`] -- per-character lock table used by the above.
//! - [`progress::ProgressService`] -- learner cursors through the lesson list.

pub mod characters;
pub mod chat;
pub mod lessons;
pub mod locks;
pub mod progress;
