pub mod admin;
pub mod character;
pub mod chat;
pub mod lesson;
pub mod progress;
