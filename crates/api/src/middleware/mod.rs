//! Request guards.
//!
//! - [`admin::RequireAdminKey`] -- Requires the shared admin key.

pub mod admin;
