//! Shared-secret comparison for the admin surface.
//!
//! Both sides are hashed with SHA-256 before comparison so the check does
//! not short-circuit on the first differing byte of the secret itself.

use sha2::{Digest, Sha256};

/// Header carrying the admin secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

/// Returns `true` when `provided` matches `expected`.
///
/// An empty expected key never matches, so a blank configuration cannot
/// open the admin routes.
pub fn verify_admin_key(provided: &str, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let a = Sha256::digest(provided.as_bytes());
    let b = Sha256::digest(expected.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_key_is_accepted() {
        assert!(verify_admin_key("s3cret", "s3cret"));
    }

    #[test]
    fn different_key_is_rejected() {
        assert!(!verify_admin_key("s3cret", "s3cret "));
        assert!(!verify_admin_key("", "s3cret"));
    }

    #[test]
    fn empty_expected_key_rejects_everything() {
        assert!(!verify_admin_key("", ""));
        assert!(!verify_admin_key("anything", ""));
    }
}
