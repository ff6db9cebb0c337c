//! Canonical unordered-pair identity.
//!
//! Friendships and conversations are keyed by an unordered pair of user
//! ids. Sorting the pair deterministically and deriving the document id
//! from the sorted pair makes `{a, b}` and `{b, a}` land on the same
//! storage key, so concurrent first-contact writes collapse onto one
//! document instead of racing check-then-create.

use sha2::{Digest, Sha256};

/// Orders a pair of ids deterministically (lexicographic).
#[must_use]
pub fn canonical<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Derives the document id for an unordered pair: the hex sha-256 of the
/// sorted ids, truncated to 32 characters.
#[must_use]
pub fn digest_id(a: &str, b: &str) -> String {
    let (lo, hi) = canonical(a, b);
    let digest = Sha256::digest(format!("{lo}:{hi}").as_bytes());
    hex::encode(digest)[..32].to_string()
}
