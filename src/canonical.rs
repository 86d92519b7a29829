//! Canonical cache keys for saved-file queries.
//!
//! Two queries naming the same multiset of (course, school) descriptors must
//! hit the same cache entry regardless of input order or letter case. The key
//! is the hex SHA-256 of a deterministic JSON encoding of the lower-cased,
//! lexicographically sorted descriptors.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::SavedFile;

/// Lower-cased descriptor pair with a fixed serialized field order.
#[derive(Serialize)]
struct KeyEntry {
    course: String,
    school: String,
}

/// Compute the canonical key for a saved-file query.
///
/// The empty query produces a stable key too, though callers short-circuit
/// empty queries before any cache lookup.
pub fn cache_key(saved: &[SavedFile]) -> String {
    let mut entries: Vec<KeyEntry> = saved
        .iter()
        .map(|f| KeyEntry {
            course: f.course.to_lowercase(),
            school: f.school.to_lowercase(),
        })
        .collect();

    entries.sort_by(|a, b| a.course.cmp(&b.course).then_with(|| a.school.cmp(&b.school)));

    let encoded =
        serde_json::to_string(&entries).expect("plain string fields always serialize");

    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    hex::encode(hasher.finalize())
}
