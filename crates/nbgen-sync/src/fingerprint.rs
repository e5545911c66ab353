//! Source content fingerprinting.
//!
//! The staleness check is an explicit stored hash, not a timestamp
//! comparison: timestamps are unreliable across checkouts and clones,
//! while a digest of the normalized text makes "unchanged" deterministic.

use sha2::{Digest, Sha256};

/// Compute the fingerprint of source text.
///
/// The text is normalized before hashing (CRLF line endings folded to LF,
/// trailing whitespace stripped) so byte-level noise that cannot affect
/// the generated cells does not force a regeneration.
#[must_use]
pub fn fingerprint(source: &str) -> String {
    let normalized = normalize(source);
    hex::encode(Sha256::digest(normalized.as_bytes()))
}

/// Normalize source text for hashing.
fn normalize(source: &str) -> String {
    let mut normalized = source.replace("\r\n", "\n");
    normalized.truncate(normalized.trim_end().len());
    normalized
}
