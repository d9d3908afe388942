//! Deterministic entity-id derivation.
//!
//! Component state on the chain is keyed by an entity id derived from the
//! owning account's address. The derivation must be stable across sessions
//! and insensitive to cosmetic differences in how the address is written
//! (`0x` prefix, letter case), since the same account can be restored from
//! several sources.

use std::fmt;

use sha2::{Digest, Sha256};

/// Key under which an account's component state is queried.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntityId(String);

impl EntityId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the entity id for an account address.
///
/// The address is canonicalized (trimmed, `0x` stripped, lowercased) and
/// digested, so every spelling of the same address maps to the same id.
pub fn entity_id_from_address(address: &str) -> EntityId {
    let trimmed = address.trim();
    let canonical = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .to_ascii_lowercase();

    let digest = Sha256::digest(canonical.as_bytes());
    let mut id = String::with_capacity(2 + digest.len() * 2);
    id.push_str("0x");
    use fmt::Write;
    for byte in digest {
        write!(id, "{byte:02x}").expect("writing to a String cannot fail");
    }

    EntityId(id)
}
