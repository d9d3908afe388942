//! Burner account management.
//!
//! Burners are disposable locally-held signing keys used to submit
//! transactions without repeated wallet prompts. The manager owns an ordered
//! list plus the active selection, and can round-trip the whole set through
//! a clipboard-shaped JSON payload so burners survive a page/app reload.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ChainError;

/// A disposable locally-managed signing key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BurnerAccount {
    /// Hex account address, `0x`-prefixed.
    pub address: String,
    /// Hex signing key. Never sent over the read interface.
    pub secret: String,
}

/// Ordered set of burner accounts with an active selection.
#[derive(Debug, Default)]
pub struct BurnerManager {
    accounts: Vec<BurnerAccount>,
    selected: Option<usize>,
}

impl BurnerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of deployed burners.
    pub fn count(&self) -> usize {
        self.accounts.len()
    }

    /// All burners, in deployment order.
    pub fn list(&self) -> &[BurnerAccount] {
        &self.accounts
    }

    /// The active account, if any.
    pub fn selected(&self) -> Option<&BurnerAccount> {
        self.selected.map(|i| &self.accounts[i])
    }

    /// Generates a fresh burner, appends it and selects it.
    pub fn create(&mut self) -> &BurnerAccount {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);

        let secret = hex_encode(&key);
        let address = format!("0x{}", hex_encode(&Sha256::digest(&key)));

        self.accounts.push(BurnerAccount {
            address,
            secret: format!("0x{secret}"),
        });
        self.selected = Some(self.accounts.len() - 1);
        self.selected().expect("just pushed")
    }

    /// Selects the burner with the given address.
    pub fn select(&mut self, address: &str) -> Result<(), ChainError> {
        match self.accounts.iter().position(|a| a.address == address) {
            Some(index) => {
                self.selected = Some(index);
                Ok(())
            }
            None => Err(ChainError::UnknownAccount(address.to_string())),
        }
    }

    /// Advances the selection to the next burner, wrapping around.
    ///
    /// Returns the newly active account, or `None` when the set is empty.
    pub fn next(&mut self) -> Option<&BurnerAccount> {
        if self.accounts.is_empty() {
            return None;
        }
        self.selected = Some(match self.selected {
            Some(index) => (index + 1) % self.accounts.len(),
            None => 0,
        });
        self.selected()
    }

    /// Drops every burner and the selection.
    pub fn clear(&mut self) {
        self.accounts.clear();
        self.selected = None;
    }

    /// Restores the burner set from a clipboard payload, replacing the
    /// current set and selecting the first entry.
    ///
    /// Returns the number of accounts restored. Malformed or empty payloads
    /// are rejected without touching the current set.
    pub fn apply_payload(&mut self, payload: &str) -> Result<usize, ChainError> {
        let restored: Vec<BurnerAccount> = serde_json::from_str(payload)
            .map_err(|err| ChainError::Payload(err.to_string()))?;

        if restored.is_empty() {
            return Err(ChainError::Payload("payload contains no accounts".into()));
        }
        if let Some(bad) = restored.iter().find(|a| a.address.is_empty()) {
            return Err(ChainError::Payload(format!(
                "account with empty address (secret {}…)",
                &bad.secret.chars().take(6).collect::<String>()
            )));
        }

        let count = restored.len();
        self.accounts = restored;
        self.selected = Some(0);
        Ok(count)
    }

    /// Serializes the burner set into the clipboard payload format.
    pub fn export_payload(&self) -> Result<String, ChainError> {
        serde_json::to_string(&self.accounts).map_err(|err| ChainError::Payload(err.to_string()))
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        write!(out, "{byte:02x}").expect("writing to a String cannot fail");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_appends_and_selects() {
        let mut burners = BurnerManager::new();
        assert_eq!(burners.count(), 0);
        assert!(burners.selected().is_none());

        let first = burners.create().address.clone();
        let second = burners.create().address.clone();

        assert_eq!(burners.count(), 2);
        assert_ne!(first, second);
        assert_eq!(burners.selected().unwrap().address, second);
        assert!(first.starts_with("0x"));
    }

    #[test]
    fn select_by_address() {
        let mut burners = BurnerManager::new();
        let first = burners.create().address.clone();
        burners.create();

        burners.select(&first).unwrap();
        assert_eq!(burners.selected().unwrap().address, first);

        let err = burners.select("0xnotdeployed").unwrap_err();
        assert!(matches!(err, ChainError::UnknownAccount(_)));
        // Failed select leaves the previous selection alone.
        assert_eq!(burners.selected().unwrap().address, first);
    }

    #[test]
    fn next_cycles_through_the_set() {
        let mut burners = BurnerManager::new();
        assert!(burners.next().is_none());

        let a = burners.create().address.clone();
        let b = burners.create().address.clone();

        assert_eq!(burners.next().unwrap().address, a);
        assert_eq!(burners.next().unwrap().address, b);
        assert_eq!(burners.next().unwrap().address, a);
    }

    #[test]
    fn payload_roundtrips() {
        let mut burners = BurnerManager::new();
        burners.create();
        burners.create();
        let exported = burners.export_payload().unwrap();

        let mut restored = BurnerManager::new();
        let count = restored.apply_payload(&exported).unwrap();

        assert_eq!(count, 2);
        assert_eq!(restored.list(), burners.list());
        assert_eq!(restored.selected().unwrap(), &burners.list()[0]);
    }

    #[test]
    fn malformed_payloads_are_rejected_without_side_effects() {
        let mut burners = BurnerManager::new();
        let existing = burners.create().address.clone();

        for payload in ["not json", "{}", "[]", r#"[{"address":"","secret":"0xff"}]"#] {
            assert!(burners.apply_payload(payload).is_err(), "accepted {payload:?}");
            assert_eq!(burners.count(), 1);
            assert_eq!(burners.selected().unwrap().address, existing);
        }
    }

    #[test]
    fn clear_empties_and_deselects() {
        let mut burners = BurnerManager::new();
        burners.create();
        burners.clear();

        assert_eq!(burners.count(), 0);
        assert!(burners.selected().is_none());
        assert!(burners.list().is_empty());
    }
}
