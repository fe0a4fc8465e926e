//! In-memory secret vault.
//!
//! NOT secure: values are kept in plain process memory. Used by tests and by
//! hosts without a platform keychain (CLI tooling, simulators); foreign hosts
//! reach it through `KeychainStore::in_memory`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use sha2::{Digest, Sha256};

use super::error::{VaultError, VaultResult};
use super::traits::SecretVault;
use super::types::VaultItem;

/// [`SecretVault`] backed by a `HashMap`.
///
/// Can be switched into a failing mode where every call returns
/// [`VaultError::Unavailable`], mimicking a locked device.
#[derive(Debug, Default)]
pub struct MemoryVault {
    items: Mutex<HashMap<VaultItem, Vec<u8>>>,
    failing: AtomicBool,
}

impl MemoryVault {
    /// Creates an empty vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail (`true`) or succeed (`false`).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Returns the number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.lock().map_or(0, |items| items.len())
    }

    /// Returns `true` if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> VaultResult<MutexGuard<'_, HashMap<VaultItem, Vec<u8>>>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(VaultError::Unavailable(
                "interaction not allowed".to_string(),
            ));
        }
        self.items
            .lock()
            .map_err(|_| VaultError::Io("mutex poisoned".to_string()))
    }
}

/// Stable reference for an item: SHA-256 over its identity, never its value.
fn reference_for(item: &VaultItem) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(item.class.to_string().as_bytes());
    hasher.update([0]);
    hasher.update(item.service.as_bytes());
    hasher.update([0]);
    hasher.update(item.account.as_bytes());
    hasher.update([0]);
    if let Some(group) = &item.access_group {
        hasher.update(group.as_bytes());
    }
    hasher.finalize().to_vec()
}

impl SecretVault for MemoryVault {
    fn get(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>> {
        Ok(self.lock()?.get(&item).cloned())
    }

    fn set(&self, item: VaultItem, value: Vec<u8>) -> VaultResult<()> {
        self.lock()?.insert(item, value);
        Ok(())
    }

    fn delete(&self, item: VaultItem) -> VaultResult<()> {
        self.lock()?.remove(&item);
        Ok(())
    }

    fn reference(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>> {
        let items = self.lock()?;
        Ok(items.contains_key(&item).then(|| reference_for(&item)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secure_store::types::ItemClass;

    fn item(account: &str) -> VaultItem {
        VaultItem {
            class: ItemClass::GenericPassword,
            service: "svc".to_string(),
            account: account.to_string(),
            access_group: None,
        }
    }

    #[test]
    fn test_set_get_delete() {
        let vault = MemoryVault::new();
        assert!(vault.is_empty());

        vault.set(item("a"), vec![1, 2, 3]).expect("set");
        vault.set(item("a"), vec![4]).expect("overwrite");
        assert_eq!(vault.get(item("a")).expect("get"), Some(vec![4]));
        assert_eq!(vault.len(), 1);

        vault.delete(item("a")).expect("delete");
        vault.delete(item("a")).expect("delete missing");
        assert_eq!(vault.get(item("a")).expect("get"), None);
    }

    #[test]
    fn test_reference_is_stable_per_item() {
        let vault = MemoryVault::new();
        vault.set(item("a"), vec![1]).expect("set");
        vault.set(item("b"), vec![1]).expect("set");

        let first = vault.reference(item("a")).expect("ref");
        vault.set(item("a"), vec![2]).expect("overwrite");
        let second = vault.reference(item("a")).expect("ref");
        assert_eq!(first, second);
        assert_ne!(first, vault.reference(item("b")).expect("ref"));
    }

    #[test]
    fn test_failing_mode() {
        let vault = MemoryVault::new();
        vault.set(item("a"), vec![1]).expect("set");

        vault.set_failing(true);
        assert!(matches!(vault.get(item("a")), Err(VaultError::Unavailable(_))));
        assert!(matches!(vault.set(item("b"), vec![1]), Err(VaultError::Unavailable(_))));

        vault.set_failing(false);
        assert_eq!(vault.get(item("a")).expect("get"), Some(vec![1]));
    }
}
