//! Common test utilities shared across integration tests.

#![allow(missing_docs)]
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use vpnkit_core::secure_store::{
    KeychainStore, MemoryVault, SecretVault, VaultError, VaultItem, VaultResult,
};

pub const SERVICE: &str = "com.example.vpn";

/// Vault operation as observed by [`RecordingVault`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Get(String),
    Set(String),
    Delete(String),
    Reference(String),
}

impl Op {
    pub fn account(&self) -> &str {
        match self {
            Self::Get(account)
            | Self::Set(account)
            | Self::Delete(account)
            | Self::Reference(account) => account,
        }
    }
}

/// Wraps a [`MemoryVault`], records every call and fails on selected accounts.
#[derive(Default)]
pub struct RecordingVault {
    inner: MemoryVault,
    ops: Mutex<Vec<Op>>,
    failing_accounts: Mutex<HashSet<String>>,
}

impl RecordingVault {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code, reason = "used in some tests")]
    pub fn fail_account(&self, account: &str) {
        self.failing_accounts
            .lock()
            .unwrap()
            .insert(account.to_string());
    }

    #[allow(dead_code, reason = "used in some tests")]
    pub fn take_ops(&self) -> Vec<Op> {
        std::mem::take(&mut *self.ops.lock().unwrap())
    }

    fn record(&self, op: Op, item: &VaultItem) -> VaultResult<()> {
        self.ops.lock().unwrap().push(op);
        if self.failing_accounts.lock().unwrap().contains(&item.account) {
            return Err(VaultError::Unavailable(format!(
                "refusing {}",
                item.account
            )));
        }
        Ok(())
    }
}

impl SecretVault for RecordingVault {
    fn get(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>> {
        self.record(Op::Get(item.account.clone()), &item)?;
        self.inner.get(item)
    }

    fn set(&self, item: VaultItem, value: Vec<u8>) -> VaultResult<()> {
        self.record(Op::Set(item.account.clone()), &item)?;
        self.inner.set(item, value)
    }

    fn delete(&self, item: VaultItem) -> VaultResult<()> {
        self.record(Op::Delete(item.account.clone()), &item)?;
        self.inner.delete(item)
    }

    fn reference(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>> {
        self.record(Op::Reference(item.account.clone()), &item)?;
        self.inner.reference(item)
    }
}

#[allow(dead_code, reason = "used in some tests")]
pub fn create_test_store() -> (Arc<RecordingVault>, KeychainStore) {
    let vault = Arc::new(RecordingVault::new());
    let store = KeychainStore::new(vault.clone(), SERVICE.to_string());
    (vault, store)
}

/// DER `SEQUENCE { INTEGER n }`, distinct per `n`.
#[allow(dead_code, reason = "used in some tests")]
pub fn der_key(n: u8) -> Vec<u8> {
    vec![0x30, 0x03, 0x02, 0x01, n]
}
