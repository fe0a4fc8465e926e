//! Keychain adapter translating credential operations into vault items.

use std::fmt;
use std::sync::Arc;

use zeroize::Zeroizing;

use super::error::{VaultError, VaultResult};
use super::public_key::PublicKey;
use super::traits::SecretVault;
use super::types::{ItemClass, KeychainScope, VaultItem};

/// Account of the slot holding the current (authentication) username.
const USERNAME_ACCOUNT: &str = "Username";

/// Account of the slot holding the publicly displayed username.
const PUBLIC_USERNAME_ACCOUNT: &str = "PublicUsername";

/// Suffix of the service the username slots live under, keeping them apart
/// from per-user passwords.
const SLOT_SERVICE_SUFFIX: &str = ".slots";

/// Stateless adapter over a [`SecretVault`].
///
/// Every call goes straight to the vault; nothing is cached here. The service
/// and access group are resolved once from the [`KeychainScope`] at
/// construction and never change afterwards.
///
/// The username slots are stored under `<service>.slots`, so no username can
/// address them through the password or token operations.
pub struct Keychain {
    vault: Arc<dyn SecretVault>,
    service: String,
    slot_service: String,
    scope: KeychainScope,
    access_group: Option<String>,
}

impl fmt::Debug for Keychain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keychain")
            .field("service", &self.service)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl Keychain {
    /// Creates a keychain private to the app.
    pub fn new(vault: Arc<dyn SecretVault>, service: impl Into<String>) -> Self {
        Self::with_scope(vault, service, KeychainScope::Private)
    }

    /// Creates a keychain shared with the given app group.
    pub fn with_group(
        vault: Arc<dyn SecretVault>,
        service: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self::with_scope(
            vault,
            service,
            KeychainScope::Group {
                group: group.into(),
            },
        )
    }

    /// Creates a keychain shared across the developer team boundary.
    pub fn with_team_and_group(
        vault: Arc<dyn SecretVault>,
        service: impl Into<String>,
        team: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self::with_scope(
            vault,
            service,
            KeychainScope::TeamGroup {
                team: team.into(),
                group: group.into(),
            },
        )
    }

    /// Creates a keychain with an explicit scope.
    pub fn with_scope(
        vault: Arc<dyn SecretVault>,
        service: impl Into<String>,
        scope: KeychainScope,
    ) -> Self {
        let access_group = scope.access_group();
        let service = service.into();
        Self {
            vault,
            slot_service: format!("{service}{SLOT_SERVICE_SUFFIX}"),
            service,
            scope,
            access_group,
        }
    }

    /// Returns the service items are stored under.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Returns the sharing scope.
    #[must_use]
    pub const fn scope(&self) -> &KeychainScope {
        &self.scope
    }

    fn item(&self, class: ItemClass, account: &str) -> VaultItem {
        VaultItem {
            class,
            service: self.service.clone(),
            account: account.to_string(),
            access_group: self.access_group.clone(),
        }
    }

    fn credential(&self, account: &str) -> VaultItem {
        self.item(ItemClass::GenericPassword, account)
    }

    fn slot(&self, account: &str) -> VaultItem {
        VaultItem {
            class: ItemClass::GenericPassword,
            service: self.slot_service.clone(),
            account: account.to_string(),
            access_group: self.access_group.clone(),
        }
    }

    fn read_string(&self, item: VaultItem) -> VaultResult<Option<String>> {
        let Some(bytes) = self.vault.get(item)? else {
            return Ok(None);
        };
        let bytes = Zeroizing::new(bytes);
        std::str::from_utf8(&bytes)
            .map(|value| Some(value.to_string()))
            .map_err(|err| VaultError::Encoding(format!("stored value is not UTF-8: {err}")))
    }

    fn write_string(&self, item: VaultItem, value: &str) -> VaultResult<()> {
        self.vault.set(item, value.as_bytes().to_vec())
    }

    // Public keys

    /// Stores key material under `identifier` and returns the materialized key.
    ///
    /// The material is validated before anything is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the material is not a valid key or the vault rejects
    /// the write.
    pub fn add_public_key(&self, identifier: &str, data: &[u8]) -> VaultResult<PublicKey> {
        let key = PublicKey::from_bytes(data)?;
        self.vault
            .set(self.item(ItemClass::PublicKey, identifier), key.der())?;
        Ok(key)
    }

    /// Looks up and materializes the key stored under `identifier`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried or the stored material
    /// is not a valid key.
    pub fn public_key(&self, identifier: &str) -> VaultResult<Option<PublicKey>> {
        self.vault
            .get(self.item(ItemClass::PublicKey, identifier))?
            .map(|data| PublicKey::from_bytes(&data))
            .transpose()
    }

    /// Removes the key stored under `identifier`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the delete.
    pub fn remove_public_key(&self, identifier: &str) -> VaultResult<()> {
        self.vault
            .delete(self.item(ItemClass::PublicKey, identifier))
    }

    // Passwords

    /// Returns the password stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried or the value is not UTF-8.
    pub fn password(&self, username: &str) -> VaultResult<Option<String>> {
        self.read_string(self.credential(username))
    }

    /// Stores the password for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the write.
    pub fn set_password(&self, username: &str, password: &str) -> VaultResult<()> {
        self.write_string(self.credential(username), password)
    }

    /// Removes the password stored for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the delete.
    pub fn remove_password(&self, username: &str) -> VaultResult<()> {
        self.vault.delete(self.credential(username))
    }

    /// Returns a persistent reference to the password of `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried.
    pub fn password_reference(&self, username: &str) -> VaultResult<Option<Vec<u8>>> {
        self.vault.reference(self.credential(username))
    }

    // Tokens

    /// Returns the token stored under the opaque `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried or the value is not UTF-8.
    pub fn token(&self, key: &str) -> VaultResult<Option<String>> {
        self.read_string(self.credential(key))
    }

    /// Stores `token` under the opaque `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the write.
    pub fn set_token(&self, key: &str, token: &str) -> VaultResult<()> {
        self.write_string(self.credential(key), token)
    }

    /// Removes the token stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the delete.
    pub fn remove_token(&self, key: &str) -> VaultResult<()> {
        self.vault.delete(self.credential(key))
    }

    /// Returns a persistent reference to the token stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried.
    pub fn token_reference(&self, key: &str) -> VaultResult<Option<Vec<u8>>> {
        self.vault.reference(self.credential(key))
    }

    // Username slots

    /// Returns the current username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried or the value is not UTF-8.
    pub fn username(&self) -> VaultResult<Option<String>> {
        self.read_string(self.slot(USERNAME_ACCOUNT))
    }

    /// Stores the current username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the write.
    pub fn set_username(&self, username: &str) -> VaultResult<()> {
        self.write_string(self.slot(USERNAME_ACCOUNT), username)
    }

    /// Removes the current username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the delete.
    pub fn remove_username(&self) -> VaultResult<()> {
        self.vault.delete(self.slot(USERNAME_ACCOUNT))
    }

    /// Returns the publicly displayed username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault cannot be queried or the value is not UTF-8.
    pub fn public_username(&self) -> VaultResult<Option<String>> {
        self.read_string(self.slot(PUBLIC_USERNAME_ACCOUNT))
    }

    /// Stores the publicly displayed username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the write.
    pub fn set_public_username(&self, username: &str) -> VaultResult<()> {
        self.write_string(self.slot(PUBLIC_USERNAME_ACCOUNT), username)
    }

    /// Removes the publicly displayed username.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault rejects the delete.
    pub fn remove_public_username(&self) -> VaultResult<()> {
        self.vault.delete(self.slot(PUBLIC_USERNAME_ACCOUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::secure_store::memory::MemoryVault;

    const DER: &[u8] = &[0x30, 0x03, 0x02, 0x01, 0x07];

    fn keychain(vault: &Arc<MemoryVault>, scope: KeychainScope) -> Keychain {
        Keychain::with_scope(vault.clone(), "com.example.vpn", scope)
    }

    #[test]
    fn test_items_carry_service_and_access_group() {
        let vault = Arc::new(MemoryVault::new());
        let shared = keychain(
            &vault,
            KeychainScope::TeamGroup {
                team: "TEAM".to_string(),
                group: "com.example.vpn".to_string(),
            },
        );
        shared.set_password("alice", "abc123").expect("set");

        let item = VaultItem {
            class: ItemClass::GenericPassword,
            service: "com.example.vpn".to_string(),
            account: "alice".to_string(),
            access_group: Some("TEAM.com.example.vpn".to_string()),
        };
        assert_eq!(vault.get(item).expect("get"), Some(b"abc123".to_vec()));

        // same vault, different scope: not visible
        let private = keychain(&vault, KeychainScope::Private);
        assert_eq!(private.password("alice").expect("get"), None);
    }

    #[test]
    fn test_public_key_lives_in_its_own_class() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);

        keychain.add_public_key("Key", DER).expect("add");
        assert_eq!(keychain.password("Key").expect("get"), None);
        assert_eq!(keychain.public_key("Key").expect("get").map(|k| k.der()), Some(DER.to_vec()));

        keychain.remove_public_key("Key").expect("remove");
        keychain.remove_public_key("Key").expect("remove twice");
        assert!(keychain.public_key("Key").expect("get").is_none());
    }

    #[test]
    fn test_invalid_key_is_not_written() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);

        assert!(matches!(
            keychain.add_public_key("Key", b"garbage"),
            Err(VaultError::Encoding(_))
        ));
        assert!(vault.is_empty());
    }

    #[test]
    fn test_username_slots_are_fixed_accounts() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);

        keychain.set_username("alice").expect("set");
        keychain.set_public_username("p1234567").expect("set");

        let slot = |account: &str| VaultItem {
            class: ItemClass::GenericPassword,
            service: "com.example.vpn.slots".to_string(),
            account: account.to_string(),
            access_group: None,
        };
        assert_eq!(vault.get(slot("Username")).expect("get"), Some(b"alice".to_vec()));
        assert_eq!(
            vault.get(slot("PublicUsername")).expect("get"),
            Some(b"p1234567".to_vec())
        );

        keychain.remove_username().expect("remove");
        assert_eq!(keychain.username().expect("get"), None);
        assert_eq!(keychain.public_username().expect("get").as_deref(), Some("p1234567"));
    }

    #[test]
    fn test_slots_are_apart_from_passwords_of_same_name() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);

        keychain.set_username("alice").expect("set");
        keychain.set_public_username("p1234567").expect("set");
        keychain.set_password("Username", "hunter2").expect("set");
        keychain.set_token("PublicUsername", "token").expect("set");

        assert_eq!(keychain.username().expect("get").as_deref(), Some("alice"));
        assert_eq!(keychain.public_username().expect("get").as_deref(), Some("p1234567"));

        keychain.remove_password("Username").expect("remove");
        keychain.remove_token("PublicUsername").expect("remove");
        assert_eq!(keychain.username().expect("get").as_deref(), Some("alice"));
        assert_eq!(keychain.public_username().expect("get").as_deref(), Some("p1234567"));
        assert_eq!(keychain.password("Username").expect("get"), None);
    }

    #[test]
    fn test_non_utf8_value_is_an_encoding_error() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);
        vault
            .set(keychain.item(ItemClass::GenericPassword, "alice"), vec![0xff, 0xfe])
            .expect("set");

        assert!(matches!(keychain.password("alice"), Err(VaultError::Encoding(_))));
    }

    #[test]
    fn test_references_only_for_present_items() {
        let vault = Arc::new(MemoryVault::new());
        let keychain = keychain(&vault, KeychainScope::Private);

        assert_eq!(keychain.password_reference("alice").expect("ref"), None);
        keychain.set_password("alice", "abc123").expect("set");
        let reference = keychain.password_reference("alice").expect("ref").expect("present");
        assert!(!reference.is_empty());
        assert_ne!(reference, b"abc123".to_vec());
    }
}
