//! Credential store facade over the keychain adapter.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::error::VaultResult;
use super::keychain::Keychain;
use super::memory::MemoryVault;
use super::public_key::PublicKey;
use super::traits::SecretVault;
use super::types::KeychainScope;
use crate::config::{ClientConfig, ConfigError};

/// Identifier of the single public key entry.
pub const PUBLIC_KEY_ENTRY: &str = "PIAPublicKey";

const TOKEN_KEY_PREFIX: &str = "auth-token: ";

/// Derives the lookup key of the auth token stored for `username`.
///
/// The format is persisted on devices and must not change.
#[uniffi::export]
#[must_use]
pub fn token_key(username: &str) -> String {
    format!("{TOKEN_KEY_PREFIX}{username}")
}

/// Mutation applied to a stored secret.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum SecretUpdate {
    /// Store the value, replacing any previous one.
    Set {
        /// New value.
        value: String,
    },
    /// Remove the stored value.
    Delete,
}

impl From<Option<String>> for SecretUpdate {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Delete, |value| Self::Set { value })
    }
}

/// Secrets facade used by the rest of the app.
///
/// Failures never surface: a read that fails at the vault reports absence, a
/// write that fails is dropped. Both are logged at `warn`. Callers cannot tell
/// "never set" apart from "write failed".
///
/// The last public key seen is cached. [`KeychainStore::public_key_entry`]
/// always goes to the vault and refreshes the cache;
/// [`KeychainStore::cached_public_key`] only reads the cache.
#[derive(Debug, uniffi::Object)]
pub struct KeychainStore {
    backend: Keychain,
    public_key: Mutex<Option<Arc<PublicKey>>>,
}

impl KeychainStore {
    /// Creates a store over an existing keychain adapter.
    #[must_use]
    pub const fn from_keychain(backend: Keychain) -> Self {
        Self {
            backend,
            public_key: Mutex::new(None),
        }
    }

    /// Returns the underlying keychain adapter.
    #[must_use]
    pub const fn keychain(&self) -> &Keychain {
        &self.backend
    }

    fn cache(&self) -> MutexGuard<'_, Option<Arc<PublicKey>>> {
        self.public_key
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn apply(
        &self,
        what: &str,
        update: SecretUpdate,
        set: impl FnOnce(&Keychain, &str) -> VaultResult<()>,
        remove: impl FnOnce(&Keychain) -> VaultResult<()>,
    ) {
        let result = match update {
            SecretUpdate::Set { value } => set(&self.backend, &value),
            SecretUpdate::Delete => remove(&self.backend),
        };
        ignore_failure(what, result);
    }
}

fn absent_on_failure<T>(what: &str, result: VaultResult<Option<T>>) -> Option<T> {
    result.unwrap_or_else(|err| {
        log::warn!("Failed to read {what} from keychain: {err}");
        None
    })
}

fn ignore_failure(what: &str, result: VaultResult<()>) {
    if let Err(err) = result {
        log::warn!("Failed to update {what} in keychain: {err}");
    }
}

#[uniffi::export]
impl KeychainStore {
    /// Creates a store whose items are private to the app.
    #[uniffi::constructor]
    pub fn new(vault: Arc<dyn SecretVault>, service: String) -> Self {
        Self::from_keychain(Keychain::new(vault, service))
    }

    /// Creates a store shared with an app group.
    #[uniffi::constructor]
    pub fn with_group(vault: Arc<dyn SecretVault>, service: String, group: String) -> Self {
        Self::from_keychain(Keychain::with_group(vault, service, group))
    }

    /// Creates a store shared across a developer team.
    #[uniffi::constructor]
    pub fn with_team_and_group(
        vault: Arc<dyn SecretVault>,
        service: String,
        team: String,
        group: String,
    ) -> Self {
        Self::from_keychain(Keychain::with_team_and_group(vault, service, team, group))
    }

    /// Creates a store with an explicit scope.
    #[uniffi::constructor]
    pub fn with_scope(
        vault: Arc<dyn SecretVault>,
        service: String,
        scope: KeychainScope,
    ) -> Self {
        Self::from_keychain(Keychain::with_scope(vault, service, scope))
    }

    /// Creates an app-private store over a fresh [`MemoryVault`].
    ///
    /// For hosts without a platform keychain. Nothing survives the process.
    #[uniffi::constructor]
    pub fn in_memory(service: String) -> Self {
        log::warn!("Opening in-memory keychain store for {service}, secrets are not persisted");
        Self::new(Arc::new(MemoryVault::new()), service)
    }

    /// Creates a store from client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not describe a valid scope.
    #[uniffi::constructor]
    #[allow(clippy::needless_pass_by_value)]
    pub fn from_config(
        vault: Arc<dyn SecretVault>,
        config: ClientConfig,
    ) -> Result<Self, ConfigError> {
        let scope = config.scope()?;
        log::debug!(
            "Opening keychain store for service {} ({scope:?})",
            config.service
        );
        Ok(Self::with_scope(vault, config.service, scope))
    }

    // Public key

    /// Fetches the stored public key and refreshes the cache with the result.
    #[must_use]
    pub fn public_key_entry(&self) -> Option<Arc<PublicKey>> {
        let key = absent_on_failure(
            "public key",
            self.backend.public_key(PUBLIC_KEY_ENTRY),
        )
        .map(Arc::new);
        *self.cache() = key.clone();
        key
    }

    /// Replaces the stored public key.
    ///
    /// The old entry is always removed first, so a failed add leaves no key
    /// behind, not the previous one.
    #[allow(clippy::needless_pass_by_value)]
    pub fn set_public_key(&self, data: Vec<u8>) -> Option<Arc<PublicKey>> {
        ignore_failure(
            "public key",
            self.backend.remove_public_key(PUBLIC_KEY_ENTRY),
        );
        let key = match self.backend.add_public_key(PUBLIC_KEY_ENTRY, &data) {
            Ok(key) => Some(Arc::new(key)),
            Err(err) => {
                log::warn!("Failed to store public key in keychain: {err}");
                None
            }
        };
        *self.cache() = key.clone();
        key
    }

    /// Returns the key cached by the last fetch or store, without touching the
    /// keychain.
    #[must_use]
    pub fn cached_public_key(&self) -> Option<Arc<PublicKey>> {
        self.cache().clone()
    }

    /// Drops the cached public key.
    pub fn invalidate_public_key_cache(&self) {
        self.cache().take();
    }

    // Password

    /// Returns the password of `username`.
    #[must_use]
    pub fn password(&self, username: &str) -> Option<String> {
        absent_on_failure("password", self.backend.password(username))
    }

    /// Sets or deletes the password of `username`.
    pub fn set_password(&self, update: SecretUpdate, username: &str) {
        self.apply(
            "password",
            update,
            |backend, value| backend.set_password(username, value),
            |backend| backend.remove_password(username),
        );
    }

    /// Returns a persistent reference to the password of `username`.
    #[must_use]
    pub fn password_reference(&self, username: &str) -> Option<Vec<u8>> {
        absent_on_failure(
            "password reference",
            self.backend.password_reference(username),
        )
    }

    // Usernames

    /// Returns the current username.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        absent_on_failure("username", self.backend.username())
    }

    /// Sets or deletes the current username.
    pub fn set_username(&self, update: SecretUpdate) {
        self.apply(
            "username",
            update,
            |backend, value| backend.set_username(value),
            Keychain::remove_username,
        );
    }

    /// Returns the publicly displayed username.
    #[must_use]
    pub fn public_username(&self) -> Option<String> {
        absent_on_failure("public username", self.backend.public_username())
    }

    /// Sets or deletes the publicly displayed username.
    pub fn set_public_username(&self, update: SecretUpdate) {
        self.apply(
            "public username",
            update,
            |backend, value| backend.set_public_username(value),
            Keychain::remove_public_username,
        );
    }

    // Token

    /// Returns the auth token of `username`.
    #[must_use]
    pub fn token(&self, username: &str) -> Option<String> {
        self.token_by_key(&token_key(username))
    }

    /// Returns the token stored under an already derived `key`.
    #[must_use]
    pub fn token_by_key(&self, key: &str) -> Option<String> {
        absent_on_failure("token", self.backend.token(key))
    }

    /// Sets or deletes the auth token of `username`.
    pub fn set_token(&self, update: SecretUpdate, username: &str) {
        let key = token_key(username);
        self.apply(
            "token",
            update,
            |backend, value| backend.set_token(&key, value),
            |backend| backend.remove_token(&key),
        );
    }

    /// Returns a persistent reference to the auth token of `username`.
    #[must_use]
    pub fn token_reference(&self, username: &str) -> Option<Vec<u8>> {
        absent_on_failure(
            "token reference",
            self.backend.token_reference(&token_key(username)),
        )
    }

    /// Wipes the password, token and public key of `username`.
    ///
    /// Every removal is attempted even when an earlier one fails.
    pub fn clear(&self, username: &str) {
        log::info!("Clearing keychain credentials");
        ignore_failure("password", self.backend.remove_password(username));
        ignore_failure("token", self.backend.remove_token(&token_key(username)));
        ignore_failure(
            "public key",
            self.backend.remove_public_key(PUBLIC_KEY_ENTRY),
        );
        self.invalidate_public_key_cache();
    }
}
