//! Platform interface for secret storage.

use super::error::VaultResult;
use super::types::VaultItem;

/// Encrypted key-value facility provided by the host platform.
///
/// On iOS and macOS this is backed by Keychain Services (`SecItemAdd`,
/// `SecItemCopyMatching`, `SecItemDelete`), on Android by the Keystore with
/// `EncryptedSharedPreferences`. The library never caches plaintext on top of
/// it, every call is a round-trip to the platform.
///
/// Implementations are expected to serialize their own access.
#[uniffi::export(with_foreign)]
pub trait SecretVault: Send + Sync {
    /// Returns the value stored for `item`, or `None` if there is no such item.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform storage cannot be queried.
    fn get(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>>;

    /// Stores `value` for `item`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform storage rejects the write.
    fn set(&self, item: VaultItem, value: Vec<u8>) -> VaultResult<()>;

    /// Deletes `item`. Deleting a missing item succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform storage rejects the delete.
    fn delete(&self, item: VaultItem) -> VaultResult<()>;

    /// Returns a persistent reference to `item` that other platform APIs can
    /// resolve without the plaintext passing through this library
    /// (`kSecReturnPersistentRef` on Apple platforms).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform storage cannot be queried.
    fn reference(&self, item: VaultItem) -> VaultResult<Option<Vec<u8>>>;
}
