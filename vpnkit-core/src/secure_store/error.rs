//! Error types for the secret vault and the keychain adapter.

use thiserror::Error;

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Errors raised by a [`SecretVault`](super::SecretVault) implementation or by the
/// keychain adapter on top of it.
///
/// These never cross the [`KeychainStore`](super::KeychainStore) boundary; the
/// store logs them and reports absence instead.
#[derive(Debug, Error, uniffi::Error)]
pub enum VaultError {
    /// The platform secure storage refused the request (locked device,
    /// missing entitlement, interaction not allowed, ...).
    #[error("vault unavailable: {0}")]
    Unavailable(String),

    /// Reading or writing the underlying storage failed.
    #[error("vault io error: {0}")]
    Io(String),

    /// Stored or supplied bytes could not be decoded.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for VaultError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}
