//! Secure credential storage.
//!
//! Three layers, outermost first:
//!
//! - [`KeychainStore`]: the facade the app talks to. Owns the lifecycle of the
//!   password, auth token and public key of the logged-in account and swallows
//!   every storage failure.
//! - [`Keychain`]: a stateless adapter mapping those credentials onto vault
//!   items, scoped to an app group or team at construction.
//! - [`SecretVault`]: the platform capability, implemented in Swift/Kotlin
//!   over the system keychain and injected through `UniFFI`.
//!
//! # Item layout
//!
//! ```text
//! GenericPassword  <service> / <username>                password
//! GenericPassword  <service> / "auth-token: <username>"  auth token
//! GenericPassword  <service>.slots / "Username"          current username
//! GenericPassword  <service>.slots / "PublicUsername"    public username
//! PublicKey        <service> / "PIAPublicKey"            server public key (DER)
//! ```

pub mod error;
mod keychain;
pub mod memory;
mod public_key;
mod store;
mod traits;
mod types;

pub use error::{VaultError, VaultResult};
pub use keychain::Keychain;
pub use memory::MemoryVault;
pub use public_key::PublicKey;
pub use store::{token_key, KeychainStore, SecretUpdate, PUBLIC_KEY_ENTRY};
pub use traits::SecretVault;
pub use types::{ItemClass, KeychainScope, VaultItem};
