#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Client core of the VPN mobile apps.
//!
//! - [`secure_store`]: credentials of the logged-in account (password, auth
//!   token, username slots) and the server public key, kept in the platform
//!   keychain through an injected [`secure_store::SecretVault`].
//! - [`debug_log`]: packaging of diagnostic logs for support uploads.
//! - [`purchase`]: plan choices behind the subscription screens.
//!
//! Everything is exported to Swift and Kotlin with `UniFFI`; platform
//! capabilities (keychain, logging, product callbacks) are foreign traits.
//!
//! ```rust
//! use std::sync::Arc;
//! use vpnkit_core::secure_store::{KeychainStore, MemoryVault, SecretUpdate};
//!
//! let store = KeychainStore::new(Arc::new(MemoryVault::new()), "com.example.vpn".to_string());
//! store.set_password(SecretUpdate::Set { value: "abc123".to_string() }, "alice");
//! assert_eq!(store.password("alice").as_deref(), Some("abc123"));
//!
//! store.clear("alice");
//! assert_eq!(store.password("alice"), None);
//! ```

pub mod config;
pub mod debug_log;
pub mod logger;
pub mod purchase;
pub mod secure_store;

pub use config::{ClientConfig, ConfigError};

uniffi::setup_scaffolding!("vpnkit_core");
