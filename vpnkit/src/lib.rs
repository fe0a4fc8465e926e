//! Mobile bindings for the VPN client core.
//!
//! Links [`vpnkit_core`] into the single library the Swift and Kotlin packages
//! ship. Bindings are generated in library mode, which picks up the core's
//! `UniFFI` metadata from this artifact.

pub use vpnkit_core::*;

uniffi::setup_scaffolding!("vpnkit");
