//! Addressing types shared by the vault and the keychain adapter.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Kind of item held in the vault.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumString,
    Display,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    /// A generic password item (`kSecClassGenericPassword`). Used for
    /// passwords, tokens and the username slots.
    GenericPassword,
    /// A public key item (`kSecClassKey` with `kSecAttrKeyClassPublic`).
    PublicKey,
}

/// Fully qualified address of a single vault item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, uniffi::Record)]
pub struct VaultItem {
    /// Item class.
    pub class: ItemClass,
    /// Service the item belongs to (`kSecAttrService`).
    pub service: String,
    /// Account or application tag identifying the item within the service.
    pub account: String,
    /// Sharing container (`kSecAttrAccessGroup`), `None` for app-private items.
    pub access_group: Option<String>,
}

/// Sharing scope of a keychain, fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeychainScope {
    /// Items are private to the app.
    Private,
    /// Items are shared with other apps and extensions of the same app group.
    Group {
        /// App group identifier, e.g. `group.com.example.vpn`.
        group: String,
    },
    /// Items are shared across the developer team boundary.
    TeamGroup {
        /// Developer team identifier.
        team: String,
        /// Group identifier within the team.
        group: String,
    },
}

impl KeychainScope {
    /// Returns the access group items are stored under.
    #[must_use]
    pub fn access_group(&self) -> Option<String> {
        match self {
            Self::Private => None,
            Self::Group { group } => Some(group.clone()),
            Self::TeamGroup { team, group } => Some(format!("{team}.{group}")),
        }
    }
}
