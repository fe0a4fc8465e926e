//! Debug log packaging for support uploads.
//!
//! A [`DebugLog`] wraps raw VPN log text with a random report identifier and,
//! when the host knows them, app and device details. [`DebugLog::serialized`]
//! produces the compressed multipart payload the support endpoint accepts.

mod error;
mod payload;

use std::collections::BTreeMap;

use rand::Rng;

pub use error::{DebugLogError, DebugLogResult};
pub use payload::{parse_debug_log_payload, parse_payload, DebugLogPayload};

/// Largest report identifier, five hex digits.
const MAX_IDENTIFIER: u32 = 0xF_FFFF;

/// App and device details attached to a debug log.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct LogTarget {
    /// Full app version, e.g. `3.21.0 (1234)`.
    pub app_version: String,
    /// OS name and version, e.g. `iOS 17.4`.
    pub os_version: String,
    /// Device model, e.g. `iPhone`.
    pub device_type: String,
}

/// A debug log ready for upload.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct DebugLog {
    identifier: String,
    content: String,
}

impl DebugLog {
    /// Builds a log with a caller-chosen identifier.
    #[must_use]
    pub fn with_identifier(
        identifier: String,
        raw_content: &str,
        target: Option<&LogTarget>,
    ) -> Self {
        let content = if raw_content.is_empty() {
            String::new()
        } else {
            extended_content(raw_content, target)
        };
        Self {
            identifier,
            content,
        }
    }
}

/// Formats a report identifier as five uppercase hex digits.
fn format_identifier(value: u32) -> String {
    format!("{:05X}", value & MAX_IDENTIFIER)
}

fn extended_content(raw_content: &str, target: Option<&LogTarget>) -> String {
    let mut text = String::with_capacity(raw_content.len() + 256);

    if let Some(target) = target {
        let sysinfo = BTreeMap::from([
            ("app_version", target.app_version.as_str()),
            ("device", target.device_type.as_str()),
            ("os_version", target.os_version.as_str()),
        ]);
        match serde_json::to_string(&sysinfo) {
            Ok(json) => {
                text.push_str("sysinfo\n");
                text.push_str(&json);
            }
            Err(err) => log::warn!("Skipping sysinfo in debug log: {err}"),
        }
    }

    text.push_str("\npia_log\n");
    text.push_str(raw_content);
    text
}

#[uniffi::export]
impl DebugLog {
    /// Wraps `raw_content` under a fresh random identifier.
    ///
    /// Empty content stays empty; nothing is prepended to it.
    #[uniffi::constructor]
    #[must_use]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(raw_content: String, target: Option<LogTarget>) -> Self {
        let identifier = format_identifier(rand::thread_rng().gen_range(0..=MAX_IDENTIFIER));
        Self::with_identifier(identifier, &raw_content, target.as_ref())
    }

    /// Returns the report identifier shown to the user and quoted to support.
    #[must_use]
    pub fn identifier(&self) -> String {
        self.identifier.clone()
    }

    /// Returns the extended content.
    #[must_use]
    pub fn content(&self) -> String {
        self.content.clone()
    }

    /// Returns `true` if there is nothing to upload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Serializes the log into the upload payload.
    ///
    /// Every call draws a new separator.
    ///
    /// # Errors
    ///
    /// Returns an error if compression fails.
    pub fn serialized(&self) -> DebugLogResult<Vec<u8>> {
        let separator = payload::separator(&mut rand::thread_rng());
        let bytes = payload::encode(&separator, &self.identifier, &self.content)?;
        log::debug!(
            "Serialized debug log {} ({} bytes of content, {} bytes payload)",
            self.identifier,
            self.content.len(),
            bytes.len()
        );
        Ok(bytes)
    }
}
