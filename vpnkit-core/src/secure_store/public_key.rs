//! Materialized public key handle.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

use super::error::{VaultError, VaultResult};

const PEM_BOUNDARY: &str = "-----";
const PEM_HEADER: &str = "-----BEGIN PUBLIC KEY-----";
const PEM_FOOTER: &str = "-----END PUBLIC KEY-----";
const PEM_LINE_WIDTH: usize = 64;
const DER_SEQUENCE_TAG: u8 = 0x30;

/// A public key materialized from stored key material.
///
/// Accepts either DER bytes (`SubjectPublicKeyInfo` or `PKCS#1`) or a
/// `PUBLIC KEY` PEM document. The handle always holds the DER form.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Object)]
pub struct PublicKey {
    der: Vec<u8>,
}

impl PublicKey {
    /// Materializes a key from DER or PEM encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Encoding`] if the bytes are empty, the PEM armor is
    /// malformed or not labelled `PUBLIC KEY`, or the result is not a DER
    /// sequence.
    pub fn from_bytes(bytes: &[u8]) -> VaultResult<Self> {
        // leading whitespace is only skipped for PEM text; DER is taken as is
        let text = bytes.trim_ascii_start();
        if text.is_empty() {
            return Err(VaultError::Encoding("empty key material".to_string()));
        }

        let der = if text.starts_with(PEM_BOUNDARY.as_bytes()) {
            decode_pem(text)?
        } else {
            bytes.to_vec()
        };

        if der.first() != Some(&DER_SEQUENCE_TAG) {
            return Err(VaultError::Encoding(
                "key material is not a DER sequence".to_string(),
            ));
        }
        Ok(Self { der })
    }
}

#[uniffi::export]
impl PublicKey {
    /// Materializes a key from DER or PEM encoded bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the material cannot be decoded.
    #[uniffi::constructor]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(data: Vec<u8>) -> VaultResult<Self> {
        Self::from_bytes(&data)
    }

    /// Returns the DER encoding of the key.
    #[must_use]
    pub fn der(&self) -> Vec<u8> {
        self.der.clone()
    }

    /// Returns the lowercase hex SHA-256 digest of the DER encoding.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.der))
    }

    /// Returns the key as a `PUBLIC KEY` PEM document.
    #[must_use]
    pub fn to_pem(&self) -> String {
        let body = STANDARD.encode(&self.der);
        let mut pem = String::with_capacity(body.len() + body.len() / PEM_LINE_WIDTH + 64);
        pem.push_str(PEM_HEADER);
        pem.push('\n');
        for line in body.as_bytes().chunks(PEM_LINE_WIDTH) {
            // base64 output is ASCII
            pem.push_str(&String::from_utf8_lossy(line));
            pem.push('\n');
        }
        pem.push_str(PEM_FOOTER);
        pem.push('\n');
        pem
    }
}

fn decode_pem(bytes: &[u8]) -> VaultResult<Vec<u8>> {
    let text = std::str::from_utf8(bytes)
        .map_err(|err| VaultError::Encoding(format!("PEM is not UTF-8: {err}")))?;
    let mut lines = text.lines().map(str::trim).filter(|line| !line.is_empty());

    match lines.next() {
        Some(PEM_HEADER) => {}
        Some(header) => {
            return Err(VaultError::Encoding(format!(
                "unexpected PEM header {header}, expected {PEM_HEADER}"
            )));
        }
        None => return Err(VaultError::Encoding("missing PEM header".to_string())),
    }

    let mut body = String::new();
    let mut terminated = false;
    for line in lines {
        if line == PEM_FOOTER {
            terminated = true;
            break;
        }
        body.push_str(line);
    }
    if !terminated {
        return Err(VaultError::Encoding("missing PEM footer".to_string()));
    }
    if body.is_empty() {
        return Err(VaultError::Encoding("empty PEM body".to_string()));
    }

    STANDARD
        .decode(body.as_bytes())
        .map_err(|err| VaultError::Encoding(format!("invalid PEM base64: {err}")))
}
