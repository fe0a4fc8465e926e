//! Upload payload framing.
//!
//! ```text
//! <separator>\n
//! gzip("debug_id\n" <identifier>)
//! <separator>\n
//! gzip(<content>)
//! ```
//!
//! The separator is 50 random base-36 characters, which makes a collision with
//! the compressed sections negligible.

use std::io::{Read, Write};

use flate2::{read::GzDecoder, write::GzEncoder, Compression};
use rand::Rng;

use super::error::{DebugLogError, DebugLogResult};

const SEPARATOR_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SEPARATOR_LENGTH: usize = 50;
const DEBUG_ID_HEADER: &str = "debug_id\n";

/// Identifier and content recovered from a serialized payload.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DebugLogPayload {
    /// Report identifier.
    pub identifier: String,
    /// Extended log content.
    pub content: String,
}

/// Generates a fresh separator line, newline included.
pub(super) fn separator<R: Rng>(rng: &mut R) -> String {
    let mut line: String = (0..SEPARATOR_LENGTH)
        .map(|_| char::from(SEPARATOR_ALPHABET[rng.gen_range(0..SEPARATOR_ALPHABET.len())]))
        .collect();
    line.push('\n');
    line
}

fn deflate(bytes: &[u8]) -> DebugLogResult<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes)?;
    Ok(encoder.finish()?)
}

fn inflate(bytes: &[u8]) -> DebugLogResult<String> {
    let mut text = String::new();
    GzDecoder::new(bytes).read_to_string(&mut text)?;
    Ok(text)
}

/// Frames `identifier` and `content` into an upload payload.
pub(super) fn encode(separator: &str, identifier: &str, content: &str) -> DebugLogResult<Vec<u8>> {
    let id_section = deflate(format!("{DEBUG_ID_HEADER}{identifier}").as_bytes())?;
    let content_section = deflate(content.as_bytes())?;

    let mut payload = Vec::with_capacity(
        2 * separator.len() + id_section.len() + content_section.len(),
    );
    payload.extend_from_slice(separator.as_bytes());
    payload.extend_from_slice(&id_section);
    payload.extend_from_slice(separator.as_bytes());
    payload.extend_from_slice(&content_section);
    Ok(payload)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Splits and inflates a payload produced by [`DebugLog::serialized`](super::DebugLog::serialized).
///
/// # Errors
///
/// Returns an error if the framing is broken or a section does not inflate.
pub fn parse_payload(payload: &[u8]) -> DebugLogResult<DebugLogPayload> {
    let line_end = payload
        .iter()
        .position(|&byte| byte == b'\n')
        .ok_or(DebugLogError::MissingSeparator)?;
    let separator = &payload[..=line_end];
    if line_end == 0 || !separator[..line_end].iter().all(u8::is_ascii_alphanumeric) {
        return Err(DebugLogError::MissingSeparator);
    }

    let rest = &payload[separator.len()..];
    let split = find(rest, separator).ok_or_else(|| {
        DebugLogError::MalformedPayload("second separator not found".to_string())
    })?;
    let (id_section, content_section) = (&rest[..split], &rest[split + separator.len()..]);

    let identifier = inflate(id_section)?
        .strip_prefix(DEBUG_ID_HEADER)
        .map(str::to_string)
        .ok_or_else(|| DebugLogError::MalformedPayload("missing debug_id header".to_string()))?;
    let content = inflate(content_section)?;

    Ok(DebugLogPayload {
        identifier,
        content,
    })
}

/// Parses an upload payload.
///
/// # Errors
///
/// Returns an error if the framing is broken or a section does not inflate.
#[uniffi::export]
#[allow(clippy::needless_pass_by_value)]
pub fn parse_debug_log_payload(payload: Vec<u8>) -> DebugLogResult<DebugLogPayload> {
    parse_payload(&payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_separator_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let line = separator(&mut rng);
        assert_eq!(line.len(), SEPARATOR_LENGTH + 1);
        assert!(line.ends_with('\n'));
        assert!(line[..SEPARATOR_LENGTH]
            .bytes()
            .all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()));
        assert_ne!(line, separator(&mut rng));
    }

    #[test]
    fn test_sections_are_gzip() {
        let sep = "abc\n";
        let payload = encode(sep, "0A1B2", "hello").expect("encode");
        assert!(payload.starts_with(b"abc\n"));
        // gzip magic right after the separator
        assert_eq!(&payload[4..6], &[0x1f, 0x8b]);
    }

    #[test]
    fn test_parse_encoded() {
        let sep = separator(&mut StdRng::seed_from_u64(1));
        let payload = encode(&sep, "FFFFF", "sysinfo\n{}\npia_log\nline").expect("encode");
        let parsed = parse_payload(&payload).expect("parse");
        assert_eq!(parsed.identifier, "FFFFF");
        assert_eq!(parsed.content, "sysinfo\n{}\npia_log\nline");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_payload(b""), Err(DebugLogError::MissingSeparator)));
        assert!(matches!(parse_payload(b"\nabc"), Err(DebugLogError::MissingSeparator)));
        assert!(matches!(
            parse_payload(b"sep\nno second"),
            Err(DebugLogError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_payload(b"sep\nnot gzipsep\nalso not"),
            Err(DebugLogError::Compression(_))
        ));
    }

    #[test]
    fn test_parse_rejects_missing_header() {
        let sep = separator(&mut StdRng::seed_from_u64(2));
        let mut payload = sep.as_bytes().to_vec();
        payload.extend(deflate(b"no header").unwrap());
        payload.extend_from_slice(sep.as_bytes());
        payload.extend(deflate(b"content").unwrap());
        assert!(matches!(
            parse_payload(&payload),
            Err(DebugLogError::MalformedPayload(_))
        ));
    }
}
