//! Byte codecs for transport payloads.
//!
//! Two encodings arrive from the transport layer: a legacy "binary string"
//! (one character per byte, produced by a charset-suppressing GET) and
//! base64 (produced by legacy script payloads and by the proxy).

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::LoadError;

/// Decode a legacy binary string into raw bytes.
///
/// Each character's code point is masked to its low 8 bits, so the output
/// has exactly one byte per input character. The transport obtains such
/// strings by overriding the response charset so nothing gets decoded or
/// munged; the mask undoes any code points the host still pushed above
/// 0xFF.
pub fn decode_binary_string(text: &str) -> Vec<u8> {
    text.chars().map(|ch| (ch as u32 & 0xff) as u8).collect()
}

/// Decode standard-alphabet base64 (`A-Z a-z 0-9 + /` with `=` padding).
///
/// Four input characters yield three bytes; a final group with one or two
/// trailing `=` characters yields two or one bytes instead.
pub fn decode_base64(text: &str) -> Result<Vec<u8>, LoadError> {
    Ok(STANDARD.decode(text)?)
}
