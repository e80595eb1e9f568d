//! In-memory Blorb fixtures for integration tests.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

pub const GAME_IMAGE: &[u8] = b"Glul\x00\x03\x01\x01fake glulx image";

pub const IFMD_DREAMHOLD: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<ifindex version="1.0" xmlns="http://babel.ifarchive.org/protocol/iFiction/">
  <story>
    <identification>
      <ifid>GLULX-1-041001-C9A1</ifid>
      <format>glulx</format>
    </identification>
    <bibliographic>
      <title>The Dreamhold</title>
      <author>Andrew Plotkin</author>
    </bibliographic>
  </story>
</ifindex>"#;

/// Encode one chunk: tag, big-endian length, payload (no pad byte).
pub fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(tag);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    out
}

/// Assemble a container: `FORM` signature, declared length, `IFRS`
/// subtype, then the chunks with even-alignment padding.
pub fn container(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut body = Vec::with_capacity(64);
    body.extend_from_slice(b"IFRS");
    for chunk in chunks {
        body.extend_from_slice(chunk);
        if body.len() & 1 == 1 {
            body.push(0);
        }
    }
    let mut out = Vec::with_capacity(8 + body.len());
    out.extend_from_slice(b"FORM");
    out.extend_from_slice(&(body.len() as u32).to_be_bytes());
    out.extend_from_slice(&body);
    out
}

/// A container holding the fixture game image and Dreamhold metadata.
pub fn dreamhold_blorb() -> Vec<u8> {
    container(&[chunk(b"IFmd", IFMD_DREAMHOLD), chunk(b"GLUL", GAME_IMAGE)])
}

/// A binary string as a charset-suppressed GET would deliver it: one
/// character per byte.
pub fn as_binary_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

pub fn as_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
