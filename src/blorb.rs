//! Blorb container unpacking.
//!
//! A Blorb file is an IFF-style container: a 12-byte preamble (`FORM`
//! signature, declared total length, format subtype) followed by a
//! sequence of chunks, each `{4-byte ASCII tag}{u32 big-endian length}`
//! and then the payload, padded with one byte when it ends at an odd
//! offset. The loader consumes two chunk kinds: `GLUL` (the executable
//! image) and `IFmd` (bibliographic metadata as an iFiction XML document).
//! Every other chunk kind is skipped over by its declared length.

use std::collections::BTreeMap;

use log::{debug, warn};
use quick_xml::events::Event;

use crate::error::LoadError;

/// The container magic signature; the caller checks it before unpacking.
pub const FORM_MAGIC: [u8; 4] = *b"FORM";

const CHUNK_GLUL: [u8; 4] = *b"GLUL";
const CHUNK_IFMD: [u8; 4] = *b"IFmd";

/// Offset of the first chunk: signature + declared length + subtype tag.
const FIRST_CHUNK_OFFSET: usize = 12;

/// Bibliographic metadata: lowercase field name → text content.
pub type Metadata = BTreeMap<String, String>;

/// The result of unpacking a container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Blorb {
    /// The executable image, if the container carried a `GLUL` chunk.
    pub executable: Option<Vec<u8>>,
    /// Bibliographic fields. May be empty, never absent.
    pub metadata: Metadata,
}

/// Walk a container and extract the executable image and metadata.
///
/// A container without a `GLUL` chunk is well-formed: the result carries
/// `executable: None`, which is distinct from the `Err` cases (a chunk
/// header truncated by the buffer end, or a chunk payload overrunning it).
/// When several `GLUL` chunks appear, the last one wins; the scan never
/// stops early because metadata may follow the executable.
pub fn unpack(image: &[u8]) -> Result<Blorb, LoadError> {
    let len = image.len();
    let mut pos = FIRST_CHUNK_OFFSET;
    let mut blorb = Blorb::default();

    while pos < len {
        if pos + 8 > len {
            return Err(LoadError::Malformed(format!(
                "truncated chunk header at offset {pos}"
            )));
        }
        let tag = [image[pos], image[pos + 1], image[pos + 2], image[pos + 3]];
        let chunk_len = u32::from_be_bytes([
            image[pos + 4],
            image[pos + 5],
            image[pos + 6],
            image[pos + 7],
        ]) as usize;
        pos += 8;

        let end = match pos.checked_add(chunk_len) {
            Some(end) if end <= len => end,
            _ => {
                return Err(LoadError::Malformed(format!(
                    "chunk {} at offset {} overruns the buffer ({} bytes declared, {} available)",
                    tag_display(&tag),
                    pos - 8,
                    chunk_len,
                    len - pos
                )))
            }
        };
        let payload = &image[pos..end];

        if tag == CHUNK_GLUL {
            debug!("GLUL chunk at offset {}, {} bytes", pos - 8, chunk_len);
            blorb.executable = Some(payload.to_vec());
        } else if tag == CHUNK_IFMD {
            debug!("IFmd chunk at offset {}, {} bytes", pos - 8, chunk_len);
            collect_metadata(payload, &mut blorb.metadata);
        }

        pos = end;
        // Chunks are even-aligned; skip the pad byte after an odd length.
        if pos & 1 == 1 {
            pos += 1;
        }
    }

    Ok(blorb)
}

fn tag_display(tag: &[u8; 4]) -> String {
    tag.iter()
        .map(|&byte| {
            if byte.is_ascii_graphic() {
                char::from(byte)
            } else {
                '?'
            }
        })
        .collect()
}

/// Extract `bibliographic` fields from an `IFmd` payload.
///
/// The payload is an iFiction document; the fields are the direct children
/// of its first `bibliographic` element (found at any depth), keyed by
/// lowercased tag name, with all descendant text concatenated. Anomalies
/// in the document are not fatal: whatever was collected before the scan
/// stopped is kept.
fn collect_metadata(payload: &[u8], metadata: &mut Metadata) {
    let mut reader = quick_xml::reader::Reader::from_reader(payload);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::with_capacity(64);
    let mut in_bibliographic = false;
    // Set while a direct child of <bibliographic> is open: lowercased
    // name, accumulated text, and element depth inside the child.
    let mut field: Option<(String, String, usize)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.name();
                let name = name.as_ref();
                if !in_bibliographic {
                    if name.eq_ignore_ascii_case(b"bibliographic") {
                        in_bibliographic = true;
                    }
                } else if let Some((_, _, depth)) = field.as_mut() {
                    *depth += 1;
                } else {
                    field = Some((lowercase_name(name), String::new(), 1));
                }
            }
            Ok(Event::Empty(e)) => {
                if in_bibliographic && field.is_none() {
                    metadata.insert(lowercase_name(e.name().as_ref()), String::new());
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, text, _)) = field.as_mut() {
                    let decoded = reader.decoder().decode(&e).unwrap_or_default();
                    // Space separator when concatenating text segments from
                    // markup inside a field (e.g. "The <em>King</em>").
                    if !text.is_empty() && !text.ends_with(' ') && !decoded.starts_with(' ') {
                        text.push(' ');
                    }
                    text.push_str(decoded.as_ref());
                }
            }
            Ok(Event::End(e)) => {
                let closed_field = match field.as_mut() {
                    Some((_, _, depth)) => {
                        *depth -= 1;
                        *depth == 0
                    }
                    None => {
                        if in_bibliographic
                            && e.name().as_ref().eq_ignore_ascii_case(b"bibliographic")
                        {
                            // Only the first bibliographic section is consumed.
                            break;
                        }
                        false
                    }
                };
                if closed_field {
                    if let Some((name, text, _)) = field.take() {
                        metadata.insert(name, text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                warn!("metadata chunk is not well-formed XML: {err:?}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }
}

fn lowercase_name(name: &[u8]) -> String {
    String::from_utf8_lossy(name).to_ascii_lowercase()
}
