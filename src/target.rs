//! Facts about the resource being loaded: origin comparison and
//! legacy-script detection.
//!
//! These facts feed the strategy decision tree in
//! [`transport`](crate::transport). They are computed once per load and
//! never mutated.

/// Derived facts about the load target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTarget {
    /// The resolved story URL.
    pub url: String,
    /// Whether the target shares the hosting page's origin.
    pub same_origin: bool,
    /// Whether the URL carries the legacy `.js` story extension.
    pub legacy_script: bool,
}

impl LoadTarget {
    /// Compute target facts against the hosting page's location.
    pub fn resolve(page_url: &str, story_url: &str) -> Self {
        let same_origin = match (origin_prefix(page_url), origin_prefix(story_url)) {
            // A relative story URL inherits the page's origin.
            (_, None) => true,
            (Some(page), Some(data)) => page == data,
            (None, Some(_)) => false,
        };
        Self {
            url: story_url.to_owned(),
            same_origin,
            legacy_script: has_js_extension(story_url),
        }
    }
}

/// Extract the protocol+host prefix of a URL, or the bare `file:` scheme.
///
/// Equivalent to matching `^(file:|(\w+:)?//[^/?#]+)`: any `file:` URL
/// yields `file:`; otherwise an optional scheme followed by `//` and a
/// non-empty authority yields everything up to the first `/`, `?`, or `#`
/// after the authority. `None` means the URL is relative.
pub(crate) fn origin_prefix(url: &str) -> Option<&str> {
    if url.starts_with("file:") {
        return Some(&url[..5]);
    }
    let bytes = url.as_bytes();
    let mut scheme_len = 0;
    while scheme_len < bytes.len() && is_scheme_byte(bytes[scheme_len]) {
        scheme_len += 1;
    }
    let authority_start = if scheme_len > 0 && bytes.get(scheme_len) == Some(&b':') {
        scheme_len + 1
    } else {
        0
    };
    if !url[authority_start..].starts_with("//") {
        return None;
    }
    let host_start = authority_start + 2;
    let host = &url[host_start..];
    let host_len = host.find(['/', '?', '#']).unwrap_or(host.len());
    if host_len == 0 {
        return None;
    }
    Some(&url[..host_start + host_len])
}

fn is_scheme_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

fn has_js_extension(url: &str) -> bool {
    let bytes = url.as_bytes();
    bytes.len() >= 3 && bytes[bytes.len() - 3..].eq_ignore_ascii_case(b".js")
}
