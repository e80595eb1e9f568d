//! Page query-string parsing.
//!
//! The loader consults one parameter (`story`), but the parse produces the
//! whole map so the embedding host can reuse it.

use std::collections::BTreeMap;

use percent_encoding::percent_decode_str;

/// Parsed query parameters, keyed by decoded name.
pub type QueryParams = BTreeMap<String, String>;

/// Parse a query string (without the leading `?`) into a key → value map.
///
/// Pairs are split on `&`, then on the first `=`. A bare key with no `=`
/// is treated as both key and value. `+` is treated as a space before
/// percent-decoding; later duplicate keys overwrite earlier ones.
pub fn parse_query(qs: &str) -> QueryParams {
    let mut map = QueryParams::new();
    if qs.is_empty() {
        return map;
    }
    for pair in qs.split('&') {
        let (name, value) = match pair.split_once('=') {
            Some((raw_name, raw_value)) => {
                (decode_component(raw_name), decode_component(raw_value))
            }
            None => {
                let name = decode_component(pair);
                (name.clone(), name)
            }
        };
        map.insert(name, value);
    }
    map
}

/// Extract the query span of a URL: after the first `?`, before any `#`.
/// A `?` inside the fragment is not a query.
pub fn query_of(url: &str) -> &str {
    let without_fragment = match url.find('#') {
        Some(end) => &url[..end],
        None => url,
    };
    match without_fragment.find('?') {
        Some(start) => &without_fragment[start + 1..],
        None => "",
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}
