//! Transport capability facts and the retrieval strategy decision tree.
//!
//! The loader never talks to the network itself. It derives the target
//! facts, probes the [`Transport`] collaborator for capability facts, and
//! commits to exactly one of five mutually exclusive retrieval strategies.
//! This is a decision tree, not a fallback chain: a committed strategy is
//! attempted exactly once, and its failure is terminal for the load.

use log::debug;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::codec;
use crate::error::LoadError;
use crate::options::LoadOptions;
use crate::target::LoadTarget;

/// Name of the global callback that legacy script payloads and the proxy's
/// script mode invoke with a base64 argument.
pub const BASE64_CALLBACK: &str = "processBase64Zcode";

/// RFC 3986 unreserved characters pass through; everything else is escaped
/// when a URL is embedded as a query-parameter value.
const URL_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Host capability facts, probed once per load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities {
    /// GETs can override the response mime type so raw byte values survive
    /// charset decoding.
    pub binary_fetch: bool,
    /// Credentialed cross-origin GETs are available.
    pub credentialed_cross_origin: bool,
}

/// A single failed GET, as reported by the transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportFailure {
    /// Status code (0 for a network-level failure).
    pub status: u16,
    /// Status text accompanying the code.
    pub status_text: String,
}

/// The transport collaborator.
///
/// Every operation is single-shot: it returns once, with the one
/// completion the underlying host delivers, and is never retried or raced.
/// The script-injection operation has no failure channel at all: a script
/// that never invokes [`BASE64_CALLBACK`] simply never completes, and
/// detecting that is out of scope.
pub trait Transport {
    /// Probe the capability facts consulted by strategy selection.
    fn capabilities(&self) -> Capabilities;

    /// Whether the host document has a place to insert a script element.
    fn has_insertion_point(&self) -> bool;

    /// GET `url` and evaluate the response as a script; resolves with the
    /// base64 payload the script hands to [`BASE64_CALLBACK`].
    fn execute_script(&mut self, url: &str) -> Result<String, TransportFailure>;

    /// Insert a script element referencing `url`; resolves with the base64
    /// payload the loaded script hands to [`BASE64_CALLBACK`].
    fn inject_script(&mut self, url: &str) -> String;

    /// GET `url` with a charset-suppressing mime override; the response
    /// body maps one character per raw byte.
    fn fetch_binary(&mut self, url: &str) -> Result<String, TransportFailure>;

    /// GET `url` with the given query parameters appended; the response
    /// body is plain text.
    fn fetch_text(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, TransportFailure>;
}

/// The five mutually exclusive retrieval strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Same-origin legacy script: GET and evaluate, await the callback.
    ExecuteScript,
    /// Cross-origin legacy script: insert a script element, await the
    /// callback.
    InjectScript,
    /// Same-origin GET with a charset-suppressing mime override.
    FetchBinary,
    /// Credentialed GET through the proxy; the body is base64 text.
    FetchViaProxy,
    /// Script element pointing at the proxy's callback mode. Always
    /// available as the final branch.
    InjectProxyScript,
}

/// Pick the single strategy for this load.
///
/// The first matching branch wins and later branches are never consulted,
/// even if the chosen strategy goes on to fail.
pub fn select_strategy(target: &LoadTarget, caps: &Capabilities) -> Strategy {
    if target.legacy_script && target.same_origin {
        Strategy::ExecuteScript
    } else if target.legacy_script {
        Strategy::InjectScript
    } else if caps.binary_fetch && target.same_origin {
        Strategy::FetchBinary
    } else if caps.credentialed_cross_origin {
        Strategy::FetchViaProxy
    } else {
        Strategy::InjectProxyScript
    }
}

/// Run `strategy` against the transport and decode the payload to bytes.
pub fn run_strategy<T: Transport>(
    strategy: Strategy,
    target: &LoadTarget,
    options: &LoadOptions,
    transport: &mut T,
) -> Result<Vec<u8>, LoadError> {
    match strategy {
        Strategy::ExecuteScript => {
            debug!("trying old-fashioned script load ({})", target.url);
            let payload = transport
                .execute_script(&target.url)
                .map_err(|failure| transport_error(&target.url, failure))?;
            codec::decode_base64(&payload)
        }
        Strategy::InjectScript => {
            debug!("trying cross-origin script load ({})", target.url);
            ensure_insertion_point(transport)?;
            let payload = transport.inject_script(&target.url);
            codec::decode_base64(&payload)
        }
        Strategy::FetchBinary => {
            debug!("trying binary load ({})", target.url);
            let body = transport
                .fetch_binary(&target.url)
                .map_err(|failure| transport_error(&target.url, failure))?;
            Ok(codec::decode_binary_string(&body))
        }
        Strategy::FetchViaProxy => {
            debug!("trying proxy load ({})", options.proxy_url);
            let body = transport
                .fetch_text(
                    &options.proxy_url,
                    &[("encode", "base64"), ("url", target.url.as_str())],
                )
                .map_err(|failure| transport_error(&target.url, failure))?;
            codec::decode_base64(&body)
        }
        Strategy::InjectProxyScript => {
            let url = proxy_script_url(&options.proxy_url, &target.url);
            debug!("trying proxy-script load ({url})");
            ensure_insertion_point(transport)?;
            let payload = transport.inject_script(&url);
            codec::decode_base64(&payload)
        }
    }
}

/// Build the proxy URL for script-tag delivery.
fn proxy_script_url(proxy_url: &str, story_url: &str) -> String {
    format!(
        "{proxy_url}?encode=base64&callback={BASE64_CALLBACK}&url={}",
        utf8_percent_encode(story_url, URL_COMPONENT)
    )
}

fn ensure_insertion_point<T: Transport>(transport: &T) -> Result<(), LoadError> {
    if transport.has_insertion_point() {
        Ok(())
    } else {
        Err(LoadError::NoInsertionPoint)
    }
}

fn transport_error(url: &str, failure: TransportFailure) -> LoadError {
    LoadError::Transport {
        url: url.to_owned(),
        status: failure.status,
        status_text: failure.status_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(url: &str, same_origin: bool) -> LoadTarget {
        LoadTarget {
            url: url.to_owned(),
            same_origin,
            legacy_script: url.to_ascii_lowercase().ends_with(".js"),
        }
    }

    const NO_CAPS: Capabilities = Capabilities {
        binary_fetch: false,
        credentialed_cross_origin: false,
    };
    const ALL_CAPS: Capabilities = Capabilities {
        binary_fetch: true,
        credentialed_cross_origin: true,
    };

    #[test]
    fn same_origin_legacy_script_executes_directly() {
        let strategy = select_strategy(&target("http://a.com/story.js", true), &ALL_CAPS);
        assert_eq!(strategy, Strategy::ExecuteScript);
    }

    #[test]
    fn cross_origin_legacy_script_is_injected() {
        let strategy = select_strategy(&target("http://b.com/story.js", false), &ALL_CAPS);
        assert_eq!(strategy, Strategy::InjectScript);
    }

    #[test]
    fn script_branch_wins_even_without_capabilities() {
        // The legacy-script branches outrank the capability-gated ones.
        let strategy = select_strategy(&target("http://b.com/story.js", false), &NO_CAPS);
        assert_eq!(strategy, Strategy::InjectScript);
    }

    #[test]
    fn same_origin_binary_fetch() {
        let strategy = select_strategy(&target("http://a.com/story.ulx", true), &ALL_CAPS);
        assert_eq!(strategy, Strategy::FetchBinary);
    }

    #[test]
    fn cross_origin_goes_through_proxy_fetch() {
        let strategy = select_strategy(&target("http://b.com/story.ulx", false), &ALL_CAPS);
        assert_eq!(strategy, Strategy::FetchViaProxy);
    }

    #[test]
    fn proxy_fetch_also_covers_same_origin_without_binary_support() {
        let caps = Capabilities {
            binary_fetch: false,
            credentialed_cross_origin: true,
        };
        let strategy = select_strategy(&target("http://a.com/story.ulx", true), &caps);
        assert_eq!(strategy, Strategy::FetchViaProxy);
    }

    #[test]
    fn proxy_script_is_the_final_branch() {
        let strategy = select_strategy(&target("http://b.com/story.ulx", false), &NO_CAPS);
        assert_eq!(strategy, Strategy::InjectProxyScript);
    }

    #[test]
    fn proxy_script_url_carries_callback_and_escaped_target() {
        let url = proxy_script_url(
            "http://proxy.example/proxy/",
            "http://b.com/a game.ulx",
        );
        assert_eq!(
            url,
            "http://proxy.example/proxy/?encode=base64&callback=processBase64Zcode\
&url=http%3A%2F%2Fb.com%2Fa%20game.ulx"
        );
    }
}
