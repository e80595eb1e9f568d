//! Error taxonomy for the load pipeline.
//!
//! Every variant is terminal for the current load attempt: nothing is
//! retried, and a failed transport strategy never falls back to another.
//! The loader surfaces each one through the display collaborator's
//! `fatal_error` sink; `Display` renders the player-facing message.

use std::fmt;

/// Errors that can end a load attempt.
#[derive(Debug)]
pub enum LoadError {
    /// No story URL could be resolved from the options or the page query.
    NoStory,
    /// A script-injection strategy found no insertion point in the host page.
    NoInsertionPoint,
    /// The transport reported a failed GET (non-2xx status or network error).
    Transport {
        /// The story URL the load was for.
        url: String,
        /// Status code reported by the transport.
        status: u16,
        /// Status text reported by the transport.
        status_text: String,
    },
    /// The retrieved payload was zero-length.
    EmptyResponse,
    /// The container structure is malformed: a truncated chunk header or a
    /// chunk payload overrunning the buffer.
    Malformed(String),
    /// A well-formed container that carries no executable chunk.
    NoExecutable,
    /// A base64 payload could not be decoded.
    Base64(base64::DecodeError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NoStory => write!(f, "No story file specified!"),
            LoadError::NoInsertionPoint => write!(f, "This page has no <head> element!"),
            LoadError::Transport {
                url,
                status,
                status_text,
            } => write!(
                f,
                "The story could not be loaded. ({url}): Error {status}: {status_text}"
            ),
            LoadError::EmptyResponse => {
                write!(f, "No game file was loaded. (Zero-length response.)")
            }
            LoadError::Malformed(detail) => {
                write!(f, "Blorb file could not be parsed: {detail}")
            }
            LoadError::NoExecutable => write!(f, "Blorb file contains no Glulx game!"),
            LoadError::Base64(err) => {
                write!(f, "The story data could not be decoded: {err}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Base64(err) => Some(err),
            _ => None,
        }
    }
}

impl From<base64::DecodeError> for LoadError {
    fn from(err: base64::DecodeError) -> Self {
        LoadError::Base64(err)
    }
}
