//! Capability-driven loader for Glulx game images.
//!
//! The crate retrieves a story file from a URL (possibly cross-origin),
//! committing to exactly one of five transport strategies based on the
//! host's capability facts, unpacks a Blorb container when that is what
//! arrived, and hands the executable image plus bibliographic metadata to
//! the embedding engine and display collaborators. There is no retry, no
//! timeout, and no fallback to another strategy once one is committed.
//!
//! # Usage
//!
//! ```rust,no_run
//! use glulx_load::{Loader, OptionOverrides};
//! # use glulx_load::{Capabilities, DisplayLayer, GameEngine, LoadOptions,
//! #                  Transport, TransportFailure};
//! # struct Host;
//! # impl Transport for Host {
//! #     fn capabilities(&self) -> Capabilities { Capabilities::default() }
//! #     fn has_insertion_point(&self) -> bool { true }
//! #     fn execute_script(&mut self, _: &str) -> Result<String, TransportFailure> { todo!() }
//! #     fn inject_script(&mut self, _: &str) -> String { todo!() }
//! #     fn fetch_binary(&mut self, _: &str) -> Result<String, TransportFailure> { todo!() }
//! #     fn fetch_text(&mut self, _: &str, _: &[(&str, &str)]) -> Result<String, TransportFailure> { todo!() }
//! # }
//! # struct Engine;
//! # impl GameEngine for Engine { fn prepare(&mut self, _: Vec<u8>) {} }
//! # struct Glk;
//! # impl DisplayLayer for Glk {
//! #     fn init(&mut self, _: &LoadOptions) {}
//! #     fn fatal_error(&mut self, _: &str) {}
//! # }
//! let mut loader = Loader::new(Host, Engine, Glk);
//! let overrides = OptionOverrides {
//!     default_story: Some("http://example.com/game.blb".into()),
//!     ..Default::default()
//! };
//! let _ = loader.load_run(overrides, "http://example.com/play.html");
//! ```

#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

pub mod blorb;
pub mod codec;
pub mod error;
pub mod loader;
pub mod options;
pub mod query;
pub mod target;
pub mod transport;

pub use blorb::{Blorb, Metadata, FORM_MAGIC};
pub use error::LoadError;
pub use loader::{DisplayLayer, GameEngine, Loader};
pub use options::{LoadOptions, OptionOverrides};
pub use query::{parse_query, QueryParams};
pub use target::LoadTarget;
pub use transport::{
    select_strategy, Capabilities, Strategy, Transport, TransportFailure, BASE64_CALLBACK,
};
