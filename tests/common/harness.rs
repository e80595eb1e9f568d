//! Scripted fake collaborators for end-to-end load tests.

use glulx_load::{
    Capabilities, DisplayLayer, GameEngine, LoadOptions, Transport, TransportFailure,
};

/// A transport whose every operation is scripted up front. Each response
/// slot can be consumed once; a second request on the same channel fails
/// the test, which pins down the "exactly one attempt" contract.
#[derive(Default)]
pub struct FakeTransport {
    pub caps: Capabilities,
    pub insertion_point: bool,
    pub script_response: Option<Result<String, TransportFailure>>,
    pub injected_response: Option<String>,
    pub binary_response: Option<Result<String, TransportFailure>>,
    pub text_response: Option<Result<String, TransportFailure>>,
    /// One entry per operation, recording the channel and URL.
    pub requests: Vec<String>,
    /// Query pairs passed to the last `fetch_text`.
    pub text_query: Vec<(String, String)>,
}

impl FakeTransport {
    pub fn with_insertion_point(caps: Capabilities) -> Self {
        Self {
            caps,
            insertion_point: true,
            ..Self::default()
        }
    }
}

impl Transport for FakeTransport {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn has_insertion_point(&self) -> bool {
        self.insertion_point
    }

    fn execute_script(&mut self, url: &str) -> Result<String, TransportFailure> {
        self.requests.push(format!("execute_script {url}"));
        self.script_response
            .take()
            .expect("unscripted execute_script request")
    }

    fn inject_script(&mut self, url: &str) -> String {
        self.requests.push(format!("inject_script {url}"));
        self.injected_response
            .take()
            .expect("unscripted inject_script request")
    }

    fn fetch_binary(&mut self, url: &str) -> Result<String, TransportFailure> {
        self.requests.push(format!("fetch_binary {url}"));
        self.binary_response
            .take()
            .expect("unscripted fetch_binary request")
    }

    fn fetch_text(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, TransportFailure> {
        self.requests.push(format!("fetch_text {url}"));
        self.text_query = query
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        self.text_response
            .take()
            .expect("unscripted fetch_text request")
    }
}

#[derive(Default)]
pub struct RecordingEngine {
    pub prepared: Vec<Vec<u8>>,
}

impl GameEngine for RecordingEngine {
    fn prepare(&mut self, image: Vec<u8>) {
        self.prepared.push(image);
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub inits: Vec<LoadOptions>,
    pub errors: Vec<String>,
    pub titles: Vec<String>,
}

impl DisplayLayer for RecordingDisplay {
    fn init(&mut self, options: &LoadOptions) {
        self.inits.push(options.clone());
    }

    fn fatal_error(&mut self, message: &str) {
        self.errors.push(message.to_owned());
    }

    fn set_title(&mut self, title: &str) {
        self.titles.push(title.to_owned());
    }
}
