//! Load orchestration: resolve the configuration, commit to a transport
//! strategy, unpack the retrieved image, and hand it to the engine and
//! display collaborators.

use log::debug;

use crate::blorb::{self, Metadata, FORM_MAGIC};
use crate::error::LoadError;
use crate::options::{LoadOptions, OptionOverrides};
use crate::query;
use crate::target::LoadTarget;
use crate::transport::{self, Transport};

/// The virtual machine that will execute the image.
pub trait GameEngine {
    /// Accept the executable image. Called once, before display init.
    fn prepare(&mut self, image: Vec<u8>);
}

/// The display layer.
pub trait DisplayLayer {
    /// Start the display with the effective configuration. The display is
    /// expected to start the engine once its windows are set up.
    fn init(&mut self, options: &LoadOptions);

    /// Report a terminal load failure to the player.
    fn fatal_error(&mut self, message: &str);

    /// Show the resolved story title on the display surface. The default
    /// implementation ignores it.
    fn set_title(&mut self, title: &str) {
        let _ = title;
    }
}

/// One game-load attempt, wired to its collaborators.
///
/// The loader owns the collaborators for the duration of the attempt;
/// [`Loader::into_parts`] releases them afterwards.
pub struct Loader<T, V, D> {
    transport: T,
    vm: V,
    io: D,
}

impl<T: Transport, V: GameEngine, D: DisplayLayer> Loader<T, V, D> {
    pub fn new(transport: T, vm: V, io: D) -> Self {
        Self { transport, vm, io }
    }

    /// Release the collaborators.
    pub fn into_parts(self) -> (T, V, D) {
        (self.transport, self.vm, self.io)
    }

    /// Run one load attempt.
    ///
    /// `page_url` is the full location of the hosting page; the origin
    /// comparison and the `?story=` parameter both derive from it. Every
    /// failure is surfaced through the display sink exactly once; the
    /// error is also returned for callers that want to inspect it.
    pub fn load_run(
        &mut self,
        overrides: OptionOverrides,
        page_url: &str,
    ) -> Result<(), LoadError> {
        let mut options = LoadOptions::default();
        options.apply(overrides);
        match self.try_load(&options, page_url) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.io.fatal_error(&err.to_string());
                Err(err)
            }
        }
    }

    fn try_load(&mut self, options: &LoadOptions, page_url: &str) -> Result<(), LoadError> {
        let params = query::parse_query(query::query_of(page_url));
        let Some(story_url) = options.resolve_story(&params) else {
            return Err(LoadError::NoStory);
        };
        // The story URL is now known and does not change.
        debug!("gameurl: {story_url}");

        let target = LoadTarget::resolve(page_url, &story_url);
        let caps = self.transport.capabilities();
        debug!(
            "same_origin={}, binary_fetch={}, credentialed_cross_origin={}",
            target.same_origin, caps.binary_fetch, caps.credentialed_cross_origin
        );

        let strategy = transport::select_strategy(&target, &caps);
        let image = transport::run_strategy(strategy, &target, options, &mut self.transport)?;
        self.start_game(options, &target.url, image)
    }

    /// Bootstrap the retrieved image: detect a container, resolve the
    /// title, and hand off to the engine and display.
    fn start_game(
        &mut self,
        options: &LoadOptions,
        story_url: &str,
        image: Vec<u8>,
    ) -> Result<(), LoadError> {
        if image.is_empty() {
            return Err(LoadError::EmptyResponse);
        }

        let (image, metadata) = if image.starts_with(&FORM_MAGIC) {
            let unpacked = blorb::unpack(&image)?;
            let Some(executable) = unpacked.executable else {
                return Err(LoadError::NoExecutable);
            };
            (executable, unpacked.metadata)
        } else {
            (image, Metadata::new())
        };

        if options.set_page_title {
            let title = metadata
                .get("title")
                .map(String::as_str)
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| trailing_segment(story_url));
            self.io.set_title(title);
        }

        debug!("starting game, image length {}", image.len());
        self.vm.prepare(image);
        // The display takes over from here and starts the engine once its
        // windows are set up.
        self.io.init(options);
        Ok(())
    }
}

/// Everything after the last `/`, or the whole string when there is none.
fn trailing_segment(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}
