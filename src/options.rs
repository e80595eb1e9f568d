//! Load configuration: defaults, caller overrides, story-URL resolution.
//!
//! A [`LoadOptions`] value is resolved once per load attempt and never
//! mutated afterwards; every component receives it by reference. The
//! engine and display collaborators are not part of this value; they are
//! wired into the [`Loader`](crate::Loader) directly.

use crate::query::QueryParams;

/// Effective configuration for one load attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadOptions {
    /// Spacing between display windows, in pixels.
    pub spacing: u32,
    /// Consult the page's `?story=` parameter for the story URL.
    pub use_query_story: bool,
    /// Story URL to use if the query does not name one.
    pub default_story: Option<String>,
    /// Show the resolved story title on the display surface.
    pub set_page_title: bool,
    /// Base URL of the cross-origin fetch proxy.
    pub proxy_url: String,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            spacing: 4,
            use_query_story: true,
            default_story: None,
            set_page_title: true,
            proxy_url: "http://zcode.appspot.com/proxy/".into(),
        }
    }
}

/// Caller-supplied overrides, merged onto [`LoadOptions::default`] before
/// a load begins. An override wins on every field it sets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub spacing: Option<u32>,
    pub use_query_story: Option<bool>,
    pub default_story: Option<String>,
    pub set_page_title: Option<bool>,
    pub proxy_url: Option<String>,
}

impl LoadOptions {
    /// Merge caller overrides onto this configuration.
    pub fn apply(&mut self, overrides: OptionOverrides) {
        if let Some(spacing) = overrides.spacing {
            self.spacing = spacing;
        }
        if let Some(use_query_story) = overrides.use_query_story {
            self.use_query_story = use_query_story;
        }
        if let Some(default_story) = overrides.default_story {
            self.default_story = Some(default_story);
        }
        if let Some(set_page_title) = overrides.set_page_title {
            self.set_page_title = set_page_title;
        }
        if let Some(proxy_url) = overrides.proxy_url {
            self.proxy_url = proxy_url;
        }
    }

    /// Resolve the story URL for this load attempt.
    ///
    /// When `use_query_story` is set, a non-empty `story` query parameter
    /// wins; otherwise (or when the parameter is absent or empty) the
    /// configured `default_story` is used. `None` means the load cannot
    /// proceed.
    pub fn resolve_story(&self, params: &QueryParams) -> Option<String> {
        if self.use_query_story {
            if let Some(url) = params.get("story").filter(|url| !url.is_empty()) {
                return Some(url.clone());
            }
        }
        self.default_story
            .clone()
            .filter(|url| !url.is_empty())
    }
}
