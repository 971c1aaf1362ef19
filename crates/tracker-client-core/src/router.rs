use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::address::{query_value, with_query_value};
use crate::config::ConfigError;
use crate::port::{AddressBar, ViewPort};

/// Data a view needs beyond its static copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewData {
    None,
    Chart,
    TopTracks,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub key: &'static str,
    pub title: &'static str,
    pub lede: &'static str,
    pub badge: &'static str,
    pub placeholder: &'static str,
    pub data: ViewData,
}

impl ViewDescriptor {
    /// Data-backed views render their own content instead of the placeholder.
    #[must_use]
    pub fn shows_placeholder(&self) -> bool {
        self.data == ViewData::None
    }
}

static WELCOME: ViewDescriptor = ViewDescriptor {
    key: "welcome",
    title: "Welcome",
    lede: "Start here to see your Spotify profile and listening stats.",
    badge: "Overview",
    placeholder: "Once you are connected, your personal dashboard appears here.",
    data: ViewData::None,
};

static QUICKSEARCH: ViewDescriptor = ViewDescriptor {
    key: "quicksearch",
    title: "Quick search",
    lede: "Find playlists, tracks or artists as soon as you are signed in.",
    badge: "Search",
    placeholder: "Use the search to load content from your Spotify account.",
    data: ViewData::None,
};

static LINKS: ViewDescriptor = ViewDescriptor {
    key: "links",
    title: "Links & actions",
    lede: "Manage the shortcuts and actions you use most.",
    badge: "Actions",
    placeholder: "Your actions show up here once you have added them.",
    data: ViewData::None,
};

static EXPLORE: ViewDescriptor = ViewDescriptor {
    key: "explore",
    title: "Explore",
    lede: "Get recommendations and insights once your account is connected.",
    badge: "Explore",
    placeholder: "Recommendations and trends are waiting for you here.",
    data: ViewData::None,
};

static CHARTS: ViewDescriptor = ViewDescriptor {
    key: "charts",
    title: "Global Top 50",
    lede: "The latest snapshot of the global chart, ranked by position.",
    badge: "Charts",
    placeholder: "",
    data: ViewData::Chart,
};

static TOP_TRACKS: ViewDescriptor = ViewDescriptor {
    key: "top-tracks",
    title: "Your top tracks",
    lede: "The tracks you have played most recently on Spotify.",
    badge: "Top tracks",
    placeholder: "",
    data: ViewData::TopTracks,
};

static DESCRIPTORS: [&ViewDescriptor; 6] =
    [&WELCOME, &QUICKSEARCH, &LINKS, &EXPLORE, &CHARTS, &TOP_TRACKS];

/// The closed set of views plus the fallback for unknown keys.
#[derive(Debug, Clone, Copy)]
pub struct ViewCatalog {
    default_view: &'static ViewDescriptor,
}

impl ViewCatalog {
    pub fn new(default_key: &str) -> Result<Self, ConfigError> {
        let default_view = Self::get(default_key)
            .ok_or_else(|| ConfigError::UnknownDefaultView(default_key.to_string()))?;
        Ok(Self { default_view })
    }

    #[must_use]
    pub fn get(key: &str) -> Option<&'static ViewDescriptor> {
        DESCRIPTORS
            .iter()
            .copied()
            .find(|descriptor| descriptor.key == key)
    }

    #[must_use]
    pub fn keys() -> impl Iterator<Item = &'static str> {
        DESCRIPTORS.iter().map(|descriptor| descriptor.key)
    }

    #[must_use]
    pub fn resolve(&self, key: &str) -> &'static ViewDescriptor {
        Self::get(key.trim()).unwrap_or(self.default_view)
    }

    #[must_use]
    pub fn default_view(&self) -> &'static ViewDescriptor {
        self.default_view
    }
}

pub struct ViewRouter {
    catalog: ViewCatalog,
    view_param: String,
    port: Rc<dyn ViewPort>,
    address: Rc<dyn AddressBar>,
    active: Cell<&'static ViewDescriptor>,
}

impl ViewRouter {
    pub fn new(
        catalog: ViewCatalog,
        view_param: impl Into<String>,
        port: Rc<dyn ViewPort>,
        address: Rc<dyn AddressBar>,
    ) -> Self {
        Self {
            active: Cell::new(catalog.default_view()),
            catalog,
            view_param: view_param.into(),
            port,
            address,
        }
    }

    /// Renders the view for `key`, falling back to the default view. With
    /// `update_address` the query parameter is rewritten in place to the
    /// resolved key.
    pub fn set_active_view(&self, key: &str, update_address: bool) -> &'static ViewDescriptor {
        let descriptor = self.catalog.resolve(key);
        if descriptor.key != key {
            debug!(requested = key, resolved = descriptor.key, "unknown view key");
        }
        self.active.set(descriptor);
        self.port.render_view_descriptor(descriptor);
        self.port.highlight_nav(descriptor.key);
        if update_address {
            self.write_address(descriptor.key);
        }
        descriptor
    }

    /// Activates the view named in the address. An unknown key in the address
    /// is replaced by the resolved one; a known or absent key is left alone.
    pub fn init_from_address(&self) -> &'static ViewDescriptor {
        let requested = query_value(&self.address.current_url(), &self.view_param);
        let descriptor =
            self.set_active_view(requested.as_deref().unwrap_or_default(), false);
        if requested.is_some_and(|key| key != descriptor.key) {
            self.write_address(descriptor.key);
        }
        descriptor
    }

    #[must_use]
    pub fn active(&self) -> &'static ViewDescriptor {
        self.active.get()
    }

    fn write_address(&self, key: &str) {
        let current = self.address.current_url();
        if let Some(next) = with_query_value(&current, &self.view_param, key)
            && next != current
        {
            self.address.replace_url(&next);
        }
    }
}
