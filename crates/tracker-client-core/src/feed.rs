use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::http::{ApiClient, decode_json};
use crate::port::ViewPort;

const NO_CONTENT: u16 = 204;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotWire {
    #[serde(default)]
    chart_date: Option<NaiveDate>,
    #[serde(default)]
    entries: Vec<EntryWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EntryWire {
    position: u32,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    provider_track_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub rank: u32,
    pub title: String,
    pub subtitle: String,
    pub external_id: String,
}

/// One fetched page of the chart. Entries are kept in ascending rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSnapshot {
    pub as_of: Option<NaiveDate>,
    pub entries: Vec<FeedEntry>,
}

impl FeedSnapshot {
    #[must_use]
    pub fn new(as_of: Option<NaiveDate>, mut entries: Vec<FeedEntry>) -> Self {
        entries.sort_by_key(|entry| entry.rank);
        Self { as_of, entries }
    }

    /// Ranks start at 1; entries without a valid rank are dropped.
    fn from_wire(wire: SnapshotWire) -> Self {
        let received = wire.entries.len();
        let entries: Vec<FeedEntry> = wire
            .entries
            .into_iter()
            .filter(|entry| entry.position > 0)
            .map(|entry| FeedEntry {
                rank: entry.position,
                title: entry.title,
                subtitle: entry.artist,
                external_id: entry.provider_track_id,
            })
            .collect();
        if entries.len() < received {
            warn!(
                dropped = received - entries.len(),
                "chart entries without a rank were dropped"
            );
        }
        Self::new(wire.chart_date, entries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedRow {
    Entry(FeedEntry),
    /// No snapshot exists upstream yet.
    Empty,
    Error,
}

#[must_use]
pub fn render_rows(snapshot: &FeedSnapshot) -> Vec<FeedRow> {
    snapshot
        .entries
        .iter()
        .cloned()
        .map(FeedRow::Entry)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedCaption {
    pub text: String,
    pub toggle_label: &'static str,
}

#[must_use]
pub fn caption_for(snapshot: &FeedSnapshot, expanded: bool) -> FeedCaption {
    let text = match snapshot.as_of {
        Some(date) => format!("Snapshot from {}", date.format("%A, %B %-d, %Y")),
        None => "Snapshot loaded".to_string(),
    };
    FeedCaption {
        text,
        toggle_label: if expanded { "Show less" } else { "Show more" },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedOutcome {
    Loaded { entries: usize },
    Empty,
    Failed,
    /// A newer fetch rendered first; this result was dropped.
    Superseded,
}

/// Fetches the ranked chart in a limited or full page and renders it.
pub struct FeedLoader {
    api: Rc<ApiClient>,
    port: Rc<dyn ViewPort>,
    limited_page_size: usize,
    full_page_size: usize,
    expanded: Cell<bool>,
    snapshot: RefCell<Option<FeedSnapshot>>,
    issued: Cell<u64>,
    rendered: Cell<u64>,
}

impl FeedLoader {
    pub fn new(
        api: Rc<ApiClient>,
        port: Rc<dyn ViewPort>,
        limited_page_size: usize,
        full_page_size: usize,
    ) -> Self {
        Self {
            api,
            port,
            limited_page_size,
            full_page_size,
            expanded: Cell::new(false),
            snapshot: RefCell::new(None),
            issued: Cell::new(0),
            rendered: Cell::new(0),
        }
    }

    pub async fn load(&self, force_full: bool) -> FeedOutcome {
        let page_size = if force_full || self.expanded.get() {
            self.full_page_size
        } else {
            self.limited_page_size
        };
        let sequence = self.issued.get() + 1;
        self.issued.set(sequence);

        let result = self.api.get(&ApiClient::chart_path(page_size), None).await;

        if sequence < self.rendered.get() {
            debug!(sequence, rendered = self.rendered.get(), "dropping stale chart response");
            return FeedOutcome::Superseded;
        }
        self.rendered.set(sequence);

        let snapshot = match result {
            Ok(response) if response.status == NO_CONTENT => {
                self.snapshot.replace(None);
                self.port.render_feed_rows(&[FeedRow::Empty]);
                return FeedOutcome::Empty;
            }
            Ok(response) => decode_json::<SnapshotWire>(&response).map(FeedSnapshot::from_wire),
            Err(error) => Err(error),
        };

        match snapshot {
            Ok(snapshot) => {
                self.expanded.set(page_size > self.limited_page_size);
                self.port.render_feed_rows(&render_rows(&snapshot));
                self.port
                    .render_feed_caption(&caption_for(&snapshot, self.expanded.get()));
                let entries = snapshot.entries.len();
                self.snapshot.replace(Some(snapshot));
                FeedOutcome::Loaded { entries }
            }
            Err(error) => {
                warn!(kind = error.kind().as_str(), %error, "chart load failed");
                self.snapshot.replace(None);
                self.port.render_feed_rows(&[FeedRow::Error]);
                FeedOutcome::Failed
            }
        }
    }

    pub async fn toggle(&self) -> FeedOutcome {
        self.expanded.set(!self.expanded.get());
        self.load(self.expanded.get()).await
    }

    pub async fn refresh(&self) -> FeedOutcome {
        self.load(self.expanded.get()).await
    }

    #[must_use]
    pub fn expanded(&self) -> bool {
        self.expanded.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<FeedSnapshot> {
        self.snapshot.borrow().clone()
    }
}
