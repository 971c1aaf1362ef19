//! In-memory collaborators shared by the unit tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::ClientConfig;
use crate::feed::{FeedCaption, FeedRow};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};
use crate::port::{AddressBar, FeedbackPort, ViewPort};
use crate::profile::ProfileCard;
use crate::router::ViewDescriptor;
use crate::store::{KeyValueStorage, MemoryStorage, Session};
use crate::top_tracks::TopTracksView;

pub(crate) const TEST_BASE_URL: &str = "http://api.test";
pub(crate) const DASHBOARD_URL: &str = "http://app.test/page.html";

type Scripted = Result<HttpResponse, TransportError>;

/// Answers requests from per-route queues and records everything it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: RefCell<BTreeMap<(HttpMethod, String), VecDeque<Scripted>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.push(method, path, Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, method: HttpMethod, path: &str, message: &str) {
        self.push(method, path, Err(TransportError::new(message)));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|request| route_path(&request.url))
            .collect()
    }

    pub(crate) fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|seen| seen.as_str() == path).count()
    }

    fn push(&self, method: HttpMethod, path: &str, outcome: Scripted) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(outcome);
    }
}

fn route_path(url: &str) -> String {
    url.strip_prefix(TEST_BASE_URL).unwrap_or(url).to_string()
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, route_path(&request.url));
        self.requests.borrow_mut().push(request);
        self.routes
            .borrow_mut()
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(TransportError::new(format!("unscripted {key:?}"))))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PortEvent {
    Descriptor(&'static str),
    Nav(String),
    Locked(bool),
    Rows(Vec<FeedRow>),
    Caption(FeedCaption),
    Profile(ProfileCard),
    TopTracks(TopTracksView),
    Notice(String),
}

#[derive(Default)]
pub(crate) struct RecordingPort {
    events: RefCell<Vec<PortEvent>>,
}

impl RecordingPort {
    pub(crate) fn events(&self) -> Vec<PortEvent> {
        self.events.borrow().clone()
    }

    pub(crate) fn locked(&self) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            PortEvent::Locked(locked) => Some(*locked),
            _ => None,
        })
    }

    pub(crate) fn last_rows(&self) -> Option<Vec<FeedRow>> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            PortEvent::Rows(rows) => Some(rows.clone()),
            _ => None,
        })
    }

    pub(crate) fn last_nav(&self) -> Option<String> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            PortEvent::Nav(key) => Some(key.clone()),
            _ => None,
        })
    }

    pub(crate) fn profiles(&self) -> Vec<ProfileCard> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PortEvent::Profile(card) => Some(card.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn notices(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                PortEvent::Notice(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: PortEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl ViewPort for RecordingPort {
    fn render_view_descriptor(&self, descriptor: &ViewDescriptor) {
        self.record(PortEvent::Descriptor(descriptor.key));
    }

    fn highlight_nav(&self, key: &str) {
        self.record(PortEvent::Nav(key.to_string()));
    }

    fn set_locked(&self, locked: bool) {
        self.record(PortEvent::Locked(locked));
    }

    fn render_feed_rows(&self, rows: &[FeedRow]) {
        self.record(PortEvent::Rows(rows.to_vec()));
    }

    fn render_feed_caption(&self, caption: &FeedCaption) {
        self.record(PortEvent::Caption(caption.clone()));
    }

    fn render_profile(&self, profile: &ProfileCard) {
        self.record(PortEvent::Profile(profile.clone()));
    }

    fn render_top_tracks(&self, view: &TopTracksView) {
        self.record(PortEvent::TopTracks(view.clone()));
    }

    fn show_notice(&self, message: &str) {
        self.record(PortEvent::Notice(message.to_string()));
    }
}

#[derive(Default)]
pub(crate) struct RecordingFeedback {
    messages: RefCell<Vec<String>>,
}

impl RecordingFeedback {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl FeedbackPort for RecordingFeedback {
    fn show_feedback(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

pub(crate) struct RecordingAddress {
    url: RefCell<String>,
    replaced: RefCell<Vec<String>>,
    redirects: RefCell<Vec<String>>,
    scheduled: RefCell<Vec<(String, Duration)>>,
}

impl RecordingAddress {
    pub(crate) fn at(url: &str) -> Self {
        Self {
            url: RefCell::new(url.to_string()),
            replaced: RefCell::new(Vec::new()),
            redirects: RefCell::new(Vec::new()),
            scheduled: RefCell::new(Vec::new()),
        }
    }

    pub(crate) fn url(&self) -> String {
        self.url.borrow().clone()
    }

    pub(crate) fn replaced(&self) -> Vec<String> {
        self.replaced.borrow().clone()
    }

    pub(crate) fn redirects(&self) -> Vec<String> {
        self.redirects.borrow().clone()
    }

    pub(crate) fn scheduled(&self) -> Vec<(String, Duration)> {
        self.scheduled.borrow().clone()
    }
}

impl AddressBar for RecordingAddress {
    fn current_url(&self) -> String {
        self.url()
    }

    fn replace_url(&self, url: &str) {
        *self.url.borrow_mut() = url.to_string();
        self.replaced.borrow_mut().push(url.to_string());
    }

    fn redirect(&self, url: &str) {
        self.redirects.borrow_mut().push(url.to_string());
    }

    fn redirect_after(&self, url: &str, delay: Duration) {
        self.scheduled.borrow_mut().push((url.to_string(), delay));
    }
}

pub(crate) fn test_config() -> ClientConfig {
    ClientConfig {
        api_base_url: TEST_BASE_URL.to_string(),
        ..ClientConfig::default()
    }
}

pub(crate) fn signed_in_storage() -> Rc<MemoryStorage> {
    let storage = Rc::new(MemoryStorage::default());
    let keys = test_config().storage_keys;
    let session = test_session();
    for (key, value) in [
        (keys.subject_id, session.subject_id),
        (keys.display_name, session.display_name),
        (keys.access_credential, session.access_credential),
    ] {
        let _ = storage.set_item(&key, &value);
    }
    storage
}

pub(crate) fn test_session() -> Session {
    Session {
        subject_id: "42".to_string(),
        display_name: "ada".to_string(),
        access_credential: "token-42".to_string(),
    }
}

pub(crate) fn chart_body(entries: &[(u32, &str, &str)]) -> String {
    let entries = entries
        .iter()
        .map(|(position, title, artist)| {
            serde_json::json!({
                "position": position,
                "title": title,
                "artist": artist,
                "providerTrackId": format!("trk-{position}"),
            })
        })
        .collect::<Vec<_>>();
    serde_json::json!({
        "chartKey": "global-top-50",
        "chartDate": "2026-10-16",
        "totalEntries": 50,
        "entries": entries,
    })
    .to_string()
}
