use std::rc::Rc;

use tracing::info;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientError;
use crate::feed::{FeedLoader, FeedOutcome};
use crate::gate::{ConnectionGate, GateOutcome};
use crate::http::HttpTransport;
use crate::port::{AddressBar, ViewPort};
use crate::profile::ProfileLoader;
use crate::router::{ViewCatalog, ViewData, ViewDescriptor, ViewRouter};
use crate::session::SessionService;
use crate::store::KeyValueStorage;
use crate::top_tracks::{TopTracksLoader, TopTracksOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    RedirectedToEntry,
    Locked,
    Unlocked,
}

/// What a view switch fetched, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLoad {
    Static,
    Feed(FeedOutcome),
    TopTracks(TopTracksOutcome),
}

/// The dashboard page: session check, connection gate, routing and feeds.
pub struct Dashboard {
    entry_page: String,
    session: Rc<SessionService>,
    router: ViewRouter,
    gate: ConnectionGate,
    feed: FeedLoader,
    top_tracks: TopTracksLoader,
    address: Rc<dyn AddressBar>,
}

impl Dashboard {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStorage>,
        port: Rc<dyn ViewPort>,
        address: Rc<dyn AddressBar>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let catalog = ViewCatalog::new(&config.default_view)?;
        let session = Rc::new(SessionService::from_config(config, transport, storage)?);
        let api = session.api();
        let profile = Rc::new(ProfileLoader::new(
            Rc::clone(&session),
            Rc::clone(&api),
            Rc::clone(&port),
        ));
        let gate = ConnectionGate::new(
            Rc::clone(&session),
            Rc::clone(&port),
            Rc::clone(&address),
            profile,
            config.connected_param.clone(),
            config.connected_value.clone(),
        );
        let feed = FeedLoader::new(
            Rc::clone(&api),
            Rc::clone(&port),
            config.limited_page_size,
            config.full_page_size,
        );
        let top_tracks = TopTracksLoader::new(Rc::clone(&session), api, Rc::clone(&port));
        let router = ViewRouter::new(
            catalog,
            config.view_param.clone(),
            port,
            Rc::clone(&address),
        );
        Ok(Self {
            entry_page: config.entry_page.clone(),
            session,
            router,
            gate,
            feed,
            top_tracks,
            address,
        })
    }

    /// Page activation. The gate starts locked and the session is validated
    /// before the connection status is consulted.
    pub async fn activate(&self) -> Activation {
        self.gate.lock();
        let descriptor = self.router.init_from_address();

        if !self.session.validate().await {
            self.leave_for_entry();
            return Activation::RedirectedToEntry;
        }

        let outcome = match self.gate.consume_authorization_marker().await {
            Some(outcome) => outcome,
            None => self.gate.refresh().await,
        };
        if outcome == GateOutcome::SessionLost {
            self.leave_for_entry();
            return Activation::RedirectedToEntry;
        }

        self.load_view_data(descriptor).await;
        if outcome == GateOutcome::Unlocked {
            Activation::Unlocked
        } else {
            Activation::Locked
        }
    }

    pub async fn select_view(&self, key: &str) -> ViewLoad {
        let descriptor = self.router.set_active_view(key, true);
        let load = self.load_view_data(descriptor).await;
        if load == ViewLoad::TopTracks(TopTracksOutcome::Failed) && self.session.current().is_none()
        {
            self.gate.lock();
            self.leave_for_entry();
        }
        load
    }

    pub async fn toggle_feed(&self) -> FeedOutcome {
        self.feed.toggle().await
    }

    pub async fn refresh_feed(&self) -> FeedOutcome {
        self.feed.refresh().await
    }

    pub async fn connect(&self) -> Result<(), ClientError> {
        let result = self.gate.begin_authorization().await;
        if let Err(error) = &result
            && error.is_unauthorized()
        {
            self.leave_for_entry();
        }
        result
    }

    pub async fn logout(&self) {
        self.session.logout().await;
        self.address.redirect(&self.entry_page);
    }

    #[must_use]
    pub fn active_view(&self) -> &'static ViewDescriptor {
        self.router.active()
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.gate.is_locked()
    }

    #[must_use]
    pub fn feed(&self) -> &FeedLoader {
        &self.feed
    }

    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.session
    }

    fn leave_for_entry(&self) {
        info!(entry = %self.entry_page, "no valid session; leaving dashboard");
        self.address.redirect(&self.entry_page);
    }

    async fn load_view_data(&self, descriptor: &ViewDescriptor) -> ViewLoad {
        match descriptor.data {
            ViewData::None => ViewLoad::Static,
            ViewData::Chart => ViewLoad::Feed(self.feed.load(false).await),
            ViewData::TopTracks => ViewLoad::TopTracks(self.top_tracks.load().await),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::query_value;
    use crate::feed::FeedRow;
    use crate::http::{ApiClient, HttpMethod};
    use crate::store::MemoryStorage;
    use crate::testing::{
        DASHBOARD_URL, RecordingAddress, RecordingPort, ScriptedTransport, chart_body,
        signed_in_storage, test_config,
    };

    const LIMITED: &str = "/charts/global-top-50?limit=10";
    const FULL: &str = "/charts/global-top-50?limit=50";
    const CONNECTED: &str = r#"{"connected":true}"#;
    const DISCONNECTED: &str = r#"{"connected":false}"#;
    const PROFILE: &str = r#"{"displayName":"Ada","followers":1,"product":"premium"}"#;

    struct Harness {
        transport: Rc<ScriptedTransport>,
        storage: Rc<MemoryStorage>,
        port: Rc<RecordingPort>,
        address: Rc<RecordingAddress>,
        dashboard: Dashboard,
    }

    fn harness(storage: Rc<MemoryStorage>, url: &str) -> Harness {
        let transport = Rc::new(ScriptedTransport::default());
        let port = Rc::new(RecordingPort::default());
        let address = Rc::new(RecordingAddress::at(url));
        let dashboard = Dashboard::new(
            &test_config(),
            transport.clone(),
            storage.clone(),
            port.clone(),
            address.clone(),
        )
        .expect("valid config");
        Harness {
            transport,
            storage,
            port,
            address,
            dashboard,
        }
    }

    #[test]
    fn unknown_default_view_is_a_config_error() {
        let config = test_config().with_default_view("nowhere");
        let result = Dashboard::new(
            &config,
            Rc::new(ScriptedTransport::default()),
            Rc::new(MemoryStorage::default()),
            Rc::new(RecordingPort::default()),
            Rc::new(RecordingAddress::at(DASHBOARD_URL)),
        );
        assert!(matches!(result, Err(ConfigError::UnknownDefaultView(_))));
    }

    #[tokio::test]
    async fn anonymous_visitors_are_sent_to_the_entry_page() {
        let h = harness(Rc::new(MemoryStorage::default()), DASHBOARD_URL);
        assert_eq!(h.dashboard.activate().await, Activation::RedirectedToEntry);
        assert!(h.transport.requests().is_empty());
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
        assert_eq!(h.port.locked(), Some(true));
    }

    #[tokio::test]
    async fn expired_session_is_cleared_and_redirected() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 401, "");

        assert_eq!(h.dashboard.activate().await, Activation::RedirectedToEntry);
        assert!(h.storage.is_empty());
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
        assert_eq!(h.transport.count(ApiClient::CONNECTION_STATUS_PATH), 0);
    }

    #[tokio::test]
    async fn unlinked_account_stays_locked_without_profile_fetch() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport.respond(
            HttpMethod::Get,
            ApiClient::CONNECTION_STATUS_PATH,
            200,
            DISCONNECTED,
        );

        assert_eq!(h.dashboard.activate().await, Activation::Locked);
        assert!(h.dashboard.is_locked());
        assert_eq!(h.port.locked(), Some(true));
        assert_eq!(h.transport.count(ApiClient::PROFILE_PATH), 0);
        assert_eq!(
            h.transport.paths(),
            vec![
                ApiClient::SESSION_PATH.to_string(),
                ApiClient::CONNECTION_STATUS_PATH.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn linked_account_on_chart_view_loads_everything() {
        let url = format!("{DASHBOARD_URL}?tab=charts");
        let h = harness(signed_in_storage(), &url);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport.respond(
            HttpMethod::Get,
            ApiClient::CONNECTION_STATUS_PATH,
            200,
            CONNECTED,
        );
        h.transport
            .respond(HttpMethod::Get, ApiClient::PROFILE_PATH, 200, PROFILE);
        h.transport
            .respond(HttpMethod::Get, LIMITED, 200, &chart_body(&[(1, "A", "a")]));

        assert_eq!(h.dashboard.activate().await, Activation::Unlocked);
        assert_eq!(h.dashboard.active_view().key, "charts");
        assert_eq!(h.port.profiles().len(), 1);
        assert_eq!(h.port.last_rows().map(|rows| rows.len()), Some(1));
        assert!(h.address.replaced().is_empty());
    }

    #[tokio::test]
    async fn returning_from_authorization_unlocks_without_status_check() {
        let url = format!("{DASHBOARD_URL}?connected=spotify");
        let h = harness(signed_in_storage(), &url);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport
            .respond(HttpMethod::Get, ApiClient::PROFILE_PATH, 200, PROFILE);

        assert_eq!(h.dashboard.activate().await, Activation::Unlocked);
        assert_eq!(h.transport.count(ApiClient::CONNECTION_STATUS_PATH), 0);
        assert_eq!(query_value(&h.address.url(), "connected"), None);
    }

    #[tokio::test]
    async fn empty_feed_renders_one_empty_row() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport.respond(HttpMethod::Get, LIMITED, 204, "");

        let load = h.dashboard.select_view("charts").await;
        assert_eq!(load, ViewLoad::Feed(FeedOutcome::Empty));
        assert_eq!(h.port.last_rows(), Some(vec![FeedRow::Empty]));
        assert_eq!(h.dashboard.feed().snapshot(), None);
        assert_eq!(query_value(&h.address.url(), "tab").as_deref(), Some("charts"));
    }

    #[tokio::test]
    async fn full_feed_then_toggle_requests_the_limited_page() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, FULL, 200, &chart_body(&[(1, "A", "a")]));
        h.transport
            .respond(HttpMethod::Get, LIMITED, 200, &chart_body(&[(1, "A", "a")]));

        h.dashboard.feed().load(true).await;
        h.dashboard.toggle_feed().await;
        assert_eq!(h.transport.paths(), vec![FULL.to_string(), LIMITED.to_string()]);
        assert!(!h.dashboard.feed().expanded());
    }

    #[tokio::test]
    async fn static_views_fetch_nothing() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        assert_eq!(h.dashboard.select_view("links").await, ViewLoad::Static);
        assert_eq!(h.dashboard.select_view("bogus").await, ViewLoad::Static);
        assert_eq!(h.dashboard.active_view().key, "welcome");
        assert!(h.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn top_tracks_view_fetches_with_the_credential() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::TOP_TRACKS_PATH, 200, "[]");

        assert_eq!(
            h.dashboard.select_view("top-tracks").await,
            ViewLoad::TopTracks(TopTracksOutcome::Loaded(0))
        );
    }

    #[tokio::test]
    async fn logout_clears_and_returns_to_entry() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Post, ApiClient::LOGOUT_PATH, 204, "");

        h.dashboard.logout().await;
        assert!(h.storage.is_empty());
        assert_eq!(h.dashboard.session().current(), None);
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn connect_failure_reports_and_locks() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::AUTHORIZATION_PATH, 502, "");

        assert!(h.dashboard.connect().await.is_err());
        assert!(h.dashboard.is_locked());
        assert!(h.address.redirects().is_empty());
    }

    #[tokio::test]
    async fn profile_rejection_on_return_from_authorization_signs_out() {
        let url = format!("{DASHBOARD_URL}?connected=spotify");
        let h = harness(signed_in_storage(), &url);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport
            .respond(HttpMethod::Get, ApiClient::PROFILE_PATH, 401, "");

        assert_eq!(h.dashboard.activate().await, Activation::RedirectedToEntry);
        assert!(h.dashboard.is_locked());
        assert_eq!(h.port.locked(), Some(true));
        assert_eq!(h.dashboard.session().current(), None);
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn profile_rejection_after_linked_status_signs_out() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport.respond(
            HttpMethod::Get,
            ApiClient::CONNECTION_STATUS_PATH,
            200,
            CONNECTED,
        );
        h.transport
            .respond(HttpMethod::Get, ApiClient::PROFILE_PATH, 401, "");

        assert_eq!(h.dashboard.activate().await, Activation::RedirectedToEntry);
        assert!(h.dashboard.is_locked());
        assert!(h.storage.is_empty());
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn rejected_status_check_reports_and_signs_out() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport
            .respond(HttpMethod::Get, ApiClient::CONNECTION_STATUS_PATH, 401, "");

        assert_eq!(h.dashboard.activate().await, Activation::RedirectedToEntry);
        assert!(h.dashboard.is_locked());
        assert_eq!(h.port.notices().len(), 1);
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn failing_status_check_locks_with_a_notice() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::SESSION_PATH, 200, "{}");
        h.transport
            .respond(HttpMethod::Get, ApiClient::CONNECTION_STATUS_PATH, 503, "");

        assert_eq!(h.dashboard.activate().await, Activation::Locked);
        assert!(h.dashboard.is_locked());
        assert_eq!(
            h.port.notices(),
            vec!["Something went wrong. Please try again.".to_string()]
        );
        assert!(h.dashboard.session().current().is_some());
        assert!(h.address.redirects().is_empty());
    }

    #[tokio::test]
    async fn rejected_top_tracks_request_signs_out() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::TOP_TRACKS_PATH, 401, "");

        assert_eq!(
            h.dashboard.select_view("top-tracks").await,
            ViewLoad::TopTracks(TopTracksOutcome::Failed)
        );
        assert!(h.storage.is_empty());
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }

    #[tokio::test]
    async fn rejected_authorization_request_signs_out() {
        let h = harness(signed_in_storage(), DASHBOARD_URL);
        h.transport
            .respond(HttpMethod::Get, ApiClient::AUTHORIZATION_PATH, 401, "");

        let error = h.dashboard.connect().await.expect_err("401 is reported");
        assert!(error.is_unauthorized());
        assert_eq!(h.dashboard.session().current(), None);
        assert_eq!(h.address.redirects(), vec!["index.html".to_string()]);
    }
}
