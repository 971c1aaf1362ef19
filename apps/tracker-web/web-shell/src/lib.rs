#![cfg_attr(test, allow(clippy::expect_used))]

#[cfg(any(target_arch = "wasm32", test))]
mod markup;
#[cfg(target_arch = "wasm32")]
mod wasm_constants;
#[cfg(any(target_arch = "wasm32", test))]
mod wasm_state;

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;
    use web_time::Instant;

    use async_trait::async_trait;
    use gloo_net::http::Request;
    use gloo_timers::future::sleep;
    use serde::Serialize;
    use tracker_client_core::http::HttpMethod;
    use tracker_client_core::store::MemoryStorage;
    use tracker_client_core::{
        AddressBar, ClientConfig, Dashboard, EntryOutcome, EntryPage, FeedCaption, FeedOutcome,
        FeedRow, FeedbackPort, HttpRequest, HttpResponse, HttpTransport, KeyValueStorage, ProfileCard,
        StorageError, TopTracksView, TransportError, ViewDescriptor, ViewPort,
    };
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;
    use web_sys::{Document, Element, HtmlElement, HtmlInputElement};

    use crate::markup::{avatar_style, row_cells, top_tracks_status};
    use crate::wasm_constants::*;
    use crate::wasm_state::ShellDiagnostics;

    mod dom;
    mod lifecycle;
    mod logging;
    mod network;
    mod routing;
    mod storage;
    mod wiring;

    use dom::*;
    use lifecycle::*;
    use network::*;
    use routing::*;
    use storage::*;
    use wiring::*;

    type EventHandler = Closure<dyn FnMut(web_sys::Event)>;

    thread_local! {
        static DIAGNOSTICS: RefCell<ShellDiagnostics> = RefCell::new(ShellDiagnostics::default());
        static DASHBOARD: RefCell<Option<Rc<Dashboard>>> = const { RefCell::new(None) };
        static ENTRY_PAGE: RefCell<Option<Rc<EntryPage>>> = const { RefCell::new(None) };
        static NAV_CLICK_HANDLERS: RefCell<Vec<EventHandler>> = const { RefCell::new(Vec::new()) };
        static CONNECT_CLICK_HANDLERS: RefCell<Vec<EventHandler>> = const { RefCell::new(Vec::new()) };
        static LOGOUT_CLICK_HANDLERS: RefCell<Vec<EventHandler>> = const { RefCell::new(Vec::new()) };
        static CHART_TOGGLE_HANDLER: RefCell<Option<EventHandler>> = const { RefCell::new(None) };
        static CHART_REFRESH_HANDLER: RefCell<Option<EventHandler>> = const { RefCell::new(None) };
        static LOGIN_SUBMIT_HANDLER: RefCell<Option<EventHandler>> = const { RefCell::new(None) };
        static REGISTER_SUBMIT_HANDLER: RefCell<Option<EventHandler>> = const { RefCell::new(None) };
    }

    /// Session fields safe to expose to page scripts. The credential is never included.
    #[derive(Debug, Serialize)]
    struct SessionStateView {
        authenticated: bool,
        subject_id: Option<String>,
        display_name: Option<String>,
    }

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        logging::install_console_logging();
        set_boot_phase("booting", "initializing tracker web shell");
        spawn_local(async {
            if let Err(error) = boot().await {
                set_boot_error(&error);
            }
        });
    }

    #[wasm_bindgen]
    pub fn boot_diagnostics_json() -> String {
        DIAGNOSTICS.with(|state| {
            serde_json::to_string(&*state.borrow()).unwrap_or_else(|_| {
                "{\"phase\":\"error\",\"detail\":\"diagnostics serialization failed\"}".to_string()
            })
        })
    }

    #[wasm_bindgen]
    pub fn session_state_json() -> String {
        let session = DASHBOARD
            .with(|slot| slot.borrow().as_ref().map(|dashboard| dashboard.session().current()))
            .or_else(|| {
                ENTRY_PAGE.with(|slot| slot.borrow().as_ref().map(|page| page.session().current()))
            })
            .flatten();
        let view = SessionStateView {
            authenticated: session.is_some(),
            subject_id: session.as_ref().map(|session| session.subject_id.clone()),
            display_name: session.map(|session| session.display_name),
        };
        serde_json::to_string(&view).unwrap_or_else(|_| "{}".to_string())
    }

    #[wasm_bindgen]
    pub fn navigate_view(key: String) {
        select_view(key);
    }

    async fn boot() -> Result<(), String> {
        let boot_started_at = Instant::now();
        DIAGNOSTICS.with(|state| {
            state.borrow_mut().boot_started_at_unix_ms = Some(epoch_millis_now());
        });

        ensure_status_element()?;
        let config = resolve_client_config()?;
        let page = detect_shell_page()?;
        DIAGNOSTICS.with(|state| {
            let mut state = state.borrow_mut();
            state.page = Some(page.as_str().to_string());
            state.api_base_url = Some(config.api_base_url.clone());
        });

        let transport: Rc<dyn HttpTransport> = Rc::new(GlooTransport);
        let storage = open_session_storage();
        let address: Rc<dyn AddressBar> = Rc::new(BrowserAddressBar);

        let detail = match page {
            ShellPage::Entry => {
                set_boot_phase("booting", "checking for an existing session");
                let feedback: Rc<dyn FeedbackPort> = Rc::new(DomFeedback::new()?);
                let entry = Rc::new(
                    EntryPage::new(&config, transport, storage, feedback, address)
                        .map_err(|error| error.to_string())?,
                );
                ENTRY_PAGE.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&entry)));
                install_entry_handlers()?;
                if entry.activate().await {
                    "session valid; opening dashboard"
                } else {
                    "sign-in forms ready"
                }
            }
            ShellPage::Dashboard => {
                set_boot_phase("booting", "validating session");
                let port: Rc<dyn ViewPort> = Rc::new(DomViewPort::new()?);
                let dashboard = Rc::new(
                    Dashboard::new(&config, transport, storage, port, address)
                        .map_err(|error| error.to_string())?,
                );
                DASHBOARD.with(|slot| *slot.borrow_mut() = Some(Rc::clone(&dashboard)));
                install_dashboard_handlers()?;
                let activation = dashboard.activate().await;
                DIAGNOSTICS.with(|state| {
                    let mut state = state.borrow_mut();
                    state.activation = Some(format!("{activation:?}"));
                    state.active_view = Some(dashboard.active_view().key.to_string());
                });
                "dashboard active"
            }
        };

        let boot_total_latency_ms =
            u64::try_from(boot_started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        DIAGNOSTICS.with(|state| {
            state.borrow_mut().boot_total_latency_ms = Some(boot_total_latency_ms);
        });
        set_boot_phase("ready", detail);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm::boot_diagnostics_json;

#[cfg(not(target_arch = "wasm32"))]
pub fn boot_diagnostics_json() -> String {
    "{\"phase\":\"native\",\"detail\":\"web shell diagnostics only available on wasm\"}".to_string()
}
