use super::*;

    /// The browser location and history.
    pub(super) struct BrowserAddressBar;

    impl AddressBar for BrowserAddressBar {
        fn current_url(&self) -> String {
            web_sys::window()
                .and_then(|window| window.location().href().ok())
                .unwrap_or_default()
        }

        fn replace_url(&self, url: &str) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let Ok(history) = window.history() else {
                return;
            };
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(url));
        }

        fn redirect(&self, url: &str) {
            navigate_to(url);
        }

        fn redirect_after(&self, url: &str, delay: Duration) {
            let url = url.to_string();
            spawn_local(async move {
                sleep(delay).await;
                navigate_to(&url);
            });
        }
    }

    fn navigate_to(url: &str) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Err(error) = window.location().set_href(url) {
            tracing::warn!(url, ?error, "navigation failed");
        }
    }
