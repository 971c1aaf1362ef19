use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) enum ShellPage {
        Entry,
        Dashboard,
    }

    impl ShellPage {
        pub(super) fn as_str(self) -> &'static str {
            match self {
                Self::Entry => "entry",
                Self::Dashboard => "dashboard",
            }
        }
    }

    pub(super) fn document() -> Result<Document, String> {
        let window = web_sys::window().ok_or_else(|| "window is unavailable".to_string())?;
        window
            .document()
            .ok_or_else(|| "document is unavailable".to_string())
    }

    pub(super) fn ensure_status_element() -> Result<HtmlElement, String> {
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| "document body is unavailable".to_string())?;

        let status = match document.get_element_by_id(STATUS_ELEMENT_ID) {
            Some(existing) => existing
                .dyn_into::<HtmlElement>()
                .map_err(|_| "status element exists but is not HtmlElement".to_string())?,
            None => {
                let element = document
                    .create_element("div")
                    .map_err(|_| "failed to create status element".to_string())?;
                element.set_id(STATUS_ELEMENT_ID);
                let status = element
                    .dyn_into::<HtmlElement>()
                    .map_err(|_| "status element is not HtmlElement".to_string())?;
                status.set_hidden(true);
                body.append_child(&status)
                    .map_err(|_| "failed to append status element".to_string())?;
                status
            }
        };
        status.set_inner_text("Boot: starting");
        Ok(status)
    }

    /// The page declares itself with `<body data-page="entry|dashboard">`;
    /// without the attribute the presence of the login form decides.
    pub(super) fn detect_shell_page() -> Result<ShellPage, String> {
        let document = document()?;
        let declared = document
            .body()
            .and_then(|body| body.get_attribute(PAGE_ATTRIBUTE))
            .map(|value| value.trim().to_ascii_lowercase());
        match declared.as_deref() {
            Some("entry") => Ok(ShellPage::Entry),
            Some("dashboard") => Ok(ShellPage::Dashboard),
            Some(other) => Err(format!("unknown page kind `{other}`")),
            None if document.get_element_by_id(LOGIN_FORM_ID).is_some() => Ok(ShellPage::Entry),
            None => Ok(ShellPage::Dashboard),
        }
    }

    pub(super) fn resolve_client_config() -> Result<ClientConfig, String> {
        let mut config = ClientConfig::default();
        if let Some(base) = page_global(API_BASE_GLOBAL) {
            config = config
                .with_api_base_url(&base)
                .map_err(|error| format!("{API_BASE_GLOBAL}: {error}"))?;
        }
        if let Some(view) = page_global(DEFAULT_VIEW_GLOBAL) {
            config = config.with_default_view(&view);
        }
        config.validate().map_err(|error| error.to_string())?;
        Ok(config)
    }

    fn page_global(name: &str) -> Option<String> {
        let window = web_sys::window()?;
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(name)).ok()?;
        let value = value.as_string()?.trim().to_string();
        if value.is_empty() { None } else { Some(value) }
    }

    pub(super) fn set_boot_phase(phase: &str, detail: &str) {
        DIAGNOSTICS.with(|state| state.borrow_mut().set_phase(phase, detail));
        update_status_dom(phase, detail, false);
    }

    pub(super) fn set_boot_error(message: &str) {
        DIAGNOSTICS.with(|state| state.borrow_mut().fail(message));
        tracing::error!(error = message, "web shell startup failed");
        update_status_dom("error", message, true);
    }

    pub(super) fn record_action(action: &str, error: Option<String>) {
        DIAGNOSTICS.with(|state| state.borrow_mut().record_action(action, error));
    }

    pub(super) fn record_active_view(key: &str) {
        DIAGNOSTICS.with(|state| state.borrow_mut().active_view = Some(key.to_string()));
    }

    fn update_status_dom(phase: &str, detail: &str, is_error: bool) {
        let Ok(document) = document() else {
            return;
        };
        let Some(status) = document.get_element_by_id(STATUS_ELEMENT_ID) else {
            return;
        };
        let Ok(status) = status.dyn_into::<HtmlElement>() else {
            return;
        };
        let label = if is_error { "Boot error" } else { "Boot" };
        status.set_inner_text(&format!("{label}: {phase} ({detail})"));
        let _ = status.set_attribute("data-phase", phase);
        status.set_hidden(!is_error);
    }

    pub(super) fn epoch_millis_now() -> u64 {
        let now = js_sys::Date::now();
        if !now.is_finite() || now.is_sign_negative() {
            return 0;
        }
        now.floor().min(u64::MAX as f64) as u64
    }
