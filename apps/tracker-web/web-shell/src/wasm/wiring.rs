use super::*;

    fn current_dashboard() -> Option<Rc<Dashboard>> {
        DASHBOARD.with(|slot| slot.borrow().clone())
    }

    fn current_entry_page() -> Option<Rc<EntryPage>> {
        ENTRY_PAGE.with(|slot| slot.borrow().clone())
    }

    fn listen(target: &Element, event: &str, callback: &EventHandler) -> Result<(), String> {
        target
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|_| format!("failed to attach `{event}` listener"))
    }

    fn mark_handlers_installed() {
        let lists = [&NAV_CLICK_HANDLERS, &CONNECT_CLICK_HANDLERS, &LOGOUT_CLICK_HANDLERS]
            .into_iter()
            .map(|handlers| handlers.with(|slot| slot.borrow().len()))
            .sum::<usize>();
        let singles = [
            &CHART_TOGGLE_HANDLER,
            &CHART_REFRESH_HANDLER,
            &LOGIN_SUBMIT_HANDLER,
            &REGISTER_SUBMIT_HANDLER,
        ]
        .into_iter()
        .filter(|handler| handler.with(|slot| slot.borrow().is_some()))
        .count();
        DIAGNOSTICS.with(|state| state.borrow_mut().handlers_installed = lists + singles);
    }

    /// Binds every dashboard control to the stored [`Dashboard`]. Runs once;
    /// later calls keep the existing listeners.
    pub(super) fn install_dashboard_handlers() -> Result<(), String> {
        let document = document()?;

        NAV_CLICK_HANDLERS.with(|slot| -> Result<(), String> {
            if !slot.borrow().is_empty() {
                return Ok(());
            }
            for pill in select_all(&document, NAV_PILL_SELECTOR) {
                let Some(key) = pill.get_attribute(NAV_KEY_ATTRIBUTE) else {
                    continue;
                };
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                    event.prevent_default();
                    select_view(key.clone());
                }));
                listen(&pill, "click", &callback)?;
                slot.borrow_mut().push(callback);
            }
            Ok(())
        })?;

        CONNECT_CLICK_HANDLERS.with(|slot| -> Result<(), String> {
            if !slot.borrow().is_empty() {
                return Ok(());
            }
            for trigger in select_all(&document, CONNECT_TRIGGER_SELECTOR) {
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                    event.prevent_default();
                    start_authorization();
                }));
                listen(&trigger, "click", &callback)?;
                slot.borrow_mut().push(callback);
            }
            Ok(())
        })?;

        LOGOUT_CLICK_HANDLERS.with(|slot| -> Result<(), String> {
            if !slot.borrow().is_empty() {
                return Ok(());
            }
            for trigger in select_all(&document, LOGOUT_TRIGGER_SELECTOR) {
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                    event.prevent_default();
                    let Some(dashboard) = current_dashboard() else {
                        return;
                    };
                    spawn_local(async move {
                        dashboard.logout().await;
                        record_action("logout", None);
                    });
                }));
                listen(&trigger, "click", &callback)?;
                slot.borrow_mut().push(callback);
            }
            Ok(())
        })?;

        if let Some(toggle) = document.get_element_by_id(CHART_TOGGLE_ID) {
            CHART_TOGGLE_HANDLER.with(|slot| -> Result<(), String> {
                if slot.borrow().is_some() {
                    return Ok(());
                }
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                    let Some(dashboard) = current_dashboard() else {
                        return;
                    };
                    spawn_local(async move {
                        let outcome = dashboard.toggle_feed().await;
                        record_action("chart_toggle", feed_failure(&outcome));
                    });
                }));
                listen(&toggle, "click", &callback)?;
                *slot.borrow_mut() = Some(callback);
                Ok(())
            })?;
        }

        if let Some(refresh) = document.get_element_by_id(CHART_REFRESH_ID) {
            CHART_REFRESH_HANDLER.with(|slot| -> Result<(), String> {
                if slot.borrow().is_some() {
                    return Ok(());
                }
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |_event| {
                    let Some(dashboard) = current_dashboard() else {
                        return;
                    };
                    spawn_local(async move {
                        let outcome = dashboard.refresh_feed().await;
                        record_action("chart_refresh", feed_failure(&outcome));
                    });
                }));
                listen(&refresh, "click", &callback)?;
                *slot.borrow_mut() = Some(callback);
                Ok(())
            })?;
        }

        mark_handlers_installed();
        Ok(())
    }

    pub(super) fn install_entry_handlers() -> Result<(), String> {
        let document = document()?;

        if let Some(form) = document.get_element_by_id(LOGIN_FORM_ID) {
            LOGIN_SUBMIT_HANDLER.with(|slot| -> Result<(), String> {
                if slot.borrow().is_some() {
                    return Ok(());
                }
                let source = form.clone();
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                    event.prevent_default();
                    let Some(page) = current_entry_page() else {
                        return;
                    };
                    let identifier = form_field(&source, "identifier");
                    let password = form_field(&source, "password");
                    spawn_local(async move {
                        let outcome = page.submit_login(&identifier, &password).await;
                        record_action("login", entry_failure(&outcome));
                    });
                }));
                listen(&form, "submit", &callback)?;
                *slot.borrow_mut() = Some(callback);
                Ok(())
            })?;
        }

        if let Some(form) = document.get_element_by_id(REGISTER_FORM_ID) {
            REGISTER_SUBMIT_HANDLER.with(|slot| -> Result<(), String> {
                if slot.borrow().is_some() {
                    return Ok(());
                }
                let source = form.clone();
                let callback = Closure::<dyn FnMut(web_sys::Event)>::wrap(Box::new(move |event| {
                    event.prevent_default();
                    let Some(page) = current_entry_page() else {
                        return;
                    };
                    let username = form_field(&source, "username");
                    let email = form_field(&source, "email");
                    let password = form_field(&source, "password");
                    spawn_local(async move {
                        let outcome = page.submit_register(&username, &email, &password).await;
                        record_action("register", entry_failure(&outcome));
                    });
                }));
                listen(&form, "submit", &callback)?;
                *slot.borrow_mut() = Some(callback);
                Ok(())
            })?;
        }

        mark_handlers_installed();
        Ok(())
    }

    /// Switches the dashboard view and loads its data.
    pub(super) fn select_view(key: String) {
        let Some(dashboard) = current_dashboard() else {
            record_action("select_view", Some("dashboard is not active".to_string()));
            return;
        };
        spawn_local(async move {
            let load = dashboard.select_view(&key).await;
            record_active_view(dashboard.active_view().key);
            tracing::debug!(view = %key, ?load, "view selected");
            record_action("select_view", None);
        });
    }

    fn start_authorization() {
        let Some(dashboard) = current_dashboard() else {
            return;
        };
        spawn_local(async move {
            let error = dashboard.connect().await.err().map(|error| error.to_string());
            record_action("connect", error);
        });
    }

    fn form_field(form: &Element, name: &str) -> String {
        form.query_selector(&format!("[name=\"{name}\"]"))
            .ok()
            .flatten()
            .and_then(|field| field.dyn_into::<HtmlInputElement>().ok())
            .map(|field| field.value())
            .unwrap_or_default()
    }

    fn feed_failure(outcome: &FeedOutcome) -> Option<String> {
        matches!(outcome, FeedOutcome::Failed).then(|| "chart load failed".to_string())
    }

    fn entry_failure(outcome: &EntryOutcome) -> Option<String> {
        match outcome {
            EntryOutcome::RedirectScheduled => None,
            EntryOutcome::Invalid(field) => Some(format!("invalid {field:?}")),
            EntryOutcome::Failed(kind) => Some(format!("{kind:?}")),
        }
    }
