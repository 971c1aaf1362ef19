use super::*;

    /// Dashboard DOM renderer. Every server-provided value goes through
    /// `text_content` or a quoted style value, never markup.
    pub(super) struct DomViewPort {
        document: Document,
    }

    impl DomViewPort {
        pub(super) fn new() -> Result<Self, String> {
            Ok(Self {
                document: document()?,
            })
        }

        fn by_id(&self, id: &str) -> Option<Element> {
            self.document.get_element_by_id(id)
        }

        fn first(&self, selector: &str) -> Option<Element> {
            self.document.query_selector(selector).ok().flatten()
        }

        fn create(&self, tag: &str, class: &str) -> Option<Element> {
            let element = self.document.create_element(tag).ok()?;
            if !class.is_empty() {
                element.set_class_name(class);
            }
            Some(element)
        }

        fn text_child(&self, parent: &Element, tag: &str, class: &str, text: &str) {
            if let Some(child) = self.create(tag, class) {
                child.set_text_content(Some(text));
                let _ = parent.append_child(&child);
            }
        }

        fn tracks_grid(&self) -> Option<Element> {
            if let Some(grid) = self.by_id(TRACKS_GRID_ID) {
                return Some(grid);
            }
            let body = self.first(PANEL_BODY_SELECTOR)?;
            let grid = self.create("div", "tracks-grid")?;
            grid.set_id(TRACKS_GRID_ID);
            body.append_child(&grid).ok()?;
            Some(grid)
        }

        fn notice_element(&self) -> Option<Element> {
            if let Some(notice) = self.by_id(NOTICE_ELEMENT_ID) {
                return Some(notice);
            }
            let host = self
                .first(MAIN_PANEL_SELECTOR)
                .or_else(|| self.document.body().map(Element::from))?;
            let notice = self.create("p", "notice")?;
            notice.set_id(NOTICE_ELEMENT_ID);
            let _ = notice.set_attribute("role", "status");
            host.append_child(&notice).ok()?;
            Some(notice)
        }
    }

    impl ViewPort for DomViewPort {
        fn render_view_descriptor(&self, descriptor: &ViewDescriptor) {
            if let Some(title) = self.by_id(PANEL_TITLE_ID) {
                title.set_text_content(Some(descriptor.title));
            }
            if let Some(lede) = self.by_id(PANEL_LEDE_ID) {
                lede.set_text_content(Some(descriptor.lede));
            }
            if let Some(badge) = self.by_id(PANEL_BADGE_ID) {
                badge.set_text_content(Some(descriptor.badge));
            }
            if let Some(placeholder) = self.by_id(PANEL_PLACEHOLDER_ID) {
                if let Some(text) = placeholder.query_selector(".muted").ok().flatten() {
                    text.set_text_content(Some(descriptor.placeholder));
                }
                if let Ok(placeholder) = placeholder.dyn_into::<HtmlElement>() {
                    placeholder.set_hidden(!descriptor.shows_placeholder());
                }
            }
            if let Some(panel) = self.first(MAIN_PANEL_SELECTOR) {
                let _ = panel.set_attribute(ACTIVE_VIEW_ATTRIBUTE, descriptor.key);
            }
        }

        fn highlight_nav(&self, key: &str) {
            for pill in select_all(&self.document, NAV_PILL_SELECTOR) {
                let active = pill.get_attribute(NAV_KEY_ATTRIBUTE).as_deref() == Some(key);
                let _ = pill.class_list().toggle_with_force("active", active);
                let _ = pill.set_attribute("aria-current", if active { "page" } else { "false" });
            }
        }

        fn set_locked(&self, locked: bool) {
            if let Some(body) = self.document.body() {
                let _ = body.class_list().toggle_with_force(LOCKED_BODY_CLASS, locked);
            }
            for overlay in select_all(&self.document, GATE_OVERLAY_SELECTOR) {
                let _ = overlay
                    .class_list()
                    .toggle_with_force(GATE_DISMISSED_CLASS, !locked);
            }
        }

        fn render_feed_rows(&self, rows: &[FeedRow]) {
            let Some(list) = self.by_id(CHART_LIST_ID) else {
                return;
            };
            list.set_text_content(None);
            for row in rows {
                let cells = row_cells(row);
                let Some(item) = self.create("li", "chart-row") else {
                    continue;
                };
                if !matches!(row, FeedRow::Entry(_)) {
                    let _ = item.class_list().add_1("chart-row-status");
                }
                self.text_child(&item, "span", "rank-pill", &cells.pill);
                if let Some(meta) = self.create("div", "chart-meta") {
                    self.text_child(&meta, "strong", "chart-title", &cells.title);
                    self.text_child(&meta, "span", "chart-artist muted", &cells.subtitle);
                    let _ = item.append_child(&meta);
                }
                self.text_child(&item, "span", "chart-id muted", &cells.trailing);
                let _ = list.append_child(&item);
            }
        }

        fn render_feed_caption(&self, caption: &FeedCaption) {
            if let Some(date) = self.by_id(CHART_DATE_ID) {
                date.set_text_content(Some(&caption.text));
            }
            if let Some(toggle) = self.by_id(CHART_TOGGLE_ID) {
                toggle.set_text_content(Some(caption.toggle_label));
            }
        }

        fn render_profile(&self, profile: &ProfileCard) {
            if let Some(name) = profile.display_name.as_deref()
                && let Some(title) = self.first(HERO_TITLE_SELECTOR)
            {
                title.set_text_content(Some(name));
            }
            if let Some(avatar) = self.first(AVATAR_SELECTOR)
                && let Some(style) = avatar_style(&profile.avatar)
            {
                avatar.set_text_content(Some(&style.text));
                let _ = avatar.class_list().toggle_with_force("has-image", style.has_image);
                if let Ok(avatar) = avatar.dyn_into::<HtmlElement>() {
                    let _ = avatar
                        .style()
                        .set_property("background-image", &style.background_image);
                }
            }
            if let Some(followers) = profile.followers_text()
                && let Some(stat) = self.first(FOLLOWERS_SELECTOR)
            {
                stat.set_text_content(Some(&followers));
            }
            if let Some(plan) = self.by_id(ACCOUNT_PLAN_ID) {
                plan.set_text_content(Some(&profile.plan_label));
            }
        }

        fn render_top_tracks(&self, view: &TopTracksView) {
            let Some(grid) = self.tracks_grid() else {
                return;
            };
            grid.set_text_content(None);
            if let Some(status) = top_tracks_status(view) {
                self.text_child(&grid, "p", "muted", status);
                return;
            }
            let TopTracksView::Cards(cards) = view else {
                return;
            };
            for card in cards {
                let Some(element) = self.create("article", "track-card") else {
                    continue;
                };
                if let Some(url) = card.image_url.as_deref()
                    && let Some(cover) = self.create("div", "track-cover")
                    && let Ok(cover) = cover.dyn_into::<HtmlElement>()
                {
                    let _ = cover
                        .style()
                        .set_property("background-image", &crate::markup::css_url(url));
                    let _ = element.append_child(&cover);
                }
                self.text_child(&element, "strong", "track-title", &card.title);
                self.text_child(&element, "span", "track-artists muted", &card.artists);
                let _ = grid.append_child(&element);
            }
        }

        fn show_notice(&self, message: &str) {
            if let Some(notice) = self.notice_element() {
                notice.set_text_content(Some(message));
                let _ = notice.class_list().add_1("show");
            }
        }
    }

    /// Sign-in page feedback line.
    pub(super) struct DomFeedback {
        document: Document,
    }

    impl DomFeedback {
        pub(super) fn new() -> Result<Self, String> {
            Ok(Self {
                document: document()?,
            })
        }
    }

    impl FeedbackPort for DomFeedback {
        fn show_feedback(&self, message: &str) {
            let Some(feedback) = self.document.get_element_by_id(FORM_FEEDBACK_ID) else {
                tracing::warn!(message, "feedback element missing");
                return;
            };
            feedback.set_text_content(Some(message));
            let _ = feedback.class_list().add_1("show");
        }
    }

    pub(super) fn select_all(document: &Document, selector: &str) -> Vec<Element> {
        let Ok(nodes) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }
