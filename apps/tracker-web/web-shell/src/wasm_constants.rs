pub(crate) const STATUS_ELEMENT_ID: &str = "tracker-web-shell-status";
pub(crate) const PAGE_ATTRIBUTE: &str = "data-page";

pub(crate) const API_BASE_GLOBAL: &str = "__TRACKER_API_BASE__";
pub(crate) const DEFAULT_VIEW_GLOBAL: &str = "__TRACKER_DEFAULT_VIEW__";

// Entry page.
pub(crate) const LOGIN_FORM_ID: &str = "login-form";
pub(crate) const REGISTER_FORM_ID: &str = "register-form";
pub(crate) const FORM_FEEDBACK_ID: &str = "form-feedback";

// Dashboard.
pub(crate) const LOCKED_BODY_CLASS: &str = "locked";
pub(crate) const GATE_OVERLAY_SELECTOR: &str = ".gate-overlay";
pub(crate) const GATE_DISMISSED_CLASS: &str = "dismissed";
pub(crate) const NAV_PILL_SELECTOR: &str = ".nav-pill";
pub(crate) const NAV_KEY_ATTRIBUTE: &str = "data-tab";
pub(crate) const MAIN_PANEL_SELECTOR: &str = ".main-panel";
pub(crate) const ACTIVE_VIEW_ATTRIBUTE: &str = "data-active-tab";
pub(crate) const PANEL_TITLE_ID: &str = "panel-title";
pub(crate) const PANEL_LEDE_ID: &str = "panel-lede";
pub(crate) const PANEL_BADGE_ID: &str = "panel-badge";
pub(crate) const PANEL_PLACEHOLDER_ID: &str = "panel-placeholder";
pub(crate) const PANEL_BODY_SELECTOR: &str = ".panel-body";
pub(crate) const CONNECT_TRIGGER_SELECTOR: &str = ".spotify-login-trigger";
pub(crate) const LOGOUT_TRIGGER_SELECTOR: &str = ".logout-trigger";
pub(crate) const NOTICE_ELEMENT_ID: &str = "dashboard-notice";

pub(crate) const CHART_LIST_ID: &str = "chart-list";
pub(crate) const CHART_DATE_ID: &str = "chart-date";
pub(crate) const CHART_TOGGLE_ID: &str = "chart-toggle";
pub(crate) const CHART_REFRESH_ID: &str = "chart-refresh";
pub(crate) const TRACKS_GRID_ID: &str = "tracks-grid";

pub(crate) const HERO_TITLE_SELECTOR: &str = ".hero-text h1";
pub(crate) const AVATAR_SELECTOR: &str = ".avatar-placeholder";
pub(crate) const FOLLOWERS_SELECTOR: &str = "[data-stat=\"followers\"] strong";
pub(crate) const ACCOUNT_PLAN_ID: &str = "account-plan";
