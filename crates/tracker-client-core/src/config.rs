use std::time::Duration;

use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_ENTRY_PAGE: &str = "index.html";
pub const DEFAULT_DASHBOARD_PAGE: &str = "page.html";
pub const DEFAULT_VIEW_KEY: &str = "welcome";
pub const VIEW_QUERY_PARAM: &str = "tab";
pub const CONNECTED_MARKER_PARAM: &str = "connected";
pub const CONNECTED_MARKER_VALUE: &str = "spotify";
pub const LIMITED_PAGE_SIZE: usize = 10;
pub const FULL_PAGE_SIZE: usize = 50;
pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(900);

pub const SUBJECT_ID_STORAGE_KEY: &str = "spotify-tracker-id";
pub const DISPLAY_NAME_STORAGE_KEY: &str = "spotify-tracker-user";
pub const ACCESS_CREDENTIAL_STORAGE_KEY: &str = "spotify-tracker-token";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("base url must not be empty")]
    EmptyBaseUrl,
    #[error("base url must be an http(s) url with a host and no query, fragment or credentials")]
    InvalidBaseUrl,
    #[error("default view `{0}` is not a known view")]
    UnknownDefaultView(String),
    #[error("limited page size must be positive and smaller than the full page size")]
    InvalidPageSizes,
}

/// Local storage keys for the three session fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub subject_id: String,
    pub display_name: String,
    pub access_credential: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            subject_id: SUBJECT_ID_STORAGE_KEY.to_string(),
            display_name: DISPLAY_NAME_STORAGE_KEY.to_string(),
            access_credential: ACCESS_CREDENTIAL_STORAGE_KEY.to_string(),
        }
    }
}

/// Everything the client services need to know about their deployment.
///
/// Built once at boot and handed to each service; nothing in the core reads
/// keys or paths from globals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub entry_page: String,
    pub dashboard_page: String,
    pub view_param: String,
    pub connected_param: String,
    pub connected_value: String,
    pub default_view: String,
    pub storage_keys: StorageKeys,
    pub limited_page_size: usize,
    pub full_page_size: usize,
    pub login_redirect_delay: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            entry_page: DEFAULT_ENTRY_PAGE.to_string(),
            dashboard_page: DEFAULT_DASHBOARD_PAGE.to_string(),
            view_param: VIEW_QUERY_PARAM.to_string(),
            connected_param: CONNECTED_MARKER_PARAM.to_string(),
            connected_value: CONNECTED_MARKER_VALUE.to_string(),
            default_view: DEFAULT_VIEW_KEY.to_string(),
            storage_keys: StorageKeys::default(),
            limited_page_size: LIMITED_PAGE_SIZE,
            full_page_size: FULL_PAGE_SIZE,
            login_redirect_delay: LOGIN_REDIRECT_DELAY,
        }
    }
}

impl ClientConfig {
    pub fn with_api_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base_url = normalize_base_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub fn with_default_view(mut self, key: &str) -> Self {
        let key = key.trim();
        if !key.is_empty() {
            self.default_view = key.to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_base_url(&self.api_base_url)?;
        if self.limited_page_size == 0 || self.limited_page_size >= self.full_page_size {
            return Err(ConfigError::InvalidPageSizes);
        }
        Ok(())
    }
}

/// Parses the API base into its canonical form without a trailing slash.
///
/// Endpoint paths are appended to the result, so a query, fragment or
/// embedded credentials are rejected.
pub fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyBaseUrl);
    }
    let parsed = Url::parse(trimmed).map_err(|_| ConfigError::InvalidBaseUrl)?;
    let has_host = parsed.host_str().is_some_and(|host| !host.is_empty());
    let is_http = matches!(parsed.scheme(), "http" | "https");
    let has_extras = parsed.query().is_some()
        || parsed.fragment().is_some()
        || !parsed.username().is_empty()
        || parsed.password().is_some();
    if !is_http || !has_host || has_extras {
        return Err(ConfigError::InvalidBaseUrl);
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}
