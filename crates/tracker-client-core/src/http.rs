use std::rc::Rc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{ConfigError, normalize_base_url};
use crate::error::{ClientError, classify_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub bearer_token: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("network request failed: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sends one request and hands back the raw status and body.
///
/// Implementations never interpret the status; classification happens in
/// [`ApiClient`].
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn HttpTransport>,
}

impl ApiClient {
    pub const REGISTER_PATH: &'static str = "/users";
    pub const LOGIN_PATH: &'static str = "/users/login";
    pub const SESSION_PATH: &'static str = "/users/session";
    pub const LOGOUT_PATH: &'static str = "/users/logout";
    pub const CONNECTION_STATUS_PATH: &'static str = "/spotify/status";
    pub const AUTHORIZATION_PATH: &'static str = "/spotify/login";
    pub const PROFILE_PATH: &'static str = "/spotify/profile";
    pub const TOP_TRACKS_PATH: &'static str = "/spotify/top-tracks";

    pub fn new(base_url: &str, transport: Rc<dyn HttpTransport>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            transport,
        })
    }

    #[must_use]
    pub fn chart_path(limit: usize) -> String {
        format!("/charts/global-top-50?limit={limit}")
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub async fn get(&self, path: &str, bearer: Option<&str>) -> Result<HttpResponse, ClientError> {
        self.dispatch(HttpRequest {
            method: HttpMethod::Get,
            url: self.endpoint(path),
            bearer_token: bearer.map(ToString::to_string),
            body: None,
        })
        .await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ClientError> {
        let body = serde_json::to_value(body).map_err(|error| {
            ClientError::Decode(format!("failed to serialize request body: {error}"))
        })?;
        self.dispatch(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(path),
            bearer_token: bearer.map(ToString::to_string),
            body: Some(body),
        })
        .await
    }

    pub async fn post_empty(
        &self,
        path: &str,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ClientError> {
        self.dispatch(HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint(path),
            bearer_token: bearer.map(ToString::to_string),
            body: None,
        })
        .await
    }

    async fn dispatch(&self, request: HttpRequest) -> Result<HttpResponse, ClientError> {
        debug!(
            method = request.method.as_str(),
            url = %request.url,
            authenticated = request.bearer_token.is_some(),
            "dispatching request"
        );
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(classify_status(response.status, &response.body))
        }
    }
}

pub fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ClientError> {
    serde_json::from_str(&response.body).map_err(|error| ClientError::Decode(error.to_string()))
}
