use std::cell::Cell;
use std::rc::Rc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::address::{query_value, without_query_param};
use crate::error::ClientError;
use crate::http::{ApiClient, decode_json};
use crate::port::{AddressBar, ViewPort};
use crate::profile::ProfileLoader;
use crate::session::SessionService;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionStatus {
    #[serde(default)]
    pub connected: bool,
}

/// Where a gate check left the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Unlocked,
    Locked,
    /// A 401 invalidated the session; the dashboard is locked and the user
    /// must sign in again.
    SessionLost,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorizationLink {
    authorization_url: String,
}

/// Locks the dashboard until the third-party account is confirmed linked.
///
/// Starts locked. Every path that cannot positively confirm the link ends in
/// [`ConnectionGate::lock`].
pub struct ConnectionGate {
    session: Rc<SessionService>,
    api: Rc<ApiClient>,
    port: Rc<dyn ViewPort>,
    address: Rc<dyn AddressBar>,
    profile: Rc<ProfileLoader>,
    connected_param: String,
    connected_value: String,
    locked: Cell<bool>,
}

impl ConnectionGate {
    pub fn new(
        session: Rc<SessionService>,
        port: Rc<dyn ViewPort>,
        address: Rc<dyn AddressBar>,
        profile: Rc<ProfileLoader>,
        connected_param: impl Into<String>,
        connected_value: impl Into<String>,
    ) -> Self {
        Self {
            api: session.api(),
            session,
            port,
            address,
            profile,
            connected_param: connected_param.into(),
            connected_value: connected_value.into(),
            locked: Cell::new(true),
        }
    }

    /// Anonymous clients are reported as not connected without a request.
    /// A 401 invalidates the session before the error is returned.
    pub async fn check_status(&self) -> Result<ConnectionStatus, ClientError> {
        let Some(credential) = self.session.credential() else {
            return Ok(ConnectionStatus::default());
        };
        let result = self
            .api
            .get(ApiClient::CONNECTION_STATUS_PATH, Some(&credential))
            .await
            .and_then(|response| decode_json::<ConnectionStatus>(&response));
        if let Err(error) = &result {
            if error.is_unauthorized() {
                self.session.invalidate();
            }
            warn!(kind = error.kind().as_str(), %error, "connection status check failed");
        }
        result
    }

    pub fn lock(&self) {
        self.locked.set(true);
        self.port.set_locked(true);
    }

    pub fn unlock(&self) {
        self.locked.set(false);
        self.port.set_locked(false);
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    /// Re-derives the lock from the status endpoint and loads the profile
    /// once unlocked. A failed check locks and shows a notice; a plain
    /// "not connected" locks silently.
    pub async fn refresh(&self) -> GateOutcome {
        match self.check_status().await {
            Ok(status) if status.connected => {
                self.unlock();
                self.load_profile().await
            }
            Ok(_) => {
                debug!("account not linked; dashboard stays locked");
                self.lock();
                GateOutcome::Locked
            }
            Err(error) => {
                self.lock();
                self.port.show_notice(&error.user_message());
                if error.is_unauthorized() {
                    GateOutcome::SessionLost
                } else {
                    GateOutcome::Locked
                }
            }
        }
    }

    /// Sends the browser to the provider's consent page.
    pub async fn begin_authorization(&self) -> Result<(), ClientError> {
        match self.authorization_url().await {
            Ok(url) => {
                info!("redirecting to account authorization");
                self.address.redirect(&url);
                Ok(())
            }
            Err(error) => {
                if error.is_unauthorized() {
                    self.session.invalidate();
                }
                warn!(kind = error.kind().as_str(), %error, "authorization could not start");
                self.lock();
                self.port.show_notice(&error.user_message());
                Err(error)
            }
        }
    }

    /// Handles the return leg of the authorization redirect. `None` when the
    /// address carries no marker.
    pub async fn consume_authorization_marker(&self) -> Option<GateOutcome> {
        let current = self.address.current_url();
        let marker = query_value(&current, &self.connected_param);
        if marker.as_deref() != Some(self.connected_value.as_str()) {
            return None;
        }
        info!("returned from account authorization");
        self.unlock();
        let outcome = self.load_profile().await;
        let current = self.address.current_url();
        if let Some(stripped) = without_query_param(&current, &self.connected_param) {
            self.address.replace_url(&stripped);
        }
        Some(outcome)
    }

    /// Only a 401 undoes the unlock; other profile failures keep the
    /// dashboard usable.
    async fn load_profile(&self) -> GateOutcome {
        match self.profile.load().await {
            Err(error) if error.is_unauthorized() => {
                self.lock();
                self.port.show_notice(&error.user_message());
                GateOutcome::SessionLost
            }
            _ => GateOutcome::Unlocked,
        }
    }

    async fn authorization_url(&self) -> Result<String, ClientError> {
        let credential = self
            .session
            .credential()
            .ok_or(ClientError::MissingCredential)?;
        let response = self
            .api
            .get(ApiClient::AUTHORIZATION_PATH, Some(&credential))
            .await?;
        let link = decode_json::<AuthorizationLink>(&response)?;
        let url = link.authorization_url.trim();
        if url.is_empty() {
            return Err(ClientError::Decode("authorization url is empty".to_string()));
        }
        Ok(url.to_string())
    }
}
