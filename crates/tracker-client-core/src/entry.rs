use std::rc::Rc;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ClientError, ErrorKind, Field};
use crate::http::HttpTransport;
use crate::port::{AddressBar, FeedbackPort};
use crate::session::SessionService;
use crate::store::{KeyValueStorage, Session};

const LOGIN_SUCCESS: &str = "Login successful! Redirecting ...";
const REGISTER_SUCCESS: &str = "Registration successful! Redirecting ...";
const LOGIN_FAILED: &str = "Login failed. Please check your details.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    RedirectScheduled,
    Invalid(Field),
    Failed(ErrorKind),
}

/// The sign-in page: login and registration forms plus the existing-session
/// shortcut to the dashboard.
pub struct EntryPage {
    session: SessionService,
    feedback: Rc<dyn FeedbackPort>,
    address: Rc<dyn AddressBar>,
    dashboard_page: String,
    redirect_delay: Duration,
}

impl EntryPage {
    pub fn new(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStorage>,
        feedback: Rc<dyn FeedbackPort>,
        address: Rc<dyn AddressBar>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            session: SessionService::from_config(config, transport, storage)?,
            feedback,
            address,
            dashboard_page: config.dashboard_page.clone(),
            redirect_delay: config.login_redirect_delay,
        })
    }

    /// Skips the forms when the stored session is still valid. Returns
    /// whether the page is being left.
    pub async fn activate(&self) -> bool {
        if self.session.validate().await {
            info!("existing session is valid; opening dashboard");
            self.address.redirect(&self.dashboard_page);
            return true;
        }
        false
    }

    pub async fn submit_login(&self, identifier: &str, password: &str) -> EntryOutcome {
        let result = self.session.login(identifier, password).await;
        self.finish(result, LOGIN_SUCCESS, LOGIN_FAILED)
    }

    pub async fn submit_register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> EntryOutcome {
        let result = self.session.register(username, email, password).await;
        self.finish(result, REGISTER_SUCCESS, REGISTER_FAILED)
    }

    #[must_use]
    pub fn session(&self) -> &SessionService {
        &self.session
    }

    fn finish(
        &self,
        result: Result<Session, ClientError>,
        success: &str,
        failure: &str,
    ) -> EntryOutcome {
        match result {
            Ok(_) => {
                self.feedback.show_feedback(success);
                self.address
                    .redirect_after(&self.dashboard_page, self.redirect_delay);
                EntryOutcome::RedirectScheduled
            }
            Err(ClientError::Validation(field)) => {
                self.feedback
                    .show_feedback(&ClientError::Validation(field).user_message());
                EntryOutcome::Invalid(field)
            }
            Err(error) => {
                warn!(kind = error.kind().as_str(), %error, "sign-in request failed");
                let message = match error.kind() {
                    ErrorKind::Network | ErrorKind::Storage => error.user_message(),
                    _ => failure.to_string(),
                };
                self.feedback.show_feedback(&message);
                EntryOutcome::Failed(error.kind())
            }
        }
    }
}
