use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::error::{ClientError, Field};
use crate::http::{ApiClient, HttpResponse, HttpTransport, decode_json};
use crate::store::{CredentialStore, KeyValueStorage, Session, SessionRecord};

#[derive(Serialize)]
struct LoginRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

/// The identity service returns numeric ids today; strings are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SubjectId {
    Text(String),
    Number(serde_json::Number),
}

impl SubjectId {
    fn into_string(self) -> String {
        match self {
            Self::Text(value) => value,
            Self::Number(value) => value.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    #[serde(default)]
    id: Option<SubjectId>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default, alias = "sessionToken")]
    access_token: Option<String>,
}

impl SessionPayload {
    fn into_record(self) -> SessionRecord {
        SessionRecord {
            subject_id: self.id.map(SubjectId::into_string),
            display_name: self.username,
            access_credential: self.access_token,
        }
    }
}

/// Authentication against the identity service, backed by the credential store.
pub struct SessionService {
    api: Rc<ApiClient>,
    store: Rc<CredentialStore>,
}

impl SessionService {
    pub fn new(api: Rc<ApiClient>, store: Rc<CredentialStore>) -> Self {
        Self { api, store }
    }

    pub fn from_config(
        config: &ClientConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStorage>,
    ) -> Result<Self, ConfigError> {
        let api = ApiClient::new(&config.api_base_url, transport)?;
        let store = CredentialStore::new(storage, config.storage_keys.clone());
        Ok(Self::new(Rc::new(api), Rc::new(store)))
    }

    #[must_use]
    pub fn api(&self) -> Rc<ApiClient> {
        Rc::clone(&self.api)
    }

    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.store.load()
    }

    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.store.access_credential()
    }

    pub async fn login(&self, identifier: &str, password: &str) -> Result<Session, ClientError> {
        let identifier = required(identifier, Field::Identifier)?;
        let password = required(password, Field::Password)?;
        let response = self
            .api
            .post_json(
                ApiClient::LOGIN_PATH,
                &LoginRequest {
                    identifier,
                    password,
                },
                None,
            )
            .await
            .map_err(unauthenticated_failure)?;
        self.establish(&response, "login")
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ClientError> {
        let username = required(username, Field::Username)?;
        let email = required(email, Field::Email)?;
        let password = required(password, Field::Password)?;
        let response = self
            .api
            .post_json(
                ApiClient::REGISTER_PATH,
                &RegisterRequest {
                    username,
                    email,
                    password,
                },
                None,
            )
            .await
            .map_err(unauthenticated_failure)?;
        self.establish(&response, "register")
    }

    /// Checks the stored credential with the identity service.
    ///
    /// Anonymous clients never reach the network. Only a 401 clears the
    /// store; any other failure keeps the credential for the next attempt.
    pub async fn validate(&self) -> bool {
        let Some(credential) = self.credential() else {
            debug!("no stored credential; session is anonymous");
            return false;
        };
        match self.api.get(ApiClient::SESSION_PATH, Some(&credential)).await {
            Ok(_) => true,
            Err(error) if error.is_unauthorized() => {
                info!("stored session was rejected; clearing");
                self.store.clear();
                false
            }
            Err(error) => {
                warn!(kind = error.kind().as_str(), %error, "session check failed");
                false
            }
        }
    }

    pub async fn logout(&self) {
        if let Some(credential) = self.credential()
            && let Err(error) = self
                .api
                .post_empty(ApiClient::LOGOUT_PATH, Some(&credential))
                .await
        {
            debug!(%error, "logout notification failed");
        }
        self.store.clear();
        info!("signed out");
    }

    /// Drops the stored session after an authenticated call came back 401.
    pub fn invalidate(&self) {
        info!("session invalidated");
        self.store.clear();
    }

    fn establish(&self, response: &HttpResponse, action: &str) -> Result<Session, ClientError> {
        let record = decode_json::<SessionPayload>(response)?.into_record();
        let session = record
            .into_session()
            .ok_or_else(|| ClientError::Decode("session response is incomplete".to_string()))?;
        self.store.save(&session)?;
        info!(action, subject = %session.subject_id, "session established");
        Ok(session)
    }
}

fn required(value: &str, field: Field) -> Result<&str, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ClientError::Validation(field));
    }
    Ok(value)
}

/// A 401 from a credential-less endpoint means rejected input, not an
/// expired session.
fn unauthenticated_failure(error: ClientError) -> ClientError {
    match error {
        ClientError::Unauthorized => ClientError::Rejected {
            status: 401,
            message: None,
        },
        other => other,
    }
}
