use crate::http::TransportError;
use crate::store::StorageError;

/// Form fields that must be non-empty before a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Identifier,
    Username,
    Email,
    Password,
}

impl Field {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identifier => "identifier",
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Identifier => "username or email",
            Self::Username => "username",
            Self::Email => "email address",
            Self::Password => "password",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Rejected,
    Network,
    Decode,
    Storage,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Unauthorized => "unauthorized",
            Self::Rejected => "rejected",
            Self::Network => "network",
            Self::Decode => "decode",
            Self::Storage => "storage",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("{0} must not be empty")]
    Validation(Field),
    #[error("no authenticated session is available")]
    MissingCredential,
    #[error("request was not authorized (status 401)")]
    Unauthorized,
    #[error("request failed with status {status}")]
    Rejected {
        status: u16,
        message: Option<String>,
    },
    #[error(transparent)]
    Network(#[from] TransportError),
    #[error("failed to decode response: {0}")]
    Decode(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::MissingCredential | Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Rejected { .. } => ErrorKind::Rejected,
            Self::Network(_) => ErrorKind::Network,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Display-safe text. Upstream messages are never shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(field) => format!("Please enter your {}.", field.label()),
            Self::MissingCredential | Self::Unauthorized => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Network(_) => "Could not reach the server. Please try again.".to_string(),
            Self::Rejected { .. } | Self::Decode(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Storage(_) => "Your session could not be saved in this browser.".to_string(),
        }
    }
}

/// Maps a non-success HTTP status onto the client error taxonomy.
#[must_use]
pub fn classify_status(status: u16, body: &str) -> ClientError {
    if status == 401 {
        return ClientError::Unauthorized;
    }
    let message = body.trim();
    ClientError::Rejected {
        status,
        message: (!message.is_empty()).then(|| message.to_string()),
    }
}
