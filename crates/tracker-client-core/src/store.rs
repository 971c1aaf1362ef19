use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::StorageKeys;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable: {0}")]
    Unavailable(String),
    #[error("failed to write `{key}`")]
    Write { key: String },
    #[error("failed to remove `{key}`")]
    Remove { key: String },
}

/// Synchronous string key/value storage, e.g. the browser's `localStorage`.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<BTreeMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// An authenticated session. All three fields are always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub subject_id: String,
    pub display_name: String,
    pub access_credential: String,
}

/// Session fields as they arrive from the identity service, possibly incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionRecord {
    pub subject_id: Option<String>,
    pub display_name: Option<String>,
    pub access_credential: Option<String>,
}

impl SessionRecord {
    /// Returns `None` unless every field is present and non-blank.
    #[must_use]
    pub fn into_session(self) -> Option<Session> {
        Some(Session {
            subject_id: non_blank(self.subject_id)?,
            display_name: non_blank(self.display_name)?,
            access_credential: non_blank(self.access_credential)?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub struct CredentialStore {
    storage: Rc<dyn KeyValueStorage>,
    keys: StorageKeys,
}

impl CredentialStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>, keys: StorageKeys) -> Self {
        Self { storage, keys }
    }

    /// Writes all three fields. When a write fails the previous session, if
    /// any, is put back; a partial session is never left behind.
    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let previous = self.load();
        let Err(error) = self.write_fields(session) else {
            return Ok(());
        };
        warn!(%error, "session write failed; restoring previous session");
        self.clear();
        if let Some(previous) = previous
            && let Err(restore_error) = self.write_fields(&previous)
        {
            warn!(error = %restore_error, "previous session could not be restored");
            self.clear();
        }
        Err(error)
    }

    fn write_fields(&self, session: &Session) -> Result<(), StorageError> {
        self.storage.set_item(&self.keys.subject_id, &session.subject_id)?;
        self.storage.set_item(&self.keys.display_name, &session.display_name)?;
        self.storage.set_item(&self.keys.access_credential, &session.access_credential)
    }

    /// Persists a record only when it is complete. Returns whether it was saved.
    pub fn save_record(&self, record: SessionRecord) -> Result<bool, StorageError> {
        match record.into_session() {
            Some(session) => self.save(&session).map(|()| true),
            None => {
                warn!("refusing to persist an incomplete session record");
                Ok(false)
            }
        }
    }

    /// Loads the stored session. Partial or unreadable state reads as anonymous.
    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let record = SessionRecord {
            subject_id: self.read(&self.keys.subject_id),
            display_name: self.read(&self.keys.display_name),
            access_credential: self.read(&self.keys.access_credential),
        };
        record.into_session()
    }

    #[must_use]
    pub fn access_credential(&self) -> Option<String> {
        self.load().map(|session| session.access_credential)
    }

    pub fn clear(&self) {
        // Credential first: a reader that races a failing removal still sees
        // an incomplete record, which loads as anonymous.
        for key in [
            &self.keys.access_credential,
            &self.keys.subject_id,
            &self.keys.display_name,
        ] {
            if let Err(error) = self.storage.remove_item(key) {
                warn!(key = %key, %error, "failed to remove session field");
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "failed to read session field");
                None
            }
        }
    }
}
