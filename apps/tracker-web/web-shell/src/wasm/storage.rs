use super::*;

    pub(super) struct LocalStorage {
        storage: web_sys::Storage,
    }

    impl LocalStorage {
        pub(super) fn open() -> Result<Self, StorageError> {
            let window = web_sys::window()
                .ok_or_else(|| StorageError::Unavailable("window is unavailable".to_string()))?;
            let storage = window
                .local_storage()
                .map_err(|_| StorageError::Unavailable("localStorage access denied".to_string()))?
                .ok_or_else(|| StorageError::Unavailable("localStorage is missing".to_string()))?;
            Ok(Self { storage })
        }
    }

    impl KeyValueStorage for LocalStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage
                .get_item(key)
                .map_err(|_| StorageError::Unavailable(format!("failed to read `{key}`")))
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage
                .set_item(key, value)
                .map_err(|_| StorageError::Write {
                    key: key.to_string(),
                })
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.storage
                .remove_item(key)
                .map_err(|_| StorageError::Remove {
                    key: key.to_string(),
                })
        }
    }

    /// Falls back to in-memory storage so the pages still work (without
    /// persistence) when the browser blocks `localStorage`.
    pub(super) fn open_session_storage() -> Rc<dyn KeyValueStorage> {
        match LocalStorage::open() {
            Ok(storage) => Rc::new(storage),
            Err(error) => {
                tracing::warn!(%error, "falling back to in-memory session storage");
                DIAGNOSTICS.with(|state| {
                    state.borrow_mut().last_error = Some(error.to_string());
                });
                Rc::new(MemoryStorage::default())
            }
        }
    }
