//! Key/value service container shared between an app and its handlers.

use crate::error::{Error, Result};

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

type Service = Arc<dyn Any + Send + Sync>;

/// Cloning yields a handle to the same entries.
#[derive(Clone, Default)]
pub struct Container {
    entries: Arc<RwLock<HashMap<String, Service>>>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<T: Any + Send + Sync>(&self, key: impl Into<String>, value: T) {
        self.set_arc(key, Arc::new(value));
    }

    pub fn set_arc<T: Any + Send + Sync>(&self, key: impl Into<String>, value: Arc<T>) {
        let key = key.into();
        trace!(key = key.as_str(), service = std::any::type_name::<T>(), "container set");
        self.entries.write().insert(key, value);
    }

    /// `None` when the key is absent or holds another type.
    pub fn get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        let service = self.entries.read().get(key).cloned()?;
        service.downcast::<T>().ok()
    }

    pub fn require<T: Any + Send + Sync>(&self, key: &str) -> Result<Arc<T>> {
        self.get(key).ok_or_else(|| Error::ServiceNotFound {
            key: key.to_owned(),
        })
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.entries.write().remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.read();
        let mut keys: Vec<&String> = entries.keys().collect();
        keys.sort();
        f.debug_struct("Container").field("keys", &keys).finish()
    }
}
