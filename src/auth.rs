//! Authenticated clients and permission checks for privileged handlers.

use crate::args::Args;
use crate::container::Container;
use crate::error::{Error, Result};

use std::sync::Arc;

/// Container key under which the current client is stored.
pub const CLIENT_KEY: &str = "client";

const DENIED: &str = "You're not allowed to perform this action.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub name: String,
    pub data: Args,
}

impl Permission {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Args::new(),
        }
    }

    pub fn with_data(mut self, data: Args) -> Self {
        self.data = data;
        self
    }
}

pub trait Client: Send + Sync {
    fn username(&self) -> &str;

    fn permissions(&self) -> &[Permission];

    /// Whether the client holds `name`. Implementations may also inspect `data`.
    fn has_permission(&self, name: &str, data: &Args) -> bool {
        let _ = data;
        self.permissions().iter().any(|p| p.name == name)
    }

    fn has_any_permission(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.has_permission(n, &Args::new()))
    }

    fn has_all_permissions(&self, names: &[&str]) -> bool {
        names.iter().all(|n| self.has_permission(n, &Args::new()))
    }
}

pub fn set_client(container: &Container, client: Arc<dyn Client>) {
    container.set(CLIENT_KEY, client);
}

pub fn client(container: &Container) -> Option<Arc<dyn Client>> {
    container
        .get::<Arc<dyn Client>>(CLIENT_KEY)
        .map(|c| Arc::clone(&*c))
}

/// Permission helpers for handlers that act on behalf of a client.
pub trait Privileged {
    fn container(&self) -> &Container;

    fn client(&self) -> Result<Arc<dyn Client>> {
        client(self.container()).ok_or_else(|| Error::Unauthorized("No client given.".to_owned()))
    }

    fn has_client(&self) -> bool {
        client(self.container()).is_some()
    }

    fn action_allowed(&self, action: &str, data: &Args) -> Result<bool> {
        Ok(self.client()?.has_permission(action, data))
    }

    fn force_permission(&self, action: &str, data: &Args) -> Result<()> {
        if self.action_allowed(action, data)? {
            Ok(())
        } else {
            Err(Error::AccessDenied(DENIED.to_owned()))
        }
    }

    fn force_any_permission(&self, names: &[&str]) -> Result<()> {
        if self.client()?.has_any_permission(names) {
            Ok(())
        } else {
            Err(Error::AccessDenied(DENIED.to_owned()))
        }
    }

    fn force_all_permissions(&self, names: &[&str]) -> Result<()> {
        if self.client()?.has_all_permissions(names) {
            Ok(())
        } else {
            Err(Error::AccessDenied(DENIED.to_owned()))
        }
    }
}
