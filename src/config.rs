//! Application settings, loadable from TOML.

use crate::error::Result;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prefix stripped from request paths before routing, e.g. `/api`.
    pub base_path: String,

    /// Registers an `OPTIONS` route next to every pattern.
    pub cors: bool,

    /// A request carrying this header gets error details in 500 responses.
    pub debug_header: Option<DebugHeader>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebugHeader {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_cors(mut self, cors: bool) -> Self {
        self.cors = cors;
        self
    }

    pub fn with_debug_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.debug_header = Some(DebugHeader {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}
