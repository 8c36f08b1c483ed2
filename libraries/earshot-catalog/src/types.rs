//! Types for the content service catalog endpoint.

use serde::{Deserialize, Serialize};

/// Configuration for connecting to the content service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Base URL of the service (e.g., "https://content.example.com")
    pub base_url: String,

    /// Path of the catalog endpoint
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token, if the service requires one
    #[serde(default)]
    pub access_token: Option<String>,
}

impl CatalogConfig {
    /// Create a config with just the base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            catalog_path: default_catalog_path(),
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }

    /// Use a bearer token for requests.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

fn default_catalog_path() -> String {
    "/api/audio".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Response body of the catalog endpoint.
///
/// `tracks` defaults to empty so `{ "success": false, "error": "..." }`
/// parses.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogResponse {
    pub success: bool,
    #[serde(default)]
    pub tracks: Vec<RemoteTrack>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A track as sent by the service, before normalization.
///
/// Fields are loosely typed on purpose: ids may be numbers or strings and the
/// audio URL may be missing, empty, or not a string at all.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteTrack {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default, rename = "audioUrl", alias = "audio_url")]
    pub audio_url: Option<serde_json::Value>,
}
