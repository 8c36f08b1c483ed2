//! HTTP catalog client.

use crate::error::{CatalogError, Result};
use crate::normalize::{normalize_tracks, select_tracks};
use crate::types::{CatalogConfig, CatalogResponse};
use async_trait::async_trait;
use earshot_core::{CatalogFilter, Track, TrackCatalog};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the content service's catalog endpoint.
///
/// # Example
///
/// ```ignore
/// use earshot_catalog::{CatalogClient, CatalogConfig};
/// use earshot_core::CatalogFilter;
///
/// let client = CatalogClient::new(CatalogConfig::new("https://content.example.com"))?;
/// let single = client.fetch(&CatalogFilter::Single("intro".into())).await?;
/// assert_eq!(single.len(), 1);
/// ```
pub struct CatalogClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base = config.base_url.trim().trim_end_matches('/');
        if !base.starts_with("http://") && !base.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let path = if config.catalog_path.starts_with('/') {
            config.catalog_path.clone()
        } else {
            format!("/{}", config.catalog_path)
        };

        let endpoint = Url::parse(&format!("{}{}", base, path))
            .map_err(|e| CatalogError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Earshot/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            endpoint,
            access_token: config.access_token,
        })
    }

    /// Full URL of the catalog endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Fetch and normalize the catalog.
    ///
    /// The filter key is sent as a `track` query parameter and also applied
    /// locally, so services that ignore the parameter still produce a
    /// single-track result.
    pub async fn fetch(&self, filter: &CatalogFilter) -> Result<Vec<Track>> {
        let mut request = self.http.get(self.endpoint.clone());
        if let Some(key) = filter.key() {
            request = request.query(&[("track", key)]);
        }
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        debug!(url = %self.endpoint, filter = ?filter, "Fetching track catalog");

        let response = request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                CatalogError::ServerUnreachable(e.to_string())
            } else {
                CatalogError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Catalog request failed");
            return Err(CatalogError::ServerError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body: CatalogResponse = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse catalog response: {}", e))
        })?;

        if !body.success {
            let message = body
                .error
                .unwrap_or_else(|| "service reported failure".to_string());
            warn!(error = %message, "Catalog service reported failure");
            return Err(CatalogError::Service(message));
        }

        let tracks = normalize_tracks(body.tracks, Some(&self.endpoint));
        let tracks = select_tracks(tracks, filter)?;

        info!(
            tracks = tracks.len(),
            unavailable = tracks.iter().filter(|t| !t.is_playable()).count(),
            "Loaded track catalog"
        );

        Ok(tracks)
    }
}

#[async_trait]
impl TrackCatalog for CatalogClient {
    async fn load(&self, filter: &CatalogFilter) -> earshot_core::Result<Vec<Track>> {
        self.fetch(filter).await.map_err(Into::into)
    }
}
