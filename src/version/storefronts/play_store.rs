//! Google Play detail page implementation

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, warn};

use crate::config::DEFAULT_PLAY_STORE_URL;
use crate::version::error::StorefrontError;
use crate::version::extractor::{PatternExtractor, VersionExtractor};
use crate::version::storefront::Storefront;
use crate::version::storefronts::build_url;
use crate::version::types::Platform;

/// Storefront implementation scraping the Google Play detail page
pub struct PlayStore {
    client: Client,
    base_url: String,
    extractor: Arc<dyn VersionExtractor>,
}

impl PlayStore {
    /// Creates a new PlayStore with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a new PlayStore that sends requests through `client`
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            extractor: Arc::new(PatternExtractor::embedded_data()),
        }
    }

    /// Replaces the rule used to find the version in the page
    pub fn with_extractor(mut self, extractor: Arc<dyn VersionExtractor>) -> Self {
        self.extractor = extractor;
        self
    }
}

impl Default for PlayStore {
    fn default() -> Self {
        Self::new(DEFAULT_PLAY_STORE_URL)
    }
}

#[async_trait::async_trait]
impl Storefront for PlayStore {
    fn platform(&self) -> Platform {
        Platform::Android
    }

    async fn fetch_latest_version(
        &self,
        app_id: &str,
        _country: Option<&str>,
    ) -> Result<String, StorefrontError> {
        let url = build_url(&self.base_url, "/store/apps/details", &[("id", app_id)])?;
        debug!("Fetching Google Play page: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();

        if !status.is_success() {
            warn!("Google Play returned status {}: {}", status, url);
            return Err(StorefrontError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;

        self.extractor.extract_version(&html).ok_or_else(|| {
            warn!("No version found in Google Play page for {}", app_id);
            StorefrontError::InvalidResponse("no version found in store page".to_string())
        })
    }
}
