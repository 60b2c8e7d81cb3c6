//! Cache-backed version lookup
//!
//! Each call is a single pass: cache check, then on a miss one storefront
//! request followed by a best-effort cache write. There are no retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::{HttpConfig, LookupConfig};
use crate::version::cache::{FileCache, VersionStore};
use crate::version::error::LookupError;
use crate::version::storefront::Storefront;
use crate::version::storefronts::{AppStore, PlayStore};
use crate::version::types::Platform;

/// Looks up the published version of one app on both storefronts
pub struct AppVersion {
    bundle_id: String,
    cache_period: Duration,
    app_store: Arc<dyn Storefront>,
    play_store: Arc<dyn Storefront>,
    store: Option<Arc<dyn VersionStore>>,
}

impl AppVersion {
    /// Validates `config` and wires the default storefronts and file cache
    pub fn new(config: LookupConfig) -> Result<Self, LookupError> {
        let bundle_id = validate_bundle_id(config.bundle_id.as_deref())?;
        let client = build_client(&config.http)?;

        let app_store = AppStore::with_client(client.clone(), &config.endpoints.app_store);
        let play_store = PlayStore::with_client(client, &config.endpoints.play_store);

        let store: Option<Arc<dyn VersionStore>> = match &config.cache_file_path {
            Some(path) if config.use_cache => Some(Arc::new(FileCache::new(path))),
            _ => None,
        };

        info!(
            "Looking up {} (cache: {})",
            bundle_id,
            if store.is_some() { "on" } else { "off" }
        );

        Ok(Self::build(
            bundle_id,
            config.cache_period(),
            Arc::new(app_store),
            Arc::new(play_store),
            store,
        ))
    }

    /// Build an AppVersion with custom storefronts and store
    pub fn build(
        bundle_id: impl Into<String>,
        cache_period: Duration,
        app_store: Arc<dyn Storefront>,
        play_store: Arc<dyn Storefront>,
        store: Option<Arc<dyn VersionStore>>,
    ) -> Self {
        debug_assert_eq!(app_store.platform(), Platform::Ios);
        debug_assert_eq!(play_store.platform(), Platform::Android);

        Self {
            bundle_id: bundle_id.into(),
            cache_period,
            app_store,
            play_store,
            store,
        }
    }

    pub fn bundle_id(&self) -> &str {
        &self.bundle_id
    }

    /// Latest App Store version. `country` defaults to "br".
    pub async fn get_ios(&self, country: Option<&str>) -> Result<String, LookupError> {
        self.get(Platform::Ios, country).await
    }

    /// Latest Google Play version
    pub async fn get_android(&self) -> Result<String, LookupError> {
        self.get(Platform::Android, None).await
    }

    pub async fn get(
        &self,
        platform: Platform,
        country: Option<&str>,
    ) -> Result<String, LookupError> {
        if let Some(version) = self.cached(platform) {
            return Ok(version);
        }

        let version = self
            .storefront(platform)
            .fetch_latest_version(&self.bundle_id, country)
            .await
            .map_err(|source| LookupError::Storefront { platform, source })?;

        info!(
            "{} has {} version {}",
            self.bundle_id,
            platform.storefront_name(),
            version
        );

        self.remember(platform, &version);

        Ok(version)
    }

    fn storefront(&self, platform: Platform) -> &dyn Storefront {
        match platform {
            Platform::Ios => self.app_store.as_ref(),
            Platform::Android => self.play_store.as_ref(),
        }
    }

    fn cached(&self, platform: Platform) -> Option<String> {
        let store = self.store.as_ref()?;
        let version = store.lookup(&self.bundle_id, platform);
        if version.is_none() {
            debug!("Cache miss for {}/{}", self.bundle_id, platform);
        }
        version
    }

    /// The cache is an optimization: a failed write is logged and dropped.
    fn remember(&self, platform: Platform, version: &str) {
        let Some(store) = &self.store else {
            return;
        };

        let _ = store
            .store(&self.bundle_id, platform, version, self.cache_period)
            .inspect_err(|e| {
                warn!(
                    "Failed to cache version for {}/{}: {}",
                    self.bundle_id, platform, e
                )
            });
    }
}

fn validate_bundle_id(bundle_id: Option<&str>) -> Result<String, LookupError> {
    match bundle_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(LookupError::Configuration(
            "bundle id is required".to_string(),
        )),
    }
}

fn build_client(http: &HttpConfig) -> Result<Client, LookupError> {
    // A zero timeout would fail every request before it is sent
    if http.timeout_secs == 0 {
        return Err(LookupError::Configuration(
            "http timeout must be at least 1 second".to_string(),
        ));
    }
    if http.accept_invalid_certs {
        warn!("TLS certificate verification is disabled");
    }

    Client::builder()
        .user_agent(concat!("mobile-version/", env!("CARGO_PKG_VERSION")))
        .timeout(http.timeout())
        .danger_accept_invalid_certs(http.accept_invalid_certs)
        .build()
        .map_err(|e| LookupError::Configuration(format!("failed to create HTTP client: {}", e)))
}
