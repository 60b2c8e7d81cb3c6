use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Defaults
// =============================================================================

/// Default cache period in seconds (10 minutes)
pub const DEFAULT_CACHE_PERIOD_SECS: u64 = 600;

/// Default App Store country code
pub const DEFAULT_COUNTRY: &str = "br";

/// Default timeout for storefront requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default base URL for the App Store lookup API
pub const DEFAULT_APP_STORE_URL: &str = "http://itunes.apple.com";

/// Default base URL for the Google Play web storefront
pub const DEFAULT_PLAY_STORE_URL: &str = "https://play.google.com";

/// Lookup configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    /// Bundle identifier (iOS) / package name (Android). Required.
    pub bundle_id: Option<String>,
    pub use_cache: bool,
    pub cache_file_path: Option<PathBuf>,
    /// Cache period in seconds
    pub cache_period: Option<u64>,
    pub http: HttpConfig,
    pub endpoints: EndpointsConfig,
}

impl LookupConfig {
    pub fn new(bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: Some(bundle_id.into()),
            ..Self::default()
        }
    }

    /// Enables the file cache at `path`
    pub fn with_cache_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.use_cache = true;
        self.cache_file_path = Some(path.into());
        self
    }

    pub fn with_cache_period(mut self, seconds: u64) -> Self {
        self.cache_period = Some(seconds);
        self
    }

    /// The cache is only consulted when it is switched on and has somewhere to live.
    pub fn cache_enabled(&self) -> bool {
        self.use_cache && self.cache_file_path.is_some()
    }

    pub fn cache_period(&self) -> Duration {
        Duration::from_secs(self.cache_period.unwrap_or(DEFAULT_CACHE_PERIOD_SECS))
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct HttpConfig {
    /// Request timeout in seconds, at least 1
    pub timeout_secs: u64,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }
}

/// Storefront base URLs
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EndpointsConfig {
    pub app_store: String,
    pub play_store: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            app_store: DEFAULT_APP_STORE_URL.to_string(),
            play_store: DEFAULT_PLAY_STORE_URL.to_string(),
        }
    }
}

/// Returns the path to the data directory for mobile-version.
/// Uses $XDG_DATA_HOME/mobile-version if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/mobile-version,
/// or ./mobile-version if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the default cache file.
pub fn cache_path() -> PathBuf {
    data_dir().join("cache.json")
}

/// Returns the path to the default log file.
pub fn log_path() -> PathBuf {
    data_dir().join("mobile-version.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("mobile-version")
}
