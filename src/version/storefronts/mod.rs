//! Storefront implementations for fetching app versions

pub mod app_store;
pub mod play_store;

pub use app_store::AppStore;
pub use play_store::PlayStore;

use reqwest::Url;

use crate::version::error::StorefrontError;

/// Joins `base_url` and `path` and appends the query parameters
fn build_url(
    base_url: &str,
    path: &str,
    params: &[(&str, &str)],
) -> Result<Url, StorefrontError> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    Url::parse_with_params(&url, params)
        .map_err(|e| StorefrontError::ConnectionFailed(format!("invalid URL {}: {}", url, e)))
}
