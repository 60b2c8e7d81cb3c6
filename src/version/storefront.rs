//! Storefront trait for fetching the latest published app version

use crate::version::error::StorefrontError;
use crate::version::types::Platform;

/// Trait for fetching the published version of an app from a storefront
#[async_trait::async_trait]
pub trait Storefront: Send + Sync {
    /// Returns the platform this storefront serves
    fn platform(&self) -> Platform;

    /// Fetches the latest published version of an app
    ///
    /// # Arguments
    /// * `app_id` - Bundle identifier (iOS) or package name (Android)
    /// * `country` - Storefront country code; ignored by storefronts without
    ///   regional catalogs
    ///
    /// # Returns
    /// * `Ok(String)` - The published version, e.g. "1.2.3"
    /// * `Err(StorefrontError)` - If the request or the extraction fails
    async fn fetch_latest_version(
        &self,
        app_id: &str,
        country: Option<&str>,
    ) -> Result<String, StorefrontError>;
}
