//! App Store lookup API implementation

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::{DEFAULT_APP_STORE_URL, DEFAULT_COUNTRY};
use crate::version::error::StorefrontError;
use crate::version::storefront::Storefront;
use crate::version::storefronts::build_url;
use crate::version::types::Platform;

/// Response from the App Store lookup API
#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    version: Option<String>,
}

/// Storefront implementation for the App Store lookup API
pub struct AppStore {
    client: Client,
    base_url: String,
}

impl AppStore {
    /// Creates a new AppStore with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a new AppStore that sends requests through `client`
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(DEFAULT_APP_STORE_URL)
    }
}

#[async_trait::async_trait]
impl Storefront for AppStore {
    fn platform(&self) -> Platform {
        Platform::Ios
    }

    async fn fetch_latest_version(
        &self,
        app_id: &str,
        country: Option<&str>,
    ) -> Result<String, StorefrontError> {
        let country = country.unwrap_or(DEFAULT_COUNTRY);
        let url = build_url(
            &self.base_url,
            "/lookup",
            &[("bundleId", app_id), ("country", country)],
        )?;
        debug!("Fetching App Store lookup: {}", url);

        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();

        if !status.is_success() {
            warn!("App Store returned status {}: {}", status, url);
            return Err(StorefrontError::RequestFailed {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        parse_lookup_response(&body)
    }
}

/// Extracts `results[0].version` from a lookup API body
fn parse_lookup_response(body: &str) -> Result<String, StorefrontError> {
    if body.trim().is_empty() {
        return Err(StorefrontError::InvalidResponse(
            "empty response body".to_string(),
        ));
    }

    let lookup: LookupResponse = serde_json::from_str(body).map_err(|e| {
        warn!("Failed to parse App Store lookup response: {}", e);
        StorefrontError::InvalidResponse(e.to_string())
    })?;

    lookup
        .results
        .into_iter()
        .next()
        .and_then(|result| result.version)
        .filter(|version| !version.is_empty())
        .ok_or_else(|| {
            StorefrontError::InvalidResponse("no version in lookup results".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use rstest::rstest;

    #[tokio::test]
    async fn fetch_latest_version_returns_version_of_first_result() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lookup")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("bundleId".into(), "com.example.app".into()),
                Matcher::UrlEncoded("country".into(), "br".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "text/javascript; charset=utf-8")
            .with_body(
                r#"{
                    "resultCount": 1,
                    "results": [
                        {"bundleId": "com.example.app", "version": "1.2.3"}
                    ]
                }"#,
            )
            .create_async()
            .await;

        let store = AppStore::new(&server.url());
        let result = store
            .fetch_latest_version("com.example.app", None)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "1.2.3");
    }

    #[tokio::test]
    async fn fetch_latest_version_sends_requested_country() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lookup")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("bundleId".into(), "com.example.app".into()),
                Matcher::UrlEncoded("country".into(), "us".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"resultCount": 1, "results": [{"version": "4.0.0"}]}"#)
            .create_async()
            .await;

        let store = AppStore::new(&server.url());
        let result = store
            .fetch_latest_version("com.example.app", Some("us"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(result, "4.0.0");
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_request_failed_for_error_status() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lookup")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .create_async()
            .await;

        let store = AppStore::new(&server.url());
        let result = store.fetch_latest_version("com.example.app", None).await;

        mock.assert_async().await;
        assert_eq!(result, Err(StorefrontError::RequestFailed { status: 503 }));
    }

    #[tokio::test]
    async fn fetch_latest_version_returns_invalid_response_for_unknown_app() {
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/lookup")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"resultCount": 0, "results": []}"#)
            .create_async()
            .await;

        let store = AppStore::new(&server.url());
        let result = store.fetch_latest_version("com.unknown.app", None).await;

        mock.assert_async().await;
        assert!(matches!(result, Err(StorefrontError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn fetch_latest_version_handles_connection_error() {
        // Nothing listens on port 1
        let store = AppStore::new("http://127.0.0.1:1");
        let result = store.fetch_latest_version("com.example.app", None).await;

        assert!(matches!(result, Err(StorefrontError::ConnectionFailed(_))));
    }

    #[rstest]
    #[case("")]
    #[case("   \n")]
    #[case("<html>not json</html>")]
    #[case(r#"{"resultCount": 0}"#)]
    #[case(r#"{"results": []}"#)]
    #[case(r#"{"results": [{"trackName": "Example"}]}"#)]
    #[case(r#"{"results": [{"version": ""}]}"#)]
    fn parse_lookup_response_rejects_unusable_bodies(#[case] body: &str) {
        assert!(matches!(
            parse_lookup_response(body),
            Err(StorefrontError::InvalidResponse(_))
        ));
    }

    #[test]
    fn parse_lookup_response_uses_first_result_only() {
        let body = r#"{"results": [{"version": "2.0.0"}, {"version": "1.0.0"}]}"#;

        assert_eq!(parse_lookup_response(body), Ok("2.0.0".to_string()));
    }
}
