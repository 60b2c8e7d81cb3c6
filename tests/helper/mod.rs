//! Test utilities

use std::fs;

use mockito::{Matcher, Mock, Server, ServerGuard};
use tempfile::TempDir;

use mobile_version::LookupConfig;
use mobile_version::config::EndpointsConfig;

pub async fn start_server() -> ServerGuard {
    Server::new_async().await
}

/// Config with the cache enabled in a fresh temp dir and both storefronts
/// pointed at `server`
pub fn create_test_config(server: &ServerGuard) -> (TempDir, LookupConfig) {
    let temp_dir = TempDir::new().unwrap();
    let config = LookupConfig {
        endpoints: EndpointsConfig {
            app_store: server.url(),
            play_store: server.url(),
        },
        ..LookupConfig::new("com.example.app")
            .with_cache_file(temp_dir.path().join("cache.json"))
            .with_cache_period(600)
    };

    (temp_dir, config)
}

/// App Store lookup mock answering with `version`
pub fn mock_app_store(server: &mut ServerGuard, version: &str) -> Mock {
    server
        .mock("GET", "/lookup")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("bundleId".into(), "com.example.app".into()),
            Matcher::UrlEncoded("country".into(), "br".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "text/javascript; charset=utf-8")
        .with_body(format!(
            r#"{{"resultCount": 1, "results": [{{"version": "{}"}}]}}"#,
            version
        ))
}

/// Google Play detail page mock answering with `html`
pub fn mock_play_store(server: &mut ServerGuard, html: &str) -> Mock {
    server
        .mock("GET", "/store/apps/details")
        .match_query(Matcher::UrlEncoded("id".into(), "com.example.app".into()))
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
}

pub fn read_cache_document(temp_dir: &TempDir) -> serde_json::Value {
    let contents = fs::read_to_string(temp_dir.path().join("cache.json")).unwrap();
    serde_json::from_str(&contents).unwrap()
}

/// Move an entry's expiry into the past
pub fn expire_entry(temp_dir: &TempDir, app_id: &str, platform: &str) {
    let path = temp_dir.path().join("cache.json");
    let mut document = read_cache_document(temp_dir);
    document[app_id][platform]["expired_at"] = "2000-01-01T00:00:00Z".into();
    fs::write(path, serde_json::to_string(&document).unwrap()).unwrap();
}
