//! Version extraction from storefront HTML
//!
//! Google Play has no public version API; the version is scraped from data
//! embedded in the app's detail page. The page structure is undocumented and
//! changes without notice, so the rule lives behind [`VersionExtractor`] and
//! can be swapped without touching the fetch or cache logic.

use std::sync::LazyLock;

use regex::Regex;

/// Default rule: a dotted numeric token right after the `[[["` marker of the
/// page's embedded data, e.g. `[[["1.2.3"]]`.
const EMBEDDED_DATA_PATTERN: &str = r#"\[\[\["(?P<version>\d+\.\d+\.\d+(?:\.\d+)*)"#;

static EMBEDDED_DATA: LazyLock<PatternExtractor> = LazyLock::new(PatternExtractor::embedded_data);

/// Trait for pulling a version string out of a storefront page
pub trait VersionExtractor: Send + Sync {
    /// Returns the first version found in `html`, or None if the page
    /// doesn't contain one
    fn extract_version(&self, html: &str) -> Option<String>;
}

/// Regex-based extractor
///
/// Uses the `version` named group when the pattern has one, otherwise the
/// first capture group, otherwise the whole match.
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    pattern: Regex,
}

impl PatternExtractor {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// Extractor for the JSON data embedded in the Google Play detail page
    pub fn embedded_data() -> Self {
        Self {
            pattern: Regex::new(EMBEDDED_DATA_PATTERN).expect("embedded data pattern is valid"),
        }
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::embedded_data()
    }
}

impl VersionExtractor for PatternExtractor {
    fn extract_version(&self, html: &str) -> Option<String> {
        let caps = self.pattern.captures(html)?;
        let matched = caps
            .name("version")
            .or_else(|| caps.get(1))
            .or_else(|| caps.get(0))?;

        let version = matched.as_str().trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}

/// Extracts a version from a Google Play page using the default rule
pub fn extract_version_from_html(html: &str) -> Option<String> {
    EMBEDDED_DATA.extract_version(html)
}
