use thiserror::Error;

use crate::version::types::Platform;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,
}

/// Failure of a single storefront request
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorefrontError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request failed with status {status}")]
    RequestFailed { status: u16 },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for StorefrontError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            StorefrontError::RequestFailed {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            StorefrontError::InvalidResponse(e.to_string())
        } else {
            StorefrontError::ConnectionFailed(e.to_string())
        }
    }
}

/// Error returned by [`crate::version::lookup::AppVersion`]
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{} lookup failed: {source}", .platform.storefront_name())]
    Storefront {
        platform: Platform,
        #[source]
        source: StorefrontError,
    },
}

impl LookupError {
    /// The storefront failure behind this error, if any
    pub fn storefront_error(&self) -> Option<&StorefrontError> {
        match self {
            LookupError::Storefront { source, .. } => Some(source),
            LookupError::Configuration(_) => None,
        }
    }
}
