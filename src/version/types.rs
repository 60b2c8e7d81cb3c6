//! Common types for version lookups

use std::fmt;

/// Mobile platform whose storefront is queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Apple App Store (lookup API)
    Ios,
    /// Google Play (web detail page)
    Android,
}

impl Platform {
    /// Returns the string representation of the platform
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    /// Human readable storefront name, used in error messages
    pub fn storefront_name(&self) -> &'static str {
        match self {
            Platform::Ios => "App Store",
            Platform::Android => "Google Play",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Platform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(()),
        }
    }
}
