pub mod config;
pub mod logging;
pub mod version;

pub use config::LookupConfig;
pub use version::error::{LookupError, StorefrontError};
pub use version::lookup::AppVersion;
pub use version::types::Platform;
