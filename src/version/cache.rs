//! File-based version cache
//!
//! The whole cache is one JSON document keyed by app identifier and platform:
//!
//! ```json
//! {
//!   "com.example.app": {
//!     "ios": {"expired_at": "2026-10-19T12:10:00Z", "version": "1.2.3"},
//!     "android": {"expired_at": "2026-10-19T12:10:00Z", "version": "1.2.4"}
//!   }
//! }
//! ```
//!
//! Every store rewrites the whole document. Writes from one [`FileCache`] are
//! serialized, but separate processes sharing the file can still lose each
//! other's entries (last writer wins).

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[cfg(test)]
use mockall::automock;

use chrono::{DateTime, TimeDelta, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::version::error::CacheError;
use crate::version::types::Platform;

/// Trait for storing and retrieving cached versions
#[cfg_attr(test, automock)]
pub trait VersionStore: Send + Sync {
    /// Get the cached version if it has not expired yet
    ///
    /// Unreadable or malformed storage is reported as a miss.
    fn lookup(&self, app_id: &str, platform: Platform) -> Option<String>;

    /// Save a version that stays valid for `ttl`
    fn store(
        &self,
        app_id: &str,
        platform: Platform,
        version: &str,
        ttl: Duration,
    ) -> Result<(), CacheError>;
}

/// A cached version and the moment it stops being valid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(with = "expiry")]
    pub expired_at: DateTime<Utc>,
    pub version: String,
}

impl CacheEntry {
    pub fn new(version: impl Into<String>, ttl: Duration) -> Self {
        let now = Utc::now();
        let expired_at = TimeDelta::from_std(ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            expired_at,
            version: version.into(),
        }
    }

    /// An entry is fresh only while now is strictly before its expiry
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expired_at
    }
}

/// app id -> platform -> entry, entries kept as raw JSON until decoded
pub type CacheDocument = IndexMap<String, Value>;

/// Version cache persisted as a single JSON file
pub struct FileCache {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("Using cache file at {:?}", path);

        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Acquire write lock with proper error handling
    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, CacheError> {
        self.write_lock.lock().map_err(|_| CacheError::LockPoisoned)
    }

    /// Read the entry for a key regardless of its expiry
    pub fn entry(&self, app_id: &str, platform: Platform) -> Option<CacheEntry> {
        let document = self.load().ok()?;
        decode_entry(&document, app_id, platform)
    }

    /// Read the whole document. A missing file is an empty document.
    ///
    /// Only the outer app map is checked here; entries are decoded one at a
    /// time so a single bad entry never hides the rest of the file.
    pub fn load(&self) -> Result<CacheDocument, CacheError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CacheDocument::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&contents)?)
    }

    /// `<path>.tmp`, next to the cache file
    fn temp_path(&self) -> PathBuf {
        let mut temp_path = self.path.clone().into_os_string();
        temp_path.push(".tmp");
        PathBuf::from(temp_path)
    }

    /// Replace the file content with `document`, via a temp file and rename
    fn save(&self, document: &CacheDocument) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string(document)?;

        let temp_path = self.temp_path();
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}

fn decode_entry(
    document: &CacheDocument,
    app_id: &str,
    platform: Platform,
) -> Option<CacheEntry> {
    let value = document.get(app_id)?.get(platform.as_str())?;

    serde_json::from_value(value.clone())
        .inspect_err(|e| {
            debug!(
                "Ignoring malformed cache entry {}/{}: {}",
                app_id, platform, e
            )
        })
        .ok()
}

impl VersionStore for FileCache {
    fn lookup(&self, app_id: &str, platform: Platform) -> Option<String> {
        let document = self
            .load()
            .inspect_err(|e| debug!("Ignoring unreadable cache {:?}: {}", self.path, e))
            .ok()?;

        let entry = decode_entry(&document, app_id, platform)?;

        if !entry.is_fresh_at(Utc::now()) {
            debug!(
                "Cache entry for {}/{} expired at {}",
                app_id, platform, entry.expired_at
            );
            return None;
        }

        debug!("Cache hit for {}/{}: {}", app_id, platform, entry.version);
        Some(entry.version)
    }

    fn store(
        &self,
        app_id: &str,
        platform: Platform,
        version: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let _guard = self.lock_writes()?;

        // Only a file that isn't a JSON object is replaced wholesale
        let mut document = self
            .load()
            .inspect_err(|e| debug!("Starting new cache document: {}", e))
            .unwrap_or_default();

        let entry = CacheEntry::new(version, ttl);
        let expired_at = entry.expired_at;
        let value = serde_json::to_value(&entry)?;

        match document.get_mut(app_id).and_then(Value::as_object_mut) {
            Some(platforms) => {
                platforms.insert(platform.as_str().to_string(), value);
            }
            None => {
                let mut platforms = Map::new();
                platforms.insert(platform.as_str().to_string(), value);
                document.insert(app_id.to_string(), Value::Object(platforms));
            }
        }

        self.save(&document)?;

        info!(
            "Cached {}/{} = {} until {}",
            app_id, platform, version, expired_at
        );
        Ok(())
    }
}

/// Serde adapter for `expired_at`
///
/// Written as RFC 3339 UTC. Also reads the legacy `YYYY-MM-DD HH:MM:SS`
/// form, which is a naive timestamp in the host's local timezone.
mod expiry {
    use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const LEGACY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(
        value: &DateTime<Utc>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Secs, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid expiry timestamp: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
            return Some(value.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(raw, LEGACY_FORMAT).ok()?;
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}
