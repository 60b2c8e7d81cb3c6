//! Version lookup layer
//!
//! This module fetches the latest published version of a mobile app from the
//! App Store and Google Play, and keeps recent answers in a file cache.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Storefront  │◀────│  AppVersion │────▶│    Cache    │
//! │  (fetch)    │     │  (lookup)   │     │  (storage)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐     ┌─────────────┐
//! │ Storefronts │────▶│  Extractor  │
//! │(ios,android)│     │(html scrape)│
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: JSON file cache with per-entry expiry
//! - [`extractor`]: Swappable rules for finding a version in storefront HTML
//! - [`lookup`]: Cache-backed lookup combining cache and storefronts
//! - [`storefront`]: Storefront trait for fetching versions from remote sources
//! - [`storefronts`]: Concrete storefront implementations (App Store, Google Play)
//! - [`error`]: Error types for cache, storefront and lookup operations
//! - [`types`]: Common types like `Platform`

pub mod cache;
pub mod error;
pub mod extractor;
pub mod lookup;
pub mod storefront;
pub mod storefronts;
pub mod types;
