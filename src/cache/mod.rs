//! # Cache Module
//!
//! Short-lived, file-backed response cache for the inventory facade.
//!
//! ## Key Components
//!
//! - [`storage`] - Entry files on disk: digest naming, atomic writes, freshness checks
//! - [`service`] - Typed get/set over logical keys, tolerant of storage failures
//! - [`constants`] - File naming and key prefixes

pub mod constants;
pub mod service;
pub mod storage;

pub use service::ResponseCache;
pub use storage::{CacheEntry, CacheStorage};
