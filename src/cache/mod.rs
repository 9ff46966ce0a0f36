//! In-memory dataset cache
//!
//! This module provides the process-wide cache for the upstream dataset.
//! The cache refreshes on a time-to-live basis and supports graceful
//! degradation: when a refresh fails and an older dataset exists, the stale
//! copy is served instead of surfacing the error.

mod dataset;

pub use dataset::{CachedDataset, DatasetCache, CACHE_TTL_HOURS};
