//! Carbon Intensity API Library
//!
//! This module exposes the cache, data, query, and API modules for use in
//! the server binary and in integration tests.

pub mod api;
pub mod cache;
pub mod data;
pub mod query;
