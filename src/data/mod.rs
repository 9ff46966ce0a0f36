//! Core data model for the carbon intensity API
//!
//! This module contains the record type returned by the upstream dataset
//! and the client used to fetch it. Upstream records are loosely shaped:
//! every field is optional and two fields have historical aliases, so the
//! accessors here encode the resolution order explicitly.

pub mod client;

pub use client::{CarbonClient, DatasetSource, FetchError};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One country's carbon intensity data point, as served by the upstream source
///
/// All fields are optional because the upstream dataset is not strictly
/// schema'd. Two aliases exist in the wild: `code` for `country_code` and
/// `intensity` for `carbon_intensity`. Unknown fields are preserved in
/// `extra` so records pass through the API verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonRecord {
    /// Country name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// ISO-like country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// Alias for `country_code` used by some dataset revisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Carbon intensity in gCO2/kWh
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbon_intensity: Option<f64>,
    /// Alias for `carbon_intensity` used by some dataset revisions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    /// Any other upstream fields, passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CarbonRecord {
    /// Returns the country code, preferring `country_code` over the `code` alias
    pub fn effective_code(&self) -> Option<&str> {
        self.country_code.as_deref().or(self.code.as_deref())
    }

    /// Returns the carbon intensity, resolving `carbon_intensity`, then the
    /// `intensity` alias, then defaulting to zero
    pub fn effective_intensity(&self) -> f64 {
        self.carbon_intensity.or(self.intensity).unwrap_or(0.0)
    }

    /// Resolves a named field to its JSON value, for sorting
    ///
    /// Known fields are checked first; anything else is looked up in the
    /// passthrough map. Returns `None` when the field is absent on this record.
    pub fn field_value(&self, name: &str) -> Option<Value> {
        match name {
            "country" => self.country.clone().map(Value::String),
            "country_code" => self.country_code.clone().map(Value::String),
            "code" => self.code.clone().map(Value::String),
            "carbon_intensity" => self.carbon_intensity.and_then(number_value),
            "intensity" => self.intensity.and_then(number_value),
            _ => self.extra.get(name).cloned(),
        }
    }
}

/// Converts an `f64` to a JSON number value, dropping NaN/infinity
fn number_value(n: f64) -> Option<Value> {
    serde_json::Number::from_f64(n).map(Value::Number)
}
