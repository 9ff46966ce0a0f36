//! Query processing over the cached dataset
//!
//! Given the cached records and the request's query parameters, this module
//! applies filters, search, sort, and pagination, producing the response
//! envelope. Processing is a pure function of its inputs; all parameter
//! parsing is permissive, so malformed values disable a stage instead of
//! producing an error.

mod pipeline;

pub use pipeline::{distinct_countries, process};

use serde::{Deserialize, Serialize};

use crate::data::CarbonRecord;

/// Raw query parameters as received on the request
///
/// Every parameter is kept as an optional string: numeric parameters that
/// fail to parse silently disable their filter rather than rejecting the
/// request, so parsing happens inside the pipeline, not at extraction time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryParams {
    /// Comma-separated country name substrings (case-insensitive)
    pub country: Option<String>,
    /// Comma-separated country codes (exact, uppercased)
    pub country_code: Option<String>,
    /// Inclusive lower bound on carbon intensity
    pub min_intensity: Option<String>,
    /// Inclusive upper bound on carbon intensity
    pub max_intensity: Option<String>,
    /// Case-insensitive substring search over country names
    pub search: Option<String>,
    /// Field to sort by
    pub sort: Option<String>,
    /// Sort direction: "asc" (default) or "desc"
    pub order: Option<String>,
    /// Page number, 1-based
    pub page: Option<String>,
    /// Page size; defaults to the full filtered count
    pub limit: Option<String>,
}

/// Echo of the parameters a query was processed with
///
/// Raw values are echoed back verbatim (or null when absent); `order` is the
/// one parameter with a visible default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersApplied {
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub min_intensity: Option<String>,
    pub max_intensity: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: String,
}

/// Response envelope for the carbon intensity endpoint
#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    /// Always true; failures never reach envelope construction
    pub success: bool,
    /// Record count after filters, search, and sort, before pagination
    pub total: usize,
    /// Page that was served
    pub page: u64,
    /// Page size that was applied
    pub limit: u64,
    /// Total page count: ceil(total / limit), or 0 when limit is 0
    pub pages: u64,
    /// Echo of the raw input parameters
    pub filters_applied: FiltersApplied,
    /// The paginated slice of records
    pub data: Vec<CarbonRecord>,
}
