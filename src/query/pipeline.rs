//! Filter, search, sort, and pagination pipeline

use std::cmp::Ordering;

use serde_json::Value;

use super::{FiltersApplied, QueryParams, QueryResponse};
use crate::data::CarbonRecord;

/// Processes a dataset against query parameters, producing the response envelope
///
/// Stages run in a fixed order, each consuming the previous stage's output:
/// country filter, country-code filter, intensity bounds, search, sort,
/// pagination. Filters compose as an intersection, so only the sort stage
/// and pagination are order-sensitive.
pub fn process(records: &[CarbonRecord], params: &QueryParams) -> QueryResponse {
    let mut working: Vec<&CarbonRecord> = records.iter().collect();

    // Country filter: any comma-separated token matching as a
    // case-insensitive substring keeps the record.
    if let Some(raw) = &params.country {
        let tokens: Vec<String> = raw.split(',').map(|t| t.trim().to_lowercase()).collect();
        working.retain(|record| match &record.country {
            Some(country) => {
                let lowered = country.to_lowercase();
                tokens.iter().any(|token| lowered.contains(token.as_str()))
            }
            None => false,
        });
    }

    // Country-code filter: exact match against uppercased tokens.
    if let Some(raw) = &params.country_code {
        let tokens: Vec<String> = raw.split(',').map(|t| t.trim().to_uppercase()).collect();
        working.retain(|record| match record.effective_code() {
            Some(code) => tokens.iter().any(|token| code == token),
            None => false,
        });
    }

    // Intensity bounds: unparseable values disable the bound entirely.
    if let Some(min) = parse_number(params.min_intensity.as_deref()) {
        working.retain(|record| record.effective_intensity() >= min);
    }
    if let Some(max) = parse_number(params.max_intensity.as_deref()) {
        working.retain(|record| record.effective_intensity() <= max);
    }

    // Search: case-insensitive substring over the country name.
    if let Some(term) = &params.search {
        let term = term.to_lowercase();
        working.retain(|record| match &record.country {
            Some(country) => country.to_lowercase().contains(&term),
            None => false,
        });
    }

    // Sort: stable, so ties keep their upstream relative order.
    if let Some(field) = &params.sort {
        let descending = matches!(params.order.as_deref(), Some("desc"));
        working.sort_by(|a, b| {
            let ordering = compare_records(a, b, field);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }

    // Pagination: out-of-range pages clamp to an empty slice, never an error.
    let total = working.len();
    let page = parse_page(params.page.as_deref());
    let limit = parse_limit(params.limit.as_deref(), total);
    let start = usize::try_from(page - 1)
        .unwrap_or(usize::MAX)
        .saturating_mul(limit as usize);
    let data: Vec<CarbonRecord> = working
        .into_iter()
        .skip(start)
        .take(limit as usize)
        .cloned()
        .collect();
    let pages = if limit == 0 {
        0
    } else {
        (total as u64).div_ceil(limit)
    };

    QueryResponse {
        success: true,
        total,
        page,
        limit,
        pages,
        filters_applied: FiltersApplied {
            country: params.country.clone(),
            country_code: params.country_code.clone(),
            min_intensity: params.min_intensity.clone(),
            max_intensity: params.max_intensity.clone(),
            search: params.search.clone(),
            sort: params.sort.clone(),
            order: params.order.clone().unwrap_or_else(|| "asc".to_string()),
        },
        data,
    }
}

/// Returns the sorted set of distinct non-empty country names in a dataset
pub fn distinct_countries(records: &[CarbonRecord]) -> Vec<String> {
    let mut countries: Vec<String> = records
        .iter()
        .filter_map(|record| record.country.clone())
        .filter(|country| !country.is_empty())
        .collect();
    countries.sort();
    countries.dedup();
    countries
}

/// Parses an optional numeric parameter, treating malformed input as absent
fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
}

/// Parses the page parameter: 1-based, defaulting to 1 on absence or garbage
fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&page| page >= 1)
        .unwrap_or(1)
}

/// Parses the limit parameter, defaulting to the full filtered count
fn parse_limit(raw: Option<&str>, total: usize) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(total as u64)
}

/// Sort key for one record: the named field, else `carbon_intensity`,
/// else `intensity`, else zero
enum SortKey {
    Text(String),
    Number(f64),
}

fn sort_key(record: &CarbonRecord, field: &str) -> SortKey {
    match record.field_value(field) {
        Some(Value::String(s)) => SortKey::Text(s),
        Some(other) => SortKey::Number(other.as_f64().unwrap_or(0.0)),
        None => SortKey::Number(record.carbon_intensity.or(record.intensity).unwrap_or(0.0)),
    }
}

/// Compares two records by the named field
///
/// Textual values compare as strings; numeric values compare numerically.
/// When types mix, both sides compare textually.
fn compare_records(a: &CarbonRecord, b: &CarbonRecord, field: &str) -> Ordering {
    match (sort_key(a, field), sort_key(b, field)) {
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(&y),
        (SortKey::Text(x), SortKey::Number(y)) => x.cmp(&y.to_string()),
        (SortKey::Number(x), SortKey::Text(y)) => x.to_string().cmp(&y),
    }
}
