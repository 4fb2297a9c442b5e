//! Query and response types for the raw entries view

use serde::{Deserialize, Serialize};

use super::event::{HttpMethod, RequestEvent};
use crate::config::QueryConfig;
use crate::error::{Error, Result};

/// Lowest status code a filter may name
pub const STATUS_MIN: u16 = 100;
/// Highest status code a filter may name
pub const STATUS_MAX: u16 = 599;

/// Raw entries query as supplied by a caller (HTTP query string or CLI flags)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EntriesParams {
    /// Maximum entries to return; defaults to the configured limit
    pub limit: Option<i64>,
    /// Exact, uppercase HTTP verb
    pub method: Option<String>,
    /// Case-insensitive path substring
    pub path_contains: Option<String>,
    /// Lowest status, inclusive (default 100)
    pub status_min: Option<i64>,
    /// Highest status, inclusive (default 599)
    pub status_max: Option<i64>,
}

/// Validated, conjunctive filter over request events
#[derive(Debug, Clone, PartialEq)]
pub struct EntryFilter {
    /// Required verb, if any
    pub method: Option<HttpMethod>,
    /// Stored lowercased; matched case-insensitively
    pub path_contains: Option<String>,
    /// Inclusive status range
    pub status_min: u16,
    /// Inclusive status range
    pub status_max: u16,
    /// Number of most recent matches to keep
    pub limit: usize,
}

impl EntriesParams {
    /// Check every parameter against the accepted bounds and build a filter.
    ///
    /// Nothing is clamped or swapped: any out-of-contract value is an error.
    pub fn validate(&self, limits: &QueryConfig) -> Result<EntryFilter> {
        let limit = match self.limit {
            None => limits.default_limit,
            Some(n) if n >= 1 && n <= limits.max_limit as i64 => n as usize,
            Some(n) => {
                return Err(Error::validation(format!(
                    "limit must be between 1 and {}, got {n}",
                    limits.max_limit
                )))
            }
        };

        let method = self
            .method
            .as_deref()
            .map(str::parse::<HttpMethod>)
            .transpose()
            .map_err(|e| Error::validation(e.to_string()))?;

        let status_min = status_bound("status_min", self.status_min, STATUS_MIN)?;
        let status_max = status_bound("status_max", self.status_max, STATUS_MAX)?;
        if status_min > status_max {
            return Err(Error::validation(format!(
                "status_min ({status_min}) must not exceed status_max ({status_max})"
            )));
        }

        Ok(EntryFilter {
            method,
            path_contains: self
                .path_contains
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(str::to_lowercase),
            status_min,
            status_max,
            limit,
        })
    }
}

fn status_bound(name: &str, value: Option<i64>, default: u16) -> Result<u16> {
    match value {
        None => Ok(default),
        Some(v) if (i64::from(STATUS_MIN)..=i64::from(STATUS_MAX)).contains(&v) => Ok(v as u16),
        Some(v) => Err(Error::validation(format!(
            "{name} must be between {STATUS_MIN} and {STATUS_MAX}, got {v}"
        ))),
    }
}

impl EntryFilter {
    /// Whether an event satisfies every constraint
    pub fn matches(&self, event: &RequestEvent) -> bool {
        if let Some(method) = self.method {
            if event.method != method {
                return false;
            }
        }
        if let Some(needle) = &self.path_contains {
            if !event.path.to_lowercase().contains(needle.as_str()) {
                return false;
            }
        }
        (self.status_min..=self.status_max).contains(&event.status)
    }
}

/// Most recent matching events
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntriesPage {
    /// Matching events in log order
    pub entries: Vec<RequestEvent>,
    /// `entries.len()`
    pub count: usize,
}
