//! Aggregate metrics data models

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Aggregate view over the whole request log, recomputed on every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewSnapshot {
    /// Number of parsed events
    pub total_requests: u64,

    /// Mean latency in seconds, rounded to 6 places
    pub avg_response_time_seconds: f64,

    /// Most requested paths, at most 20, busiest first
    pub top_endpoints: TopEndpoints,

    /// Client and server error counts
    pub errors: ErrorBreakdown,

    /// Latency distribution
    pub latency: LatencySummary,

    /// Request counts per status class
    pub status_classes: StatusClassCounts,
}

/// Error counts by status class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ErrorBreakdown {
    /// Requests answered with 400..=499
    #[serde(rename = "4xx_count")]
    pub count_4xx: u64,

    /// Requests answered with 500..=599
    #[serde(rename = "5xx_count")]
    pub count_5xx: u64,

    /// `(4xx + 5xx) / total`, rounded to 6 places; 0.0 for an empty log
    pub error_rate: f64,
}

/// Single path with its request count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCount {
    /// Request path as logged
    pub path: String,
    /// Number of requests to it
    pub count: u64,
}

/// Ranked path counts.
///
/// Serialized as a JSON object whose key order is the ranking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopEndpoints(pub Vec<EndpointCount>);

impl TopEndpoints {
    /// Number of ranked paths
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no request was seen
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ranking order
    pub fn iter(&self) -> impl Iterator<Item = &EndpointCount> {
        self.0.iter()
    }
}

impl Serialize for TopEndpoints {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.path, &entry.count)?;
        }
        map.end()
    }
}

/// Latency percentiles in seconds (nearest-rank), rounded to 6 places
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    /// Median
    pub p50: f64,
    /// 95th percentile
    pub p95: f64,
    /// 99th percentile
    pub p99: f64,
    /// Slowest request
    pub max: f64,
}

/// Request counts per hundreds-band of status codes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusClassCounts {
    /// 1xx
    #[serde(rename = "1xx")]
    pub informational: u64,
    /// 2xx
    #[serde(rename = "2xx")]
    pub success: u64,
    /// 3xx
    #[serde(rename = "3xx")]
    pub redirection: u64,
    /// 4xx
    #[serde(rename = "4xx")]
    pub client_error: u64,
    /// 5xx
    #[serde(rename = "5xx")]
    pub server_error: u64,
}

impl StatusClassCounts {
    /// Count one status code into its band; codes outside 100..=599 are ignored
    pub fn record(&mut self, status: u16) {
        match status / 100 {
            1 => self.informational += 1,
            2 => self.success += 1,
            3 => self.redirection += 1,
            4 => self.client_error += 1,
            5 => self.server_error += 1,
            _ => {}
        }
    }
}
