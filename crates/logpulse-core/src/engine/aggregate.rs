//! Overview aggregation

use std::collections::HashMap;

use crate::models::{
    EndpointCount, ErrorBreakdown, LatencySummary, OverviewSnapshot, RequestEvent,
    StatusClassCounts, TopEndpoints,
};

/// Maximum number of paths reported in `top_endpoints`
pub const TOP_ENDPOINTS_LIMIT: usize = 20;

/// Round to 6 decimal places, halves away from zero.
///
/// Applied to every derived ratio and mean so snapshots are stable across
/// repeated reads of the same log.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Compute the overview snapshot for an event sequence.
///
/// The sequence is taken as-is; callers wanting a filtered overview filter
/// first. An empty sequence yields an all-zero snapshot.
pub fn summarize(events: &[RequestEvent]) -> OverviewSnapshot {
    let total = events.len() as u64;

    let mut latencies = Vec::with_capacity(events.len());
    let mut latency_sum = 0.0;
    let mut status_classes = StatusClassCounts::default();
    let mut count_4xx = 0u64;
    let mut count_5xx = 0u64;

    for event in events {
        latencies.push(event.latency_seconds);
        latency_sum += event.latency_seconds;
        status_classes.record(event.status);
        if event.is_client_error() {
            count_4xx += 1;
        } else if event.is_server_error() {
            count_5xx += 1;
        }
    }

    let avg_response_time_seconds = if total == 0 {
        0.0
    } else {
        round6(latency_sum / total as f64)
    };

    let error_rate = if total == 0 {
        0.0
    } else {
        round6((count_4xx + count_5xx) as f64 / total as f64)
    };

    latencies.sort_by(f64::total_cmp);
    let latency = LatencySummary {
        p50: round6(percentile(&latencies, 50.0)),
        p95: round6(percentile(&latencies, 95.0)),
        p99: round6(percentile(&latencies, 99.0)),
        max: round6(latencies.last().copied().unwrap_or(0.0)),
    };

    OverviewSnapshot {
        total_requests: total,
        avg_response_time_seconds,
        top_endpoints: top_endpoints(events, TOP_ENDPOINTS_LIMIT),
        errors: ErrorBreakdown {
            count_4xx,
            count_5xx,
            error_rate,
        },
        latency,
        status_classes,
    }
}

/// Nearest-rank percentile of an ascending slice; 0.0 when empty
pub fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (pct * sorted.len() as f64 / 100.0).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

/// Paths by request count descending; equal counts keep first-seen order
fn top_endpoints(events: &[RequestEvent], limit: usize) -> TopEndpoints {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(&str, u64)> = Vec::new();

    for event in events {
        let slot = *index.entry(event.path.as_str()).or_insert_with(|| {
            counts.push((event.path.as_str(), 0));
            counts.len() - 1
        });
        counts[slot].1 += 1;
    }

    // sort_by is stable, so ties stay in first-appearance order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);

    TopEndpoints(
        counts
            .into_iter()
            .map(|(path, count)| EndpointCount {
                path: path.to_string(),
                count,
            })
            .collect(),
    )
}
