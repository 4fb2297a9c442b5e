//! Pure transforms from an event sequence to API payloads

mod aggregate;
mod query;

pub use aggregate::{percentile, round6, summarize, TOP_ENDPOINTS_LIMIT};
pub use query::select_entries;
