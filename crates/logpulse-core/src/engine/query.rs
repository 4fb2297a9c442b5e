//! Raw entries selection

use crate::models::{EntriesPage, EntryFilter, RequestEvent};

/// Keep the events matching `filter` and return the most recent `filter.limit`
/// of them, still in log order.
pub fn select_entries(events: &[RequestEvent], filter: &EntryFilter) -> EntriesPage {
    let matching: Vec<&RequestEvent> = events.iter().filter(|e| filter.matches(e)).collect();

    let skip = matching.len().saturating_sub(filter.limit);
    let entries: Vec<RequestEvent> = matching[skip..].iter().map(|e| (*e).clone()).collect();

    EntriesPage {
        count: entries.len(),
        entries,
    }
}
