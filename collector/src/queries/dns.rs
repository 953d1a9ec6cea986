use super::RestQuery;
use crate::window::CollectionWindow;

pub const METRICS: [&str; 7] = [
    "queryCount",
    "uncachedCount",
    "staleCount",
    "responseTimeAvg",
    "responseTimeMedian",
    "responseTime90th",
    "responseTime99th",
];

pub const DIMENSIONS: [&str; 5] = ["queryName", "queryType", "responseCode", "responseCached", "coloName"];

/// DNS analytics report of one zone, grouped by [`DIMENSIONS`].
pub fn query(window: &CollectionWindow, zone_id: &str) -> RestQuery {
    RestQuery {
        path: format!("zones/{zone_id}/dns_analytics/report"),
        params: vec![
            ("since", window.start_rfc3339()),
            ("until", window.end_rfc3339()),
            ("metrics", METRICS.join(",")),
            ("dimensions", DIMENSIONS.join(",")),
        ],
    }
}
