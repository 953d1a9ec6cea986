//! # Metric Descriptors
//!
//! Every metric the exporter can publish is identified by a [`MetricKey`] and
//! described once in the [`DescriptorTable`]: fully-qualified name, help text,
//! value kind and the ordered label schema emissions must follow.

use crate::error::{
    CollectError,
    Result,
};
use std::collections::HashMap;
use strum::{
    Display,
    EnumIter,
    IntoStaticStr,
};

pub const NAMESPACE: &str = "cloudflare";

/// Short name of an exported metric.
#[derive(Debug, Clone, Copy, Display, EnumIter, IntoStaticStr, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum MetricKey {
    // worker
    #[strum(serialize = "cputime")]
    WorkerCpuTime,
    #[strum(serialize = "errors")]
    WorkerErrors,
    #[strum(serialize = "requests")]
    WorkerRequests,
    #[strum(serialize = "subrequests")]
    WorkerSubrequests,

    // net
    #[strum(serialize = "bits")]
    NetBits,
    #[strum(serialize = "packets")]
    NetPackets,

    // waf
    #[strum(serialize = "events")]
    WafEvents,

    // http
    BytesByCacheStatus,
    RequestsByResponseCode,
    RequestsByCountry,
    BytesByCountry,
    ThreatsByCountry,
    RequestsByContentType,
    BytesByContentType,
    RequestsBySslVersion,
    RequestsByHttpVersion,
    TotalBytes,
    CachedBytes,
    EncryptedBytes,
    TotalRequests,
    CachedRequests,
    EncryptedRequests,

    // dns
    TotalQueries,
    UncachedQueries,
    StaledQueries,
    AverageResponseMilliseconds,
    MedianResponseMilliseconds,
    #[strum(serialize = "90th_response_milliseconds")]
    P90ResponseMilliseconds,
    #[strum(serialize = "99th__response_milliseconds")]
    P99ResponseMilliseconds,

    // exporter
    CycleSuccess,
    DatasetFailures,
    DatasetEmissions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

#[derive(Debug, Clone)]
pub struct MetricDescriptor {
    pub key: MetricKey,
    pub fq_name: String,
    pub help: &'static str,
    pub kind: MetricKind,
    pub label_names: &'static [&'static str],
}

const WORKER_LABELS: &[&str] = &["workerName", "accountName"];
const NET_LABELS: &[&str] = &[
    "attackID",
    "accountName",
    "attackProtocol",
    "mitigationType",
    "country",
    "destinationPort",
    "attackType",
];
const COUNTRY_LABELS: &[&str] = &["country", "zoneName"];
const CONTENT_TYPE_LABELS: &[&str] = &["contentType", "zoneName"];
const VERSION_LABELS: &[&str] = &["version", "zoneName"];
const ZONE_LABELS: &[&str] = &["zoneName"];
const DNS_LABELS: &[&str] = &[
    "zoneName",
    "queryName",
    "queryType",
    "responseCode",
    "responseCached",
    "coloName",
];

use MetricKey::*;
use MetricKind::*;

#[rustfmt::skip]
const CATALOGUE: &[(&str, MetricKey, &str, MetricKind, &[&str])] = &[
    ("worker", WorkerCpuTime, "CPU time consumed by worker", Gauge, &["workerName", "accountName", "percentile"]),
    ("worker", WorkerErrors, "Errors triggered by worker", Gauge, WORKER_LABELS),
    ("worker", WorkerRequests, "Requests received by worker", Gauge, WORKER_LABELS),
    ("worker", WorkerSubrequests, "Subrequests performed by worker", Gauge, WORKER_LABELS),

    ("net", NetBits, "Number of bits, labelled per AttackID", Gauge, NET_LABELS),
    ("net", NetPackets, "Number of packets, labelled per AttackID", Gauge, NET_LABELS),

    ("waf", WafEvents, "Cloudflare WAF Hits", Gauge, &["as", "country", "action", "ruleID", "zoneName"]),

    ("http", BytesByCacheStatus, "The total number of processed bytes labelled per cache status", Gauge, &["cacheStatus", "method", "contentType", "country", "zoneName"]),
    ("http", RequestsByResponseCode, "The total number of request, labelled per HTTP response codes", Gauge, &["responseCode", "zoneName"]),
    ("http", RequestsByCountry, "The total number of request, labeled per Country", Gauge, COUNTRY_LABELS),
    ("http", BytesByCountry, "The total number of bytes, labeled per Country", Gauge, COUNTRY_LABELS),
    ("http", ThreatsByCountry, "The total number of threats, labeled per Country", Gauge, COUNTRY_LABELS),
    ("http", RequestsByContentType, "The total number of request, labeled per content type", Gauge, CONTENT_TYPE_LABELS),
    ("http", BytesByContentType, "The total number of bytes, labeled per content type", Gauge, CONTENT_TYPE_LABELS),
    ("http", RequestsBySslVersion, "The total number of requests labeled per SSL type", Gauge, VERSION_LABELS),
    ("http", RequestsByHttpVersion, "The total number of requests labeled per HTTP version", Gauge, VERSION_LABELS),
    ("http", TotalBytes, "The total number of bytes sent", Gauge, ZONE_LABELS),
    ("http", CachedBytes, "The total number of bytes cached", Gauge, ZONE_LABELS),
    ("http", EncryptedBytes, "The total number of bytes encrypted", Gauge, ZONE_LABELS),
    ("http", TotalRequests, "The total number of requests served", Gauge, ZONE_LABELS),
    ("http", CachedRequests, "The total number of requests cached", Gauge, ZONE_LABELS),
    ("http", EncryptedRequests, "The total number of requests encrypted", Gauge, ZONE_LABELS),

    ("dns", TotalQueries, "DNS query count", Gauge, DNS_LABELS),
    ("dns", UncachedQueries, "DNS uncached query count", Gauge, DNS_LABELS),
    ("dns", StaledQueries, "DNS stale query count", Gauge, DNS_LABELS),
    ("dns", AverageResponseMilliseconds, "DNS average response time", Gauge, DNS_LABELS),
    ("dns", MedianResponseMilliseconds, "DNS median response time", Gauge, DNS_LABELS),
    ("dns", P90ResponseMilliseconds, "DNS 90th percentile response time", Gauge, DNS_LABELS),
    ("dns", P99ResponseMilliseconds, "DNS 99th percentile response time", Gauge, DNS_LABELS),

    ("exporter", CycleSuccess, "Whether the last collection cycle resolved its scopes", Gauge, &[]),
    ("exporter", DatasetFailures, "Failed scope iterations per dataset in the last cycle", Gauge, &["dataset"]),
    ("exporter", DatasetEmissions, "Samples emitted per dataset in the last cycle", Gauge, &["dataset"]),
];

/// Immutable lookup from [`MetricKey`] to its [`MetricDescriptor`].
#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    descriptors: HashMap<MetricKey, MetricDescriptor>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete catalogue of exported metrics.
    pub fn cloudflare() -> Result<Self> {
        let mut table = Self::new();
        for (subsystem, key, help, kind, label_names) in CATALOGUE {
            table.register(subsystem, *key, *help, *kind, *label_names)?;
        }
        Ok(table)
    }

    /// Adds a descriptor. Registering the same key twice is an error.
    pub fn register(
        &mut self,
        subsystem: &str,
        key: MetricKey,
        help: &'static str,
        kind: MetricKind,
        label_names: &'static [&'static str],
    ) -> Result<()> {
        if self.descriptors.contains_key(&key) {
            return Err(CollectError::DuplicateMetric(key));
        }
        let descriptor = MetricDescriptor {
            key,
            fq_name: format!("{NAMESPACE}_{subsystem}_{key}"),
            help,
            kind,
            label_names,
        };
        self.descriptors.insert(key, descriptor);
        Ok(())
    }

    pub fn lookup(&self, key: MetricKey) -> Result<&MetricDescriptor> {
        self.descriptors.get(&key).ok_or(CollectError::UnknownMetric(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
