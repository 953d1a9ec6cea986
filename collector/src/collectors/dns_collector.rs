use crate::{
    client::CloudflareClient,
    collectors::collector::{
        collect_zones,
        CycleContext,
        DatasetCollector,
        DatasetReport,
        ZoneFuture,
    },
    descriptors::MetricKey,
    emission::Emission,
    error::{
        CollectError,
        Result,
    },
    queries::{
        self,
        dns::{
            DIMENSIONS,
            METRICS,
        },
    },
    responses::{
        DnsReport,
        DnsRow,
    },
    scope::{
        ScopeId,
        Zone,
        ZoneFilter,
    },
    window::CollectionWindow,
};
use cloudflare_exporter_config::Dataset;
use std::{
    future::Future,
    pin::Pin,
};

/// Report metric name and the key it is exported under.
const METRIC_KEYS: [(&str, MetricKey); 7] = [
    ("queryCount", MetricKey::TotalQueries),
    ("uncachedCount", MetricKey::UncachedQueries),
    ("staleCount", MetricKey::StaledQueries),
    ("responseTimeAvg", MetricKey::AverageResponseMilliseconds),
    ("responseTimeMedian", MetricKey::MedianResponseMilliseconds),
    ("responseTime90th", MetricKey::P90ResponseMilliseconds),
    ("responseTime99th", MetricKey::P99ResponseMilliseconds),
];

/// Collects the DNS analytics report per zone over the REST API.
pub struct DnsCollector {
    client: CloudflareClient,
    filter: ZoneFilter,
    concurrency: usize,
}

impl DnsCollector {
    pub fn new(client: CloudflareClient, filter: ZoneFilter, concurrency: usize) -> Self {
        Self {
            client,
            filter,
            concurrency,
        }
    }

    async fn collect_zone(&self, window: &CollectionWindow, zone: &Zone) -> Result<Vec<Emission>> {
        info!(zone = %zone.name, start = %window.start_rfc3339(), end = %window.end_rfc3339(), "Getting DNS metrics");
        let query = queries::build(Dataset::Dns, window, ScopeId::Zone(&zone.id))?;
        let report: DnsReport = self.client.execute(&query).await?;
        let rows = report.into_rows(&DIMENSIONS, &METRICS).map_err(|reason| CollectError::Decode {
            url: self.client.query_url(&query),
            reason,
        })?;
        Ok(map_rows(&rows, &zone.name))
    }
}

impl DatasetCollector for DnsCollector {
    fn dataset(&self) -> Dataset {
        Dataset::Dns
    }

    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
        collect_zones(
            Dataset::Dns,
            self.filter.eligible(&cycle.zones),
            self.concurrency,
            move |zone: &'a Zone| -> ZoneFuture<'a> { Box::pin(self.collect_zone(&cycle.window, zone)) },
        )
    }
}

/// Seven emissions per row, labelled by zone followed by the row dimensions.
pub fn map_rows(rows: &[DnsRow], zone_name: &str) -> Vec<Emission> {
    let mut emissions = Vec::with_capacity(rows.len() * METRIC_KEYS.len());
    for row in rows {
        let labels: Vec<&str> = std::iter::once(zone_name)
            .chain(DIMENSIONS.iter().map(|name| row.dimension(name).unwrap_or_default()))
            .collect();
        for (name, key) in METRIC_KEYS {
            if let Some(value) = row.metric(name) {
                emissions.push(Emission::new(key, value, labels.iter().copied()));
            }
        }
    }
    emissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptors::DescriptorTable,
        emission::validate,
    };
    use pretty_assertions::assert_eq;

    fn rows(json: &str) -> Vec<DnsRow> {
        serde_json::from_str::<DnsReport>(json)
            .unwrap()
            .into_rows(&DIMENSIONS, &METRICS)
            .unwrap()
    }

    #[test]
    fn maps_a_report_row() {
        let rows = rows(
            r#"{"data": [{"dimensions": ["q.example.", "A", "NOERROR", "true", "LAX"], "metrics": [10, 2, 1, 5.5, 4, 8, 9]}], "totals": {}}"#,
        );
        let labels = ["example.com", "q.example.", "A", "NOERROR", "true", "LAX"];
        let emissions = map_rows(&rows, "example.com");
        assert_eq!(
            emissions,
            vec![
                Emission::new(MetricKey::TotalQueries, 10.0, labels),
                Emission::new(MetricKey::UncachedQueries, 2.0, labels),
                Emission::new(MetricKey::StaledQueries, 1.0, labels),
                Emission::new(MetricKey::AverageResponseMilliseconds, 5.5, labels),
                Emission::new(MetricKey::MedianResponseMilliseconds, 4.0, labels),
                Emission::new(MetricKey::P90ResponseMilliseconds, 8.0, labels),
                Emission::new(MetricKey::P99ResponseMilliseconds, 9.0, labels),
            ]
        );

        let table = DescriptorTable::cloudflare().unwrap();
        for emission in &emissions {
            validate(&table, emission).unwrap();
        }
    }

    #[test]
    fn metric_keys_follow_the_requested_order() {
        let names: Vec<_> = METRIC_KEYS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, METRICS.to_vec());
    }

    #[test]
    fn empty_report() {
        assert!(map_rows(&rows(r#"{"data": []}"#), "example.com").is_empty());
    }
}
