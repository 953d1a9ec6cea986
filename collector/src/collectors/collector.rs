use crate::{
    emission::Emission,
    error::{
        CollectError,
        Result,
    },
    scope::{
        Account,
        Zone,
    },
    window::CollectionWindow,
};
use cloudflare_exporter_config::Dataset;
use futures::{
    stream,
    StreamExt,
};
use std::{
    future::Future,
    pin::Pin,
};

/// Scopes and time window resolved once at the start of a collection cycle.
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub window: CollectionWindow,
    pub zones: Vec<Zone>,
    pub account: Option<Account>,
}

/// A scope iteration that produced no emissions.
#[derive(Debug)]
pub struct ScopeFailure {
    pub scope: String,
    pub error: CollectError,
}

/// Everything one dataset produced during a cycle.
#[derive(Debug)]
pub struct DatasetReport {
    pub dataset: Dataset,
    pub emissions: Vec<Emission>,
    pub failures: Vec<ScopeFailure>,
}

impl DatasetReport {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            emissions: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Records the outcome of one scope iteration. A failed iteration
    /// contributes nothing.
    pub fn record(&mut self, scope: &str, outcome: Result<Vec<Emission>>) {
        match outcome {
            Ok(emissions) => {
                debug!(dataset = %self.dataset, scope, count = emissions.len(), "Mapped response");
                self.emissions.extend(emissions);
            }
            Err(error) => {
                warn!(dataset = %self.dataset, scope, %error, "Fetch failed");
                self.failures.push(ScopeFailure {
                    scope: scope.to_string(),
                    error,
                });
            }
        }
    }
}

/// Collects one dataset for every scope it applies to.
pub trait DatasetCollector: Send + Sync {
    fn dataset(&self) -> Dataset;

    /// Runs one pass over the dataset's scopes. Never fails as a whole: errors
    /// are recorded per scope in the returned report.
    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>>;
}

/// The fetch-and-map step of one zone.
pub(crate) type ZoneFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Emission>>> + Send + 'a>>;

/// Runs one [`ZoneFuture`] per zone with at most `concurrency` of them in
/// flight. Results are recorded in zone order.
///
/// The per-zone futures are created up front so that no closure ends up in the
/// returned future's state.
pub(crate) fn collect_zones<'a>(
    dataset: Dataset,
    zones: impl IntoIterator<Item = &'a Zone>,
    concurrency: usize,
    collect_zone: impl Fn(&'a Zone) -> ZoneFuture<'a>,
) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
    let (names, fetches): (Vec<&'a str>, Vec<ZoneFuture<'a>>) = zones
        .into_iter()
        .map(|zone| (zone.name.as_str(), collect_zone(zone)))
        .unzip();

    Box::pin(async move {
        let outcomes: Vec<Result<Vec<Emission>>> = stream::iter(fetches).buffered(concurrency.max(1)).collect().await;

        let mut report = DatasetReport::new(dataset);
        for (name, outcome) in names.into_iter().zip(outcomes) {
            report.record(name, outcome);
        }
        report
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptors::MetricKey,
        scope::ZonePlan,
    };
    use pretty_assertions::assert_eq;
    use std::{
        sync::{
            atomic::{
                AtomicUsize,
                Ordering,
            },
            Arc,
        },
        time::Duration,
    };

    fn zone(name: &str) -> Zone {
        Zone {
            id: format!("id-{name}"),
            name: name.to_string(),
            plan: ZonePlan::default(),
        }
    }

    #[derive(Default)]
    struct InFlight {
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    /// Later zones answer sooner; `zone-c` fails.
    fn delayed<'a>(zone: &'a Zone, in_flight: Arc<InFlight>) -> ZoneFuture<'a> {
        Box::pin(async move {
            let now = in_flight.current.fetch_add(1, Ordering::SeqCst) + 1;
            in_flight.peak.fetch_max(now, Ordering::SeqCst);

            let (delay, requests) = match zone.name.as_str() {
                "zone-a" => (300, 1.0),
                "zone-b" => (50, 2.0),
                _ => (10, 3.0),
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            in_flight.current.fetch_sub(1, Ordering::SeqCst);

            if zone.name == "zone-c" {
                return Err(CollectError::Api {
                    url: "https://api.test/graphql".into(),
                    message: "rate limited".into(),
                });
            }
            Ok(vec![Emission::new(MetricKey::TotalRequests, requests, [zone.name.as_str()])])
        })
    }

    #[tokio::test]
    async fn zone_results_keep_zone_order_when_fetched_concurrently() {
        let zones = vec![zone("zone-a"), zone("zone-b"), zone("zone-c"), zone("zone-d")];
        let in_flight = Arc::new(InFlight::default());

        let report = collect_zones(Dataset::Http, &zones, 2, |zone| delayed(zone, in_flight.clone())).await;

        assert_eq!(
            report.emissions,
            vec![
                Emission::new(MetricKey::TotalRequests, 1.0, ["zone-a"]),
                Emission::new(MetricKey::TotalRequests, 2.0, ["zone-b"]),
                Emission::new(MetricKey::TotalRequests, 3.0, ["zone-d"]),
            ]
        );
        let failed: Vec<&str> = report.failures.iter().map(|failure| failure.scope.as_str()).collect();
        assert_eq!(failed, vec!["zone-c"]);
        assert_eq!(in_flight.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn zero_concurrency_still_collects_sequentially() {
        let zones = vec![zone("zone-a"), zone("zone-b")];
        let in_flight = Arc::new(InFlight::default());

        let report = collect_zones(Dataset::Waf, &zones, 0, |zone| delayed(zone, in_flight.clone())).await;

        assert_eq!(report.dataset, Dataset::Waf);
        assert_eq!(report.emissions.len(), 2);
        assert!(report.failures.is_empty());
        assert_eq!(in_flight.peak.load(Ordering::SeqCst), 1);
    }
}
