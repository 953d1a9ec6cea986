use crate::{
    client::CloudflareClient,
    collectors::{
        CycleContext,
        DatasetCollector,
        DnsCollector,
        HttpCollector,
        NetworkCollector,
        SessionResolver,
        WafCollector,
        WorkersCollector,
    },
    descriptors::{
        DescriptorTable,
        MetricKey,
    },
    emission::{
        Emission,
        Emitter,
        MetricSink,
    },
    error::{
        CollectError,
        Result,
    },
    scope::ZoneFilter,
};
use chrono::Utc;
use cloudflare_exporter_config::{
    Config,
    Dataset,
};
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::Mutex;

/// Outcome of one dataset within a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub dataset: Dataset,
    pub emitted: usize,
    pub failures: usize,
}

/// Outcome of one collection cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub session_resolved: bool,
    pub datasets: Vec<DatasetSummary>,
}

impl CycleReport {
    pub fn emitted(&self) -> usize {
        self.datasets.iter().map(|summary| summary.emitted).sum()
    }
}

/// Runs collection cycles: resolves the session, then every enabled dataset
/// collector in turn, forwarding their emissions to a sink.
///
/// Cycles are serialized. A second caller waits until the running cycle has
/// finished before it issues its first request.
pub struct Orchestrator {
    table: Arc<DescriptorTable>,
    session: SessionResolver,
    collectors: Vec<Box<dyn DatasetCollector>>,
    cycle_lock: Mutex<()>,
}

impl Orchestrator {
    pub fn new(config: &Config) -> Result<Self> {
        let table = Arc::new(DescriptorTable::cloudflare()?);
        let client = CloudflareClient::from_config(config)?;
        let filter = ZoneFilter {
            eligible_plan: config.eligible_plan.clone(),
            zone_name: config.zone_name.clone(),
        };
        let concurrency = config.max_concurrent_fetches;

        let mut collectors: Vec<Box<dyn DatasetCollector>> = Vec::new();
        for dataset in Dataset::iter().filter(|dataset| config.datasets.contains(*dataset)) {
            if dataset.requires_account() && config.account_id.is_none() {
                return Err(CollectError::MissingAccount(dataset));
            }
            let collector: Box<dyn DatasetCollector> = match dataset {
                Dataset::Net => Box::new(NetworkCollector::new(client.clone())),
                Dataset::Http => Box::new(HttpCollector::new(client.clone(), filter.clone(), concurrency)),
                Dataset::Waf => Box::new(WafCollector::new(client.clone(), filter.clone(), concurrency)),
                Dataset::Workers => Box::new(WorkersCollector::new(client.clone())),
                Dataset::Dns => Box::new(DnsCollector::new(client.clone(), filter.clone(), concurrency)),
            };
            collectors.push(collector);
        }

        let session = SessionResolver::new(client, config.account_id.clone(), config.window);

        info!(
            datasets = %config.datasets,
            zone = config.zone_name.as_deref(),
            account = config.account_id.as_deref(),
            "Collectors ready"
        );
        Ok(Self {
            table,
            session,
            collectors,
            cycle_lock: Mutex::new(()),
        })
    }

    pub fn descriptors(&self) -> &Arc<DescriptorTable> {
        &self.table
    }

    /// The enabled datasets in collection order.
    pub fn datasets(&self) -> impl Iterator<Item = Dataset> + '_ {
        self.collectors.iter().map(|collector| collector.dataset())
    }

    /// Runs one full collection cycle into `sink`.
    #[instrument(level = "debug", skip_all)]
    pub async fn collect(&self, sink: &mut dyn MetricSink) -> CycleReport {
        let _cycle = self.cycle_lock.lock().await;
        let mut emitter = Emitter::new(&self.table, sink);
        let mut report = CycleReport::default();

        let cycle = match self.session.resolve(Utc::now()).await {
            Ok(cycle) => cycle,
            Err(err) => {
                error!(%err, "Could not resolve the collection session");
                emitter.emit(Emission::new(MetricKey::CycleSuccess, 0.0, Vec::<String>::new()));
                return report;
            }
        };
        report.session_resolved = true;

        for collector in &self.collectors {
            let summary = self.run_collector(collector.as_ref(), &cycle, &mut emitter).await;
            report.datasets.push(summary);
        }

        emitter.emit(Emission::new(MetricKey::CycleSuccess, 1.0, Vec::<String>::new()));
        for summary in &report.datasets {
            let dataset = summary.dataset.to_string();
            emitter.emit(Emission::new(MetricKey::DatasetFailures, summary.failures as f64, [dataset.as_str()]));
            emitter.emit(Emission::new(MetricKey::DatasetEmissions, summary.emitted as f64, [dataset.as_str()]));
        }

        info!(emitted = emitter.emitted(), skipped = emitter.skipped(), "Collection cycle finished");
        report
    }

    #[instrument(level = "debug", skip_all, fields(dataset = %collector.dataset()))]
    async fn run_collector(
        &self,
        collector: &dyn DatasetCollector,
        cycle: &CycleContext,
        emitter: &mut Emitter<'_>,
    ) -> DatasetSummary {
        let dataset_report = collector.collect(cycle).await;
        let failures = dataset_report.failures.len();
        let emitted = emitter.emit_all(dataset_report.emissions);
        debug!(emitted, failures, "Dataset collected");
        DatasetSummary {
            dataset: collector.dataset(),
            emitted,
            failures,
        }
    }
}
