use crate::{
    client::CloudflareClient,
    collectors::collector::{
        CycleContext,
        DatasetCollector,
        DatasetReport,
    },
    descriptors::MetricKey,
    emission::Emission,
    error::{
        CollectError,
        Result,
    },
    queries,
    responses::ViewerData,
    scope::{
        Account,
        ScopeId,
    },
    window::CollectionWindow,
};
use cloudflare_exporter_config::Dataset;
use std::{
    future::Future,
    pin::Pin,
};

/// Collects per-script Workers invocation statistics for the configured account.
pub struct WorkersCollector {
    client: CloudflareClient,
}

impl WorkersCollector {
    pub fn new(client: CloudflareClient) -> Self {
        Self { client }
    }

    async fn collect_account(&self, window: &CollectionWindow, account: Option<&Account>) -> Result<Vec<Emission>> {
        let account = account.ok_or(CollectError::MissingAccount(Dataset::Workers))?;
        info!(account = %account.name, start = %window.start_rfc3339(), end = %window.end_rfc3339(), "Getting Workers metrics");
        let query = queries::build(Dataset::Workers, window, ScopeId::Account(&account.id))?;
        let data: ViewerData = self.client.execute(&query).await?;
        Ok(map_response(&data, &account.name))
    }
}

impl DatasetCollector for WorkersCollector {
    fn dataset(&self) -> Dataset {
        Dataset::Workers
    }

    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
        Box::pin(async move {
            let mut report = DatasetReport::new(Dataset::Workers);
            let scope = cycle.account.as_ref().map(|account| account.name.as_str()).unwrap_or("account");
            report.record(scope, self.collect_account(&cycle.window, cycle.account.as_ref()).await);
            report
        })
    }
}

pub fn map_response(data: &ViewerData, account_name: &str) -> Vec<Emission> {
    let mut emissions = Vec::new();
    for worker in data.viewer.accounts.iter().flat_map(|account| &account.workers) {
        let script = worker.info.script_name.as_str();
        let quantiles = &worker.quantiles;
        for (percentile, value) in [
            ("50", quantiles.cpu_time_p50),
            ("75", quantiles.cpu_time_p75),
            ("99", quantiles.cpu_time_p99),
            ("99.9", quantiles.cpu_time_p999),
        ] {
            emissions.push(Emission::new(MetricKey::WorkerCpuTime, value, [script, account_name, percentile]));
        }

        let labels = [script, account_name];
        emissions.push(Emission::new(MetricKey::WorkerErrors, worker.sum.errors as f64, labels));
        emissions.push(Emission::new(MetricKey::WorkerRequests, worker.sum.requests as f64, labels));
        emissions.push(Emission::new(MetricKey::WorkerSubrequests, worker.sum.subrequests as f64, labels));
    }
    emissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quantiles_and_sums() {
        let data: ViewerData = serde_json::from_value(serde_json::json!({
            "viewer": { "accounts": [{ "workers": [{
                "info": { "scriptName": "w1" },
                "quantiles": { "cpuTimeP50": 50, "cpuTimeP75": 75, "cpuTimeP99": 99, "cpuTimeP999": 99.9 },
                "sum": { "errors": 3, "requests": 100, "subrequests": 7 }
            }]}]}
        }))
        .unwrap();

        assert_eq!(
            map_response(&data, "acct"),
            vec![
                Emission::new(MetricKey::WorkerCpuTime, 50.0, ["w1", "acct", "50"]),
                Emission::new(MetricKey::WorkerCpuTime, 75.0, ["w1", "acct", "75"]),
                Emission::new(MetricKey::WorkerCpuTime, 99.0, ["w1", "acct", "99"]),
                Emission::new(MetricKey::WorkerCpuTime, 99.9, ["w1", "acct", "99.9"]),
                Emission::new(MetricKey::WorkerErrors, 3.0, ["w1", "acct"]),
                Emission::new(MetricKey::WorkerRequests, 100.0, ["w1", "acct"]),
                Emission::new(MetricKey::WorkerSubrequests, 7.0, ["w1", "acct"]),
            ]
        );
    }

    #[test]
    fn no_scripts_no_emissions() {
        let data: ViewerData = serde_json::from_str(r#"{"viewer": {"accounts": []}}"#).unwrap();
        assert!(map_response(&data, "acct").is_empty());
    }
}
