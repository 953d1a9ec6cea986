//! Prometheus exposition of one collection cycle.

use crate::{
    descriptors::{
        MetricDescriptor,
        MetricKey,
        MetricKind,
    },
    emission::{
        Emission,
        MetricSink,
    },
    error::Result,
};
use prometheus::{
    CounterVec,
    Encoder,
    GaugeVec,
    Opts,
    Registry,
    TextEncoder,
};
use std::collections::HashMap;

enum Family {
    Gauge(GaugeVec),
    Counter(CounterVec),
}

/// Collects emissions into a private [`Registry`]. A new sink is used for every
/// scrape, so series that were not emitted by the cycle are not exposed.
#[derive(Default)]
pub struct RegistrySink {
    registry: Registry,
    families: HashMap<MetricKey, Family>,
}

impl RegistrySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn family(&mut self, descriptor: &MetricDescriptor) -> Result<&Family> {
        if !self.families.contains_key(&descriptor.key) {
            let opts = Opts::new(descriptor.fq_name.as_str(), descriptor.help);
            let family = match descriptor.kind {
                MetricKind::Gauge => {
                    let vec = GaugeVec::new(opts, descriptor.label_names)?;
                    self.registry.register(Box::new(vec.clone()))?;
                    Family::Gauge(vec)
                }
                MetricKind::Counter => {
                    let vec = CounterVec::new(opts, descriptor.label_names)?;
                    self.registry.register(Box::new(vec.clone()))?;
                    Family::Counter(vec)
                }
            };
            self.families.insert(descriptor.key, family);
        }
        Ok(&self.families[&descriptor.key])
    }

    /// Renders every collected sample in the Prometheus text format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl MetricSink for RegistrySink {
    fn emit(&mut self, descriptor: &MetricDescriptor, emission: Emission) {
        let family = match self.family(descriptor) {
            Ok(family) => family,
            Err(err) => {
                warn!(metric = %descriptor.fq_name, %err, "Could not register metric");
                return;
            }
        };
        let labels: Vec<&str> = emission.labels.iter().map(String::as_str).collect();
        match family {
            Family::Gauge(vec) => match vec.get_metric_with_label_values(&labels) {
                Ok(gauge) => gauge.set(emission.value),
                Err(err) => warn!(metric = %descriptor.fq_name, %err, "Dropping sample"),
            },
            Family::Counter(vec) => {
                if emission.value < 0.0 {
                    warn!(metric = %descriptor.fq_name, value = emission.value, "Dropping negative counter sample");
                    return;
                }
                match vec.get_metric_with_label_values(&labels) {
                    Ok(counter) => counter.inc_by(emission.value),
                    Err(err) => warn!(metric = %descriptor.fq_name, %err, "Dropping sample"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        descriptors::DescriptorTable,
        emission::Emitter,
    };

    #[test]
    fn renders_emitted_series_only() {
        let table = DescriptorTable::cloudflare().unwrap();
        let mut sink = RegistrySink::new();
        let mut emitter = Emitter::new(&table, &mut sink);
        emitter.emit(Emission::new(MetricKey::TotalRequests, 42.0, ["example.com"]));
        emitter.emit(Emission::new(
            MetricKey::WorkerCpuTime,
            1.5,
            ["w1", "acct", "99.9"],
        ));

        let text = sink.render().unwrap();
        assert!(text.contains("# HELP cloudflare_http_total_requests The total number of requests served"));
        assert!(text.contains("# TYPE cloudflare_http_total_requests gauge"));
        assert!(text.contains(r#"cloudflare_http_total_requests{zoneName="example.com"} 42"#));
        assert!(text.contains(r#"cloudflare_worker_cputime{accountName="acct",percentile="99.9",workerName="w1"} 1.5"#));
        assert!(!text.contains("cloudflare_waf_events"));
    }

    #[test]
    fn counters_accumulate() {
        let mut table = DescriptorTable::new();
        table
            .register("exporter", MetricKey::DatasetEmissions, "samples", MetricKind::Counter, &["dataset"])
            .unwrap();
        let mut sink = RegistrySink::new();
        let mut emitter = Emitter::new(&table, &mut sink);
        emitter.emit(Emission::new(MetricKey::DatasetEmissions, 2.0, ["http"]));
        emitter.emit(Emission::new(MetricKey::DatasetEmissions, 3.0, ["http"]));
        emitter.emit(Emission::new(MetricKey::DatasetEmissions, -1.0, ["http"]));

        let text = sink.render().unwrap();
        assert!(text.contains(r#"cloudflare_exporter_dataset_emissions{dataset="http"} 5"#));
    }
}
