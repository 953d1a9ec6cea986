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
    error::Result,
    queries,
    responses::ViewerData,
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

/// Collects firewall event counts per zone.
pub struct WafCollector {
    client: CloudflareClient,
    filter: ZoneFilter,
    concurrency: usize,
}

impl WafCollector {
    pub fn new(client: CloudflareClient, filter: ZoneFilter, concurrency: usize) -> Self {
        Self {
            client,
            filter,
            concurrency,
        }
    }

    async fn collect_zone(&self, window: &CollectionWindow, zone: &Zone) -> Result<Vec<Emission>> {
        info!(zone = %zone.name, start = %window.start_rfc3339(), end = %window.end_rfc3339(), "Getting WAF metrics");
        let query = queries::build(Dataset::Waf, window, ScopeId::Zone(&zone.id))?;
        let data: ViewerData = self.client.execute(&query).await?;
        Ok(map_response(&data, &zone.name))
    }
}

impl DatasetCollector for WafCollector {
    fn dataset(&self) -> Dataset {
        Dataset::Waf
    }

    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
        collect_zones(
            Dataset::Waf,
            self.filter.eligible(&cycle.zones),
            self.concurrency,
            move |zone: &'a Zone| -> ZoneFuture<'a> { Box::pin(self.collect_zone(&cycle.window, zone)) },
        )
    }
}

pub fn map_response(data: &ViewerData, zone_name: &str) -> Vec<Emission> {
    data.viewer
        .zones
        .iter()
        .flat_map(|zone| &zone.fw_events)
        .map(|event| {
            let dimensions = &event.dimensions;
            Emission::new(
                MetricKey::WafEvents,
                event.count as f64,
                [
                    dimensions.as_name.as_str(),
                    dimensions.country.as_str(),
                    dimensions.action.as_str(),
                    dimensions.rule_id.as_str(),
                    zone_name,
                ],
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_emission_per_event_group() {
        let data: ViewerData = serde_json::from_value(serde_json::json!({
            "viewer": { "zones": [{ "fwEvents": [
                { "count": 12, "dimensions": { "action": "block", "clientASNDescription": "AS-EXAMPLE", "clientCountryName": "FR", "ruleId": "100015" } },
                { "count": 3, "dimensions": { "action": "challenge", "clientASNDescription": "AS-OTHER", "clientCountryName": "US", "ruleId": "100016" } }
            ]}]}
        }))
        .unwrap();

        assert_eq!(
            map_response(&data, "example.com"),
            vec![
                Emission::new(MetricKey::WafEvents, 12.0, ["AS-EXAMPLE", "FR", "block", "100015", "example.com"]),
                Emission::new(MetricKey::WafEvents, 3.0, ["AS-OTHER", "US", "challenge", "100016", "example.com"]),
            ]
        );
    }

    #[test]
    fn null_dimensions_become_empty_labels() {
        let data: ViewerData = serde_json::from_value(serde_json::json!({
            "viewer": { "zones": [{ "fwEvents": [
                { "count": 5, "dimensions": { "action": "block", "clientASNDescription": null, "clientCountryName": "FR", "ruleId": "100015" } },
                { "count": null, "dimensions": { "action": "log", "clientASNDescription": "AS-OTHER", "clientCountryName": null, "ruleId": null } }
            ]}]}
        }))
        .unwrap();

        assert_eq!(
            map_response(&data, "example.com"),
            vec![
                Emission::new(MetricKey::WafEvents, 5.0, ["", "FR", "block", "100015", "example.com"]),
                Emission::new(MetricKey::WafEvents, 0.0, ["AS-OTHER", "", "log", "", "example.com"]),
            ]
        );
    }

    #[test]
    fn no_events_no_emissions() {
        let data: ViewerData = serde_json::from_str(r#"{"viewer": {"zones": [{"fwEvents": []}]}}"#).unwrap();
        assert!(map_response(&data, "example.com").is_empty());
    }
}
