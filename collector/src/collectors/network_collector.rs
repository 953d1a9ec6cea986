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

/// Collects network-layer attack history for the configured account.
pub struct NetworkCollector {
    client: CloudflareClient,
}

impl NetworkCollector {
    pub fn new(client: CloudflareClient) -> Self {
        Self { client }
    }

    async fn collect_account(&self, window: &CollectionWindow, account: Option<&Account>) -> Result<Vec<Emission>> {
        let account = account.ok_or(CollectError::MissingAccount(Dataset::Net))?;
        info!(account = %account.name, start = %window.start_rfc3339(), end = %window.end_rfc3339(), "Getting network metrics");
        let query = queries::build(Dataset::Net, window, ScopeId::Account(&account.id))?;
        let data: ViewerData = self.client.execute(&query).await?;
        Ok(map_response(&data, &account.name))
    }
}

impl DatasetCollector for NetworkCollector {
    fn dataset(&self) -> Dataset {
        Dataset::Net
    }

    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
        Box::pin(async move {
            let mut report = DatasetReport::new(Dataset::Net);
            let scope = cycle.account.as_ref().map(|account| account.name.as_str()).unwrap_or("account");
            report.record(scope, self.collect_account(&cycle.window, cycle.account.as_ref()).await);
            report
        })
    }
}

/// Bits and packets per attack history row.
pub fn map_response(data: &ViewerData, account_name: &str) -> Vec<Emission> {
    let mut emissions = Vec::new();
    for attack in data.viewer.accounts.iter().flat_map(|account| &account.attack_history) {
        let dimensions = &attack.network_dimensions;
        let port = dimensions.destination_port.to_string();
        let labels = [
            dimensions.attack_id.as_str(),
            account_name,
            dimensions.attack_protocol.as_str(),
            dimensions.attack_mitigation_type.as_str(),
            dimensions.colo_country.as_str(),
            port.as_str(),
            dimensions.attack_type.as_str(),
        ];
        emissions.push(Emission::new(MetricKey::NetBits, attack.sum.bits as f64, labels));
        emissions.push(Emission::new(MetricKey::NetPackets, attack.sum.packets as f64, labels));
    }
    emissions
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn bits_and_packets_per_attack() {
        let data: ViewerData = serde_json::from_value(serde_json::json!({
            "viewer": { "accounts": [{ "attackHistory": [{
                "networkDimensions": {
                    "attackId": "a-1",
                    "attackMitigationType": "BLOCK",
                    "attackProtocol": "UDP",
                    "attackType": "flood",
                    "coloCountry": "NL",
                    "destinationPort": 53
                },
                "sum": { "bits": 4096, "packets": 32 }
            }]}]}
        }))
        .unwrap();

        let labels = ["a-1", "acct", "UDP", "BLOCK", "NL", "53", "flood"];
        assert_eq!(
            map_response(&data, "acct"),
            vec![
                Emission::new(MetricKey::NetBits, 4096.0, labels),
                Emission::new(MetricKey::NetPackets, 32.0, labels),
            ]
        );
    }

    #[test]
    fn no_attacks_no_emissions() {
        let data: ViewerData = serde_json::from_str(r#"{"viewer": {"accounts": [{"attackHistory": []}]}}"#).unwrap();
        assert!(map_response(&data, "acct").is_empty());
    }
}
