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

/// Collects HTTP traffic analytics (cache groups and request totals) per zone.
pub struct HttpCollector {
    client: CloudflareClient,
    filter: ZoneFilter,
    concurrency: usize,
}

impl HttpCollector {
    pub fn new(client: CloudflareClient, filter: ZoneFilter, concurrency: usize) -> Self {
        Self {
            client,
            filter,
            concurrency,
        }
    }

    async fn collect_zone(&self, window: &CollectionWindow, zone: &Zone) -> Result<Vec<Emission>> {
        info!(zone = %zone.name, start = %window.start_rfc3339(), end = %window.end_rfc3339(), "Getting HTTP metrics");
        let query = queries::build(Dataset::Http, window, ScopeId::Zone(&zone.id))?;
        let data: ViewerData = self.client.execute(&query).await?;
        Ok(map_response(&data, &zone.name))
    }
}

impl DatasetCollector for HttpCollector {
    fn dataset(&self) -> Dataset {
        Dataset::Http
    }

    fn collect<'a>(&'a self, cycle: &'a CycleContext) -> Pin<Box<dyn Future<Output = DatasetReport> + Send + 'a>> {
        collect_zones(
            Dataset::Http,
            self.filter.eligible(&cycle.zones),
            self.concurrency,
            move |zone: &'a Zone| -> ZoneFuture<'a> { Box::pin(self.collect_zone(&cycle.window, zone)) },
        )
    }
}

/// Flattens the HTTP analytics of one zone.
pub fn map_response(data: &ViewerData, zone_name: &str) -> Vec<Emission> {
    let mut emissions = Vec::new();
    let Some(zone) = data.viewer.zones.first() else {
        return emissions;
    };

    for group in &zone.caching {
        let dimensions = &group.dimensions;
        emissions.push(Emission::new(
            MetricKey::BytesByCacheStatus,
            group.sum_edge_response_bytes.edge_response_bytes as f64,
            [
                dimensions.cache_status.as_str(),
                dimensions.http_method.as_str(),
                dimensions.content_type_name.as_str(),
                dimensions.country_name.as_str(),
                zone_name,
            ],
        ));
    }

    let Some(requests) = zone.requests.first().map(|group| &group.requests_data) else {
        return emissions;
    };

    let totals = [
        (MetricKey::TotalBytes, requests.bytes),
        (MetricKey::CachedBytes, requests.cached_bytes),
        (MetricKey::EncryptedBytes, requests.encrypted_bytes),
        (MetricKey::TotalRequests, requests.requests),
        (MetricKey::CachedRequests, requests.cached_requests),
        (MetricKey::EncryptedRequests, requests.encrypted_requests),
    ];
    for (key, value) in totals {
        emissions.push(Emission::new(key, value as f64, [zone_name]));
    }

    for entry in &requests.response_status_map {
        emissions.push(Emission::new(
            MetricKey::RequestsByResponseCode,
            entry.requests as f64,
            [entry.edge_response_status.to_string().as_str(), zone_name],
        ));
    }

    for entry in &requests.country_map {
        let labels = [entry.country_name.as_str(), zone_name];
        emissions.push(Emission::new(MetricKey::RequestsByCountry, entry.requests as f64, labels));
        emissions.push(Emission::new(MetricKey::BytesByCountry, entry.bytes as f64, labels));
        emissions.push(Emission::new(MetricKey::ThreatsByCountry, entry.threats as f64, labels));
    }

    for entry in &requests.content_type_map {
        let labels = [entry.content_type_name.as_str(), zone_name];
        emissions.push(Emission::new(MetricKey::RequestsByContentType, entry.requests as f64, labels));
        emissions.push(Emission::new(MetricKey::BytesByContentType, entry.bytes as f64, labels));
    }

    for entry in &requests.client_ssl_map {
        emissions.push(Emission::new(
            MetricKey::RequestsBySslVersion,
            entry.requests as f64,
            [entry.protocol.as_str(), zone_name],
        ));
    }

    for entry in &requests.client_http_version_map {
        emissions.push(Emission::new(
            MetricKey::RequestsByHttpVersion,
            entry.requests as f64,
            [entry.protocol.as_str(), zone_name],
        ));
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

    fn viewer(json: serde_json::Value) -> ViewerData {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn maps_every_breakdown() {
        let data = viewer(serde_json::json!({
            "viewer": { "zones": [{
                "caching": [{
                    "dimensions": {
                        "cacheStatus": "hit",
                        "clientCountryName": "DE",
                        "clientRequestHTTPMethodName": "GET",
                        "edgeResponseContentTypeName": "html"
                    },
                    "sumEdgeResponseBytes": { "edgeResponseBytes": 2048 }
                }],
                "requests": [{
                    "requestsData": {
                        "bytes": 100, "cachedBytes": 60, "encryptedBytes": 90,
                        "requests": 10, "cachedRequests": 6, "encryptedRequests": 9,
                        "responseStatusMap": [{ "edgeResponseStatus": 200, "requests": 8 }, { "edgeResponseStatus": 404, "requests": 2 }],
                        "countryMap": [{ "clientCountryName": "DE", "requests": 10, "bytes": 100, "threats": 1 }],
                        "contentTypeMap": [{ "edgeResponseContentTypeName": "html", "requests": 10, "bytes": 100 }],
                        "clientSSLMap": [{ "clientSSLProtocol": "TLSv1.3", "requests": 9 }],
                        "clientHTTPVersionMap": [{ "clientHTTPProtocol": "HTTP/2", "requests": 10 }]
                    }
                }]
            }]}
        }));

        let emissions = map_response(&data, "example.com");
        assert_eq!(emissions.len(), 1 + 6 + 2 + 3 + 2 + 1 + 1);
        assert_eq!(
            emissions[0],
            Emission::new(MetricKey::BytesByCacheStatus, 2048.0, ["hit", "GET", "html", "DE", "example.com"])
        );
        assert!(emissions.contains(&Emission::new(MetricKey::CachedBytes, 60.0, ["example.com"])));
        assert!(emissions.contains(&Emission::new(MetricKey::RequestsByResponseCode, 2.0, ["404", "example.com"])));
        assert!(emissions.contains(&Emission::new(MetricKey::ThreatsByCountry, 1.0, ["DE", "example.com"])));
        assert!(emissions.contains(&Emission::new(MetricKey::BytesByContentType, 100.0, ["html", "example.com"])));
        assert!(emissions.contains(&Emission::new(MetricKey::RequestsBySslVersion, 9.0, ["TLSv1.3", "example.com"])));
        assert!(emissions.contains(&Emission::new(MetricKey::RequestsByHttpVersion, 10.0, ["HTTP/2", "example.com"])));

        let table = DescriptorTable::cloudflare().unwrap();
        for emission in &emissions {
            validate(&table, emission).unwrap();
        }
    }

    #[test]
    fn empty_collections_emit_nothing() {
        assert!(map_response(&viewer(serde_json::json!({ "viewer": { "zones": [] } })), "z").is_empty());
        assert!(map_response(&viewer(serde_json::json!({ "viewer": { "zones": [{}] } })), "z").is_empty());
    }
}
