use serde::{
    Deserialize,
    Deserializer,
};

/// GraphQL reports unknown dimensions and empty sums as `null`. They decode as
/// the type's default instead of failing the whole response.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub struct GraphqlEnvelope<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewerData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub viewer: Viewer,
}

#[derive(Debug, Default, Deserialize)]
pub struct Viewer {
    #[serde(default, deserialize_with = "null_as_default")]
    pub zones: Vec<ZoneGroups>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub accounts: Vec<AccountGroups>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ZoneGroups {
    #[serde(default, deserialize_with = "null_as_default")]
    pub caching: Vec<CacheGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: Vec<RequestsGroup>,
    #[serde(default, deserialize_with = "null_as_default", rename = "fwEvents")]
    pub fw_events: Vec<FirewallEventGroup>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountGroups {
    #[serde(default, deserialize_with = "null_as_default", rename = "attackHistory")]
    pub attack_history: Vec<AttackGroup>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub workers: Vec<WorkerGroup>,
}

// http

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: CacheDimensions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sum_edge_response_bytes: EdgeResponseBytes,
}

#[derive(Debug, Default, Deserialize)]
pub struct CacheDimensions {
    #[serde(default, deserialize_with = "null_as_default", rename = "cacheStatus")]
    pub cache_status: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientRequestHTTPMethodName")]
    pub http_method: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientCountryName")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "edgeResponseContentTypeName")]
    pub content_type_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeResponseBytes {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_response_bytes: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests_data: RequestsData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestsData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bytes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cached_bytes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypted_bytes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub cached_requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub encrypted_requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response_status_map: Vec<ResponseStatusEntry>,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientSSLMap")]
    pub client_ssl_map: Vec<ClientSslEntry>,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientHTTPVersionMap")]
    pub client_http_version_map: Vec<ClientHttpVersionEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_type_map: Vec<ContentTypeEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub country_map: Vec<CountryEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStatusEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub edge_response_status: u16,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientSslEntry {
    #[serde(default, deserialize_with = "null_as_default", rename = "clientSSLProtocol")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct ClientHttpVersionEntry {
    #[serde(default, deserialize_with = "null_as_default", rename = "clientHTTPProtocol")]
    pub protocol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeEntry {
    #[serde(default, deserialize_with = "null_as_default", rename = "edgeResponseContentTypeName")]
    pub content_type_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bytes: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryEntry {
    #[serde(default, deserialize_with = "null_as_default", rename = "clientCountryName")]
    pub country_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bytes: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub threats: u64,
}

// waf

#[derive(Debug, Default, Deserialize)]
pub struct FirewallEventGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dimensions: FirewallDimensions,
}

#[derive(Debug, Default, Deserialize)]
pub struct FirewallDimensions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientASNDescription")]
    pub as_name: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "clientCountryName")]
    pub country: String,
    #[serde(default, deserialize_with = "null_as_default", rename = "ruleId")]
    pub rule_id: String,
}

// workers

#[derive(Debug, Default, Deserialize)]
pub struct WorkerGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub info: WorkerInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub quantiles: WorkerQuantiles,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sum: WorkerSum,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkerInfo {
    #[serde(default, deserialize_with = "null_as_default", rename = "scriptName")]
    pub script_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkerQuantiles {
    #[serde(default, deserialize_with = "null_as_default", rename = "cpuTimeP50")]
    pub cpu_time_p50: f64,
    #[serde(default, deserialize_with = "null_as_default", rename = "cpuTimeP75")]
    pub cpu_time_p75: f64,
    #[serde(default, deserialize_with = "null_as_default", rename = "cpuTimeP99")]
    pub cpu_time_p99: f64,
    #[serde(default, deserialize_with = "null_as_default", rename = "cpuTimeP999")]
    pub cpu_time_p999: f64,
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkerSum {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requests: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subrequests: u64,
}

// network

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackGroup {
    #[serde(default, deserialize_with = "null_as_default")]
    pub network_dimensions: NetworkDimensions,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sum: AttackSum,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDimensions {
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_mitigation_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_protocol: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attack_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colo_country: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub destination_port: u32,
}

#[derive(Debug, Default, Deserialize)]
pub struct AttackSum {
    #[serde(default, deserialize_with = "null_as_default")]
    pub bits: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub packets: u64,
}
