use serde::Deserialize;
use std::collections::HashMap;

/// `result` of the DNS analytics report endpoint. Dimension and metric values
/// are positional, in the order they were requested.
#[derive(Debug, Default, Deserialize)]
pub struct DnsReport {
    #[serde(default)]
    pub data: Vec<DnsReportRow>,
    #[serde(default)]
    pub totals: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct DnsReportRow {
    #[serde(default)]
    pub dimensions: Vec<serde_json::Value>,
    #[serde(default)]
    pub metrics: Vec<f64>,
}

/// One report row with its values keyed by the requested names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DnsRow {
    dimensions: HashMap<&'static str, String>,
    metrics: HashMap<&'static str, f64>,
}

impl DnsRow {
    pub fn dimension(&self, name: &str) -> Option<&str> {
        self.dimensions.get(name).map(String::as_str)
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

impl DnsReport {
    /// Pairs every positional value with the name it was requested under.
    /// Fails when a row does not carry exactly one value per requested name.
    pub fn into_rows(
        self,
        dimension_names: &[&'static str],
        metric_names: &[&'static str],
    ) -> Result<Vec<DnsRow>, String> {
        self.data
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                if row.dimensions.len() != dimension_names.len() || row.metrics.len() != metric_names.len() {
                    return Err(format!(
                        "row {index} has {} dimensions and {} metrics, expected {} and {}",
                        row.dimensions.len(),
                        row.metrics.len(),
                        dimension_names.len(),
                        metric_names.len()
                    ));
                }
                Ok(DnsRow {
                    dimensions: dimension_names
                        .iter()
                        .copied()
                        .zip(row.dimensions.into_iter().map(dimension_to_string))
                        .collect(),
                    metrics: metric_names.iter().copied().zip(row.metrics).collect(),
                })
            })
            .collect()
    }
}

fn dimension_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
