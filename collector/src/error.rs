use crate::descriptors::MetricKey;
use cloudflare_exporter_config::Dataset;

/// Errors raised while running a collection cycle.
///
/// `Authentication` and `ScopeList` abort a whole cycle. `Transport`, `Decode`,
/// `Api`, `ScopeMismatch` and `MissingAccount` abort a single dataset or zone iteration.
/// `UnknownMetric` and `LabelMismatch` only drop one emission.
#[derive(thiserror::Error, Debug)]
pub enum CollectError {
    #[error("the API rejected the configured credentials: {0}")]
    Authentication(String),
    #[error("listing scopes failed: {0}")]
    ScopeList(String),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },
    #[error("the API reported an error for {url}: {message}")]
    Api { url: String, message: String },
    #[error("the {dataset} dataset cannot be queried by {scope}")]
    ScopeMismatch { dataset: Dataset, scope: &'static str },
    #[error("the {0} dataset needs an account but none was resolved")]
    MissingAccount(Dataset),
    #[error("metric `{0}` is not registered")]
    UnknownMetric(MetricKey),
    #[error("metric `{key}` expects {expected} labels but got {actual}")]
    LabelMismatch {
        key: MetricKey,
        expected: usize,
        actual: usize,
    },
    #[error("metric `{0}` is registered twice")]
    DuplicateMetric(MetricKey),
    #[error("rendering metrics failed: {0}")]
    Exposition(#[from] prometheus::Error),
}

impl CollectError {
    /// Whether the upstream API refused the credentials.
    pub fn is_authentication(&self) -> bool {
        matches!(self, CollectError::Authentication(_))
    }
}

pub type Result<T, E = CollectError> = std::result::Result<T, E>;
