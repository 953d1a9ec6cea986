use crate::Dataset;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("must provide both an API key and an API email")]
    MissingCredentials,
    #[error("an account ID is required when exporting the `{0}` dataset")]
    AccountRequired(Dataset),
    #[error("unknown dataset `{0}`, valid values are: net, http, waf, workers, dns")]
    UnknownDataset(String),
    #[error("invalid duration for `{field}`: {source}")]
    InvalidDuration {
        field: &'static str,
        #[source]
        source: humantime::DurationError,
    },
    #[error("the collection window must start before it ends (start offset {start:?}, end offset {end:?})")]
    InvalidWindow { start: Duration, end: Duration },
    #[error("`max_concurrent_fetches` must be at least 1")]
    InvalidConcurrency,
    #[error(transparent)]
    Source(#[from] config::ConfigError),
}
