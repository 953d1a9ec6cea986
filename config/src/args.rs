use clap::Parser;

/// Prometheus exporter for Cloudflare analytics
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Your Cloudflare API key.
    #[arg(long = "key", env = "CF_KEY", value_name = "KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// The email address associated with the API key.
    #[arg(long = "email", env = "CF_EMAIL", value_name = "EMAIL")]
    pub api_email: Option<String>,

    /// Account ID to be fetched. Required by the `net` and `workers` datasets.
    #[arg(long = "account", env = "CF_ACCOUNT", value_name = "ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Only export zone-level datasets for the zone with this name.
    #[arg(long = "zone", env = "CF_ZONE", value_name = "ZONE_NAME")]
    pub zone_name: Option<String>,

    /// Comma separated datasets to export: http, waf, dns, workers, net.
    #[arg(long = "dataset", env = "CF_DATASET", value_name = "DATASETS")]
    pub datasets: Option<String>,

    /// Address the metrics endpoint listens on.
    #[arg(long = "prom-port", env = "CF_PROM_PORT", value_name = "ADDR")]
    pub listen_address: Option<String>,

    /// Base URL of the Cloudflare v4 API.
    #[arg(long, env = "CF_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Zone plan name eligible for zone-level datasets.
    #[arg(long, env = "CF_ELIGIBLE_PLAN", value_name = "PLAN")]
    pub eligible_plan: Option<String>,

    /// Timeout of every upstream request, e.g. `5s`.
    #[arg(long, value_name = "DURATION")]
    pub request_timeout: Option<String>,

    /// How far back the collection window starts, e.g. `20m`.
    #[arg(long, value_name = "DURATION")]
    pub window_start_offset: Option<String>,

    /// How far back the collection window ends, e.g. `5m`.
    #[arg(long, value_name = "DURATION")]
    pub window_end_offset: Option<String>,

    /// Number of zones fetched concurrently within one dataset.
    #[arg(long, value_name = "N")]
    pub max_concurrent_fetches: Option<usize>,
}

mod config_ext {
    use super::*;
    use config::{
        Map,
        Source,
        Value,
    };
    use std::collections::HashMap;

    impl Source for Args {
        fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
            Box::new((*self).clone())
        }

        fn collect(&self) -> Result<Map<String, Value>, config::ConfigError> {
            let mut cache = HashMap::<String, Value>::new();
            let strings = [
                ("api_key", &self.api_key),
                ("api_email", &self.api_email),
                ("account_id", &self.account_id),
                ("zone_name", &self.zone_name),
                ("datasets", &self.datasets),
                ("listen_address", &self.listen_address),
                ("api_url", &self.api_url),
                ("eligible_plan", &self.eligible_plan),
                ("request_timeout", &self.request_timeout),
                ("window_start_offset", &self.window_start_offset),
                ("window_end_offset", &self.window_end_offset),
            ];
            for (key, value) in strings {
                if let Some(value) = value {
                    cache.insert(key.to_string(), value.clone().into());
                }
            }
            if let Some(max_concurrent_fetches) = self.max_concurrent_fetches {
                cache.insert(
                    "max_concurrent_fetches".to_string(),
                    (max_concurrent_fetches as u64).into(),
                );
            }
            Ok(cache)
        }
    }
}
