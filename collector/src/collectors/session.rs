use crate::{
    client::CloudflareClient,
    collectors::collector::CycleContext,
    error::{
        CollectError,
        Result,
    },
    window::CollectionWindow,
};
use chrono::{
    DateTime,
    Utc,
};
use cloudflare_exporter_config::WindowOffsets;

/// Resolves the window and scopes of a collection cycle.
pub struct SessionResolver {
    client: CloudflareClient,
    account_id: Option<String>,
    offsets: WindowOffsets,
}

impl SessionResolver {
    pub fn new(client: CloudflareClient, account_id: Option<String>, offsets: WindowOffsets) -> Self {
        Self {
            client,
            account_id,
            offsets,
        }
    }

    /// Computes the rolling window ending relative to `now`, lists the zones
    /// and fetches the configured account. Any failure aborts the cycle.
    pub async fn resolve(&self, now: DateTime<Utc>) -> Result<CycleContext> {
        let window = CollectionWindow::rolling(now, self.offsets);

        let zones = self.client.list_zones().await.map_err(scope_error)?;

        let account = match &self.account_id {
            Some(id) => Some(self.client.account(id).await.map_err(scope_error)?),
            None => None,
        };

        debug!(
            zones = zones.len(),
            account = account.as_ref().map(|account| account.name.as_str()),
            start = %window.start_rfc3339(),
            end = %window.end_rfc3339(),
            "Resolved session"
        );
        Ok(CycleContext { window, zones, account })
    }
}

fn scope_error(error: CollectError) -> CollectError {
    match error {
        CollectError::Authentication(_) => error,
        other => CollectError::ScopeList(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_errors_are_preserved() {
        assert!(scope_error(CollectError::Authentication("bad key".into())).is_authentication());
        let error = scope_error(CollectError::Api {
            url: "https://api.test/zones".into(),
            message: "rate limited".into(),
        });
        assert!(matches!(error, CollectError::ScopeList(message) if message.contains("rate limited")));
    }
}
