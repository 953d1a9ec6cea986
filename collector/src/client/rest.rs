use super::{
    body_excerpt,
    is_auth_status,
    CloudflareClient,
};
use crate::{
    error::{
        CollectError,
        Result,
    },
    responses::{
        join_messages,
        ApiEnvelope,
        ResultInfo,
    },
    scope::{
        Account,
        Zone,
    },
};
use serde::de::DeserializeOwned;

pub const ZONES_PER_PAGE: u32 = 50;

impl CloudflareClient {
    /// GETs `path` and returns the `result` of the v4 envelope.
    pub(crate) async fn get_result<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let (result, _) = self.get_envelope(path, params).await?;
        Ok(result)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<(T, Option<ResultInfo>)> {
        let url = self.url(path);
        let (status, body) = self.send(self.http_client.get(&url).query(params), &url).await?;

        let envelope: ApiEnvelope<T> = match serde_json::from_slice(&body) {
            Ok(envelope) => envelope,
            Err(_) if is_auth_status(status) => {
                return Err(CollectError::Authentication(format!("HTTP {status}: {}", body_excerpt(&body))))
            }
            Err(_) if !status.is_success() => {
                return Err(CollectError::Api {
                    url,
                    message: format!("HTTP {status}: {}", body_excerpt(&body)),
                })
            }
            Err(err) => {
                return Err(CollectError::Decode {
                    url,
                    reason: err.to_string(),
                })
            }
        };

        let message = if envelope.errors.is_empty() {
            format!("HTTP {status}")
        } else {
            join_messages(&envelope.errors)
        };
        if is_auth_status(status) || envelope.errors.iter().any(|e| e.is_authentication()) {
            return Err(CollectError::Authentication(message));
        }
        if !status.is_success() || !envelope.success || !envelope.errors.is_empty() {
            return Err(CollectError::Api { url, message });
        }

        let result = envelope.result.ok_or_else(|| CollectError::Decode {
            url,
            reason: "response carries no result".to_string(),
        })?;
        Ok((result, envelope.result_info))
    }

    /// Lists every zone visible to the credentials, following pagination.
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let mut zones = Vec::new();
        let mut page = 1;
        loop {
            let params = [("page", page.to_string()), ("per_page", ZONES_PER_PAGE.to_string())];
            let (batch, info): (Vec<Zone>, _) = self.get_envelope("zones", &params).await?;
            let fetched = batch.len();
            zones.extend(batch);

            let total_pages = info.map(|info| info.total_pages).unwrap_or(page);
            if page >= total_pages || fetched == 0 {
                break;
            }
            page += 1;
        }
        Ok(zones)
    }

    pub async fn account(&self, account_id: &str) -> Result<Account> {
        self.get_result(&format!("accounts/{account_id}"), &[]).await
    }
}
