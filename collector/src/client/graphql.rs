use super::{
    body_excerpt,
    CloudflareClient,
};
use crate::{
    error::{
        CollectError,
        Result,
    },
    queries::GraphqlQuery,
    responses::GraphqlEnvelope,
};
use serde::de::DeserializeOwned;

impl CloudflareClient {
    pub fn graphql_url(&self) -> String {
        self.url("graphql")
    }

    /// POSTs `query` to the GraphQL endpoint and returns its `data`.
    pub(crate) async fn post_graphql<T: DeserializeOwned>(&self, query: &GraphqlQuery) -> Result<T> {
        let url = self.graphql_url();
        let (status, body) = self.send(self.http_client.post(&url).json(query), &url).await?;

        if !status.is_success() {
            return Err(CollectError::Api {
                url,
                message: format!("HTTP {status}: {}", body_excerpt(&body)),
            });
        }

        let envelope: GraphqlEnvelope<T> = serde_json::from_slice(&body).map_err(|err| CollectError::Decode {
            url: url.clone(),
            reason: err.to_string(),
        })?;

        if !envelope.errors.is_empty() {
            let message = envelope
                .errors
                .iter()
                .map(|error| error.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(CollectError::Api { url, message });
        }

        envelope.data.ok_or_else(|| CollectError::Decode {
            url,
            reason: "response carries no data".to_string(),
        })
    }
}
