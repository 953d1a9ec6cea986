//! # Fetch Client
//!
//! A thin wrapper around a shared [`reqwest::Client`] that executes exactly one
//! request per call against the Cloudflare API. There is no retry: a timeout or
//! a malformed answer is returned to the caller as a [`CollectError`].

mod graphql;
mod rest;

use crate::{
    error::{
        CollectError,
        Result,
    },
    queries::Query,
};
use cloudflare_exporter_config::Config;
use reqwest::{
    Client as HttpClient,
    RequestBuilder,
    StatusCode,
};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_email: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("api_email", &self.api_email)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CloudflareClient {
    http_client: HttpClient,
    api_base: String,
    credentials: Credentials,
}

impl CloudflareClient {
    pub fn new(api_base: impl Into<String>, credentials: Credentials, timeout: Duration) -> Result<Self> {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| CollectError::Transport {
                url: api_base.clone(),
                source,
            })?;
        Ok(Self {
            http_client,
            api_base,
            credentials,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base(),
            Credentials {
                api_key: config.api_key.clone(),
                api_email: config.api_email.clone(),
            },
            config.request_timeout,
        )
    }

    /// Runs `query` and decodes the payload of its response envelope.
    pub async fn execute<T: DeserializeOwned>(&self, query: &Query) -> Result<T> {
        match query {
            Query::Graphql(query) => self.post_graphql(query).await,
            Query::Rest(query) => self.get_result(&query.path, &query.params).await,
        }
    }

    /// The endpoint `query` is sent to.
    pub fn query_url(&self, query: &Query) -> String {
        match query {
            Query::Graphql(_) => self.graphql_url(),
            Query::Rest(query) => self.url(&query.path),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("X-Auth-Key", &self.credentials.api_key)
            .header("X-Auth-Email", &self.credentials.api_email)
    }

    /// Sends `request` and reads the whole body.
    async fn send(&self, request: RequestBuilder, url: &str) -> Result<(StatusCode, Vec<u8>)> {
        let transport = |source: reqwest::Error| CollectError::Transport {
            url: url.to_string(),
            source,
        };
        let response = self.authorize(request).send().await.map_err(transport)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport)?;
        debug!(%url, %status, bytes = body.len(), "Received response");
        Ok((status, body.to_vec()))
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(200) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

fn is_auth_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}
