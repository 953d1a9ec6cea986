//! # Query Builders
//!
//! One module per dataset holding the fixed set of requested dimensions and
//! metrics. [`build`] binds a collection window and scope into a [`Query`] the
//! fetch client can execute.

pub mod dns;
pub mod http;
pub mod network;
pub mod waf;
pub mod workers;

use crate::{
    error::{
        CollectError,
        Result,
    },
    scope::ScopeId,
    window::CollectionWindow,
};
use cloudflare_exporter_config::Dataset;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Graphql(GraphqlQuery),
    Rest(RestQuery),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlQuery {
    #[serde(rename = "query")]
    pub document: &'static str,
    pub variables: GraphqlVariables,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlVariables {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_tag: Option<String>,
    pub start_date: String,
    pub end_date: String,
}

impl GraphqlVariables {
    fn new(window: &CollectionWindow, scope: ScopeId<'_>) -> Self {
        let (zone_tag, account_tag) = match scope {
            ScopeId::Zone(id) => (Some(id.to_string()), None),
            ScopeId::Account(id) => (None, Some(id.to_string())),
        };
        Self {
            zone_tag,
            account_tag,
            start_date: window.start_rfc3339(),
            end_date: window.end_rfc3339(),
        }
    }
}

/// A GET against a path below the API base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RestQuery {
    pub path: String,
    pub params: Vec<(&'static str, String)>,
}

/// Builds the query of `dataset` for one scope.
pub fn build(dataset: Dataset, window: &CollectionWindow, scope: ScopeId<'_>) -> Result<Query> {
    let document = match (dataset, scope) {
        (Dataset::Dns, ScopeId::Zone(zone_id)) => return Ok(Query::Rest(dns::query(window, zone_id))),
        (Dataset::Http, ScopeId::Zone(_)) => http::DOCUMENT,
        (Dataset::Waf, ScopeId::Zone(_)) => waf::DOCUMENT,
        (Dataset::Workers, ScopeId::Account(_)) => workers::DOCUMENT,
        (Dataset::Net, ScopeId::Account(_)) => network::DOCUMENT,
        (dataset, ScopeId::Zone(_)) => {
            return Err(CollectError::ScopeMismatch {
                dataset,
                scope: "zone",
            })
        }
        (dataset, ScopeId::Account(_)) => {
            return Err(CollectError::ScopeMismatch {
                dataset,
                scope: "account",
            })
        }
    };
    Ok(Query::Graphql(GraphqlQuery {
        document,
        variables: GraphqlVariables::new(window, scope),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{
        DateTime,
        Utc,
    };
    use cloudflare_exporter_config::WindowOffsets;
    use pretty_assertions::assert_eq;

    fn window() -> CollectionWindow {
        let now = DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        CollectionWindow::rolling(now, WindowOffsets::default())
    }

    #[test]
    fn zone_queries_bind_only_the_zone_tag() {
        let Query::Graphql(query) = build(Dataset::Http, &window(), ScopeId::Zone("zone-1")).unwrap() else {
            panic!("http must be a graphql query");
        };
        assert_eq!(
            serde_json::to_value(&query.variables).unwrap(),
            serde_json::json!({
                "zoneTag": "zone-1",
                "startDate": "2024-03-01T11:40:00Z",
                "endDate": "2024-03-01T11:55:00Z",
            })
        );
    }

    #[test]
    fn account_queries_bind_only_the_account_tag() {
        for dataset in [Dataset::Workers, Dataset::Net] {
            let Query::Graphql(query) = build(dataset, &window(), ScopeId::Account("acc")).unwrap() else {
                panic!("{dataset} must be a graphql query");
            };
            let variables = serde_json::to_value(&query.variables).unwrap();
            assert_eq!(variables["accountTag"], "acc");
            assert!(variables.get("zoneTag").is_none());
        }
    }

    #[test]
    fn request_body_carries_document_and_variables() {
        let Query::Graphql(query) = build(Dataset::Waf, &window(), ScopeId::Zone("z")).unwrap() else {
            panic!("waf must be a graphql query");
        };
        let body = serde_json::to_value(&query).unwrap();
        assert_eq!(body["query"], waf::DOCUMENT);
        assert_eq!(body["variables"]["zoneTag"], "z");
    }

    #[test]
    fn scope_granularity_is_enforced() {
        assert!(matches!(
            build(Dataset::Workers, &window(), ScopeId::Zone("z")),
            Err(CollectError::ScopeMismatch {
                dataset: Dataset::Workers,
                scope: "zone"
            })
        ));
        assert!(matches!(
            build(Dataset::Dns, &window(), ScopeId::Account("a")),
            Err(CollectError::ScopeMismatch {
                dataset: Dataset::Dns,
                ..
            })
        ));
    }
}
