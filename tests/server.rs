use cloudflare_exporter::server;
use cloudflare_exporter_collector::Orchestrator;
use cloudflare_exporter_config::{
    Args,
    Config,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::Arc,
};
use tokio::{
    net::TcpListener,
    sync::oneshot,
};
use wiremock::{
    matchers::{
        method,
        path,
    },
    Mock,
    MockServer,
    ResponseTemplate,
};

async fn start(api: &MockServer) -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let config = Config::from_sources(
        Args {
            api_key: Some("key".to_string()),
            api_email: Some("ops@example.com".to_string()),
            datasets: Some("waf".to_string()),
            api_url: Some(api.uri()),
            ..Default::default()
        },
        None,
    )
    .unwrap();
    let orchestrator = Arc::new(Orchestrator::new(&config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        server::serve(listener, orchestrator, async move {
            let _ = stopped.await;
        })
        .await
        .unwrap();
    });
    (address, stop, handle)
}

#[tokio::test]
async fn metrics_endpoint_renders_one_cycle() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [{ "id": "zone-a", "name": "a.example", "plan": { "name": "Enterprise Website" } }]
        })))
        .mount(&api)
        .await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "viewer": { "zones": [{ "fwEvents": [
            { "count": 12, "dimensions": { "action": "block", "clientASNDescription": "AS-EXAMPLE", "clientCountryName": "FR", "ruleId": "100015" } }
        ]}]}}})))
        .mount(&api)
        .await;

    let (address, stop, handle) = start(&api).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("http://{address}/healthz")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    assert_eq!(health.text().await.unwrap(), "ok");

    let response = client.get(format!("http://{address}/metrics")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/plain; version=0.0.4"));
    let body = response.text().await.unwrap();
    assert!(body.contains(
        r#"cloudflare_waf_events{action="block",as="AS-EXAMPLE",country="FR",ruleID="100015",zoneName="a.example"} 12"#
    ));
    assert!(body.contains(r#"cloudflare_exporter_dataset_emissions{dataset="waf"} 1"#));
    assert!(!body.contains("cloudflare_http_"));

    stop.send(()).unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn failed_session_still_answers_the_scrape() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/zones"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&api)
        .await;

    let (address, stop, handle) = start(&api).await;
    let body = reqwest::get(format!("http://{address}/metrics"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("cloudflare_exporter_cycle_success 0"));
    assert!(!body.contains("cloudflare_waf_events"));

    stop.send(()).unwrap();
    handle.await.unwrap();
}
