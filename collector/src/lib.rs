//! # Cloudflare Exporter Collector
//!
//! Pulls analytics from the Cloudflare API and turns them into Prometheus samples.
//!
//! ## Datasets
//!
//! - **http**: bytes and requests per cache status, response code, country, content type, SSL and HTTP version
//! - **waf**: firewall events per ASN, country, action and rule
//! - **dns**: query counts and response time percentiles from the DNS analytics report
//! - **workers**: CPU time quantiles and request sums per Workers script
//! - **net**: bits and packets per network-layer attack
//!
//! ## Architecture
//!
//! - **`descriptors`**: the immutable catalogue of exported metrics and their label schemas
//! - **`queries`**: per-dataset GraphQL documents and REST report parameters
//! - **`client`**: single-shot GraphQL and REST calls with a fixed timeout
//! - **`responses`**: typed response shapes
//! - **`collectors`**: per-dataset collectors, session resolution and the cycle orchestrator
//! - **`sink`**: renders one cycle into the Prometheus text format
//!
//! ## Usage
//!
//! ```no_run
//! # async fn scrape(config: cloudflare_exporter_config::Config) -> Result<(), cloudflare_exporter_collector::CollectError> {
//! use cloudflare_exporter_collector::{Orchestrator, RegistrySink};
//!
//! let orchestrator = Orchestrator::new(&config)?;
//! let mut sink = RegistrySink::new();
//! orchestrator.collect(&mut sink).await;
//! println!("{}", sink.render()?);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate tracing;

pub mod client;
pub mod collectors;
pub mod descriptors;
pub mod emission;
pub mod error;
pub mod queries;
pub mod responses;
pub mod scope;
pub mod sink;
pub mod window;

pub use client::{
    CloudflareClient,
    Credentials,
};
pub use collectors::*;
pub use descriptors::{
    DescriptorTable,
    MetricDescriptor,
    MetricKey,
    MetricKind,
};
pub use emission::{
    Emission,
    Emitter,
    MetricSink,
};
pub use error::{
    CollectError,
    Result,
};
pub use sink::RegistrySink;
pub use window::CollectionWindow;
