//! # Collectors Module
//!
//! One collector per Cloudflare dataset, plus the pieces that drive them.
//!
//! ## Architecture
//!
//! - **`DatasetCollector` trait**: builds, fetches and maps one dataset for every scope it applies to
//! - **`HttpCollector`**, **`WafCollector`**, **`DnsCollector`**: iterate the eligible zones
//! - **`WorkersCollector`**, **`NetworkCollector`**: run once against the configured account
//! - **`SessionResolver`**: computes the rolling window and lists zones and account per cycle
//! - **`Orchestrator`**: serializes cycles and streams every emission into a sink
//!
//! A failing zone or dataset is logged and contributes nothing. It never stops
//! sibling zones or datasets of the same cycle.

pub mod collector;
pub mod dns_collector;
pub mod http_collector;
pub mod network_collector;
pub mod orchestrator;
pub mod session;
pub mod waf_collector;
pub mod workers_collector;

pub use collector::{
    CycleContext,
    DatasetCollector,
    DatasetReport,
    ScopeFailure,
};
pub use dns_collector::DnsCollector;
pub use http_collector::HttpCollector;
pub use network_collector::NetworkCollector;
pub use orchestrator::{
    CycleReport,
    DatasetSummary,
    Orchestrator,
};
pub use session::SessionResolver;
pub use waf_collector::WafCollector;
pub use workers_collector::WorkersCollector;
