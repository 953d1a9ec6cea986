#[macro_use]
extern crate tracing;

pub mod error;
pub mod logging;
pub mod server;

pub use logging::{
    init_errors,
    init_logging,
};
