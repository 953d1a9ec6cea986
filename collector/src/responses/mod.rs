//! Typed shapes of the upstream responses.

pub mod api;
pub mod dns;
pub mod graphql;

pub use api::*;
pub use dns::*;
pub use graphql::*;
