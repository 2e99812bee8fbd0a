//! Custom Axum extractors.

mod json;
mod principal;

pub use json::*;
pub use principal::*;
