//! HTTP middleware.

mod auth;
mod logging;
mod timeout;

pub use auth::*;
pub use logging::*;
pub use timeout::*;
