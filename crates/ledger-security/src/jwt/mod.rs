//! JWT handling.

mod claims;
mod verifier;

pub use claims::*;
pub use verifier::*;
