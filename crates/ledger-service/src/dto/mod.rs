//! Data Transfer Objects (DTOs).

mod transaction_dto;
mod validation;

pub use transaction_dto::*;
pub use validation::*;
