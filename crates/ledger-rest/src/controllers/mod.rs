//! REST API controllers.

pub mod analytics_controller;
pub mod health_controller;
pub mod transaction_controller;

pub use health_controller::*;
