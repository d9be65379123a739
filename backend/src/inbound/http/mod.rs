//! HTTP inbound adapter exposing the REST endpoints.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod todos;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

/// JSON extractor configuration shared by every handler.
///
/// Body errors are reported with the standard error envelope.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(error::json_error_handler)
}
