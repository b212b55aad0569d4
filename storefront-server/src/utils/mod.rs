//! Utility module - shared helpers and types
//!
//! - [`AppError`] / [`AppResponse`] - unified error and response types
//! - [`logger`] - tracing subscriber setup
//! - [`time`] - Unix-millisecond helpers
//! - [`validation`] - text input validation helpers

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult};
pub use error::{ok, ok_with_message};
