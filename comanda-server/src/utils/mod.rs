//! Utility module - common helpers and types
//!
//! - [`AppError`] / [`AppResult`] - application error types
//! - [`AppResponse`] - API response envelope
//! - logging and validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};
