//! Result type alias shared across the workspace.
//!
//! Defaults the error type to `QuotationError`, so pipeline functions can simply
//! return `Result<T>`.
use crate::error::QuotationError;

/// Workspace-wide `Result` alias with `QuotationError` as the default error.
pub type Result<T, E = QuotationError> = std::result::Result<T, E>;
