//!
//! Common types and utilities shared by the quotation server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `QuotationError` used across the workspace.
//! - `result` — handy `Result<T, QuotationError>` alias.
//! - `quotation` — the `QuotationRecord` built from the upstream payload.
//! - `net` — endpoints, defaults and the cascading call budgets.
#![warn(missing_docs)]
pub mod error;
pub mod net;
pub mod quotation;
pub mod result;

pub use error::QuotationError;
pub use quotation::QuotationRecord;
pub use result::Result;
