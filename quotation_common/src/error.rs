//! Error types shared between client and server.
//!
//! The `QuotationError` enum covers every failure along the quotation pipeline:
//! remote calls, payload decoding, persistence and the final file write. Both
//! binaries propagate it unchanged; the server renders its message as the body
//! of a 500 response, the client prints it and exits.
use std::io;
use std::path::PathBuf;
use std::sync::PoisonError;

use thiserror::Error;

/// Unified error type shared by client and server.
#[derive(Error, Debug)]
pub enum QuotationError {
    /// Transport failure or timeout while calling the upstream API or the quotation server.
    #[error("{}", fetch_message(.url, .timed_out, .reason))]
    FetchFailed {
        /// Target of the failed request.
        url: String,
        /// `true` when the call was aborted because its deadline elapsed.
        timed_out: bool,
        /// Underlying transport error, rendered as text.
        reason: String,
    },

    /// Upstream payload that does not decode into a quotation (bad JSON, missing field, bad date).
    #[error("malformed quotation response: {0}")]
    MalformedResponse(String),

    /// The store deadline elapsed before the insert completed.
    #[error("failed to persist quotation: deadline exceeded")]
    DeadlineExceeded,

    /// Any other store failure.
    #[error("failed to persist quotation: {0}")]
    PersistenceFailed(String),

    /// Output file could not be created or written.
    #[error("failed to write quotation to {}: {source}", .path.display())]
    IoFailed {
        /// File that was being written.
        path: PathBuf,
        /// Error reported by the file system.
        #[source]
        source: io::Error,
    },

    /// Error indicating a poisoned mutex/lock was encountered.
    #[error("failed to persist quotation: mutex lock poisoned: {0}")]
    MutexLock(String),
}

fn fetch_message(url: &str, timed_out: &bool, reason: &str) -> String {
    if *timed_out {
        format!("request to {url} failed: deadline exceeded ({reason})")
    } else {
        format!("request to {url} failed: {reason}")
    }
}

impl QuotationError {
    /// Returns `true` for errors caused by an elapsed deadline, on either a fetch or an insert.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            QuotationError::FetchFailed { timed_out: true, .. } | QuotationError::DeadlineExceeded
        )
    }
}

impl<T> From<PoisonError<T>> for QuotationError {
    fn from(err: PoisonError<T>) -> Self {
        QuotationError::MutexLock(err.to_string())
    }
}
