//! Quotation client library.
//!
//! - `fetcher` — `QuotationFetcher`, one bounded GET to the quotation server.
//! - `writer` — `write_quotation`, the `Dólar: <bid>` output file.
//! - `model` — the bid-only `Quotation`.
//!
//! [`run`] chains the two steps the way the binary does.
#![warn(missing_docs)]
pub mod fetcher;
pub mod model;
pub mod writer;

use std::path::{Path, PathBuf};

use quotation_common::Result;

pub use fetcher::QuotationFetcher;
pub use model::quotation::Quotation;
pub use writer::write_quotation;

/// Fetch the quotation from `server_url` and write it to `output`.
///
/// Returns the quotation and the file actually written.
pub async fn run(server_url: &str, output: &Path) -> Result<(Quotation, PathBuf)> {
    let quotation = QuotationFetcher::new(server_url)?.fetch().await?;
    let written = write_quotation(output, &quotation)?;
    Ok((quotation, written))
}
