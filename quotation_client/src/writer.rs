//! Writing the quotation to a local text file.
use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use quotation_common::net::DEFAULT_OUTPUT_PATH;
use quotation_common::{QuotationError, Result};

use crate::model::quotation::Quotation;

/// `path`, or `cotacao.txt` when it is empty.
pub fn resolve_output_path(path: &Path) -> PathBuf {
    if path.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_OUTPUT_PATH)
    } else {
        path.to_path_buf()
    }
}

/// Create or truncate the output file and write `Dólar: <bid>` to it, without a newline.
///
/// The bid bytes are written exactly as the server sent them.
pub fn write_quotation(path: &Path, quotation: &Quotation) -> Result<PathBuf> {
    let path = resolve_output_path(path);
    fs::write(&path, quotation.file_content()).map_err(|source| QuotationError::IoFailed {
        path: path.clone(),
        source,
    })?;
    info!("Quotation written to {}", path.display());
    Ok(path)
}
