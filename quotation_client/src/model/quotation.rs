//! Quotation as seen by the client.
//!
//! The server answers with the bare bid, so the client keeps only that. The bytes are
//! kept as received; nothing is decoded before they reach the output file.
use std::borrow::Cow;

/// Bid returned by the quotation server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quotation {
    /// Raw response body, taken verbatim.
    pub bid: Vec<u8>,
}

impl Quotation {
    /// Bid for display; invalid UTF-8 is shown with replacement characters.
    pub fn bid_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bid)
    }

    /// Bytes written to the output file: `Dólar: ` followed by the raw bid.
    pub fn file_content(&self) -> Vec<u8> {
        let mut content = "Dólar: ".as_bytes().to_vec();
        content.extend_from_slice(&self.bid);
        content
    }
}
