//! Data model types exchanged with the quotation server.
//!
//! - `quotation` — the bid-only quotation read from the server's response body.
pub mod quotation;
