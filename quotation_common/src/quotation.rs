//! Quotation record produced by the upstream lookup.
//!
//! Price fields stay as the text the upstream API sent so no precision is lost
//! on the way to the database and to the client. Only `create_date` is parsed,
//! and a record cannot exist with an unparsable date.
use chrono::NaiveDateTime;

use crate::error::QuotationError;
use crate::result::Result;

/// Fixed layout of the upstream `create_date` field, e.g. `2023-11-29 17:55:42`.
pub const CREATE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One currency quotation for a trading pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotationRecord {
    /// Base currency symbol (e.g., `USD`).
    pub code: String,
    /// Counter currency symbol (e.g., `BRL`).
    pub codein: String,
    /// Display name of the pair.
    pub name: String,
    /// Session high.
    pub high: String,
    /// Session low.
    pub low: String,
    /// Bid variation.
    pub var_bid: String,
    /// Percent change.
    pub pct_change: String,
    /// Price delivered to the client.
    pub bid: String,
    /// Ask price.
    pub ask: String,
    /// Seconds since epoch, as provided upstream.
    pub timestamp: String,
    /// Upstream creation instant.
    pub create_date: NaiveDateTime,
}

impl QuotationRecord {
    /// Parse an upstream `create_date` value under [`CREATE_DATE_FORMAT`].
    pub fn parse_create_date(raw: &str) -> Result<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, CREATE_DATE_FORMAT).map_err(|e| {
            QuotationError::MalformedResponse(format!("invalid create_date {raw:?}: {e}"))
        })
    }

    /// `create_date` rendered back in the upstream layout, as stored in the database.
    pub fn create_date_text(&self) -> String {
        self.create_date.format(CREATE_DATE_FORMAT).to_string()
    }
}
