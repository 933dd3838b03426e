//! Upstream quotation lookup.
//!
//! `QuotationGateway` issues one GET to the quotation API per call, bounded by a
//! fixed timeout that covers connecting, headers and the body. The reply is an
//! envelope keyed by trading pair:
//!
//! ```json
//! { "USDBRL": { "code": "USD", "bid": "5.8576", "create_date": "2023-11-29 17:55:42", ... } }
//! ```
//!
//! Every leaf is a string; `create_date` is the only one parsed.
use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error, warn};
use quotation_common::net::{UPSTREAM_PAIR, UPSTREAM_TIMEOUT, UPSTREAM_URL};
use quotation_common::{QuotationError, QuotationRecord, Result};
use serde::Deserialize;
use serde_json::Value;

/// Capability to obtain a fresh quotation.
#[async_trait]
pub trait QuotationSource: Send + Sync {
    /// Fetch the current quotation. Never cached, never retried.
    async fn fetch(&self) -> Result<QuotationRecord>;
}

#[derive(Debug, Deserialize)]
struct UpstreamQuotation {
    code: String,
    codein: String,
    name: String,
    high: String,
    low: String,
    #[serde(rename = "varBid")]
    var_bid: String,
    #[serde(rename = "pctChange")]
    pct_change: String,
    bid: String,
    ask: String,
    timestamp: String,
    create_date: String,
}

impl UpstreamQuotation {
    fn into_record(self) -> Result<QuotationRecord> {
        let create_date = QuotationRecord::parse_create_date(&self.create_date)?;
        Ok(QuotationRecord {
            code: self.code,
            codein: self.codein,
            name: self.name,
            high: self.high,
            low: self.low,
            var_bid: self.var_bid,
            pct_change: self.pct_change,
            bid: self.bid,
            ask: self.ask,
            timestamp: self.timestamp,
            create_date,
        })
    }
}

/// HTTP client for the upstream quotation API.
pub struct QuotationGateway {
    url: String,
    pair: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl QuotationGateway {
    /// Gateway for `url`, reading the `pair` entry of the envelope, bounded by `timeout`.
    pub fn new(url: &str, pair: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("quotation_server/0.1")
            .build()
            .map_err(|e| QuotationError::FetchFailed {
                url: url.to_string(),
                timed_out: false,
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            url: url.to_string(),
            pair: pair.to_string(),
            timeout,
            client,
        })
    }

    /// Gateway for the production USD-BRL endpoint with the 200ms budget.
    pub fn upstream() -> Result<Self> {
        Self::new(UPSTREAM_URL, UPSTREAM_PAIR, UPSTREAM_TIMEOUT)
    }

    fn fetch_error(&self, err: reqwest::Error) -> QuotationError {
        let timed_out = err.is_timeout();
        if timed_out {
            error!(
                "Time limit of {:?} exceeded calling upstream API {}: {}",
                self.timeout, self.url, err
            );
        } else {
            error!("Error calling upstream API {}: {}", self.url, err);
        }
        QuotationError::FetchFailed {
            url: self.url.clone(),
            timed_out,
            reason: err.to_string(),
        }
    }

    fn decode(&self, body: &str) -> Result<QuotationRecord> {
        let mut envelope: HashMap<String, Value> = serde_json::from_str(body)
            .map_err(|e| QuotationError::MalformedResponse(format!("cannot decode JSON: {e}")))?;
        let entry = envelope.remove(&self.pair).ok_or_else(|| {
            QuotationError::MalformedResponse(format!("missing {} entry", self.pair))
        })?;
        let quotation: UpstreamQuotation = serde_json::from_value(entry).map_err(|e| {
            QuotationError::MalformedResponse(format!("invalid {} entry: {e}", self.pair))
        })?;
        quotation.into_record()
    }
}

#[async_trait]
impl QuotationSource for QuotationGateway {
    async fn fetch(&self) -> Result<QuotationRecord> {
        debug!("Requesting quotation from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream API {} answered with status {}", self.url, status);
        }

        let body = response.text().await.map_err(|e| self.fetch_error(e))?;

        self.decode(&body).inspect_err(|e| {
            error!("Error decoding upstream quotation (status {}): {}", status, e);
        })
    }
}
