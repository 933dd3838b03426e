//! Fetching the current quotation from the quotation server.
//!
//! The response body is the bid whatever the HTTP status: a `500` with body
//! `boom` yields a quotation whose bid is `boom`. Only transport failures and the
//! 300ms timeout are errors.
use std::time::Duration;

use log::{debug, error, info, warn};
use quotation_common::net::SERVER_FETCH_TIMEOUT;
use quotation_common::{QuotationError, Result};

use crate::model::quotation::Quotation;

/// HTTP client for the quotation server.
pub struct QuotationFetcher {
    server_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl QuotationFetcher {
    /// Fetcher for `server_url` with the 300ms budget.
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_timeout(server_url, SERVER_FETCH_TIMEOUT)
    }

    /// Fetcher for `server_url` bounded by `timeout`.
    pub fn with_timeout(server_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("quotation_client/0.1")
            .build()
            .map_err(|e| QuotationError::FetchFailed {
                url: server_url.to_string(),
                timed_out: false,
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            server_url: server_url.to_string(),
            timeout,
            client,
        })
    }

    /// GET the server URL and take the whole body as the bid.
    pub async fn fetch(&self) -> Result<Quotation> {
        info!("Requesting quotation from {}", self.server_url);

        let response = self
            .client
            .get(&self.server_url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| self.fetch_error(e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                "Quotation server {} answered with status {}; using the body as the bid",
                self.server_url, status
            );
        }

        let bid = response.bytes().await.map_err(|e| self.fetch_error(e))?.to_vec();
        let quotation = Quotation { bid };
        debug!("Received bid {:?}", quotation.bid_text());

        Ok(quotation)
    }

    fn fetch_error(&self, err: reqwest::Error) -> QuotationError {
        let timed_out = err.is_timeout();
        if timed_out {
            error!(
                "Time limit of {:?} exceeded calling {}: {}",
                self.timeout, self.server_url, err
            );
        } else {
            error!("Error calling {}: {}", self.server_url, err);
        }
        QuotationError::FetchFailed {
            url: self.server_url.clone(),
            timed_out,
            reason: err.to_string(),
        }
    }
}
