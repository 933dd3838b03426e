//! `GET /cotacao` handler.
//!
//! Each request runs the same linear pipeline: fetch from the upstream source,
//! persist with a fresh 10ms deadline, answer with the raw bid. Any failure stops
//! the pipeline and becomes a 500 whose body is the error message.
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use log::error;
use quotation_common::net::{PERSIST_DEADLINE, QUOTATION_ROUTE};
use quotation_common::{QuotationError, Result};

use crate::gateway::QuotationSource;
use crate::store::QuotationStore;

/// Orchestrates source lookup and persistence for one request.
pub struct QuotationHandler {
    source: Arc<dyn QuotationSource>,
    store: Arc<dyn QuotationStore>,
    persist_deadline: Duration,
}

impl QuotationHandler {
    /// Handler over the given source and store.
    pub fn new(source: Arc<dyn QuotationSource>, store: Arc<dyn QuotationStore>) -> Self {
        Self {
            source,
            store,
            persist_deadline: PERSIST_DEADLINE,
        }
    }

    /// Replace the persistence budget (10ms by default).
    pub fn with_persist_deadline(mut self, persist_deadline: Duration) -> Self {
        self.persist_deadline = persist_deadline;
        self
    }

    /// Fetch, then persist, then hand back the bid to send.
    pub async fn quotation_bid(&self) -> Result<String> {
        let record = self.source.fetch().await.inspect_err(|e| {
            error!("Error getting quotation from upstream API: {}", e);
        })?;

        let deadline = Instant::now() + self.persist_deadline;
        if let Err(e) = self.store.insert(&record, deadline).await {
            if matches!(e, QuotationError::DeadlineExceeded) {
                error!("Time limit exceeded persisting quotation to database: {}", e);
            } else {
                error!("Error persisting quotation to database: {}", e);
            }
            return Err(e);
        }

        Ok(record.bid)
    }
}

/// Router exposing the quotation route on top of `handler`.
pub fn router(handler: Arc<QuotationHandler>) -> Router {
    Router::new()
        .route(QUOTATION_ROUTE, get(get_quotation))
        .with_state(handler)
}

async fn get_quotation(State(handler): State<Arc<QuotationHandler>>) -> Response {
    match handler.quotation_bid().await {
        Ok(bid) => ([(header::CONTENT_TYPE, "application/json")], bid).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(err: &QuotationError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        format!("{err}\n"),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request};
    use quotation_common::QuotationRecord;
    use std::sync::Mutex;
    use tower::ServiceExt;

    fn sample_record() -> QuotationRecord {
        QuotationRecord {
            code: "USD".into(),
            codein: "BRL".into(),
            name: "Dólar Americano/Real Brasileiro".into(),
            high: "5.8688".into(),
            low: "5.8213".into(),
            var_bid: "0.0313".into(),
            pct_change: "0.54".into(),
            bid: "5.8576".into(),
            ask: "5.8582".into(),
            timestamp: "1701278942".into(),
            create_date: QuotationRecord::parse_create_date("2023-11-29 17:55:42").unwrap(),
        }
    }

    struct FakeSource {
        outcome: fn() -> Result<QuotationRecord>,
    }

    #[async_trait]
    impl QuotationSource for FakeSource {
        async fn fetch(&self) -> Result<QuotationRecord> {
            (self.outcome)()
        }
    }

    #[derive(Default)]
    struct FakeStore {
        failure: Option<fn() -> QuotationError>,
        inserted: Mutex<Vec<(String, Instant)>>,
    }

    #[async_trait]
    impl QuotationStore for FakeStore {
        async fn insert(&self, record: &QuotationRecord, deadline: Instant) -> Result<()> {
            self.inserted
                .lock()
                .unwrap()
                .push((record.bid.clone(), deadline));
            match self.failure {
                Some(failure) => Err(failure()),
                None => Ok(()),
            }
        }
    }

    fn ok_source() -> Arc<FakeSource> {
        Arc::new(FakeSource {
            outcome: || Ok(sample_record()),
        })
    }

    async fn call(handler: QuotationHandler, method: Method, uri: &str) -> (StatusCode, Response) {
        let response = router(Arc::new(handler))
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        (response.status(), response)
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn success_returns_raw_bid_as_json() {
        let store = Arc::new(FakeStore::default());
        let handler = QuotationHandler::new(ok_source(), store.clone());

        let (status, response) = call(handler, Method::GET, "/cotacao").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(body_text(response).await, "5.8576");
        assert_eq!(store.inserted.lock().unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn persistence_gets_a_ten_millisecond_deadline() {
        let store = Arc::new(FakeStore::default());
        let handler = QuotationHandler::new(ok_source(), store.clone());

        let before = Instant::now();
        handler.quotation_bid().await.unwrap();
        let after = Instant::now();

        let inserted = store.inserted.lock().unwrap();
        let (bid, deadline) = &inserted[0];
        assert_eq!(bid, "5.8576");
        assert!(*deadline >= before + PERSIST_DEADLINE);
        assert!(*deadline <= after + PERSIST_DEADLINE);
    }

    #[test_log::test(tokio::test)]
    async fn fetch_failure_is_500_and_skips_store() {
        let source = Arc::new(FakeSource {
            outcome: || {
                Err(QuotationError::FetchFailed {
                    url: "https://upstream".into(),
                    timed_out: true,
                    reason: "operation timed out".into(),
                })
            },
        });
        let store = Arc::new(FakeStore::default());
        let handler = QuotationHandler::new(source, store.clone());

        let (status, response) = call(handler, Method::GET, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            body_text(response).await,
            "request to https://upstream failed: deadline exceeded (operation timed out)\n"
        );
        assert!(store.inserted.lock().unwrap().is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn malformed_upstream_is_500() {
        let source = Arc::new(FakeSource {
            outcome: || Err(QuotationError::MalformedResponse("bad create_date".into())),
        });
        let handler = QuotationHandler::new(source, Arc::new(FakeStore::default()));

        let (status, response) = call(handler, Method::GET, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "malformed quotation response: bad create_date\n"
        );
    }

    #[test_log::test(tokio::test)]
    async fn store_deadline_is_500_with_message() {
        let store = Arc::new(FakeStore {
            failure: Some(|| QuotationError::DeadlineExceeded),
            ..FakeStore::default()
        });
        let handler = QuotationHandler::new(ok_source(), store.clone());

        let (status, response) = call(handler, Method::GET, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "failed to persist quotation: deadline exceeded\n"
        );
        assert_eq!(store.inserted.lock().unwrap().len(), 1);
    }

    #[test_log::test(tokio::test)]
    async fn store_failure_is_500_with_message() {
        let store = Arc::new(FakeStore {
            failure: Some(|| QuotationError::PersistenceFailed("disk I/O error".into())),
            ..FakeStore::default()
        });
        let handler = QuotationHandler::new(ok_source(), store);

        let (status, response) = call(handler, Method::GET, "/cotacao").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_text(response).await,
            "failed to persist quotation: disk I/O error\n"
        );
    }

    #[test_log::test(tokio::test)]
    async fn only_get_is_routed() {
        let handler = QuotationHandler::new(ok_source(), Arc::new(FakeStore::default()));
        let (status, _) = call(handler, Method::POST, "/cotacao").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let handler = QuotationHandler::new(ok_source(), Arc::new(FakeStore::default()));
        let (status, _) = call(handler, Method::GET, "/other").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
