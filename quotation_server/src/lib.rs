//! Quotation proxy server.
//!
//! Each `GET /cotacao` looks up the current USD-BRL quotation upstream, records it in
//! SQLite and answers with the bid. The building blocks:
//!
//! - `gateway` — `QuotationSource` capability and the HTTP `QuotationGateway` (200ms budget).
//! - `store` — `QuotationStore` capability and the SQLite `SqliteQuotationStore` (10ms budget).
//! - `handler` — `QuotationHandler` wiring the two together, and the axum `router`.
//!
//! Both capabilities are injected into the handler, so tests can swap either for a fake.
pub mod gateway;
pub mod handler;
pub mod store;

pub use gateway::{QuotationGateway, QuotationSource};
pub use handler::{QuotationHandler, router};
pub use store::{QuotationStore, SqliteQuotationStore};
