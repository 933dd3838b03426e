//! Shared networking defaults and call budgets used by client and server.
//!
//! The three budgets cascade: the client gives the server 300ms, the server gives
//! the upstream API 200ms of that, and the local insert gets 10ms.
use std::time::Duration;

/// Upstream quotation API queried by the server.
pub const UPSTREAM_URL: &str = "https://economia.awesomeapi.com.br/json/last/USD-BRL";
/// Top-level key of the upstream JSON envelope.
pub const UPSTREAM_PAIR: &str = "USDBRL";
/// Budget for the server's call to the upstream API.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_millis(200);

/// Budget for the client's call to the quotation server.
pub const SERVER_FETCH_TIMEOUT: Duration = Duration::from_millis(300);

/// Budget for persisting one quotation.
pub const PERSIST_DEADLINE: Duration = Duration::from_millis(10);

/// The single route exposed by the server.
pub const QUOTATION_ROUTE: &str = "/cotacao";
/// Default HTTP port of the server.
pub const DEFAULT_PORT: &str = "8080";
/// Default SQLite database file of the server.
pub const DEFAULT_DB_PATH: &str = "./quotations.db";
/// Default server endpoint used by the client.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080/cotacao";
/// Default output file written by the client.
pub const DEFAULT_OUTPUT_PATH: &str = "cotacao.txt";

/// Helper to build a listen address like "0.0.0.0:port".
pub fn listen_addr(port: &str) -> String {
    format!("0.0.0.0:{}", port)
}
