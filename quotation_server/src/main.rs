//! Quotation HTTP server.
//!
//! Binds `GET /cotacao` on the configured port. Every request fetches the current
//! USD-BRL quotation from the upstream API, stores it in the SQLite database given
//! by `--db`, and answers with the bid as the response body.
//!
//! Usage example (CLI):
//! ```bash
//! quotation_server --port 8080 --db ./quotations.db
//! ```
mod args;

use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use quotation_common::net::listen_addr;
use quotation_server::{QuotationGateway, QuotationHandler, SqliteQuotationStore, router};

use crate::args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logger();
    let args = Args::parse();

    let store = Arc::new(SqliteQuotationStore::open(&args.db)?);
    let gateway = Arc::new(QuotationGateway::upstream()?);
    let handler = Arc::new(QuotationHandler::new(gateway, store));

    let listener = tokio::net::TcpListener::bind(listen_addr(&args.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl+C received. Shutting down server..."),
        Err(e) => {
            error!("Cannot listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
