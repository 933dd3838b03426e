//! Command-line arguments for the quotation server.
use clap::Parser;
use quotation_common::net::{DEFAULT_DB_PATH, DEFAULT_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// HTTP server port.
    #[clap(long, default_value = DEFAULT_PORT)]
    pub port: String,

    /// Path to the SQLite database file.
    #[clap(long, default_value = DEFAULT_DB_PATH)]
    pub db: String,
}
