//! Command-line arguments for the quotation client.
use clap::Parser;
use quotation_common::net::{DEFAULT_OUTPUT_PATH, DEFAULT_SERVER_URL};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// URL of the quotation server.
    #[clap(long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Path to save the quotation to.
    #[clap(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: String,
}
