//! Quotation Client — asks the quotation server for the current USD-BRL bid and
//! writes it to a text file as `Dólar: <bid>`.
//!
//! Usage example (CLI):
//! ```bash
//! quotation_client --server http://localhost:8080/cotacao --output cotacao.txt
//! ```
//!
//! Any fetch or write failure is printed to stderr and the process exits with status 1.
#![warn(missing_docs)]
mod args;

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use crate::args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();
    let args = Args::parse();

    match quotation_client::run(&args.server, Path::new(&args.output)).await {
        Ok((quotation, written)) => {
            println!("USD-BRL quotation: {}", quotation.bid_text());
            println!("Quotation saved to {}", written.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Quotation client failed: {}", e);
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
