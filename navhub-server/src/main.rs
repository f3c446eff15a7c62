//! Binary crate for the `navhub` server.
//!
//! This crate focuses on:
//! - Parsing CLI arguments and loading configuration
//! - Logging setup
//! - Serving the weather endpoint over HTTP

use clap::Parser;

mod cli;
mod logging;
mod routes;
mod server;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
