//! CLI module for the PMP Partner API
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `routes`: print the envelope endpoint table

pub mod routes;
pub mod serve;

use clap::{Parser, Subcommand};

/// PMP Partner API - partner self-service and partner manager endpoints
#[derive(Parser)]
#[command(name = "pmp-partner-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve(serve::ServeArgs),

    /// Print the envelope endpoint table
    Routes(routes::RoutesArgs),
}
