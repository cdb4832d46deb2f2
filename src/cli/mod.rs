//! CLI module for the user registry service

pub mod serve;

use clap::{Parser, Subcommand};

/// User Registry - CRUD REST API with national ID and phone validation
#[derive(Parser)]
#[command(name = "user-registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}
