/*
 * Responsibility
 * - CLI parsing, tokio runtime
 * - app::run() call (no logic here)
 */
use anyhow::Result;
use clap::Parser;

mod api;
mod app;
mod cli;
mod config;
mod error;
mod middleware;
mod services;
mod state;
#[cfg(test)]
mod test_support;

#[tokio::main]
async fn main() -> Result<()> {
    app::run(cli::Args::parse()).await
}
