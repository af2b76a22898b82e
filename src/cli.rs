/*
 * Responsibility
 * - Command-line flags (config path, log level, TLS / plaintext listeners)
 */
use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "jwt-subrequest-auth")]
#[command(about = "Validates bearer JWTs for reverse-proxy auth sub-requests")]
pub struct Args {
    /// Path to configuration file
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Path to TLS key
    #[arg(long)]
    pub tls_key: Option<PathBuf>,

    /// Path to TLS cert
    #[arg(long)]
    pub tls_cert: Option<PathBuf>,

    /// Address/port to serve traffic in TLS mode
    #[arg(long, default_value = ":8443")]
    pub addr: String,

    /// Serve traffic unencrypted over http
    #[arg(long)]
    pub insecure: bool,

    /// Address/port to serve traffic in insecure mode
    #[arg(long, default_value = ":8080")]
    pub insecure_addr: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl LogLevel {
    /// `tracing` has no fatal level; it filters like error.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error | LogLevel::Fatal => "error",
        }
    }
}

/// Accepts `host:port` or `:port` (all interfaces).
pub fn parse_bind_addr(addr: &str) -> Result<SocketAddr, std::net::AddrParseError> {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}").parse(),
        None => addr.parse(),
    }
}
