//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Email authentication checker
///
/// Looks up SPF, DKIM and DMARC records for a domain or email address
/// over DNS-over-HTTPS and scores them out of 100.
/// Use --explain on any command to learn what it does.
#[derive(Parser, Debug)]
#[command(name = "dnsauth")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Explain what this command does (educational mode)
    #[arg(long, global = true)]
    pub explain: bool,

    /// Increase verbosity
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// DNS-over-HTTPS endpoint (DNS-JSON)
    #[arg(long, env = "DNSAUTH_RESOLVER", global = true)]
    pub resolver: Option<String>,

    /// Usage log service base URL
    #[arg(long, env = "DNSAUTH_LOG_ENDPOINT", global = true)]
    pub log_endpoint: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check SPF, DKIM and DMARC for a domain or email address
    Check(CheckArgs),

    /// Show usage statistics from the log service
    Stats(StatsArgs),

    /// Run the usage log service
    Serve(ServeArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Domain (example.com) or email address (someone@example.com)
    pub address: String,

    /// Do not report this check to the log service
    #[arg(long)]
    pub no_log: bool,
}

#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Admin token for the log service
    #[arg(long, env = "DNSAUTH_ADMIN_TOKEN")]
    pub token: Option<String>,
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Server config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listen address, e.g. 127.0.0.1:8787
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// SQLite database URL, e.g. sqlite://dnsauth.db
    #[arg(long)]
    pub database: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Key to set (e.g., resolver, log_endpoint, output_format)
        key: String,

        /// Value to set
        value: String,
    },

    /// Show config file path
    Path,
}
