//! # CLI Interface
//!
//! Defines the command-line argument structure for `yieldvault` using
//! `clap` derive. Supports four subcommands: `serve`, `demo`, `config`,
//! and `version`.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Yield vault dashboard.
///
/// Connects a wallet to the vault factory, lists vaults, and drives
/// deploys, deposits, withdrawals and strategy changes. Runs against an
/// in-memory development chain.
#[derive(Parser, Debug)]
#[command(
    name = "yieldvault",
    about = "Yield vault dashboard",
    version,
    propagate_version = true
)]
pub struct YieldVaultCli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the dashboard binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the dashboard API, WebSocket event feed, and metrics.
    Serve(ServeArgs),
    /// Walk through connect, deploy, deposit, withdraw and add strategy
    /// against a fresh development chain.
    Demo(DemoArgs),
    /// Print the effective configuration as JSON.
    Config(ConfigArgs),
    /// Print version information and exit.
    Version,
}

/// Options shared by every subcommand that builds a controller.
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Path to a JSON dashboard configuration file.
    ///
    /// Missing fields fall back to the Amoy testnet defaults.
    #[arg(long, short = 'c', env = "YIELDVAULT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the `VaultFactory` address.
    #[arg(long, env = "YIELDVAULT_FACTORY")]
    pub factory: Option<String>,

    /// Log output format: `pretty` or `json`.
    #[arg(long, env = "YIELDVAULT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Interface to bind the API and metrics listeners on.
    #[arg(long, env = "YIELDVAULT_BIND", default_value = "127.0.0.1")]
    pub bind: String,

    /// Port for the REST and WebSocket API.
    #[arg(long, env = "YIELDVAULT_API_PORT", default_value_t = 8645)]
    pub api_port: u16,

    /// Port for the Prometheus metrics endpoint.
    #[arg(long, env = "YIELDVAULT_METRICS_PORT", default_value_t = 9645)]
    pub metrics_port: u16,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Amount of tUSDC to deposit.
    #[arg(long, default_value = "250.5")]
    pub deposit: String,

    /// Amount of tUSDC to withdraw afterwards.
    #[arg(long, default_value = "100")]
    pub withdraw: String,
}

/// Arguments for the `config` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}
