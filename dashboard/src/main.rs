// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Yield Vault Dashboard
//!
//! Entry point for the `yieldvault` binary. Parses CLI arguments, builds a
//! development chain and a dashboard controller on top of it, and either
//! serves the controller over HTTP or walks through a scripted session.
//!
//! The binary supports four subcommands:
//!
//! - `serve`: REST/WebSocket API plus Prometheus metrics
//! - `demo`: connect, deploy, deposit, withdraw, add strategy, list
//! - `config`: print the effective configuration
//! - `version`: print build version information

mod api;
mod cli;
mod logging;
mod metrics;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use yieldvault_core::config::DashboardConfig;
use yieldvault_core::{DashboardController, VaultSummary, WalletProvider};
use yieldvault_devchain::{bootstrap, Fixture};

use cli::{Commands, CommonArgs, YieldVaultCli};
use logging::LogFormat;
use metrics::DashboardMetrics;

/// Strategy attached by the demo walkthrough.
const DEMO_STRATEGY: &str = "0x5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a5a";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = YieldVaultCli::parse();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Demo(args) => demo(args).await,
        Commands::Config(args) => print_config(&args.common),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Reads the config file (or the defaults) and applies CLI overrides.
fn load_config(args: &CommonArgs) -> Result<DashboardConfig> {
    let mut config = match &args.config {
        Some(path) => DashboardConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    if let Some(factory) = &args.factory {
        config.factory_address = factory
            .parse::<Address>()
            .with_context(|| format!("invalid factory address: {factory}"))?;
    }

    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Builds a development chain for `config` and a controller wired to it.
fn build_controller(
    config: DashboardConfig,
) -> Result<(api::SharedController, Fixture)> {
    let fixture = bootstrap(&config).context("failed to bootstrap development chain")?;
    let provider: Arc<dyn WalletProvider> = fixture.chain.clone();
    let controller = Arc::new(DashboardController::new(config, Some(provider)));
    Ok((controller, fixture))
}

/// Serves the dashboard API and the metrics endpoint until shutdown.
async fn serve(args: cli::ServeArgs) -> Result<()> {
    logging::init_logging(
        logging::SERVE_FILTER,
        LogFormat::from_str_lossy(&args.common.log_format),
    );

    let config = load_config(&args.common)?;
    tracing::info!(
        network = %config.network.chain_name,
        chain_id = config.target_chain_id(),
        factory = %config.factory_address,
        api_port = args.api_port,
        metrics_port = args.metrics_port,
        "starting yieldvault dashboard"
    );

    let (controller, fixture) = build_controller(config)?;
    tracing::info!(
        account = %fixture.account,
        usdc = %fixture.usdc,
        weth = %fixture.weth,
        "development chain ready"
    );

    // --- Metrics ---
    let dashboard_metrics =
        Arc::new(DashboardMetrics::new().context("failed to register metrics")?);
    let recorder = metrics::spawn_recorder(Arc::clone(&dashboard_metrics), controller.subscribe());

    // --- Controller ---
    controller.initialize().await;
    let watcher = controller.watch_wallet_events();

    // --- API server ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        controller: Arc::clone(&controller),
    };
    let api_router = api::create_router(app_state);
    let api_addr = format!("{}:{}", args.bind, args.api_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {api_addr}"))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&dashboard_metrics));
    let metrics_addr = format!("{}:{}", args.bind, args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    if let Some(watcher) = watcher {
        watcher.abort();
    }
    recorder.abort();
    tracing::info!("yieldvault dashboard stopped");
    Ok(())
}

/// Runs one full dashboard session against a fresh development chain and
/// prints what the dashboard would show after each step.
async fn demo(args: cli::DemoArgs) -> Result<()> {
    logging::init_logging(
        logging::QUIET_FILTER,
        LogFormat::from_str_lossy(&args.common.log_format),
    );

    let config = load_config(&args.common)?;
    let (controller, fixture) = build_controller(config)?;

    let account = controller.connect().await.context("connect failed")?;
    println!("connected     {account}");
    println!("network       {}", controller.network_status());
    println!("vaults        {}", controller.state().vaults.len());

    let receipt = controller
        .deploy_vault(&fixture.usdc.to_string(), "USDC Yield Vault", "yvUSDC")
        .await
        .context("deploy failed")?;
    let vault = receipt
        .contract_address
        .context("deploy receipt carries no vault address")?;
    println!("deployed      {vault} (block {})", receipt.block_number);

    controller.select_vault(vault).await.context("select failed")?;

    controller
        .deposit(vault, &args.deposit)
        .await
        .context("deposit failed")?;
    println!(
        "deposited     {} -> balance {}",
        args.deposit,
        controller.state().user_vault_balance
    );

    controller
        .withdraw(vault, &args.withdraw)
        .await
        .context("withdraw failed")?;
    println!(
        "withdrew      {} -> balance {}",
        args.withdraw,
        controller.state().user_vault_balance
    );

    controller
        .add_strategy(vault, DEMO_STRATEGY)
        .await
        .context("add strategy failed")?;
    println!("strategy      {DEMO_STRATEGY}");

    let vaults = controller.list_vaults().await.context("list failed")?;
    println!();
    for summary in &vaults {
        print_vault(summary);
    }
    println!("transactions  {}", controller.state().history.len());
    Ok(())
}

fn print_vault(summary: &VaultSummary) {
    println!("{} ({})  {}", summary.name, summary.symbol, summary.address);
    println!("  total assets  {}", summary.total_assets);
    println!("  tvl           {}", summary.tvl);
    println!("  apy           {}", summary.apy);
    println!("  strategies    {}", summary.strategies);
}

/// Prints the effective configuration as pretty JSON.
fn print_config(args: &CommonArgs) -> Result<()> {
    let config = load_config(args)?;
    let rendered =
        serde_json::to_string_pretty(&config).context("failed to serialize configuration")?;
    println!("{rendered}");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    let config = DashboardConfig::default();
    println!("yieldvault {}", env!("CARGO_PKG_VERSION"));
    println!(
        "network    {} ({})",
        config.network.chain_name,
        config.network.chain_id_hex()
    );
    println!("factory    {}", config.factory_address);
    println!("rustc      {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// If a handler cannot be installed, that branch never completes and the
/// other one still works.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common(factory: Option<&str>) -> CommonArgs {
        CommonArgs {
            config: None,
            factory: factory.map(str::to_string),
            log_format: "pretty".into(),
        }
    }

    #[test]
    fn factory_override_applies() {
        let config = load_config(&common(Some("0x1111111111111111111111111111111111111111")))
            .unwrap();
        assert_eq!(config.factory_address, Address::repeat_byte(0x11));
    }

    #[test]
    fn bad_factory_override_is_rejected() {
        assert!(load_config(&common(Some("factory"))).is_err());
        assert!(load_config(&common(Some(
            "0x0000000000000000000000000000000000000000"
        )))
        .is_err());
    }

    #[test]
    fn config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{ "tx_history_limit": 3 }"#).unwrap();

        let mut args = common(None);
        args.config = Some(path);
        let config = load_config(&args).unwrap();
        assert_eq!(config.tx_history_limit, 3);
        assert_eq!(config.target_chain_id(), 80_002);
    }

    #[tokio::test]
    async fn demo_walkthrough_succeeds() {
        let args = cli::DemoArgs {
            common: common(None),
            deposit: "10".into(),
            withdraw: "4".into(),
        };
        let config = load_config(&args.common).unwrap();
        let (controller, fixture) = build_controller(config).unwrap();
        controller.connect().await.unwrap();
        let receipt = controller
            .deploy_vault(&fixture.usdc.to_string(), "V", "V")
            .await
            .unwrap();
        let vault = receipt.contract_address.unwrap();
        controller.select_vault(vault).await.unwrap();
        controller.deposit(vault, &args.deposit).await.unwrap();
        controller.withdraw(vault, &args.withdraw).await.unwrap();
        assert_eq!(controller.state().user_vault_balance, "6.0");
    }
}
