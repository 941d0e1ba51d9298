//! # Prometheus Metrics
//!
//! Counts what the dashboard does on-chain. Scraped by Prometheus at the
//! `/metrics` HTTP endpoint on the configured metrics port.
//!
//! All metrics are registered in a dedicated [`prometheus::Registry`] under
//! the `yieldvault` prefix. They are fed from the controller's event stream,
//! so the controller itself knows nothing about Prometheus.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::core::Collector;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use yieldvault_core::DashboardEvent;

/// Prometheus metric handles for the dashboard.
#[derive(Clone)]
pub struct DashboardMetrics {
    registry: Registry,
    /// Transactions handed to the wallet and broadcast, by kind.
    pub transactions_submitted_total: IntCounterVec,
    /// Transactions mined successfully, by kind.
    pub transactions_confirmed_total: IntCounterVec,
    /// Transactions rejected, reverted, or lost, by kind.
    pub transactions_failed_total: IntCounterVec,
    /// Completed reloads of the vault list.
    pub vault_refreshes_total: IntCounter,
    /// Vaults in the most recent list.
    pub vaults_listed: IntGauge,
    /// Failed controller operations, by operation.
    pub errors_total: IntCounterVec,
}

fn register<M: Collector + Clone + 'static>(
    registry: &Registry,
    metric: M,
) -> Result<M, prometheus::Error> {
    registry.register(Box::new(metric.clone()))?;
    Ok(metric)
}

impl DashboardMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("yieldvault".into()), None)?;

        let transactions_submitted_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "transactions_submitted_total",
                    "Transactions signed and broadcast",
                ),
                &["kind"],
            )?,
        )?;
        let transactions_confirmed_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "transactions_confirmed_total",
                    "Transactions mined with a success status",
                ),
                &["kind"],
            )?,
        )?;
        let transactions_failed_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new(
                    "transactions_failed_total",
                    "Transactions rejected, reverted or lost",
                ),
                &["kind"],
            )?,
        )?;
        let vault_refreshes_total = register(
            &registry,
            IntCounter::new("vault_refreshes_total", "Completed vault list reloads")?,
        )?;
        let vaults_listed = register(
            &registry,
            IntGauge::new("vaults_listed", "Vaults in the most recent list")?,
        )?;
        let errors_total = register(
            &registry,
            IntCounterVec::new(
                Opts::new("errors_total", "Failed dashboard operations"),
                &["operation"],
            )?,
        )?;

        Ok(Self {
            registry,
            transactions_submitted_total,
            transactions_confirmed_total,
            transactions_failed_total,
            vault_refreshes_total,
            vaults_listed,
            errors_total,
        })
    }

    /// Updates the counters for one controller event.
    pub fn record(&self, event: &DashboardEvent) {
        match event {
            DashboardEvent::TransactionSubmitted { kind, .. } => self
                .transactions_submitted_total
                .with_label_values(&[kind.to_string().as_str()])
                .inc(),
            DashboardEvent::TransactionConfirmed { kind, .. } => self
                .transactions_confirmed_total
                .with_label_values(&[kind.to_string().as_str()])
                .inc(),
            DashboardEvent::TransactionFailed { kind, .. } => self
                .transactions_failed_total
                .with_label_values(&[kind.to_string().as_str()])
                .inc(),
            DashboardEvent::VaultsLoaded { count } => {
                self.vault_refreshes_total.inc();
                self.vaults_listed
                    .set(i64::try_from(*count).unwrap_or(i64::MAX));
            }
            DashboardEvent::Error { operation, .. } => {
                self.errors_total.with_label_values(&[*operation]).inc()
            }
            _ => {}
        }
    }

    /// Encodes all registered metrics into the Prometheus text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Shared metrics state passed to axum handlers.
pub type SharedMetrics = Arc<DashboardMetrics>;

/// Feeds controller events into `metrics` until the event channel closes.
pub fn spawn_recorder(
    metrics: SharedMetrics,
    mut events: broadcast::Receiver<DashboardEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => metrics.record(&event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "metrics recorder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Axum handler that renders `/metrics` in Prometheus text format.
pub async fn metrics_handler(
    axum::extract::State(metrics): axum::extract::State<SharedMetrics>,
) -> impl IntoResponse {
    match metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics encoding failed").into_response()
        }
    }
}
