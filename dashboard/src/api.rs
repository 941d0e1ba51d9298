//! # REST + WebSocket API
//!
//! Builds the axum router that puts the dashboard controller on HTTP. Every
//! handler is a thin call into the controller. The controller already owns
//! validation, the error banner, and event emission; handlers only pick the
//! status code.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                        |
//! |--------|-------------------------------|------------------------------------|
//! | GET    | `/health`                     | Liveness probe                     |
//! | GET    | `/status`                     | Dashboard state snapshot           |
//! | POST   | `/connect`                    | Connect the wallet                 |
//! | GET    | `/vaults`                     | Reload and return the vault list   |
//! | POST   | `/vaults`                     | Deploy a vault                     |
//! | POST   | `/vaults/:address/select`     | Select a vault, load its balance   |
//! | GET    | `/vaults/:address/balance`    | Caller's balance in a vault        |
//! | POST   | `/vaults/:address/deposit`    | Approve and deposit                |
//! | POST   | `/vaults/:address/withdraw`   | Withdraw                           |
//! | POST   | `/vaults/:address/strategies` | Add a strategy                     |
//! | DELETE | `/error`                      | Dismiss the error banner           |
//! | GET    | `/ws`                         | Live dashboard events              |

use alloy_primitives::Address;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use yieldvault_core::error::ErrorClass;
use yieldvault_core::{
    DashboardController, DashboardError, DashboardState, TxReceipt, VaultSummary, WalletProvider,
};

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// The controller as the API sees it: any wallet behind it.
pub type SharedController = Arc<DashboardController<dyn WalletProvider>>;

/// Shared application state available to all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The binary's reported version string.
    pub version: String,
    pub controller: SharedController,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .route("/connect", post(connect_handler))
        .route("/vaults", get(list_vaults_handler).post(deploy_vault_handler))
        .route("/vaults/:address/select", post(select_vault_handler))
        .route("/vaults/:address/balance", get(balance_handler))
        .route("/vaults/:address/deposit", post(deposit_handler))
        .route("/vaults/:address/withdraw", post(withdraw_handler))
        .route("/vaults/:address/strategies", post(add_strategy_handler))
        .route("/error", delete(dismiss_error_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request & Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /vaults`.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeployRequest {
    pub asset: String,
    pub name: String,
    pub symbol: String,
}

/// Body of `POST /vaults/:address/deposit` and `/withdraw`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AmountRequest {
    pub amount: String,
}

/// Body of `POST /vaults/:address/strategies`.
#[derive(Debug, Serialize, Deserialize)]
pub struct StrategyRequest {
    pub strategy: String,
}

/// Response payload for `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    /// Header-bar label, e.g. "Connected to Amoy Testnet".
    pub network_status: String,
    pub target_chain_id: u64,
    pub state: DashboardState,
    /// ISO-8601 timestamp of the response.
    pub timestamp: String,
}

/// Response payload for `POST /connect`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub address: Address,
    pub network_status: String,
}

/// Response payload for balance reads.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub vault: Address,
    pub balance: String,
}

/// Error body returned by every endpoint on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub class: String,
}

/// A controller failure on its way out as an HTTP response.
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(err: DashboardError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match (&self.0, self.0.class()) {
            (DashboardError::NoProvider, _) => StatusCode::SERVICE_UNAVAILABLE,
            (DashboardError::NotConnected, _) => StatusCode::CONFLICT,
            (_, ErrorClass::Validation) => StatusCode::BAD_REQUEST,
            (_, ErrorClass::Busy) => StatusCode::CONFLICT,
            (_, ErrorClass::Connection | ErrorClass::Read | ErrorClass::Write) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

fn class_label(class: ErrorClass) -> &'static str {
    match class {
        ErrorClass::Connection => "connection",
        ErrorClass::Read => "read",
        ErrorClass::Write => "write",
        ErrorClass::Validation => "validation",
        ErrorClass::Busy => "busy",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.0.to_string(),
            class: class_label(self.0.class()).to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 if the process is alive.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

/// `GET /status`: the full dashboard state plus the network label.
async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let controller = &state.controller;
    Json(StatusResponse {
        version: state.version.clone(),
        network_status: controller.network_status(),
        target_chain_id: controller.config().target_chain_id(),
        state: controller.state(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

async fn connect_handler(State(state): State<AppState>) -> ApiResult<ConnectResponse> {
    let address = state.controller.connect().await?;
    Ok(Json(ConnectResponse {
        address,
        network_status: state.controller.network_status(),
    }))
}

async fn list_vaults_handler(State(state): State<AppState>) -> ApiResult<Vec<VaultSummary>> {
    Ok(Json(state.controller.list_vaults().await?))
}

async fn deploy_vault_handler(
    State(state): State<AppState>,
    Json(req): Json<DeployRequest>,
) -> ApiResult<TxReceipt> {
    let receipt = state
        .controller
        .deploy_vault(&req.asset, &req.name, &req.symbol)
        .await?;
    Ok(Json(receipt))
}

async fn select_vault_handler(
    State(state): State<AppState>,
    Path(vault): Path<Address>,
) -> ApiResult<BalanceResponse> {
    let balance = state.controller.select_vault(vault).await?;
    Ok(Json(BalanceResponse { vault, balance }))
}

async fn balance_handler(
    State(state): State<AppState>,
    Path(vault): Path<Address>,
) -> ApiResult<BalanceResponse> {
    let balance = state.controller.load_user_vault_balance(vault).await?;
    Ok(Json(BalanceResponse { vault, balance }))
}

async fn deposit_handler(
    State(state): State<AppState>,
    Path(vault): Path<Address>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<TxReceipt> {
    Ok(Json(state.controller.deposit(vault, &req.amount).await?))
}

async fn withdraw_handler(
    State(state): State<AppState>,
    Path(vault): Path<Address>,
    Json(req): Json<AmountRequest>,
) -> ApiResult<TxReceipt> {
    Ok(Json(state.controller.withdraw(vault, &req.amount).await?))
}

async fn add_strategy_handler(
    State(state): State<AppState>,
    Path(vault): Path<Address>,
    Json(req): Json<StrategyRequest>,
) -> ApiResult<TxReceipt> {
    Ok(Json(
        state.controller.add_strategy(vault, &req.strategy).await?,
    ))
}

/// `DELETE /error`: dismisses the error banner.
async fn dismiss_error_handler(State(state): State<AppState>) -> StatusCode {
    state.controller.dismiss_error();
    StatusCode::NO_CONTENT
}

/// `GET /ws`: WebSocket upgrade for live dashboard events.
///
/// Clients receive JSON-encoded `DashboardEvent` messages. Client messages
/// are ignored.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Forwards controller events until the client disconnects or the channel
/// closes.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut rx = state.controller.subscribe();

    loop {
        tokio::select! {
            event = rx.recv() => {
                match event {
                    Ok(ev) => {
                        let payload = match serde_json::to_string(&ev) {
                            Ok(s) => s,
                            Err(e) => {
                                tracing::warn!(error = %e, "failed to serialize ws event");
                                continue;
                            }
                        };
                        if sender.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "ws subscriber lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }
}
