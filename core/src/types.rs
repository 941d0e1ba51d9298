//! # Dashboard Types
//!
//! Read-only projections of on-chain state plus the bookkeeping the
//! dashboard needs to track its own in-flight transactions. Everything here
//! is plain data: serializable, cloneable, and owned by the controller.

use alloy_primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Transaction hash.
pub type TxHash = B256;

// ---------------------------------------------------------------------------
// Vault Projection
// ---------------------------------------------------------------------------

/// A vault as the dashboard shows it. Fetched on demand, never persisted,
/// and stale the moment anyone deposits, withdraws, or adds a strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultSummary {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    /// Total assets formatted with the vault's decimals.
    pub total_assets: String,
    /// Total assets in base units.
    pub total_assets_raw: U256,
    pub decimals: u8,
    /// Number of strategies attached to the vault.
    pub strategies: u64,
    /// Always [`crate::config::APY_UNAVAILABLE`] for now.
    pub apy: String,
    /// Total value locked. Equal to `total_assets` until price feeds exist.
    pub tvl: String,
}

// ---------------------------------------------------------------------------
// Connection
// ---------------------------------------------------------------------------

/// What the dashboard knows about the wallet session. The wallet owns the
/// session; the dashboard only observes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    /// The active account, once the user has authorized one.
    pub address: Option<Address>,
    /// The chain the wallet last reported.
    pub chain_id: Option<u64>,
    /// Whether an account is authorized and the session is usable.
    pub connected: bool,
}

impl ConnectionState {
    /// One-line status for the header bar.
    pub fn network_status(&self, target_chain_id: u64, target_name: &str) -> String {
        match (self.connected, self.chain_id) {
            (true, Some(id)) if id == target_chain_id => format!("Connected to {target_name}"),
            (true, Some(_)) => format!("Please connect to {target_name}"),
            _ => "Not Connected".to_string(),
        }
    }

    /// Whether the wallet sits on the target network.
    pub fn on_target(&self, target_chain_id: u64) -> bool {
        self.chain_id == Some(target_chain_id)
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// The kinds of writes the dashboard submits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxKind {
    DeployVault,
    Approve,
    Deposit,
    Withdraw,
    AddStrategy,
}

impl std::fmt::Display for TxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            TxKind::DeployVault => "deploy vault",
            TxKind::Approve => "approve",
            TxKind::Deposit => "deposit",
            TxKind::Withdraw => "withdraw",
            TxKind::AddStrategy => "add strategy",
        };
        f.write_str(label)
    }
}

/// Lifecycle of a tracked transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxStatus {
    /// Handed to the wallet, waiting for the user to sign.
    Submitting,
    /// Signed and broadcast, waiting for a receipt.
    Submitted,
    /// Mined with a success status.
    Confirmed,
    /// Rejected, reverted, or lost.
    Failed,
}

impl TxStatus {
    /// Whether the transaction has reached a final state.
    pub fn is_terminal(self) -> bool {
        matches!(self, TxStatus::Confirmed | TxStatus::Failed)
    }
}

/// A write tracked from submission to confirmation or failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    pub id: Uuid,
    pub kind: TxKind,
    /// Contract the call was sent to.
    pub target: Address,
    /// Set once the wallet has broadcast the transaction.
    pub hash: Option<TxHash>,
    pub status: TxStatus,
    pub submitted_at: DateTime<Utc>,
    /// Set when the transaction ends in [`TxStatus::Failed`].
    pub failure: Option<String>,
}

impl PendingTransaction {
    pub fn new(kind: TxKind, target: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            target,
            hash: None,
            status: TxStatus::Submitting,
            submitted_at: Utc::now(),
            failure: None,
        }
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub block_number: u64,
    /// `false` when execution reverted.
    pub success: bool,
    /// Address of a contract created by the transaction, if any.
    pub contract_address: Option<Address>,
}

// ---------------------------------------------------------------------------
// Forms & State
// ---------------------------------------------------------------------------

/// Input fields the dashboard binds to. Cleared by the controller after the
/// corresponding write is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    pub asset_address: String,
    pub vault_name: String,
    pub vault_symbol: String,
    pub deposit_amount: String,
    pub withdraw_amount: String,
    pub new_strategy_address: String,
}

impl FormState {
    pub fn clear_deploy(&mut self) {
        self.asset_address.clear();
        self.vault_name.clear();
        self.vault_symbol.clear();
    }
}

/// Everything a dashboard view renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub connection: ConnectionState,
    pub vaults: Vec<VaultSummary>,
    pub selected_vault: Option<Address>,
    /// The caller's vault share balance, formatted. `"0"` until loaded.
    pub user_vault_balance: String,
    pub forms: FormState,
    pub is_loading: bool,
    pub is_connecting: bool,
    /// User-visible, dismissible error message.
    pub error: Option<String>,
    pub pending: Option<PendingTransaction>,
    /// Finished transactions, most recent last.
    pub history: Vec<PendingTransaction>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            connection: ConnectionState::default(),
            vaults: Vec::new(),
            selected_vault: None,
            user_vault_balance: "0".to_string(),
            forms: FormState::default(),
            is_loading: false,
            is_connecting: false,
            error: None,
            pending: None,
            history: Vec::new(),
        }
    }
}

impl DashboardState {
    /// Looks up a vault in the current snapshot.
    pub fn vault(&self, address: Address) -> Option<&VaultSummary> {
        self.vaults.iter().find(|v| v.address == address)
    }

    /// Drops everything tied to the wallet session, keeping forms and
    /// transaction history.
    pub fn reset_session(&mut self) {
        self.connection = ConnectionState::default();
        self.vaults.clear();
        self.selected_vault = None;
        self.user_vault_balance = "0".to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_status_labels() {
        let mut conn = ConnectionState::default();
        assert_eq!(conn.network_status(80_002, "Amoy"), "Not Connected");

        conn.connected = true;
        conn.chain_id = Some(1);
        assert_eq!(conn.network_status(80_002, "Amoy"), "Please connect to Amoy");

        conn.chain_id = Some(80_002);
        assert_eq!(conn.network_status(80_002, "Amoy"), "Connected to Amoy");
        assert!(conn.on_target(80_002));
    }

    #[test]
    fn new_pending_transaction_starts_submitting() {
        let tx = PendingTransaction::new(TxKind::Deposit, Address::repeat_byte(7));
        assert_eq!(tx.status, TxStatus::Submitting);
        assert!(tx.hash.is_none());
        assert!(!tx.status.is_terminal());
    }

    #[test]
    fn reset_session_keeps_forms_and_history() {
        let mut state = DashboardState::default();
        state.connection.connected = true;
        state.selected_vault = Some(Address::repeat_byte(1));
        state.user_vault_balance = "3.0".into();
        state.forms.deposit_amount = "1".into();
        state
            .history
            .push(PendingTransaction::new(TxKind::Approve, Address::ZERO));

        state.reset_session();

        assert!(!state.connection.connected);
        assert!(state.selected_vault.is_none());
        assert_eq!(state.user_vault_balance, "0");
        assert_eq!(state.forms.deposit_amount, "1");
        assert_eq!(state.history.len(), 1);
    }

    #[test]
    fn tx_kind_serializes_snake_case() {
        let json = serde_json::to_string(&TxKind::AddStrategy).unwrap();
        assert_eq!(json, "\"add_strategy\"");
        assert_eq!(TxKind::DeployVault.to_string(), "deploy vault");
    }
}
