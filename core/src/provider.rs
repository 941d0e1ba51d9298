//! # Wallet / Provider Boundary
//!
//! The dashboard never speaks JSON-RPC or ABI directly. It goes through a
//! [`WalletProvider`]: something that can list accounts, switch networks,
//! run read-only contract calls, sign and submit writes, hand back receipts,
//! and announce account or chain changes. A browser wallet, a remote signer,
//! or the in-memory development chain can all sit behind it.
//!
//! Contract methods are expressed as a typed [`ContractCall`] rather than
//! raw calldata. The ABIs stay opaque: each variant knows its Solidity
//! signature for logging and whether it mutates state, and that is all.
//!
//! ## Error Codes
//!
//! [`ProviderError`] follows EIP-1193 where a code exists:
//!
//! | Code  | Meaning                               |
//! |-------|---------------------------------------|
//! | 4001  | User rejected the request             |
//! | 4100  | Account not authorized                |
//! | 4902  | Chain not added to the wallet         |

use alloy_primitives::{Address, Bytes, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;

use crate::config::NetworkConfig;
use crate::types::{TxHash, TxKind, TxReceipt};

/// EIP-1193: the user rejected the request.
pub const CODE_USER_REJECTED: i64 = 4001;

/// EIP-1193: the requested account or method is not authorized.
pub const CODE_UNAUTHORIZED: i64 = 4100;

/// EIP-3085/3326: the wallet does not know the requested chain.
pub const CODE_UNRECOGNIZED_CHAIN: i64 = 4902;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`WalletProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The user dismissed or declined the wallet prompt.
    #[error("user rejected the request")]
    UserRejected,

    /// The account is not authorized for this request.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The wallet does not know this chain; it must be added first.
    #[error("unrecognized chain id {0}")]
    UnrecognizedChain(u64),

    /// Contract execution reverted.
    #[error("execution reverted: {0}")]
    Reverted(String),

    /// The call returned something other than what its signature promises.
    #[error("unexpected return value from {method}: expected {expected}")]
    Decode {
        /// Solidity signature of the call.
        method: &'static str,
        /// The expected return type.
        expected: &'static str,
    },

    /// No transaction with this hash is known.
    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHash),

    /// Anything else: RPC down, malformed response, wallet internal error.
    #[error("provider error ({code}): {message}")]
    Rpc {
        /// JSON-RPC or EIP-1193 error code.
        code: i64,
        /// Human-readable message from the provider.
        message: String,
    },
}

impl ProviderError {
    /// The numeric error code a browser wallet would attach.
    pub fn code(&self) -> i64 {
        match self {
            ProviderError::UserRejected => CODE_USER_REJECTED,
            ProviderError::Unauthorized(_) => CODE_UNAUTHORIZED,
            ProviderError::UnrecognizedChain(_) => CODE_UNRECOGNIZED_CHAIN,
            ProviderError::Reverted(_) => 3,
            ProviderError::Decode { .. } | ProviderError::UnknownTransaction(_) => -32603,
            ProviderError::Rpc { code, .. } => *code,
        }
    }
}

// ---------------------------------------------------------------------------
// Wallet Notifications
// ---------------------------------------------------------------------------

/// Notifications a wallet pushes without being asked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WalletEvent {
    /// The set of authorized accounts changed. Empty means disconnected.
    AccountsChanged { accounts: Vec<Address> },
    /// The user switched networks in the wallet.
    ChainChanged { chain_id: u64 },
    /// The wallet lost its connection entirely.
    Disconnected,
}

// ---------------------------------------------------------------------------
// Contract Calls
// ---------------------------------------------------------------------------

/// `VaultFactory` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FactoryCall {
    GetVaultCount,
    GetVault { index: U256 },
    DeployVault {
        asset: Address,
        name: String,
        symbol: String,
    },
}

/// `Vault` methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultCall {
    Name,
    Symbol,
    TotalAssets,
    Decimals,
    BalanceOf { account: Address },
    GetStrategiesCount,
    Asset,
    Deposit { assets: U256, receiver: Address },
    Withdraw {
        assets: U256,
        receiver: Address,
        owner: Address,
    },
    AddStrategy { strategy: Address },
}

/// The one asset token method the dashboard needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    Approve { spender: Address, amount: U256 },
}

/// A contract method invocation, typed by interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractCall {
    Factory(FactoryCall),
    Vault(VaultCall),
    Token(TokenCall),
}

impl ContractCall {
    /// Solidity signature, for logs and error messages.
    pub fn signature(&self) -> &'static str {
        match self {
            ContractCall::Factory(call) => match call {
                FactoryCall::GetVaultCount => "getVaultCount()",
                FactoryCall::GetVault { .. } => "getVault(uint256)",
                FactoryCall::DeployVault { .. } => "deployVault(address,string,string)",
            },
            ContractCall::Vault(call) => match call {
                VaultCall::Name => "name()",
                VaultCall::Symbol => "symbol()",
                VaultCall::TotalAssets => "totalAssets()",
                VaultCall::Decimals => "decimals()",
                VaultCall::BalanceOf { .. } => "balanceOf(address)",
                VaultCall::GetStrategiesCount => "getStrategiesCount()",
                VaultCall::Asset => "asset()",
                VaultCall::Deposit { .. } => "deposit(uint256,address)",
                VaultCall::Withdraw { .. } => "withdraw(uint256,address,address)",
                VaultCall::AddStrategy { .. } => "addStrategy(address)",
            },
            ContractCall::Token(TokenCall::Approve { .. }) => "approve(address,uint256)",
        }
    }

    /// The transaction kind for writes; `None` for reads.
    pub fn tx_kind(&self) -> Option<TxKind> {
        match self {
            ContractCall::Factory(FactoryCall::DeployVault { .. }) => Some(TxKind::DeployVault),
            ContractCall::Vault(VaultCall::Deposit { .. }) => Some(TxKind::Deposit),
            ContractCall::Vault(VaultCall::Withdraw { .. }) => Some(TxKind::Withdraw),
            ContractCall::Vault(VaultCall::AddStrategy { .. }) => Some(TxKind::AddStrategy),
            ContractCall::Token(TokenCall::Approve { .. }) => Some(TxKind::Approve),
            _ => None,
        }
    }

    /// Whether the call changes state and therefore needs a transaction.
    pub fn is_write(&self) -> bool {
        self.tx_kind().is_some()
    }
}

/// Decoded return value of a read-only call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallOutput {
    Uint(U256),
    Address(Address),
    String(String),
    Bool(bool),
}

impl CallOutput {
    pub fn into_uint(self, method: &'static str) -> Result<U256, ProviderError> {
        match self {
            CallOutput::Uint(v) => Ok(v),
            _ => Err(ProviderError::Decode {
                method,
                expected: "uint256",
            }),
        }
    }

    pub fn into_address(self, method: &'static str) -> Result<Address, ProviderError> {
        match self {
            CallOutput::Address(a) => Ok(a),
            _ => Err(ProviderError::Decode {
                method,
                expected: "address",
            }),
        }
    }

    pub fn into_string(self, method: &'static str) -> Result<String, ProviderError> {
        match self {
            CallOutput::String(s) => Ok(s),
            _ => Err(ProviderError::Decode {
                method,
                expected: "string",
            }),
        }
    }

    /// Narrows a `uint` result to `u8`, e.g. for `decimals()`.
    pub fn into_u8(self, method: &'static str) -> Result<u8, ProviderError> {
        let value = self.into_uint(method)?;
        u8::try_from(value).map_err(|_| ProviderError::Decode {
            method,
            expected: "uint8",
        })
    }

    /// Narrows a `uint` result to `u64`, e.g. for counts.
    pub fn into_u64(self, method: &'static str) -> Result<u64, ProviderError> {
        let value = self.into_uint(method)?;
        u64::try_from(value).map_err(|_| ProviderError::Decode {
            method,
            expected: "uint64-sized count",
        })
    }
}

// ---------------------------------------------------------------------------
// Provider Trait
// ---------------------------------------------------------------------------

/// Everything the dashboard needs from a wallet and its node.
///
/// Implementations serialize their own signing prompts; the dashboard may
/// call into them from several tasks at once.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Accounts already authorized for this dashboard. Never prompts.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// Asks the user to connect. Returns the authorized accounts.
    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The network the wallet is currently on.
    async fn chain_id(&self) -> Result<u64, ProviderError>;

    /// Asks the wallet to switch networks. Fails with
    /// [`ProviderError::UnrecognizedChain`] if the wallet does not know it.
    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError>;

    /// Asks the wallet to learn about a network (and switch to it).
    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError>;

    /// Deployed bytecode at `address`. Empty for accounts without code.
    async fn get_code(&self, address: Address) -> Result<Bytes, ProviderError>;

    /// Executes a read-only call against `to`.
    async fn call(&self, to: Address, call: ContractCall) -> Result<CallOutput, ProviderError>;

    /// Signs and broadcasts a write from `from` to `to`.
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        call: ContractCall,
    ) -> Result<TxHash, ProviderError>;

    /// Waits until the transaction is mined.
    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ProviderError>;

    /// Subscribes to account and chain change notifications.
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_classification() {
        assert!(!ContractCall::Factory(FactoryCall::GetVaultCount).is_write());
        assert!(!ContractCall::Vault(VaultCall::Decimals).is_write());
        assert!(ContractCall::Token(TokenCall::Approve {
            spender: Address::ZERO,
            amount: U256::from(1u8),
        })
        .is_write());
        assert!(ContractCall::Vault(VaultCall::AddStrategy {
            strategy: Address::ZERO
        })
        .is_write());
        assert_eq!(
            ContractCall::Factory(FactoryCall::DeployVault {
                asset: Address::ZERO,
                name: "v".into(),
                symbol: "v".into(),
            })
            .tx_kind(),
            Some(TxKind::DeployVault)
        );
    }

    #[test]
    fn signatures_name_the_methods() {
        let call = ContractCall::Vault(VaultCall::Withdraw {
            assets: U256::ZERO,
            receiver: Address::ZERO,
            owner: Address::ZERO,
        });
        assert_eq!(call.signature(), "withdraw(uint256,address,address)");
    }

    #[test]
    fn decode_narrowing() {
        assert_eq!(CallOutput::Uint(U256::from(18u8)).into_u8("decimals()"), Ok(18));
        assert!(CallOutput::Uint(U256::from(256u16))
            .into_u8("decimals()")
            .is_err());
        assert!(matches!(
            CallOutput::String("x".into()).into_uint("totalAssets()"),
            Err(ProviderError::Decode { .. })
        ));
    }

    #[test]
    fn error_codes_follow_eip1193() {
        assert_eq!(ProviderError::UserRejected.code(), 4001);
        assert_eq!(ProviderError::UnrecognizedChain(80_002).code(), 4902);
    }

    #[test]
    fn wallet_event_json_shape() {
        let json = serde_json::to_value(WalletEvent::ChainChanged { chain_id: 1 }).unwrap();
        assert_eq!(json["type"], "chain_changed");
        assert_eq!(json["chain_id"], 1);
    }
}
