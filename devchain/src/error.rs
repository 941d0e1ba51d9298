//! Revert reasons produced by the development chain's contracts.

use alloy_primitives::{Address, U256};
use thiserror::Error;
use yieldvault_core::ProviderError;

/// Why a contract call on the development chain failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// No contract lives at this address.
    #[error("no contract at {0}")]
    NoContract(Address),

    /// The contract does not implement this method.
    #[error("{contract} does not implement {method}")]
    UnsupportedMethod {
        contract: &'static str,
        method: &'static str,
    },

    /// Token balance too low for the transfer.
    #[error("insufficient balance: have {available}, need {required}")]
    InsufficientBalance { available: U256, required: U256 },

    /// Allowance too low for `transferFrom`.
    #[error("insufficient allowance: have {available}, need {required}")]
    InsufficientAllowance { available: U256, required: U256 },

    /// Vault shares too low for the withdrawal.
    #[error("insufficient shares: have {available}, need {required}")]
    InsufficientShares { available: U256, required: U256 },

    /// Zero-amount deposits and withdrawals do nothing and are refused.
    #[error("zero amount")]
    ZeroAmount,

    /// An address argument was the zero address.
    #[error("zero address")]
    ZeroAddress,

    /// The caller may not act on behalf of `owner`.
    #[error("caller {caller} is not the owner {owner}")]
    NotOwner { caller: Address, owner: Address },

    /// Only the vault manager may change strategies.
    #[error("caller {0} is not the vault manager")]
    NotManager(Address),

    /// The strategy is already attached.
    #[error("strategy {0} already added")]
    DuplicateStrategy(Address),

    /// The factory only deploys vaults for known asset tokens.
    #[error("asset {0} is not a token")]
    UnknownAsset(Address),

    /// Vault index past the end of the factory list.
    #[error("vault index {index} out of range (count {count})")]
    IndexOutOfRange { index: U256, count: u64 },

    /// Arithmetic overflow.
    #[error("arithmetic overflow")]
    Overflow,
}

impl From<ChainError> for ProviderError {
    fn from(err: ChainError) -> Self {
        ProviderError::Reverted(err.to_string())
    }
}
