//! # Dashboard Errors
//!
//! Every controller operation catches its own failures and turns them into
//! one of these. `Display` is what the user sees in the error banner, so
//! the messages are written for people, not for logs.

use alloy_primitives::Address;
use thiserror::Error;

use crate::provider::ProviderError;
use crate::types::TxKind;
use crate::units::UnitsError;

/// Coarse grouping used by presentation layers to pick a status code or
/// a banner color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Wallet missing, rejected, wrong network, not connected.
    Connection,
    /// A chain read failed.
    Read,
    /// A transaction was rejected or reverted.
    Write,
    /// Bad input, caught before anything was sent.
    Validation,
    /// Another transaction is still in flight.
    Busy,
}

/// Errors surfaced by [`crate::DashboardController`] operations.
#[derive(Debug, Error)]
pub enum DashboardError {
    // --- Connection ---
    /// No wallet provider is available.
    #[error("Please install MetaMask or another browser wallet")]
    NoProvider,

    /// The operation needs a connected wallet.
    #[error("Please connect your wallet first")]
    NotConnected,

    /// The user declined the connection prompt.
    #[error("Wallet connection was rejected")]
    ConnectionRejected,

    /// The wallet refused to switch to the target network.
    #[error("Failed to switch to {network} network")]
    NetworkSwitchFailed {
        network: String,
        #[source]
        source: ProviderError,
    },

    /// The wallet refused to add the target network.
    #[error("Failed to add {network} network to the wallet")]
    NetworkAddFailed {
        network: String,
        #[source]
        source: ProviderError,
    },

    /// The wallet authorized no accounts.
    #[error("The wallet returned no accounts")]
    NoAccounts,

    /// No bytecode at the configured factory address.
    #[error(
        "No contract deployed at {0}. Please verify the network and contract address."
    )]
    FactoryNotDeployed(Address),

    // --- Reads ---
    /// A read-only call failed.
    #[error("Failed to {context}: {source}")]
    Read {
        context: &'static str,
        #[source]
        source: ProviderError,
    },

    // --- Writes ---
    /// The transaction was never mined: rejected by the user or the wallet.
    #[error("Error during {kind}: {source}")]
    Submit {
        kind: TxKind,
        #[source]
        source: ProviderError,
    },

    /// The transaction was mined but execution failed.
    #[error("Transaction reverted during {kind}")]
    Reverted { kind: TxKind },

    // --- Validation ---
    /// The amount field does not hold a positive number in range.
    #[error("Please enter a valid {operation} amount")]
    InvalidAmount {
        operation: &'static str,
        #[source]
        source: UnitsError,
    },

    /// A field that must hold an address does not.
    #[error("Invalid {field} address: {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    /// A required text field is empty.
    #[error("{0} must not be empty")]
    MissingField(&'static str),

    /// The vault is not in the current list.
    #[error("Unknown vault {0}")]
    UnknownVault(Address),

    /// A transaction is already in flight.
    #[error("Another transaction ({0}) is still pending")]
    Busy(TxKind),
}

impl DashboardError {
    pub fn class(&self) -> ErrorClass {
        match self {
            DashboardError::NoProvider
            | DashboardError::NotConnected
            | DashboardError::ConnectionRejected
            | DashboardError::NetworkSwitchFailed { .. }
            | DashboardError::NetworkAddFailed { .. }
            | DashboardError::NoAccounts
            | DashboardError::FactoryNotDeployed(_) => ErrorClass::Connection,
            DashboardError::Read { .. } => ErrorClass::Read,
            DashboardError::Submit { .. } | DashboardError::Reverted { .. } => ErrorClass::Write,
            DashboardError::InvalidAmount { .. }
            | DashboardError::InvalidAddress { .. }
            | DashboardError::MissingField(_)
            | DashboardError::UnknownVault(_) => ErrorClass::Validation,
            DashboardError::Busy(_) => ErrorClass::Busy,
        }
    }

    pub(crate) fn read(context: &'static str) -> impl FnOnce(ProviderError) -> Self {
        move |source| DashboardError::Read { context, source }
    }

    pub(crate) fn submit(kind: TxKind) -> impl FnOnce(ProviderError) -> Self {
        move |source| DashboardError::Submit { kind, source }
    }
}
