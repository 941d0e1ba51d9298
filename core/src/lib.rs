// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Yield Vault: Dashboard Core
//!
//! The client side of the yield vault system. The vaults, the factory that
//! deploys them, and the strategies they fund all live on-chain; this crate
//! is the part that talks to them through a wallet and keeps a dashboard's
//! view of the world roughly in sync with what the chain says.
//!
//! ## Architecture
//!
//! - **config**: Target network, factory address, and tunables.
//! - **units**: Human decimal strings ↔ integer base units.
//! - **provider**: The wallet/provider boundary: reads, writes, receipts,
//!   and wallet notifications. Everything chain-shaped goes through here.
//! - **contracts**: Typed handles for `VaultFactory`, `Vault`, and the
//!   asset token's `approve`.
//! - **types**: Vault projections, connection state, tracked transactions.
//! - **controller**: The dashboard controller: connect, list, deploy,
//!   deposit, withdraw, add strategy, and react to wallet events.
//! - **error**: The controller's error taxonomy.
//!
//! ## Ground Rules
//!
//! 1. Amounts are `U256` base units everywhere except at the display edge.
//! 2. Every write is submit → confirm → refresh. No optimistic updates.
//! 3. The displayed state is a snapshot. It is allowed to be stale.

pub mod config;
pub mod contracts;
pub mod controller;
pub mod error;
pub mod provider;
pub mod types;
pub mod units;

pub use controller::{DashboardController, DashboardEvent};
pub use error::DashboardError;
pub use provider::{CallOutput, ContractCall, ProviderError, WalletEvent, WalletProvider};
pub use types::{
    ConnectionState, DashboardState, FormState, PendingTransaction, TxHash, TxKind, TxReceipt,
    TxStatus, VaultSummary,
};
