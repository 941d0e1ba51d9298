// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Yield Vault: Development Chain
//!
//! An in-memory wallet and chain that implements
//! [`yieldvault_core::WalletProvider`], so the dashboard controller can run
//! end to end without a browser or an RPC endpoint.
//!
//! - **token**: ERC-20 balances and allowances.
//! - **vault**: 1:1 share vaults with manager-gated strategies.
//! - **factory**: the ordered vault registry.
//! - **chain**: the wallet and node, with networks and receipts.
//! - **fault**: rejections, reverts and read failures on demand.
//! - **journal**: every request, in order, for assertions.
//! - **bootstrap**: a seeded chain matching a dashboard config.

pub mod bootstrap;
pub mod chain;
pub mod error;
pub mod factory;
pub mod fault;
pub mod journal;
pub mod token;
pub mod vault;

pub use bootstrap::{bootstrap, Fixture, DEV_ACCOUNT};
pub use chain::{DevChain, MAINNET_CHAIN_ID};
pub use error::ChainError;
pub use fault::Fault;
pub use journal::{submitted_kinds, Request};
