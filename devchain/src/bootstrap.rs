//! Seeded development chain for local runs, demos and tests.

use std::sync::Arc;

use alloy_primitives::{address, Address, U256};
use yieldvault_core::config::DashboardConfig;
use yieldvault_core::units::parse_units;

use crate::chain::{DevChain, MAINNET_CHAIN_ID};
use crate::error::ChainError;

/// The first account of the standard development mnemonic.
pub const DEV_ACCOUNT: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// tUSDC minted to [`DEV_ACCOUNT`].
pub const USDC_FUNDING: &str = "1000000";

/// WETH minted to [`DEV_ACCOUNT`].
pub const WETH_FUNDING: &str = "100";

/// A bootstrapped chain and the addresses worth knowing on it.
#[derive(Clone)]
pub struct Fixture {
    pub chain: Arc<DevChain>,
    pub factory: Address,
    pub account: Address,
    /// 6-decimal stablecoin.
    pub usdc: Address,
    /// 18-decimal wrapped ether.
    pub weth: Address,
}

/// Builds a chain for `config`: an empty factory at the configured address,
/// two funded asset tokens, and a wallet holding [`DEV_ACCOUNT`] that has not
/// connected yet and sits on mainnet without knowing the target network.
pub fn bootstrap(config: &DashboardConfig) -> Result<Fixture, ChainError> {
    let chain = DevChain::new(config.network.chain_id, MAINNET_CHAIN_ID);
    chain.add_account(DEV_ACCOUNT);
    chain.deploy_factory_at(config.factory_address);

    let usdc = chain.deploy_token("Test USD Coin", "tUSDC", 6);
    let weth = chain.deploy_token("Wrapped Ether", "WETH", 18);
    chain.mint(usdc, DEV_ACCOUNT, funding(USDC_FUNDING, 6)?)?;
    chain.mint(weth, DEV_ACCOUNT, funding(WETH_FUNDING, 18)?)?;

    tracing::info!(
        factory = %config.factory_address,
        %usdc,
        %weth,
        account = %DEV_ACCOUNT,
        "development chain ready"
    );
    Ok(Fixture {
        chain: Arc::new(chain),
        factory: config.factory_address,
        account: DEV_ACCOUNT,
        usdc,
        weth,
    })
}

fn funding(amount: &str, decimals: u8) -> Result<U256, ChainError> {
    parse_units(amount, decimals).map_err(|_| ChainError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yieldvault_core::WalletProvider;

    #[tokio::test]
    async fn bootstrap_seeds_factory_and_funds() {
        let config = DashboardConfig::default();
        let fixture = bootstrap(&config).unwrap();
        let chain = &fixture.chain;

        assert_eq!(chain.wallet_chain_id(), MAINNET_CHAIN_ID);
        assert!(chain.accounts().await.unwrap().is_empty());
        assert!(chain.factory_vaults(fixture.factory).is_empty());
        assert_eq!(
            chain.token_balance(fixture.usdc, DEV_ACCOUNT),
            U256::from(1_000_000_000_000u64)
        );
        assert_eq!(
            chain.token_balance(fixture.weth, DEV_ACCOUNT),
            U256::from(100u64) * U256::from(10u64).pow(U256::from(18u8))
        );
    }
}
