//! # Vault Ledger
//!
//! A minimal ERC-4626 vault with 1:1 share accounting. Assets move through
//! the vault's own [`TokenLedger`] entry, so the vault's token balance always
//! equals its `totalAssets()`.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::error::ChainError;
use crate::token::TokenLedger;

/// State of one deployed vault.
#[derive(Debug, Clone)]
pub struct VaultLedger {
    pub name: String,
    pub symbol: String,
    pub asset: Address,
    pub decimals: u8,
    /// The deployer; the only account allowed to add strategies.
    pub manager: Address,
    total_assets: U256,
    shares: HashMap<Address, U256>,
    strategies: Vec<Address>,
}

impl VaultLedger {
    pub fn new(name: &str, symbol: &str, asset: Address, decimals: u8, manager: Address) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            asset,
            decimals,
            manager,
            total_assets: U256::ZERO,
            shares: HashMap::new(),
            strategies: Vec::new(),
        }
    }

    pub fn total_assets(&self) -> U256 {
        self.total_assets
    }

    pub fn shares_of(&self, account: Address) -> U256 {
        self.shares.get(&account).copied().unwrap_or_default()
    }

    pub fn strategies(&self) -> &[Address] {
        &self.strategies
    }

    /// Pulls `assets` from `caller` through its allowance to `vault` and
    /// mints the same number of shares to `receiver`.
    pub fn deposit(
        &mut self,
        token: &mut TokenLedger,
        vault: Address,
        caller: Address,
        assets: U256,
        receiver: Address,
    ) -> Result<U256, ChainError> {
        if assets.is_zero() {
            return Err(ChainError::ZeroAmount);
        }
        if receiver == Address::ZERO {
            return Err(ChainError::ZeroAddress);
        }
        let total = self
            .total_assets
            .checked_add(assets)
            .ok_or(ChainError::Overflow)?;
        let minted = self
            .shares_of(receiver)
            .checked_add(assets)
            .ok_or(ChainError::Overflow)?;

        token.transfer_from(vault, caller, vault, assets)?;
        self.total_assets = total;
        self.shares.insert(receiver, minted);
        Ok(assets)
    }

    /// Burns `owner`'s shares and sends the matching assets to `receiver`.
    /// Share allowances are not modeled, so `caller` must be `owner`.
    pub fn withdraw(
        &mut self,
        token: &mut TokenLedger,
        vault: Address,
        caller: Address,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> Result<U256, ChainError> {
        if assets.is_zero() {
            return Err(ChainError::ZeroAmount);
        }
        if caller != owner {
            return Err(ChainError::NotOwner { caller, owner });
        }
        let available = self.shares_of(owner);
        if available < assets {
            return Err(ChainError::InsufficientShares {
                available,
                required: assets,
            });
        }

        token.transfer(vault, receiver, assets)?;
        self.shares.insert(owner, available - assets);
        self.total_assets -= assets;
        Ok(assets)
    }

    pub fn add_strategy(&mut self, caller: Address, strategy: Address) -> Result<(), ChainError> {
        if caller != self.manager {
            return Err(ChainError::NotManager(caller));
        }
        if strategy == Address::ZERO {
            return Err(ChainError::ZeroAddress);
        }
        if self.strategies.contains(&strategy) {
            return Err(ChainError::DuplicateStrategy(strategy));
        }
        self.strategies.push(strategy);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VAULT: Address = Address::repeat_byte(0xEE);
    const ALICE: Address = Address::repeat_byte(0x01);
    const BOB: Address = Address::repeat_byte(0x02);

    fn setup() -> (VaultLedger, TokenLedger) {
        let mut token = TokenLedger::new("Test USD", "tUSD", 6);
        token.mint(ALICE, U256::from(1_000_000u64)).unwrap();
        let vault = VaultLedger::new("tUSD Vault", "vtUSD", Address::repeat_byte(0xAA), 6, ALICE);
        (vault, token)
    }

    #[test]
    fn deposit_requires_allowance() {
        let (mut vault, mut token) = setup();
        let err = vault
            .deposit(&mut token, VAULT, ALICE, U256::from(500u64), ALICE)
            .unwrap_err();
        assert!(matches!(err, ChainError::InsufficientAllowance { .. }));
        assert_eq!(vault.total_assets(), U256::ZERO);
    }

    #[test]
    fn deposit_then_withdraw() {
        let (mut vault, mut token) = setup();
        token.approve(ALICE, VAULT, U256::from(500u64)).unwrap();
        vault
            .deposit(&mut token, VAULT, ALICE, U256::from(500u64), ALICE)
            .unwrap();

        assert_eq!(vault.shares_of(ALICE), U256::from(500u64));
        assert_eq!(vault.total_assets(), U256::from(500u64));
        assert_eq!(token.balance_of(VAULT), U256::from(500u64));

        vault
            .withdraw(&mut token, VAULT, ALICE, U256::from(200u64), ALICE, ALICE)
            .unwrap();
        assert_eq!(vault.shares_of(ALICE), U256::from(300u64));
        assert_eq!(token.balance_of(VAULT), vault.total_assets());
        assert_eq!(token.balance_of(ALICE), U256::from(999_700u64));
    }

    #[test]
    fn withdraw_checks_owner_and_shares() {
        let (mut vault, mut token) = setup();
        token.approve(ALICE, VAULT, U256::from(100u64)).unwrap();
        vault
            .deposit(&mut token, VAULT, ALICE, U256::from(100u64), ALICE)
            .unwrap();

        assert!(matches!(
            vault.withdraw(&mut token, VAULT, BOB, U256::from(1u64), BOB, ALICE),
            Err(ChainError::NotOwner { .. })
        ));
        assert!(matches!(
            vault.withdraw(&mut token, VAULT, ALICE, U256::from(101u64), ALICE, ALICE),
            Err(ChainError::InsufficientShares { .. })
        ));
        assert_eq!(
            vault.withdraw(&mut token, VAULT, ALICE, U256::ZERO, ALICE, ALICE),
            Err(ChainError::ZeroAmount)
        );
        assert_eq!(vault.total_assets(), U256::from(100u64));
    }

    #[test]
    fn strategies_are_manager_only_and_unique() {
        let (mut vault, _) = setup();
        let strategy = Address::repeat_byte(0x55);

        assert_eq!(
            vault.add_strategy(BOB, strategy),
            Err(ChainError::NotManager(BOB))
        );
        assert_eq!(
            vault.add_strategy(ALICE, Address::ZERO),
            Err(ChainError::ZeroAddress)
        );
        vault.add_strategy(ALICE, strategy).unwrap();
        assert_eq!(
            vault.add_strategy(ALICE, strategy),
            Err(ChainError::DuplicateStrategy(strategy))
        );
        assert_eq!(vault.strategies(), &[strategy]);
    }
}
