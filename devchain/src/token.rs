//! # Asset Token Ledger
//!
//! Just enough ERC-20 for vault deposits: balances, allowances, `approve`,
//! `transfer`, and `transferFrom`. Every operation checks before it
//! mutates, so a failed call leaves the ledger exactly as it was.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::error::ChainError;

/// Balances and allowances of one token.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    total_supply: U256,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
}

impl TokenLedger {
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply: U256::ZERO,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    /// Creates `amount` new tokens for `to`.
    pub fn mint(&mut self, to: Address, amount: U256) -> Result<(), ChainError> {
        if to == Address::ZERO {
            return Err(ChainError::ZeroAddress);
        }
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(ChainError::Overflow)?;
        let balance = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ChainError::Overflow)?;
        self.total_supply = supply;
        self.balances.insert(to, balance);
        Ok(())
    }

    /// Sets the allowance of `spender` over `owner`'s tokens. Overwrites,
    /// like the standard says.
    pub fn approve(
        &mut self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), ChainError> {
        if spender == Address::ZERO {
            return Err(ChainError::ZeroAddress);
        }
        self.allowances.insert((owner, spender), amount);
        Ok(())
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), ChainError> {
        if to == Address::ZERO {
            return Err(ChainError::ZeroAddress);
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(ChainError::InsufficientBalance {
                available,
                required: amount,
            })?;
        self.balances.insert(from, remaining);

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(ChainError::Overflow)?;
        self.balances.insert(to, credited);
        Ok(())
    }

    /// Moves `amount` from `from` to `to` on behalf of `spender`, spending
    /// allowance. An allowance of `U256::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), ChainError> {
        let allowed = self.allowance(from, spender);
        if allowed < amount {
            return Err(ChainError::InsufficientAllowance {
                available: allowed,
                required: amount,
            });
        }
        let available = self.balance_of(from);
        if available < amount {
            return Err(ChainError::InsufficientBalance {
                available,
                required: amount,
            });
        }

        self.transfer(from, to, amount)?;
        if allowed != U256::MAX {
            self.allowances.insert((from, spender), allowed - amount);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::repeat_byte(b)
    }

    fn funded() -> TokenLedger {
        let mut t = TokenLedger::new("Test USD", "tUSD", 6);
        t.mint(addr(1), U256::from(1_000u64)).unwrap();
        t
    }

    #[test]
    fn mint_updates_supply_and_balance() {
        let t = funded();
        assert_eq!(t.total_supply(), U256::from(1_000u64));
        assert_eq!(t.balance_of(addr(1)), U256::from(1_000u64));
        assert_eq!(t.balance_of(addr(2)), U256::ZERO);
    }

    #[test]
    fn transfer_from_spends_allowance() {
        let mut t = funded();
        t.approve(addr(1), addr(9), U256::from(300u64)).unwrap();
        t.transfer_from(addr(9), addr(1), addr(9), U256::from(200u64))
            .unwrap();

        assert_eq!(t.balance_of(addr(1)), U256::from(800u64));
        assert_eq!(t.balance_of(addr(9)), U256::from(200u64));
        assert_eq!(t.allowance(addr(1), addr(9)), U256::from(100u64));
    }

    #[test]
    fn transfer_from_without_allowance_fails_cleanly() {
        let mut t = funded();
        let err = t
            .transfer_from(addr(9), addr(1), addr(9), U256::from(1u64))
            .unwrap_err();
        assert!(matches!(err, ChainError::InsufficientAllowance { .. }));
        assert_eq!(t.balance_of(addr(1)), U256::from(1_000u64));
    }

    #[test]
    fn transfer_from_beyond_balance_keeps_allowance() {
        let mut t = funded();
        t.approve(addr(1), addr(9), U256::from(5_000u64)).unwrap();
        let err = t
            .transfer_from(addr(9), addr(1), addr(9), U256::from(2_000u64))
            .unwrap_err();
        assert!(matches!(err, ChainError::InsufficientBalance { .. }));
        assert_eq!(t.allowance(addr(1), addr(9)), U256::from(5_000u64));
    }

    #[test]
    fn infinite_allowance_is_not_decremented() {
        let mut t = funded();
        t.approve(addr(1), addr(9), U256::MAX).unwrap();
        t.transfer_from(addr(9), addr(1), addr(2), U256::from(10u64))
            .unwrap();
        assert_eq!(t.allowance(addr(1), addr(9)), U256::MAX);
    }

    #[test]
    fn approve_overwrites() {
        let mut t = funded();
        t.approve(addr(1), addr(9), U256::from(50u64)).unwrap();
        t.approve(addr(1), addr(9), U256::from(7u64)).unwrap();
        assert_eq!(t.allowance(addr(1), addr(9)), U256::from(7u64));
    }

    #[test]
    fn zero_address_rejected() {
        let mut t = funded();
        assert_eq!(
            t.mint(Address::ZERO, U256::from(1u64)),
            Err(ChainError::ZeroAddress)
        );
        assert_eq!(
            t.approve(addr(1), Address::ZERO, U256::from(1u64)),
            Err(ChainError::ZeroAddress)
        );
    }

    #[test]
    fn mint_overflow_detected() {
        let mut t = funded();
        assert_eq!(t.mint(addr(1), U256::MAX), Err(ChainError::Overflow));
        assert_eq!(t.total_supply(), U256::from(1_000u64));
    }
}
