//! Vault factory registry: the ordered list behind `getVaultCount()` and
//! `getVault(uint256)`.

use alloy_primitives::{Address, U256};

use crate::error::ChainError;

#[derive(Debug, Clone, Default)]
pub struct FactoryRegistry {
    vaults: Vec<Address>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.vaults.len() as u64
    }

    pub fn vault_at(&self, index: U256) -> Result<Address, ChainError> {
        let out_of_range = || ChainError::IndexOutOfRange {
            index,
            count: self.count(),
        };
        let index = usize::try_from(index).map_err(|_| out_of_range())?;
        self.vaults.get(index).copied().ok_or_else(out_of_range)
    }

    /// Appends a slot. The zero address is allowed here so that sparse or
    /// cleared registries can be reproduced.
    pub fn push(&mut self, vault: Address) {
        self.vaults.push(vault);
    }

    pub fn vaults(&self) -> &[Address] {
        &self.vaults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexed_lookup() {
        let mut registry = FactoryRegistry::new();
        registry.push(Address::ZERO);
        registry.push(Address::repeat_byte(7));

        assert_eq!(registry.count(), 2);
        assert_eq!(registry.vault_at(U256::ZERO), Ok(Address::ZERO));
        assert_eq!(
            registry.vault_at(U256::from(1u8)),
            Ok(Address::repeat_byte(7))
        );
        assert!(matches!(
            registry.vault_at(U256::from(2u8)),
            Err(ChainError::IndexOutOfRange { count: 2, .. })
        ));
        assert!(registry.vault_at(U256::MAX).is_err());
    }
}
