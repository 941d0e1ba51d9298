//! # Contract Bindings
//!
//! Typed handles over a [`WalletProvider`] for the three contracts the
//! dashboard touches. Reads return decoded Rust values; writes return the
//! transaction hash and leave confirmation to the caller.

use alloy_primitives::{Address, U256};

use crate::provider::{
    CallOutput, ContractCall, FactoryCall, ProviderError, TokenCall, VaultCall, WalletProvider,
};
use crate::types::TxHash;

async fn read<P: WalletProvider + ?Sized>(
    provider: &P,
    to: Address,
    call: ContractCall,
) -> Result<(CallOutput, &'static str), ProviderError> {
    let method = call.signature();
    tracing::debug!(%to, method, "contract read");
    let output = provider.call(to, call).await?;
    Ok((output, method))
}

async fn write<P: WalletProvider + ?Sized>(
    provider: &P,
    from: Address,
    to: Address,
    call: ContractCall,
) -> Result<TxHash, ProviderError> {
    tracing::debug!(%from, %to, method = call.signature(), "contract write");
    provider.send_transaction(from, to, call).await
}

// ---------------------------------------------------------------------------
// VaultFactory
// ---------------------------------------------------------------------------

/// The factory that deploys vaults and keeps an index of them.
pub struct VaultFactory<'a, P: ?Sized> {
    provider: &'a P,
    address: Address,
}

impl<'a, P: WalletProvider + ?Sized> VaultFactory<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `getVaultCount()`
    pub async fn vault_count(&self) -> Result<U256, ProviderError> {
        let (out, method) = read(
            self.provider,
            self.address,
            ContractCall::Factory(FactoryCall::GetVaultCount),
        )
        .await?;
        out.into_uint(method)
    }

    /// `getVault(index)`
    pub async fn vault_at(&self, index: U256) -> Result<Address, ProviderError> {
        let (out, method) = read(
            self.provider,
            self.address,
            ContractCall::Factory(FactoryCall::GetVault { index }),
        )
        .await?;
        out.into_address(method)
    }

    /// `deployVault(asset, name, symbol)`
    pub async fn deploy_vault(
        &self,
        from: Address,
        asset: Address,
        name: &str,
        symbol: &str,
    ) -> Result<TxHash, ProviderError> {
        write(
            self.provider,
            from,
            self.address,
            ContractCall::Factory(FactoryCall::DeployVault {
                asset,
                name: name.to_string(),
                symbol: symbol.to_string(),
            }),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Vault
// ---------------------------------------------------------------------------

/// A single ERC-4626 style vault.
pub struct VaultContract<'a, P: ?Sized> {
    provider: &'a P,
    address: Address,
}

impl<'a, P: WalletProvider + ?Sized> VaultContract<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    async fn read(&self, call: VaultCall) -> Result<(CallOutput, &'static str), ProviderError> {
        read(self.provider, self.address, ContractCall::Vault(call)).await
    }

    pub async fn name(&self) -> Result<String, ProviderError> {
        let (out, method) = self.read(VaultCall::Name).await?;
        out.into_string(method)
    }

    pub async fn symbol(&self) -> Result<String, ProviderError> {
        let (out, method) = self.read(VaultCall::Symbol).await?;
        out.into_string(method)
    }

    pub async fn total_assets(&self) -> Result<U256, ProviderError> {
        let (out, method) = self.read(VaultCall::TotalAssets).await?;
        out.into_uint(method)
    }

    pub async fn decimals(&self) -> Result<u8, ProviderError> {
        let (out, method) = self.read(VaultCall::Decimals).await?;
        out.into_u8(method)
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, ProviderError> {
        let (out, method) = self.read(VaultCall::BalanceOf { account }).await?;
        out.into_uint(method)
    }

    pub async fn strategies_count(&self) -> Result<u64, ProviderError> {
        let (out, method) = self.read(VaultCall::GetStrategiesCount).await?;
        out.into_u64(method)
    }

    /// The underlying asset token.
    pub async fn asset(&self) -> Result<Address, ProviderError> {
        let (out, method) = self.read(VaultCall::Asset).await?;
        out.into_address(method)
    }

    pub async fn deposit(
        &self,
        from: Address,
        assets: U256,
        receiver: Address,
    ) -> Result<TxHash, ProviderError> {
        let call = ContractCall::Vault(VaultCall::Deposit { assets, receiver });
        write(self.provider, from, self.address, call).await
    }

    pub async fn withdraw(
        &self,
        from: Address,
        assets: U256,
        receiver: Address,
        owner: Address,
    ) -> Result<TxHash, ProviderError> {
        let call = ContractCall::Vault(VaultCall::Withdraw {
            assets,
            receiver,
            owner,
        });
        write(self.provider, from, self.address, call).await
    }

    pub async fn add_strategy(
        &self,
        from: Address,
        strategy: Address,
    ) -> Result<TxHash, ProviderError> {
        let call = ContractCall::Vault(VaultCall::AddStrategy { strategy });
        write(self.provider, from, self.address, call).await
    }
}

// ---------------------------------------------------------------------------
// Asset Token
// ---------------------------------------------------------------------------

/// The vault's underlying token. Only `approve` is needed.
pub struct AssetToken<'a, P: ?Sized> {
    provider: &'a P,
    address: Address,
}

impl<'a, P: WalletProvider + ?Sized> AssetToken<'a, P> {
    pub fn new(provider: &'a P, address: Address) -> Self {
        Self { provider, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// `approve(spender, amount)`
    pub async fn approve(
        &self,
        from: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHash, ProviderError> {
        let call = ContractCall::Token(TokenCall::Approve { spender, amount });
        write(self.provider, from, self.address, call).await
    }
}
