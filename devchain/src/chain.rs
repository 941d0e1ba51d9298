//! # Development Chain
//!
//! [`DevChain`] is an in-memory EVM stand-in that plays both roles a browser
//! wallet plays for the dashboard: the wallet (accounts, authorization,
//! active network, signing prompts) and the node behind it (contract state,
//! transactions, receipts).
//!
//! Contracts only exist on the home chain. While the wallet sits on any
//! other network, `eth_getCode` comes back empty and calls revert, which is
//! what a real dashboard sees when pointed at the wrong network.
//!
//! Transactions execute at submission. A transaction whose execution fails
//! is still mined, with a failed receipt, and leaves state untouched.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tokio::sync::broadcast;

use yieldvault_core::config::NetworkConfig;
use yieldvault_core::provider::{
    CallOutput, ContractCall, FactoryCall, ProviderError, TokenCall, VaultCall, WalletEvent,
    WalletProvider,
};
use yieldvault_core::{TxHash, TxKind, TxReceipt};

use crate::error::ChainError;
use crate::factory::FactoryRegistry;
use crate::fault::{Fault, FaultSet};
use crate::journal::Request;
use crate::token::TokenLedger;
use crate::vault::VaultLedger;

/// Chain id of Ethereum mainnet, where fresh wallets start.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Capacity of the wallet notification channel.
const WALLET_EVENT_CAPACITY: usize = 64;

/// Stand-in bytecode returned by `eth_getCode` for deployed contracts.
const CONTRACT_CODE: &[u8] = &[0x60, 0x80, 0x60, 0x40, 0x52];

/// JSON-RPC "internal error".
const RPC_INTERNAL_ERROR: i64 = -32603;

/// JSON-RPC "invalid params".
const RPC_INVALID_PARAMS: i64 = -32602;

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

struct ChainState {
    home_chain_id: u64,
    wallet_chain_id: u64,
    known_chains: HashSet<u64>,
    accounts: Vec<Address>,
    authorized: bool,

    tokens: HashMap<Address, TokenLedger>,
    vaults: HashMap<Address, VaultLedger>,
    factories: HashMap<Address, FactoryRegistry>,

    receipts: HashMap<TxHash, TxReceipt>,
    revert_reasons: HashMap<TxHash, String>,
    block_number: u64,
    nonce: u64,

    faults: FaultSet,
    journal: Vec<Request>,
}

impl ChainState {
    fn on_home_chain(&self) -> bool {
        self.wallet_chain_id == self.home_chain_id
    }

    fn has_contract(&self, address: Address) -> bool {
        self.tokens.contains_key(&address)
            || self.vaults.contains_key(&address)
            || self.factories.contains_key(&address)
    }

    fn contract_kind(&self, address: Address) -> Option<&'static str> {
        if self.tokens.contains_key(&address) {
            Some("token")
        } else if self.vaults.contains_key(&address) {
            Some("vault")
        } else if self.factories.contains_key(&address) {
            Some("factory")
        } else {
            None
        }
    }

    /// The error for a call whose interface does not match the contract.
    fn mismatch(&self, to: Address, call: &ContractCall) -> ChainError {
        match self.contract_kind(to) {
            Some(contract) => ChainError::UnsupportedMethod {
                contract,
                method: call.signature(),
            },
            None => ChainError::NoContract(to),
        }
    }

    /// Derives a fresh address or hash from a domain tag and the nonce.
    fn derive(&mut self, tag: &[u8], parts: &[&[u8]]) -> B256 {
        self.nonce += 1;
        let mut hasher = Sha256::new();
        hasher.update(tag);
        hasher.update(self.nonce.to_be_bytes());
        for part in parts {
            hasher.update(part);
        }
        B256::from_slice(&hasher.finalize())
    }

    fn new_contract_address(&mut self, deployer: Address) -> Address {
        let digest = self.derive(b"yieldvault/contract", &[deployer.as_slice()]);
        Address::from_slice(&digest[12..])
    }

    fn read(&self, to: Address, call: &ContractCall) -> Result<CallOutput, ChainError> {
        match call {
            ContractCall::Factory(call) => {
                let factory = self
                    .factories
                    .get(&to)
                    .ok_or_else(|| self.mismatch(to, &ContractCall::Factory(call.clone())))?;
                match call {
                    FactoryCall::GetVaultCount => Ok(CallOutput::Uint(U256::from(factory.count()))),
                    FactoryCall::GetVault { index } => {
                        factory.vault_at(*index).map(CallOutput::Address)
                    }
                    FactoryCall::DeployVault { .. } => Err(ChainError::UnsupportedMethod {
                        contract: "factory",
                        method: "deployVault(address,string,string) as a read",
                    }),
                }
            }
            ContractCall::Vault(call) => {
                let vault = self
                    .vaults
                    .get(&to)
                    .ok_or_else(|| self.mismatch(to, &ContractCall::Vault(call.clone())))?;
                Ok(match call {
                    VaultCall::Name => CallOutput::String(vault.name.clone()),
                    VaultCall::Symbol => CallOutput::String(vault.symbol.clone()),
                    VaultCall::TotalAssets => CallOutput::Uint(vault.total_assets()),
                    VaultCall::Decimals => CallOutput::Uint(U256::from(vault.decimals)),
                    VaultCall::BalanceOf { account } => CallOutput::Uint(vault.shares_of(*account)),
                    VaultCall::GetStrategiesCount => {
                        CallOutput::Uint(U256::from(vault.strategies().len()))
                    }
                    VaultCall::Asset => CallOutput::Address(vault.asset),
                    VaultCall::Deposit { .. }
                    | VaultCall::Withdraw { .. }
                    | VaultCall::AddStrategy { .. } => {
                        return Err(ChainError::UnsupportedMethod {
                            contract: "vault",
                            method: "state-changing method as a read",
                        })
                    }
                })
            }
            ContractCall::Token(TokenCall::Approve { .. }) => Err(ChainError::UnsupportedMethod {
                contract: "token",
                method: "approve(address,uint256) as a read",
            }),
        }
    }

    /// Runs a write. Returns the address of a newly created contract, if any.
    fn execute(
        &mut self,
        from: Address,
        to: Address,
        call: &ContractCall,
    ) -> Result<Option<Address>, ChainError> {
        match call {
            ContractCall::Factory(FactoryCall::DeployVault {
                asset,
                name,
                symbol,
            }) => {
                if !self.factories.contains_key(&to) {
                    return Err(self.mismatch(to, call));
                }
                let decimals = self
                    .tokens
                    .get(asset)
                    .map(|t| t.decimals)
                    .ok_or(ChainError::UnknownAsset(*asset))?;

                let vault = self.new_contract_address(to);
                self.vaults
                    .insert(vault, VaultLedger::new(name, symbol, *asset, decimals, from));
                if let Some(factory) = self.factories.get_mut(&to) {
                    factory.push(vault);
                }
                tracing::debug!(%vault, %asset, %name, %symbol, "vault deployed");
                Ok(Some(vault))
            }
            ContractCall::Vault(VaultCall::Deposit { assets, receiver }) => {
                let vault = self
                    .vaults
                    .get_mut(&to)
                    .ok_or(ChainError::NoContract(to))?;
                let token = self
                    .tokens
                    .get_mut(&vault.asset)
                    .ok_or(ChainError::UnknownAsset(vault.asset))?;
                vault.deposit(token, to, from, *assets, *receiver)?;
                Ok(None)
            }
            ContractCall::Vault(VaultCall::Withdraw {
                assets,
                receiver,
                owner,
            }) => {
                let vault = self
                    .vaults
                    .get_mut(&to)
                    .ok_or(ChainError::NoContract(to))?;
                let token = self
                    .tokens
                    .get_mut(&vault.asset)
                    .ok_or(ChainError::UnknownAsset(vault.asset))?;
                vault.withdraw(token, to, from, *assets, *receiver, *owner)?;
                Ok(None)
            }
            ContractCall::Vault(VaultCall::AddStrategy { strategy }) => {
                let vault = self
                    .vaults
                    .get_mut(&to)
                    .ok_or(ChainError::NoContract(to))?;
                vault.add_strategy(from, *strategy)?;
                Ok(None)
            }
            ContractCall::Token(TokenCall::Approve { spender, amount }) => {
                let token = self
                    .tokens
                    .get_mut(&to)
                    .ok_or(ChainError::NoContract(to))?;
                token.approve(from, *spender, *amount)?;
                Ok(None)
            }
            _ => Err(self.mismatch(to, call)),
        }
    }

    /// Mines a transaction: records its receipt under a fresh hash.
    fn mine(
        &mut self,
        from: Address,
        to: Address,
        success: bool,
        contract_address: Option<Address>,
    ) -> TxReceipt {
        let hash = self.derive(b"yieldvault/tx", &[from.as_slice(), to.as_slice()]);
        self.block_number += 1;
        let receipt = TxReceipt {
            hash,
            block_number: self.block_number,
            success,
            contract_address,
        };
        self.receipts.insert(hash, receipt.clone());
        receipt
    }
}

// ---------------------------------------------------------------------------
// DevChain
// ---------------------------------------------------------------------------

/// In-memory wallet plus chain.
pub struct DevChain {
    inner: Mutex<ChainState>,
    events: broadcast::Sender<WalletEvent>,
}

impl DevChain {
    /// Creates an empty chain whose contracts live on `home_chain_id`, with a
    /// wallet currently on `wallet_chain_id`. The wallet knows only its
    /// current network.
    pub fn new(home_chain_id: u64, wallet_chain_id: u64) -> Self {
        let (events, _) = broadcast::channel(WALLET_EVENT_CAPACITY);
        Self {
            inner: Mutex::new(ChainState {
                home_chain_id,
                wallet_chain_id,
                known_chains: HashSet::from([wallet_chain_id]),
                accounts: Vec::new(),
                authorized: false,
                tokens: HashMap::new(),
                vaults: HashMap::new(),
                factories: HashMap::new(),
                receipts: HashMap::new(),
                revert_reasons: HashMap::new(),
                block_number: 0,
                nonce: 0,
                faults: FaultSet::default(),
                journal: Vec::new(),
            }),
            events,
        }
    }

    fn notify(&self, event: WalletEvent) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    // -----------------------------------------------------------------------
    // Wallet Setup & Simulation
    // -----------------------------------------------------------------------

    /// Adds an account to the wallet. It becomes visible once authorized.
    pub fn add_account(&self, account: Address) {
        let mut state = self.inner.lock();
        if !state.accounts.contains(&account) {
            state.accounts.push(account);
        }
    }

    /// Authorizes the wallet without a prompt, as if the user connected in
    /// an earlier session.
    pub fn authorize(&self) {
        self.inner.lock().authorized = true;
    }

    /// Registers a network with the wallet without switching to it.
    pub fn know_chain(&self, chain_id: u64) {
        self.inner.lock().known_chains.insert(chain_id);
    }

    /// The user picks different accounts in the wallet UI. An empty list
    /// revokes authorization.
    pub fn simulate_account_change(&self, accounts: Vec<Address>) {
        {
            let mut state = self.inner.lock();
            state.authorized = !accounts.is_empty();
            state.accounts = accounts.clone();
        }
        self.notify(WalletEvent::AccountsChanged { accounts });
    }

    /// The user switches networks in the wallet UI.
    pub fn simulate_chain_switch(&self, chain_id: u64) {
        {
            let mut state = self.inner.lock();
            state.known_chains.insert(chain_id);
            state.wallet_chain_id = chain_id;
        }
        self.notify(WalletEvent::ChainChanged { chain_id });
    }

    /// The wallet drops its connection.
    pub fn simulate_disconnect(&self) {
        self.inner.lock().authorized = false;
        self.notify(WalletEvent::Disconnected);
    }

    // -----------------------------------------------------------------------
    // Contract Setup
    // -----------------------------------------------------------------------

    /// Deploys an asset token on the home chain and returns its address.
    pub fn deploy_token(&self, name: &str, symbol: &str, decimals: u8) -> Address {
        let mut state = self.inner.lock();
        let address = state.new_contract_address(Address::ZERO);
        state
            .tokens
            .insert(address, TokenLedger::new(name, symbol, decimals));
        address
    }

    pub fn mint(&self, token: Address, to: Address, amount: U256) -> Result<(), ChainError> {
        self.inner
            .lock()
            .tokens
            .get_mut(&token)
            .ok_or(ChainError::NoContract(token))?
            .mint(to, amount)
    }

    /// Places an empty factory at a fixed address.
    pub fn deploy_factory_at(&self, address: Address) {
        self.inner
            .lock()
            .factories
            .insert(address, FactoryRegistry::new());
    }

    /// Appends a raw slot to a factory's vault list, including the zero
    /// address.
    pub fn push_factory_slot(&self, factory: Address, vault: Address) -> Result<(), ChainError> {
        self.inner
            .lock()
            .factories
            .get_mut(&factory)
            .ok_or(ChainError::NoContract(factory))?
            .push(vault);
        Ok(())
    }

    /// Deploys a vault through `factory` as `manager`, bypassing the wallet.
    pub fn deploy_vault_direct(
        &self,
        factory: Address,
        manager: Address,
        asset: Address,
        name: &str,
        symbol: &str,
    ) -> Result<Address, ChainError> {
        let call = ContractCall::Factory(FactoryCall::DeployVault {
            asset,
            name: name.to_string(),
            symbol: symbol.to_string(),
        });
        let mut state = self.inner.lock();
        let vault = state.execute(manager, factory, &call)?;
        vault.ok_or(ChainError::NoContract(factory))
    }

    // -----------------------------------------------------------------------
    // Inspection
    // -----------------------------------------------------------------------

    pub fn wallet_chain_id(&self) -> u64 {
        self.inner.lock().wallet_chain_id
    }

    pub fn block_number(&self) -> u64 {
        self.inner.lock().block_number
    }

    pub fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.inner
            .lock()
            .tokens
            .get(&token)
            .map(|t| t.balance_of(account))
            .unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.inner
            .lock()
            .tokens
            .get(&token)
            .map(|t| t.allowance(owner, spender))
            .unwrap_or_default()
    }

    pub fn vault_shares(&self, vault: Address, account: Address) -> U256 {
        self.inner
            .lock()
            .vaults
            .get(&vault)
            .map(|v| v.shares_of(account))
            .unwrap_or_default()
    }

    pub fn vault_strategies(&self, vault: Address) -> Vec<Address> {
        self.inner
            .lock()
            .vaults
            .get(&vault)
            .map(|v| v.strategies().to_vec())
            .unwrap_or_default()
    }

    pub fn factory_vaults(&self, factory: Address) -> Vec<Address> {
        self.inner
            .lock()
            .factories
            .get(&factory)
            .map(|f| f.vaults().to_vec())
            .unwrap_or_default()
    }

    /// Why a mined transaction failed, if it did.
    pub fn revert_reason(&self, hash: TxHash) -> Option<String> {
        self.inner.lock().revert_reasons.get(&hash).cloned()
    }

    // -----------------------------------------------------------------------
    // Journal & Faults
    // -----------------------------------------------------------------------

    /// Every request received so far, in order.
    pub fn journal(&self) -> Vec<Request> {
        self.inner.lock().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.inner.lock().journal.clear();
    }

    pub fn inject(&self, fault: Fault) {
        tracing::debug!(?fault, "fault injected");
        self.inner.lock().faults.inject(fault);
    }

    pub fn pending_faults(&self) -> Vec<Fault> {
        self.inner.lock().faults.pending().to_vec()
    }

    pub fn clear_faults(&self) {
        self.inner.lock().faults.clear();
    }
}

// ---------------------------------------------------------------------------
// Wallet Provider
// ---------------------------------------------------------------------------

#[async_trait]
impl WalletProvider for DevChain {
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::Accounts);
        Ok(if state.authorized {
            state.accounts.clone()
        } else {
            Vec::new()
        })
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::RequestAccounts);
        if state.faults.take(&Fault::RejectAccounts) {
            return Err(ProviderError::UserRejected);
        }
        state.authorized = true;
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> Result<u64, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::ChainId);
        Ok(state.wallet_chain_id)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<(), ProviderError> {
        {
            let mut state = self.inner.lock();
            state.journal.push(Request::SwitchChain { chain_id });
            if state.faults.take(&Fault::RejectSwitch) {
                return Err(ProviderError::UserRejected);
            }
            if !state.known_chains.contains(&chain_id) {
                return Err(ProviderError::UnrecognizedChain(chain_id));
            }
            if state.wallet_chain_id == chain_id {
                return Ok(());
            }
            state.wallet_chain_id = chain_id;
        }
        self.notify(WalletEvent::ChainChanged { chain_id });
        Ok(())
    }

    async fn add_chain(&self, network: &NetworkConfig) -> Result<(), ProviderError> {
        let chain_id = network.chain_id;
        {
            let mut state = self.inner.lock();
            state.journal.push(Request::AddChain { chain_id });
            if state.faults.take(&Fault::RejectAdd) {
                return Err(ProviderError::UserRejected);
            }
            if network.rpc_urls.is_empty() {
                return Err(ProviderError::Rpc {
                    code: RPC_INVALID_PARAMS,
                    message: "rpcUrls must not be empty".to_string(),
                });
            }
            state.known_chains.insert(chain_id);
            if state.wallet_chain_id == chain_id {
                return Ok(());
            }
            state.wallet_chain_id = chain_id;
        }
        self.notify(WalletEvent::ChainChanged { chain_id });
        Ok(())
    }

    async fn get_code(&self, address: Address) -> Result<Bytes, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::GetCode { address });
        if state.on_home_chain() && state.has_contract(address) {
            Ok(Bytes::from_static(CONTRACT_CODE))
        } else {
            Ok(Bytes::new())
        }
    }

    async fn call(&self, to: Address, call: ContractCall) -> Result<CallOutput, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::Call {
            to,
            call: call.clone(),
        });
        if state.faults.take(&Fault::FailReads(to)) {
            return Err(ProviderError::Rpc {
                code: RPC_INTERNAL_ERROR,
                message: format!("injected read failure at {to}"),
            });
        }
        if call.is_write() {
            return Err(ProviderError::Rpc {
                code: RPC_INVALID_PARAMS,
                message: format!("{} must be sent as a transaction", call.signature()),
            });
        }
        if !state.on_home_chain() {
            return Err(ChainError::NoContract(to).into());
        }
        Ok(state.read(to, &call)?)
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        call: ContractCall,
    ) -> Result<TxHash, ProviderError> {
        let mut state = self.inner.lock();
        state.journal.push(Request::SendTransaction {
            from,
            to,
            call: call.clone(),
        });

        if !state.authorized || !state.accounts.contains(&from) {
            return Err(ProviderError::Unauthorized(format!(
                "account {from} is not connected"
            )));
        }
        let Some(kind) = call.tx_kind() else {
            return Err(ProviderError::Rpc {
                code: RPC_INVALID_PARAMS,
                message: format!("{} is read-only", call.signature()),
            });
        };
        if state.faults.take(&Fault::RejectWrite(kind)) {
            return Err(ProviderError::UserRejected);
        }

        let outcome = if state.faults.take(&Fault::RevertWrite(kind)) {
            Err(format!("injected revert of {kind}"))
        } else if !state.on_home_chain() {
            Err(ChainError::NoContract(to).to_string())
        } else {
            state.execute(from, to, &call).map_err(|e| e.to_string())
        };

        let receipt = match outcome {
            Ok(created) => state.mine(from, to, true, created),
            Err(reason) => {
                let receipt = state.mine(from, to, false, None);
                tracing::debug!(%kind, hash = %receipt.hash, %reason, "transaction reverted");
                state.revert_reasons.insert(receipt.hash, reason);
                receipt
            }
        };
        Ok(receipt.hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<TxReceipt, ProviderError> {
        tokio::task::yield_now().await;
        let mut state = self.inner.lock();
        state.journal.push(Request::WaitForReceipt { hash });
        state
            .receipts
            .get(&hash)
            .cloned()
            .ok_or(ProviderError::UnknownTransaction(hash))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: u64 = 80_002;
    const ALICE: Address = Address::repeat_byte(0xA1);
    const FACTORY: Address = Address::repeat_byte(0xFA);

    fn chain_with_token() -> (DevChain, Address) {
        let chain = DevChain::new(HOME, HOME);
        chain.add_account(ALICE);
        chain.authorize();
        let token = chain.deploy_token("Test USD", "tUSD", 6);
        chain.mint(token, ALICE, U256::from(1_000_000u64)).unwrap();
        chain.deploy_factory_at(FACTORY);
        (chain, token)
    }

    fn deploy_call(asset: Address) -> ContractCall {
        ContractCall::Factory(FactoryCall::DeployVault {
            asset,
            name: "tUSD Vault".into(),
            symbol: "vtUSD".into(),
        })
    }

    #[tokio::test]
    async fn deploy_through_wallet_registers_vault() {
        let (chain, token) = chain_with_token();
        let hash = chain
            .send_transaction(ALICE, FACTORY, deploy_call(token))
            .await
            .unwrap();
        let receipt = chain.wait_for_receipt(hash).await.unwrap();

        assert!(receipt.success);
        assert_eq!(receipt.block_number, 1);
        let vault = receipt.contract_address.unwrap();
        assert_eq!(chain.factory_vaults(FACTORY), vec![vault]);

        let decimals = chain
            .call(vault, ContractCall::Vault(VaultCall::Decimals))
            .await
            .unwrap();
        assert_eq!(decimals, CallOutput::Uint(U256::from(6u8)));
    }

    #[tokio::test]
    async fn failed_execution_mines_a_failed_receipt() {
        let (chain, _) = chain_with_token();
        let bogus_asset = Address::repeat_byte(0x99);
        let hash = chain
            .send_transaction(ALICE, FACTORY, deploy_call(bogus_asset))
            .await
            .unwrap();
        let receipt = chain.wait_for_receipt(hash).await.unwrap();

        assert!(!receipt.success);
        assert!(chain.factory_vaults(FACTORY).is_empty());
        assert!(chain.revert_reason(hash).unwrap().contains("not a token"));
    }

    #[tokio::test]
    async fn unknown_chain_needs_adding() {
        let chain = DevChain::new(HOME, MAINNET_CHAIN_ID);
        let mut events = chain.subscribe();

        assert_eq!(
            chain.switch_chain(HOME).await,
            Err(ProviderError::UnrecognizedChain(HOME))
        );
        chain.add_chain(&NetworkConfig::amoy()).await.unwrap();
        assert_eq!(chain.chain_id().await.unwrap(), HOME);
        assert_eq!(
            events.recv().await.unwrap(),
            WalletEvent::ChainChanged { chain_id: HOME }
        );

        chain.switch_chain(MAINNET_CHAIN_ID).await.unwrap();
        assert_eq!(chain.wallet_chain_id(), MAINNET_CHAIN_ID);
    }

    #[tokio::test]
    async fn contracts_invisible_off_home_chain() {
        let (chain, token) = chain_with_token();
        assert!(!chain.get_code(token).await.unwrap().is_empty());

        chain.simulate_chain_switch(MAINNET_CHAIN_ID);
        assert!(chain.get_code(token).await.unwrap().is_empty());
        assert!(matches!(
            chain
                .call(FACTORY, ContractCall::Factory(FactoryCall::GetVaultCount))
                .await,
            Err(ProviderError::Reverted(_))
        ));
    }

    #[tokio::test]
    async fn unauthorized_sender_refused() {
        let (chain, token) = chain_with_token();
        let stranger = Address::repeat_byte(0x5);
        assert!(matches!(
            chain
                .send_transaction(stranger, FACTORY, deploy_call(token))
                .await,
            Err(ProviderError::Unauthorized(_))
        ));
    }

    #[tokio::test]
    async fn write_faults_fire_once() {
        let (chain, token) = chain_with_token();
        chain.inject(Fault::RejectWrite(TxKind::DeployVault));
        chain.inject(Fault::RevertWrite(TxKind::DeployVault));

        assert_eq!(
            chain
                .send_transaction(ALICE, FACTORY, deploy_call(token))
                .await,
            Err(ProviderError::UserRejected)
        );

        let hash = chain
            .send_transaction(ALICE, FACTORY, deploy_call(token))
            .await
            .unwrap();
        assert!(!chain.wait_for_receipt(hash).await.unwrap().success);

        let hash = chain
            .send_transaction(ALICE, FACTORY, deploy_call(token))
            .await
            .unwrap();
        assert!(chain.wait_for_receipt(hash).await.unwrap().success);
        assert!(chain.pending_faults().is_empty());
    }

    #[tokio::test]
    async fn reads_refuse_writes_and_vice_versa() {
        let (chain, token) = chain_with_token();
        assert!(matches!(
            chain.call(FACTORY, deploy_call(token)).await,
            Err(ProviderError::Rpc { .. })
        ));
        assert!(matches!(
            chain
                .send_transaction(
                    ALICE,
                    FACTORY,
                    ContractCall::Factory(FactoryCall::GetVaultCount)
                )
                .await,
            Err(ProviderError::Rpc { .. })
        ));
    }

    #[tokio::test]
    async fn journal_records_in_order() {
        let (chain, _) = chain_with_token();
        chain.chain_id().await.unwrap();
        chain.get_code(FACTORY).await.unwrap();

        assert_eq!(
            chain.journal(),
            vec![Request::ChainId, Request::GetCode { address: FACTORY }]
        );
        chain.clear_journal();
        assert!(chain.journal().is_empty());
    }

    #[tokio::test]
    async fn unknown_receipt() {
        let chain = DevChain::new(HOME, HOME);
        assert!(matches!(
            chain.wait_for_receipt(B256::repeat_byte(1)).await,
            Err(ProviderError::UnknownTransaction(_))
        ));
    }

    #[test]
    fn interface_mismatch_names_the_contract() {
        let (chain, token) = chain_with_token();
        let state = chain.inner.lock();
        assert!(matches!(
            state.read(token, &ContractCall::Vault(VaultCall::Name)),
            Err(ChainError::UnsupportedMethod {
                contract: "token",
                ..
            })
        ));
    }
}
