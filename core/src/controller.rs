//! # Vault Dashboard Controller
//!
//! The controller owns the dashboard state and mediates between the wallet,
//! the factory and vault contracts, and whatever renders the state.
//!
//! ## Operation Contract
//!
//! Every public operation catches its own errors. A failure is logged,
//! written to the state's error banner, broadcast as a
//! [`DashboardEvent::Error`], and returned to the caller. Nothing here is
//! fatal to the process.
//!
//! Every write follows the same two phases:
//!
//! ```text
//! submit ──► await receipt ──► refresh dependent reads
//!   │             │
//!   └─ rejected   └─ reverted      (both abort; prior state is kept)
//! ```
//!
//! ## Concurrency
//!
//! The state sits behind a `parking_lot::RwLock` that is never held across
//! an `.await`. One global `is_loading` flag (plus `is_connecting`) is all
//! the UI gets, so concurrent reads are not distinguishable. Writes are
//! serialized: while one is in flight, others are refused with
//! [`DashboardError::Busy`].

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::{DashboardConfig, APY_UNAVAILABLE};
use crate::contracts::{AssetToken, VaultContract, VaultFactory};
use crate::error::{DashboardError, ErrorClass};
use crate::provider::{ProviderError, WalletEvent, WalletProvider};
use crate::types::{
    ConnectionState, DashboardState, FormState, PendingTransaction, TxHash, TxKind, TxReceipt,
    TxStatus, VaultSummary,
};
use crate::units::{format_units, parse_units, validate_amount};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Changes pushed to dashboard subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Connected { address: Address, chain_id: u64 },
    Disconnected,
    NetworkChanged { chain_id: u64 },
    VaultsLoaded { count: usize },
    VaultSkipped { index: u64, reason: String },
    BalanceUpdated { vault: Address, balance: String },
    TransactionSubmitted { id: Uuid, kind: TxKind, hash: TxHash },
    TransactionConfirmed {
        id: Uuid,
        kind: TxKind,
        hash: TxHash,
        block_number: u64,
    },
    TransactionFailed { id: Uuid, kind: TxKind, reason: String },
    Error {
        operation: &'static str,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Flag {
    Loading,
    Connecting,
}

impl Flag {
    fn slot(self, state: &mut DashboardState) -> &mut bool {
        match self {
            Flag::Loading => &mut state.is_loading,
            Flag::Connecting => &mut state.is_connecting,
        }
    }
}

/// Lowers a UI flag when the operation that raised it ends, however it ends.
struct FlagGuard<'a> {
    state: &'a RwLock<DashboardState>,
    flag: Flag,
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        *self.flag.slot(&mut self.state.write()) = false;
    }
}

/// Holds the single write slot for the duration of a write operation.
struct WriteGate<'a> {
    slot: &'a Mutex<Option<TxKind>>,
}

impl Drop for WriteGate<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Dashboard state plus the operations that keep it in sync with the chain.
///
/// Share it as `Arc<DashboardController<P>>`; every method takes `&self`.
pub struct DashboardController<P: ?Sized> {
    config: DashboardConfig,
    provider: Option<Arc<P>>,
    state: RwLock<DashboardState>,
    write_slot: Mutex<Option<TxKind>>,
    events: broadcast::Sender<DashboardEvent>,
}

impl<P: WalletProvider + ?Sized> DashboardController<P> {
    /// Creates a controller. `provider = None` models a browser without a
    /// wallet: every chain operation then fails with
    /// [`DashboardError::NoProvider`].
    pub fn new(config: DashboardConfig, provider: Option<Arc<P>>) -> Self {
        let (events, _) = broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            config,
            provider,
            state: RwLock::new(DashboardState::default()),
            write_slot: Mutex::new(None),
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> DashboardState {
        self.state.read().clone()
    }

    /// Subscribes to dashboard events.
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    /// Header-bar network label.
    pub fn network_status(&self) -> String {
        self.state.read().connection.network_status(
            self.config.target_chain_id(),
            &self.config.network.chain_name,
        )
    }

    /// Clears the error banner.
    pub fn dismiss_error(&self) {
        self.state.write().error = None;
    }

    /// Mutates the bound form fields.
    pub fn edit_form(&self, edit: impl FnOnce(&mut FormState)) {
        edit(&mut self.state.write().forms);
    }

    // -----------------------------------------------------------------------
    // Connection
    // -----------------------------------------------------------------------

    /// Picks up an existing wallet session without prompting, then checks
    /// the factory deployment. Problems land in the error banner.
    pub async fn initialize(&self) {
        let Some(provider) = self.provider.clone() else {
            let _ = self.report("initialize", Err::<(), _>(DashboardError::NoProvider));
            return;
        };

        match provider.accounts().await {
            Ok(accounts) => {
                let mut state = self.state.write();
                state.connection.address = accounts.first().copied();
                state.connection.connected = !accounts.is_empty();
            }
            Err(e) => tracing::warn!(error = %e, "failed to read authorized accounts"),
        }
        match provider.chain_id().await {
            Ok(chain_id) => self.state.write().connection.chain_id = Some(chain_id),
            Err(e) => tracing::warn!(error = %e, "failed to read current network"),
        }

        let _ = self.verify_setup().await;
    }

    /// Confirms the factory exists and answers `getVaultCount()`.
    pub async fn verify_setup(&self) -> Result<U256, DashboardError> {
        let result = self.verify_setup_inner().await;
        self.report("verify setup", result)
    }

    async fn verify_setup_inner(&self) -> Result<U256, DashboardError> {
        let provider = self.provider()?;
        let chain_id = provider
            .chain_id()
            .await
            .map_err(DashboardError::read("read the current network"))?;
        tracing::debug!(chain_id, "verifying contract setup");

        let factory = self.config.factory_address;
        let code = provider
            .get_code(factory)
            .await
            .map_err(DashboardError::read("read the factory code"))?;
        if code.is_empty() {
            return Err(DashboardError::FactoryNotDeployed(factory));
        }

        let count = VaultFactory::new(provider.as_ref(), factory)
            .vault_count()
            .await
            .map_err(DashboardError::read("read from the factory contract"))?;
        tracing::info!(%factory, vault_count = %count, "factory contract verified");
        Ok(count)
    }

    /// Connects the wallet, moves it to the target network, checks the
    /// factory, and loads the vault list. Returns the connected account.
    pub async fn connect(&self) -> Result<Address, DashboardError> {
        let result = self.connect_inner().await;
        self.report("connect", result)
    }

    async fn connect_inner(&self) -> Result<Address, DashboardError> {
        let provider = self.provider()?;
        let _connecting = self.raise(Flag::Connecting);
        self.dismiss_error();

        let accounts = provider.request_accounts().await.map_err(|e| match e {
            ProviderError::UserRejected => DashboardError::ConnectionRejected,
            other => DashboardError::Read {
                context: "request wallet accounts",
                source: other,
            },
        })?;
        let account = *accounts.first().ok_or(DashboardError::NoAccounts)?;

        let chain_id = self.switch_to_target(provider.as_ref()).await?;

        let factory = self.config.factory_address;
        let code = provider
            .get_code(factory)
            .await
            .map_err(DashboardError::read("read the factory code"))?;
        if code.is_empty() {
            return Err(DashboardError::FactoryNotDeployed(factory));
        }

        self.state.write().connection = ConnectionState {
            address: Some(account),
            chain_id: Some(chain_id),
            connected: true,
        };
        tracing::info!(%account, chain_id, "wallet connected");
        self.emit(DashboardEvent::Connected {
            address: account,
            chain_id,
        });

        // The list reports its own failure; the connection still stands.
        if let Err(e) = self.list_vaults().await {
            tracing::warn!(error = %e, "connected, but the vault list did not load");
        }
        Ok(account)
    }

    /// Makes sure the wallet is on the target network, prompting a switch
    /// (or an add, for wallets that do not know it) when it is not.
    pub async fn ensure_target_network(&self) -> Result<u64, DashboardError> {
        let result = match self.provider() {
            Ok(provider) => self.switch_to_target(provider.as_ref()).await,
            Err(e) => Err(e),
        };
        self.report("switch network", result)
    }

    async fn switch_to_target(&self, provider: &P) -> Result<u64, DashboardError> {
        let network = &self.config.network;
        let current = provider
            .chain_id()
            .await
            .map_err(DashboardError::read("read the current network"))?;
        if current == network.chain_id {
            self.record_chain(current);
            return Ok(current);
        }

        tracing::info!(
            current,
            target = network.chain_id,
            "wallet on the wrong network, prompting switch"
        );
        let switch_failed = |source| DashboardError::NetworkSwitchFailed {
            network: network.chain_name.clone(),
            source,
        };

        match provider.switch_chain(network.chain_id).await {
            Ok(()) => {}
            Err(ProviderError::UnrecognizedChain(_)) => {
                tracing::info!(chain = %network.chain_name, "network unknown to wallet, prompting add");
                provider
                    .add_chain(network)
                    .await
                    .map_err(|source| DashboardError::NetworkAddFailed {
                        network: network.chain_name.clone(),
                        source,
                    })?;
                // Some wallets add without switching.
                let now = provider
                    .chain_id()
                    .await
                    .map_err(DashboardError::read("read the current network"))?;
                if now != network.chain_id {
                    provider
                        .switch_chain(network.chain_id)
                        .await
                        .map_err(switch_failed)?;
                }
            }
            Err(source) => return Err(switch_failed(source)),
        }

        self.record_chain(network.chain_id);
        self.emit(DashboardEvent::NetworkChanged {
            chain_id: network.chain_id,
        });
        Ok(network.chain_id)
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Reloads the vault list from the factory.
    ///
    /// Zero-address slots are skipped. A vault whose metadata cannot be read
    /// is logged and skipped; the rest of the list still loads.
    pub async fn list_vaults(&self) -> Result<Vec<VaultSummary>, DashboardError> {
        let result = self.list_vaults_inner().await;
        self.report("load vaults", result)
    }

    async fn list_vaults_inner(&self) -> Result<Vec<VaultSummary>, DashboardError> {
        let provider = self.provider()?;
        self.account()?;
        let _loading = self.raise(Flag::Loading);
        self.dismiss_error();

        self.switch_to_target(provider.as_ref()).await?;

        let factory = VaultFactory::new(provider.as_ref(), self.config.factory_address);
        let count = factory
            .vault_count()
            .await
            .map_err(DashboardError::read("read the vault count"))?;
        let count = u64::try_from(count).map_err(|_| DashboardError::Read {
            context: "read the vault count",
            source: ProviderError::Decode {
                method: "getVaultCount()",
                expected: "uint64-sized count",
            },
        })?;
        tracing::debug!(count, "loading vaults");

        let mut vaults = Vec::new();
        for index in 0..count {
            match Self::fetch_vault(provider.as_ref(), &factory, index).await {
                Ok(Some(vault)) => vaults.push(vault),
                Ok(None) => tracing::debug!(index, "skipping zero-address vault slot"),
                Err(e) => {
                    tracing::warn!(index, error = %e, "failed to load vault, skipping");
                    self.emit(DashboardEvent::VaultSkipped {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        {
            let mut state = self.state.write();
            state.vaults = vaults.clone();
            if let Some(selected) = state.selected_vault {
                if state.vault(selected).is_none() {
                    state.selected_vault = None;
                    state.user_vault_balance = "0".to_string();
                }
            }
        }
        tracing::info!(loaded = vaults.len(), slots = count, "vault list refreshed");
        self.emit(DashboardEvent::VaultsLoaded {
            count: vaults.len(),
        });
        Ok(vaults)
    }

    async fn fetch_vault(
        provider: &P,
        factory: &VaultFactory<'_, P>,
        index: u64,
    ) -> Result<Option<VaultSummary>, ProviderError> {
        let address = factory.vault_at(U256::from(index)).await?;
        if address == Address::ZERO {
            return Ok(None);
        }

        let vault = VaultContract::new(provider, address);
        let name = vault.name().await?;
        let symbol = vault.symbol().await?;
        let total_assets_raw = vault.total_assets().await?;
        let decimals = vault.decimals().await?;
        let strategies = vault.strategies_count().await?;

        let total_assets = format_units(total_assets_raw, decimals);
        Ok(Some(VaultSummary {
            address,
            name,
            symbol,
            tvl: total_assets.clone(),
            total_assets,
            total_assets_raw,
            decimals,
            strategies,
            apy: APY_UNAVAILABLE.to_string(),
        }))
    }

    /// Selects a vault from the current list and loads the caller's balance.
    pub async fn select_vault(&self, vault: Address) -> Result<String, DashboardError> {
        let known = self.state.read().vault(vault).is_some();
        if !known {
            return self.report("select vault", Err(DashboardError::UnknownVault(vault)));
        }
        {
            let mut state = self.state.write();
            state.selected_vault = Some(vault);
            state.user_vault_balance = "0".to_string();
        }
        self.load_user_vault_balance(vault).await
    }

    /// Reads the caller's share balance in `vault`, formatted with the
    /// vault's decimals. Updates the displayed balance when `vault` is the
    /// selected one.
    ///
    /// Failures are logged but never reach the error banner.
    pub async fn load_user_vault_balance(&self, vault: Address) -> Result<String, DashboardError> {
        let result = self.load_balance_inner(vault).await;
        if let Err(e) = &result {
            tracing::warn!(%vault, error = %e, "failed to load vault balance");
        }
        result
    }

    async fn load_balance_inner(&self, vault: Address) -> Result<String, DashboardError> {
        let provider = self.provider()?;
        let account = self.account()?;
        self.switch_to_target(provider.as_ref()).await?;

        let contract = VaultContract::new(provider.as_ref(), vault);
        let shares = contract
            .balance_of(account)
            .await
            .map_err(DashboardError::read("read the vault balance"))?;
        let decimals = contract
            .decimals()
            .await
            .map_err(DashboardError::read("read the vault decimals"))?;
        let balance = format_units(shares, decimals);

        {
            let mut state = self.state.write();
            if state.selected_vault == Some(vault) {
                state.user_vault_balance = balance.clone();
            }
        }
        self.emit(DashboardEvent::BalanceUpdated {
            vault,
            balance: balance.clone(),
        });
        Ok(balance)
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// Deploys a vault for `asset`, then reloads the list and clears the
    /// deploy form.
    pub async fn deploy_vault(
        &self,
        asset: &str,
        name: &str,
        symbol: &str,
    ) -> Result<TxReceipt, DashboardError> {
        let result = self.deploy_vault_inner(asset, name, symbol).await;
        self.report("deploy vault", result)
    }

    async fn deploy_vault_inner(
        &self,
        asset: &str,
        name: &str,
        symbol: &str,
    ) -> Result<TxReceipt, DashboardError> {
        let asset = parse_address("asset", asset)?;
        let name = non_empty("Vault name", name)?;
        let symbol = non_empty("Vault symbol", symbol)?;

        let provider = self.provider()?;
        let account = self.account()?;
        let _gate = self.begin_write(TxKind::DeployVault)?;
        self.switch_to_target(provider.as_ref()).await?;

        let factory = VaultFactory::new(provider.as_ref(), self.config.factory_address);
        let receipt = self
            .transact(
                TxKind::DeployVault,
                factory.address(),
                factory.deploy_vault(account, asset, name, symbol),
            )
            .await?;
        tracing::info!(%asset, name, symbol, "vault deployed");

        if let Err(e) = self.list_vaults().await {
            tracing::warn!(error = %e, "vault deployed, but the list did not reload");
        }
        self.state.write().forms.clear_deploy();
        Ok(receipt)
    }

    /// Approves the vault for `amount` of its asset, deposits once the
    /// approval is confirmed, then refreshes the caller's balance.
    pub async fn deposit(&self, vault: Address, amount: &str) -> Result<TxReceipt, DashboardError> {
        let result = self.deposit_inner(vault, amount).await;
        self.report("deposit", result)
    }

    async fn deposit_inner(&self, vault: Address, amount: &str) -> Result<TxReceipt, DashboardError> {
        validate_amount(amount).map_err(|source| DashboardError::InvalidAmount {
            operation: "deposit",
            source,
        })?;

        let provider = self.provider()?;
        let account = self.account()?;
        let _gate = self.begin_write(TxKind::Deposit)?;
        let _loading = self.raise(Flag::Loading);
        self.switch_to_target(provider.as_ref()).await?;

        let contract = VaultContract::new(provider.as_ref(), vault);
        let asset = contract
            .asset()
            .await
            .map_err(DashboardError::read("read the vault asset"))?;
        let decimals = contract
            .decimals()
            .await
            .map_err(DashboardError::read("read the vault decimals"))?;
        let base_amount =
            parse_units(amount, decimals).map_err(|source| DashboardError::InvalidAmount {
                operation: "deposit",
                source,
            })?;

        let token = AssetToken::new(provider.as_ref(), asset);
        self.transact(
            TxKind::Approve,
            asset,
            token.approve(account, vault, base_amount),
        )
        .await?;

        let receipt = self
            .transact(
                TxKind::Deposit,
                vault,
                contract.deposit(account, base_amount, account),
            )
            .await?;
        tracing::info!(%vault, amount, base_units = %base_amount, "deposit confirmed");

        self.state.write().forms.deposit_amount.clear();
        let _ = self.load_user_vault_balance(vault).await;
        Ok(receipt)
    }

    /// Withdraws `amount` of assets to the caller, then refreshes the
    /// caller's balance.
    pub async fn withdraw(&self, vault: Address, amount: &str) -> Result<TxReceipt, DashboardError> {
        let result = self.withdraw_inner(vault, amount).await;
        self.report("withdraw", result)
    }

    async fn withdraw_inner(&self, vault: Address, amount: &str) -> Result<TxReceipt, DashboardError> {
        validate_amount(amount).map_err(|source| DashboardError::InvalidAmount {
            operation: "withdrawal",
            source,
        })?;

        let provider = self.provider()?;
        let account = self.account()?;
        let _gate = self.begin_write(TxKind::Withdraw)?;
        let _loading = self.raise(Flag::Loading);
        self.switch_to_target(provider.as_ref()).await?;

        let contract = VaultContract::new(provider.as_ref(), vault);
        let decimals = contract
            .decimals()
            .await
            .map_err(DashboardError::read("read the vault decimals"))?;
        let base_amount =
            parse_units(amount, decimals).map_err(|source| DashboardError::InvalidAmount {
                operation: "withdrawal",
                source,
            })?;

        let receipt = self
            .transact(
                TxKind::Withdraw,
                vault,
                contract.withdraw(account, base_amount, account, account),
            )
            .await?;
        tracing::info!(%vault, amount, base_units = %base_amount, "withdrawal confirmed");

        self.state.write().forms.withdraw_amount.clear();
        let _ = self.load_user_vault_balance(vault).await;
        Ok(receipt)
    }

    /// Attaches a strategy to a vault. The vault list is left as is; the
    /// strategy count in it stays stale until the next reload.
    pub async fn add_strategy(
        &self,
        vault: Address,
        strategy: &str,
    ) -> Result<TxReceipt, DashboardError> {
        let result = self.add_strategy_inner(vault, strategy).await;
        self.report("add strategy", result)
    }

    async fn add_strategy_inner(
        &self,
        vault: Address,
        strategy: &str,
    ) -> Result<TxReceipt, DashboardError> {
        let strategy = parse_address("strategy", strategy)?;

        let provider = self.provider()?;
        let account = self.account()?;
        let _gate = self.begin_write(TxKind::AddStrategy)?;
        self.switch_to_target(provider.as_ref()).await?;

        let contract = VaultContract::new(provider.as_ref(), vault);
        let receipt = self
            .transact(
                TxKind::AddStrategy,
                vault,
                contract.add_strategy(account, strategy),
            )
            .await?;
        tracing::info!(%vault, %strategy, "strategy added");

        self.state.write().forms.new_strategy_address.clear();
        Ok(receipt)
    }

    // -----------------------------------------------------------------------
    // Wallet Events
    // -----------------------------------------------------------------------

    /// Reacts to a wallet notification.
    pub async fn handle_wallet_event(&self, event: WalletEvent) {
        match event {
            WalletEvent::AccountsChanged { accounts } if !accounts.is_empty() => {
                tracing::info!(account = %accounts[0], "wallet account changed, reconnecting");
                let _ = self.connect().await;
            }
            WalletEvent::AccountsChanged { .. } | WalletEvent::Disconnected => {
                tracing::info!("wallet disconnected, resetting session");
                self.state.write().reset_session();
                self.emit(DashboardEvent::Disconnected);
            }
            WalletEvent::ChainChanged { chain_id } => {
                let connected = {
                    let mut state = self.state.write();
                    state.connection.chain_id = Some(chain_id);
                    state.connection.connected
                };
                self.emit(DashboardEvent::NetworkChanged { chain_id });

                if connected && chain_id != self.config.target_chain_id() {
                    tracing::warn!(chain_id, "wallet left the target network");
                    let _ = self.ensure_target_network().await;
                }
            }
        }
    }

    /// Spawns a task feeding wallet notifications into
    /// [`handle_wallet_event`](Self::handle_wallet_event). Returns `None`
    /// without a provider.
    pub fn watch_wallet_events(self: &Arc<Self>) -> Option<JoinHandle<()>>
    where
        P: 'static,
    {
        let provider = self.provider.clone()?;
        let mut rx = provider.subscribe();
        let controller = Arc::clone(self);

        Some(tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(event) => controller.handle_wallet_event(event).await,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "wallet event stream lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            tracing::debug!("wallet event stream closed");
        }))
    }

    // -----------------------------------------------------------------------
    // Internal Helpers
    // -----------------------------------------------------------------------

    fn provider(&self) -> Result<Arc<P>, DashboardError> {
        self.provider.clone().ok_or(DashboardError::NoProvider)
    }

    fn account(&self) -> Result<Address, DashboardError> {
        let state = self.state.read();
        match state.connection.address {
            Some(address) if state.connection.connected => Ok(address),
            _ => Err(DashboardError::NotConnected),
        }
    }

    fn record_chain(&self, chain_id: u64) {
        self.state.write().connection.chain_id = Some(chain_id);
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn raise(&self, flag: Flag) -> FlagGuard<'_> {
        *flag.slot(&mut self.state.write()) = true;
        FlagGuard {
            state: &self.state,
            flag,
        }
    }

    fn begin_write(&self, kind: TxKind) -> Result<WriteGate<'_>, DashboardError> {
        let mut slot = self.write_slot.lock();
        if let Some(current) = *slot {
            return Err(DashboardError::Busy(current));
        }
        *slot = Some(kind);
        Ok(WriteGate {
            slot: &self.write_slot,
        })
    }

    /// Records a failure in the banner and the event stream.
    fn report<T>(
        &self,
        operation: &'static str,
        result: Result<T, DashboardError>,
    ) -> Result<T, DashboardError> {
        if let Err(err) = &result {
            match err.class() {
                ErrorClass::Validation | ErrorClass::Busy => {
                    tracing::warn!(operation, error = %err, "operation refused");
                }
                _ => tracing::error!(operation, error = %err, "operation failed"),
            }
            let message = err.to_string();
            self.state.write().error = Some(message.clone());
            self.emit(DashboardEvent::Error { operation, message });
        }
        result
    }

    /// Submits a write and waits for it to be mined, tracking it as the
    /// pending transaction throughout.
    async fn transact<F>(
        &self,
        kind: TxKind,
        target: Address,
        submit: F,
    ) -> Result<TxReceipt, DashboardError>
    where
        F: std::future::Future<Output = Result<TxHash, ProviderError>>,
    {
        let provider = self.provider()?;
        let mut tx = PendingTransaction::new(kind, target);
        self.state.write().pending = Some(tx.clone());

        let hash = match submit.await {
            Ok(hash) => hash,
            Err(source) => {
                let err = DashboardError::submit(kind)(source);
                self.finish(tx, Err(&err));
                return Err(err);
            }
        };

        tx.hash = Some(hash);
        tx.status = TxStatus::Submitted;
        self.state.write().pending = Some(tx.clone());
        tracing::info!(%kind, %hash, "transaction submitted");
        self.emit(DashboardEvent::TransactionSubmitted {
            id: tx.id,
            kind,
            hash,
        });

        let receipt = match provider.wait_for_receipt(hash).await {
            Ok(receipt) if receipt.success => receipt,
            Ok(_) => {
                let err = DashboardError::Reverted { kind };
                self.finish(tx, Err(&err));
                return Err(err);
            }
            Err(source) => {
                let err = DashboardError::submit(kind)(source);
                self.finish(tx, Err(&err));
                return Err(err);
            }
        };

        self.emit(DashboardEvent::TransactionConfirmed {
            id: tx.id,
            kind,
            hash,
            block_number: receipt.block_number,
        });
        self.finish(tx, Ok(()));
        Ok(receipt)
    }

    fn finish(&self, mut tx: PendingTransaction, outcome: Result<(), &DashboardError>) {
        match outcome {
            Ok(()) => tx.status = TxStatus::Confirmed,
            Err(err) => {
                tx.status = TxStatus::Failed;
                tx.failure = Some(err.to_string());
                self.emit(DashboardEvent::TransactionFailed {
                    id: tx.id,
                    kind: tx.kind,
                    reason: err.to_string(),
                });
            }
        }

        let mut state = self.state.write();
        state.pending = None;
        state.history.push(tx);
        let limit = self.config.tx_history_limit;
        if state.history.len() > limit {
            let excess = state.history.len() - limit;
            state.history.drain(..excess);
        }
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, DashboardError> {
    let invalid = || DashboardError::InvalidAddress {
        field,
        value: value.to_string(),
    };
    let address: Address = value.trim().parse().map_err(|_| invalid())?;
    if address == Address::ZERO {
        return Err(invalid());
    }
    Ok(address)
}

fn non_empty<'a>(field: &'static str, value: &'a str) -> Result<&'a str, DashboardError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DashboardError::MissingField(field));
    }
    Ok(trimmed)
}
