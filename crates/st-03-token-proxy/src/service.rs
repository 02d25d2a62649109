//! # Stable Proxy
//!
//! The one address end users and integrators talk to. It owns nothing but
//! handles: the Store (for reads and for finding the current implementation)
//! and the registry (for turning that address into something callable).
//!
//! ## Forwarding
//!
//! Every mutating call resolves the current implementation fresh from the
//! Store and invokes its AllArgs form with the Proxy's own address as the
//! immediate caller and the end user as the sender. Nothing is cached, so a
//! call issued right after an upgrade already reaches the new logic.
//!
//! ## Native value
//!
//! The Proxy never accepts the platform's native asset.

use shared_types::{
    Address, Bytes, CallReceipt, ContractRegistry, LogEntry, TokenError, TokenLogic, TokenResult,
    U256,
};
use st_01_token_store::TokenStore;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Stable entry point of the token.
pub struct StableProxy {
    address: Address,
    store: Arc<TokenStore>,
    registry: Arc<ContractRegistry>,
}

impl StableProxy {
    /// Creates a proxy at `address` over `store`.
    #[must_use]
    pub fn new(address: Address, store: Arc<TokenStore>, registry: Arc<ContractRegistry>) -> Self {
        Self {
            address,
            store,
            registry,
        }
    }

    /// Deploys a proxy from `deployer` at the next derived address.
    #[must_use]
    pub fn deploy(
        registry: &Arc<ContractRegistry>,
        deployer: Address,
        store: Arc<TokenStore>,
    ) -> Arc<Self> {
        let address = registry.next_address(deployer);
        debug!("[st-03] Proxy deployed at {} over store {}", address, store.address());
        Arc::new(Self::new(address, store, Arc::clone(registry)))
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Address of the implementation calls are currently forwarded to.
    #[must_use]
    pub fn implementation(&self) -> Address {
        self.store.implementation()
    }

    fn current(&self) -> TokenResult<Arc<dyn TokenLogic>> {
        self.registry.implementation(self.store.implementation())
    }

    // =========================================================================
    // READS (straight from the store)
    // =========================================================================

    #[must_use]
    pub fn name(&self) -> &str {
        &self.store.metadata().name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.store.metadata().symbol
    }

    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.store.metadata().decimals
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.store.total_supply()
    }

    #[must_use]
    pub fn balance_of(&self, account: Address) -> U256 {
        self.store.balance_of(account)
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.store.allowance(owner, spender)
    }

    /// Full event history under this address.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.store.logs()
    }

    /// Whether the current implementation is paused.
    pub fn is_paused(&self) -> TokenResult<bool> {
        Ok(self.current()?.is_paused())
    }

    // =========================================================================
    // FORWARDED CALLS
    // =========================================================================

    #[instrument(skip(self))]
    pub fn transfer(&self, caller: Address, to: Address, amount: U256) -> TokenResult<CallReceipt> {
        self.current()?
            .transfer_all_args(self.address, caller, to, amount)
    }

    #[instrument(skip(self))]
    pub fn approve(
        &self,
        caller: Address,
        spender: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .approve_all_args(self.address, caller, spender, amount)
    }

    #[instrument(skip(self))]
    pub fn increase_allowance(
        &self,
        caller: Address,
        spender: Address,
        added: U256,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .increase_allowance_all_args(self.address, caller, spender, added)
    }

    #[instrument(skip(self))]
    pub fn decrease_allowance(
        &self,
        caller: Address,
        spender: Address,
        subtracted: U256,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .decrease_allowance_all_args(self.address, caller, spender, subtracted)
    }

    #[instrument(skip(self))]
    pub fn transfer_from(
        &self,
        caller: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .transfer_from_all_args(self.address, caller, from, to, amount)
    }

    #[instrument(skip(self))]
    pub fn transfer_and_call(
        &self,
        caller: Address,
        partner: Address,
        amount: U256,
        data: Bytes,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .transfer_and_call_all_args(self.address, caller, partner, amount, data)
    }

    /// Sends the Proxy's whole balance of `token` to `to`. Admin only.
    #[instrument(skip(self))]
    pub fn reclaim_token(
        &self,
        caller: Address,
        token: Address,
        to: Address,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .reclaim_token_all_args(self.address, caller, token, to)
    }

    /// Switches every subsequent call to `new_implementation`. Admin only.
    #[instrument(skip(self))]
    pub fn upgrade_token(
        &self,
        caller: Address,
        new_implementation: Address,
    ) -> TokenResult<CallReceipt> {
        self.current()?
            .upgrade_token_all_args(self.address, caller, new_implementation)
    }

    /// Native-asset deposits always fail.
    pub fn receive_native(&self, caller: Address, value: U256) -> TokenResult<CallReceipt> {
        warn!(
            "[st-03] Rejected native value transfer of {} from {}",
            value, caller
        );
        Err(TokenError::NativeValueRejected)
    }
}

impl std::fmt::Debug for StableProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableProxy")
            .field("address", &self.address)
            .field("store", &self.store.address())
            .field("implementation", &self.store.implementation())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
