//! # Token Store Service
//!
//! The durable half of the token: roles, balances, allowances, the frozen set,
//! the event log, and the pointer to the one implementation allowed to change
//! any of it.
//!
//! ## Capability gate
//!
//! Every mutator takes the immediate caller and fails with
//! [`TokenError::OnlyImplementation`] unless it equals the registered
//! implementation. After an upgrade the previous implementation is locked out
//! here, without having to know it was replaced.
//!
//! ## Atomic scopes
//!
//! [`TokenStore::atomic`] snapshots the whole state, runs a closure, and
//! restores the snapshot if the closure fails. The implementation wraps every
//! public operation in one, which gives each call all-or-nothing semantics
//! including the log entries it emitted.

use crate::domain::{
    check_master_invariant, check_supply_invariant, AccountLedger, RoleRegistry, TokenMetadata,
};
use parking_lot::RwLock;
use shared_types::{Address, LogEntry, Role, TokenError, TokenEvent, TokenResult, U256};
use tracing::{debug, info, warn};

/// Mutable store state. The log is append-only and is rolled back by
/// truncation rather than snapshotted.
#[derive(Debug)]
struct LedgerState {
    roles: RoleRegistry,
    ledger: AccountLedger,
    implementation: Address,
    proxy: Option<Address>,
    logs: Vec<LogEntry>,
}

/// What an atomic scope restores on failure.
struct Checkpoint {
    roles: RoleRegistry,
    ledger: AccountLedger,
    implementation: Address,
    proxy: Option<Address>,
    log_mark: usize,
}

impl LedgerState {
    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            roles: self.roles.clone(),
            ledger: self.ledger.clone(),
            implementation: self.implementation,
            proxy: self.proxy,
            log_mark: self.logs.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.roles = checkpoint.roles;
        self.ledger = checkpoint.ledger;
        self.implementation = checkpoint.implementation;
        self.proxy = checkpoint.proxy;
        self.logs.truncate(checkpoint.log_mark);
    }
}

/// The persistent ledger shared by every implementation generation.
pub struct TokenStore {
    address: Address,
    metadata: TokenMetadata,
    state: RwLock<LedgerState>,
}

impl TokenStore {
    /// Deploys a store at `address` that accepts writes from `implementation`.
    pub fn new(
        address: Address,
        metadata: TokenMetadata,
        implementation: Address,
    ) -> TokenResult<Self> {
        if implementation.is_zero() {
            return Err(TokenError::ZeroAddressNotAllowed);
        }

        info!(
            "[st-01] Store {} deployed for {} ({}), implementation {}",
            address, metadata.name, metadata.symbol, implementation
        );

        Ok(Self {
            address,
            metadata,
            state: RwLock::new(LedgerState {
                roles: RoleRegistry::new(),
                ledger: AccountLedger::new(),
                implementation,
                proxy: None,
                logs: Vec::new(),
            }),
        })
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn metadata(&self) -> &TokenMetadata {
        &self.metadata
    }

    /// The only address allowed to call mutators.
    #[must_use]
    pub fn implementation(&self) -> Address {
        self.state.read().implementation
    }

    /// The Proxy all events are attributed to, once bound.
    #[must_use]
    pub fn proxy(&self) -> Option<Address> {
        self.state.read().proxy
    }

    #[must_use]
    pub fn master(&self) -> Option<Address> {
        self.state.read().roles.master()
    }

    #[must_use]
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.state.read().roles.has_role(role, account)
    }

    #[must_use]
    pub fn balance_of(&self, account: Address) -> U256 {
        self.state.read().ledger.balance_of(account)
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.state.read().ledger.allowance(owner, spender)
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.state.read().ledger.total_supply()
    }

    #[must_use]
    pub fn is_frozen(&self, account: Address) -> bool {
        self.state.read().ledger.is_frozen(account)
    }

    /// Copy of the account ledger.
    #[must_use]
    pub fn ledger(&self) -> AccountLedger {
        self.state.read().ledger.clone()
    }

    /// Copy of the role registry.
    #[must_use]
    pub fn roles(&self) -> RoleRegistry {
        self.state.read().roles.clone()
    }

    /// Every log entry since deployment.
    #[must_use]
    pub fn logs(&self) -> Vec<LogEntry> {
        self.state.read().logs.clone()
    }

    #[must_use]
    pub fn log_count(&self) -> usize {
        self.state.read().logs.len()
    }

    /// Supply and master invariants.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let state = self.state.read();
        check_supply_invariant(&state.ledger) && check_master_invariant(&state.roles)
    }

    // =========================================================================
    // GATED MUTATORS
    // =========================================================================

    fn write_gated<T>(
        &self,
        caller: Address,
        operation: &'static str,
        apply: impl FnOnce(&mut LedgerState) -> TokenResult<T>,
    ) -> TokenResult<T> {
        let mut state = self.state.write();
        if caller != state.implementation {
            warn!(
                "[st-01] {} rejected: {} is not the current implementation {}",
                operation, caller, state.implementation
            );
            return Err(TokenError::OnlyImplementation);
        }
        apply(&mut state)
    }

    pub fn set_balance(&self, caller: Address, account: Address, value: U256) -> TokenResult<()> {
        self.write_gated(caller, "set_balance", |state| {
            debug!("[st-01] balance[{}] = {}", account, value);
            state.ledger.set_balance(account, value);
            Ok(())
        })
    }

    pub fn add_balance(&self, caller: Address, account: Address, delta: U256) -> TokenResult<()> {
        self.write_gated(caller, "add_balance", |state| {
            debug!("[st-01] balance[{}] += {}", account, delta);
            state.ledger.add_balance(account, delta)
        })
    }

    pub fn set_allowance(
        &self,
        caller: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> TokenResult<()> {
        self.write_gated(caller, "set_allowance", |state| {
            debug!("[st-01] allowance[{}][{}] = {}", owner, spender, amount);
            state.ledger.set_allowance(owner, spender, amount);
            Ok(())
        })
    }

    pub fn set_total_supply(&self, caller: Address, value: U256) -> TokenResult<()> {
        self.write_gated(caller, "set_total_supply", |state| {
            debug!("[st-01] total_supply = {}", value);
            state.ledger.set_total_supply(value);
            Ok(())
        })
    }

    pub fn freeze(&self, caller: Address, account: Address) -> TokenResult<()> {
        self.write_gated(caller, "freeze", |state| state.ledger.freeze(account))
    }

    pub fn unfreeze(&self, caller: Address, account: Address) -> TokenResult<()> {
        self.write_gated(caller, "unfreeze", |state| state.ledger.unfreeze(account))
    }

    pub fn add_role(&self, caller: Address, role: Role, account: Address) -> TokenResult<()> {
        self.write_gated(caller, "add_role", |state| state.roles.add_role(role, account))
    }

    /// Revokes a role. Admin can never be revoked from the master, whatever
    /// the implementation asks.
    pub fn remove_role(&self, caller: Address, role: Role, account: Address) -> TokenResult<()> {
        self.write_gated(caller, "remove_role", |state| {
            state.roles.remove_role(role, account)
        })
    }

    pub fn set_master(&self, caller: Address, new_master: Address) -> TokenResult<()> {
        self.write_gated(caller, "set_master", |state| {
            state.roles.set_master(new_master)
        })
    }

    /// Repoints the capability gate. Only the outgoing implementation may
    /// hand over.
    pub fn upgrade_implementation(
        &self,
        caller: Address,
        new_implementation: Address,
    ) -> TokenResult<()> {
        self.write_gated(caller, "upgrade_implementation", |state| {
            if new_implementation.is_zero() {
                return Err(TokenError::ZeroAddressNotAllowed);
            }
            if new_implementation == state.implementation {
                return Err(TokenError::SameImplementation);
            }
            info!(
                "[st-01] Implementation upgraded {} -> {}",
                state.implementation, new_implementation
            );
            state.implementation = new_implementation;
            Ok(())
        })
    }

    /// Records the Proxy. One-shot.
    pub fn bind_proxy(&self, caller: Address, proxy: Address) -> TokenResult<()> {
        self.write_gated(caller, "bind_proxy", |state| {
            if proxy.is_zero() {
                return Err(TokenError::ZeroAddressNotAllowed);
            }
            if state.proxy.is_some() {
                return Err(TokenError::ProxyAlreadyBound);
            }
            info!("[st-01] Store {} bound to proxy {}", self.address, proxy);
            state.proxy = Some(proxy);
            Ok(())
        })
    }

    /// Appends `event` to the log under the Proxy's address.
    pub fn emit(&self, caller: Address, event: TokenEvent) -> TokenResult<LogEntry> {
        self.write_gated(caller, "emit", |state| {
            let address = state.proxy.ok_or(TokenError::ProxyNotBound)?;
            let entry = LogEntry {
                address,
                sequence: state.logs.len() as u64,
                event,
            };
            debug!("[st-01] log #{} {}", entry.sequence, entry.event.name());
            state.logs.push(entry.clone());
            Ok(entry)
        })
    }

    // =========================================================================
    // ATOMIC SCOPES
    // =========================================================================

    /// Runs `body` all-or-nothing.
    ///
    /// On success returns the value and the log entries appended during the
    /// scope; on failure every change made during the scope is discarded.
    /// Scopes nest: an inner failure restores only what the inner scope did.
    ///
    /// No lock is held while `body` runs, so it may call back into the store
    /// (and into other components that do).
    pub fn atomic<T>(
        &self,
        body: impl FnOnce() -> TokenResult<T>,
    ) -> TokenResult<(T, Vec<LogEntry>)> {
        let checkpoint = self.state.read().checkpoint();
        let mark = checkpoint.log_mark;

        match body() {
            Ok(value) => {
                let state = self.state.read();
                let logs = state.logs.get(mark..).map(<[LogEntry]>::to_vec).unwrap_or_default();
                Ok((value, logs))
            }
            Err(err) => {
                debug!("[st-01] Rolling back to log #{}: {}", mark, err);
                self.state.write().restore(checkpoint);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("TokenStore")
            .field("address", &self.address)
            .field("metadata", &self.metadata)
            .field("implementation", &state.implementation)
            .field("proxy", &state.proxy)
            .field("total_supply", &state.ledger.total_supply())
            .field("logs", &state.logs.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
