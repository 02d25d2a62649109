//! # Stable Token Implementation
//!
//! The replaceable business-logic unit. It holds no ledger state of its own:
//! every balance, allowance, role and frozen flag lives in the
//! [`TokenStore`], and every write goes through the Store's capability gate
//! under this implementation's address.
//!
//! ## Call surfaces
//!
//! - **Direct**: `mint`, `burn`, role management, freezes, wipe, pause. The
//!   caller is the end user.
//! - **Forwarded** ([`TokenLogic`]): the ERC20 surface plus reclaim and
//!   upgrade. The immediate caller must be the bound Proxy and the true
//!   sender travels as an explicit argument.
//!
//! ## Validation order
//!
//! capability/role → paused/frozen → argument validity → balance/allowance
//! sufficiency → mutation → event.
//!
//! ## Deactivation
//!
//! A superseded implementation does not track that it was replaced. Its first
//! Store write fails with "Only implementation" and the atomic scope discards
//! anything it did before that.

use crate::domain::{
    checked_decrease, checked_increase, debit, debit_allowance, require_account,
    require_destination, require_recipient, require_spender,
};
use shared_types::{
    Address, Bytes, CallReceipt, ContractRegistry, DeployedContract, Role, TokenError,
    TokenEvent, TokenLogic, TokenResult, U256,
};
use st_01_token_store::TokenStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, warn};

/// Proxy and Store this implementation was initialized against.
struct Binding {
    proxy: Address,
    store: Arc<TokenStore>,
}

/// One generation of token logic.
pub struct StableToken {
    address: Address,
    registry: Arc<ContractRegistry>,
    binding: OnceLock<Binding>,
    /// Not part of the Store snapshot; `execute` rolls it back itself.
    paused: AtomicBool,
}

impl StableToken {
    /// Creates an uninitialized implementation at `address`.
    #[must_use]
    pub fn new(address: Address, registry: Arc<ContractRegistry>) -> Self {
        Self {
            address,
            registry,
            binding: OnceLock::new(),
            paused: AtomicBool::new(false),
        }
    }

    /// Deploys a fresh implementation from `deployer` and registers it so the
    /// Proxy can resolve it.
    pub fn deploy(registry: &Arc<ContractRegistry>, deployer: Address) -> Arc<Self> {
        let address = registry.next_address(deployer);
        let token = Arc::new(Self::new(address, Arc::clone(registry)));
        registry.register(
            address,
            DeployedContract::Implementation(Arc::clone(&token) as Arc<dyn TokenLogic>),
        );
        info!("[st-02] Implementation deployed at {}", address);
        token
    }

    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Binds this implementation to `proxy` and `store`. Runs once.
    ///
    /// On the first deployment (the store has no master yet) the caller
    /// becomes Admin and master, and the store records the proxy; this must
    /// run while this implementation is the store's current one. Later
    /// generations only verify that they are joining the same proxy, and may
    /// be initialized before or after the upgrade that activates them.
    pub fn init(&self, caller: Address, proxy: Address, store: Arc<TokenStore>) -> TokenResult<()> {
        if self.binding.get().is_some() {
            return Err(TokenError::AlreadyInitialized);
        }
        require_destination(proxy)?;

        if store.master().is_none() {
            store.atomic(|| {
                store.bind_proxy(self.address, proxy)?;
                store.add_role(self.address, Role::Admin, caller)?;
                store.set_master(self.address, caller)?;
                store.emit(
                    self.address,
                    TokenEvent::AddRole {
                        agent: caller,
                        account: caller,
                        role: Role::Admin,
                    },
                )?;
                store.emit(
                    self.address,
                    TokenEvent::SetMaster {
                        agent: caller,
                        account: caller,
                    },
                )?;
                Ok(())
            })?;
            info!("[st-02] {} initialized; master is {}", self.address, caller);
        } else {
            match store.proxy() {
                Some(bound) if bound == proxy => {}
                Some(bound) => {
                    return Err(TokenError::ProxyMismatch {
                        expected: bound,
                        actual: proxy,
                    })
                }
                None => return Err(TokenError::ProxyNotBound),
            }
            info!("[st-02] {} joined proxy {}", self.address, proxy);
        }

        self.binding
            .set(Binding { proxy, store })
            .map_err(|_| TokenError::AlreadyInitialized)
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.binding.get().is_some()
    }

    /// The bound Proxy.
    #[must_use]
    pub fn proxy(&self) -> Option<Address> {
        self.binding.get().map(|binding| binding.proxy)
    }

    /// The bound Store.
    #[must_use]
    pub fn store(&self) -> Option<Arc<TokenStore>> {
        self.binding.get().map(|binding| Arc::clone(&binding.store))
    }

    /// Whether the Store currently accepts writes from this implementation.
    #[must_use]
    pub fn is_current(&self) -> bool {
        self.binding
            .get()
            .is_some_and(|binding| binding.store.implementation() == self.address)
    }

    pub fn balance_of(&self, account: Address) -> TokenResult<U256> {
        Ok(self.binding()?.store.balance_of(account))
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> TokenResult<U256> {
        Ok(self.binding()?.store.allowance(owner, spender))
    }

    pub fn total_supply(&self) -> TokenResult<U256> {
        Ok(self.binding()?.store.total_supply())
    }

    pub fn has_role(&self, role: Role, account: Address) -> TokenResult<bool> {
        Ok(self.binding()?.store.has_role(role, account))
    }

    // =========================================================================
    // GUARDS
    // =========================================================================

    fn binding(&self) -> TokenResult<&Binding> {
        self.binding.get().ok_or(TokenError::NotInitialized)
    }

    fn only_proxy(&self, binding: &Binding, caller: Address) -> TokenResult<()> {
        if caller != binding.proxy {
            warn!("[st-02] Forwarded call from {} rejected: not the proxy", caller);
            return Err(TokenError::OnlyProxy);
        }
        Ok(())
    }

    fn only_role(&self, binding: &Binding, role: Role, account: Address) -> TokenResult<()> {
        if !binding.store.has_role(role, account) {
            warn!("[st-02] {} lacks role {}", account, role);
            return Err(TokenError::MissingRole(role));
        }
        Ok(())
    }

    fn when_not_paused(&self) -> TokenResult<()> {
        if self.is_paused() {
            return Err(TokenError::Paused);
        }
        Ok(())
    }

    fn sender_not_frozen(&self, binding: &Binding, sender: Address) -> TokenResult<()> {
        if binding.store.is_frozen(sender) {
            return Err(TokenError::SenderFrozen);
        }
        Ok(())
    }

    /// Runs `body` in an atomic store scope and wraps the emitted logs in a
    /// receipt.
    ///
    /// The pause flag lives outside the Store, so it is restored here when
    /// the scope fails. A pause made by a nested call is undone along with
    /// the outer call that failed.
    fn execute(
        &self,
        operation: &'static str,
        body: impl FnOnce(&Binding) -> TokenResult<()>,
    ) -> TokenResult<CallReceipt> {
        let binding = self.binding()?;
        let paused = self.is_paused();
        let ((), logs) = binding
            .store
            .atomic(|| body(binding))
            .map_err(|err| {
                self.paused.store(paused, Ordering::SeqCst);
                err
            })?;
        let receipt = CallReceipt::success(logs);
        debug!(
            "[st-02] {} ok (call {}, {} log entries)",
            operation,
            receipt.call_id,
            receipt.logs.len()
        );
        Ok(receipt)
    }

    // =========================================================================
    // LEDGER PRIMITIVES (run inside a scope)
    // =========================================================================

    fn move_balance(
        &self,
        store: &TokenStore,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<()> {
        let remaining = debit(store.balance_of(from), amount)?;
        store.set_balance(self.address, from, remaining)?;
        store.add_balance(self.address, to, amount)
    }

    fn issue(
        &self,
        caller: Address,
        account: Address,
        amount: U256,
        data: Option<Bytes>,
    ) -> TokenResult<CallReceipt> {
        self.execute("mint", |binding| {
            self.only_role(binding, Role::Minter, caller)?;
            self.when_not_paused()?;
            require_destination(account)?;

            let store = &binding.store;
            let supply = checked_increase(store.total_supply(), amount)?;
            store.add_balance(self.address, account, amount)?;
            store.set_total_supply(self.address, supply)?;

            let event = match data {
                Some(data) => TokenEvent::SmartMint {
                    agent: caller,
                    account,
                    tokens: amount,
                    data,
                },
                None => TokenEvent::Mint {
                    agent: caller,
                    account,
                    tokens: amount,
                },
            };
            store.emit(self.address, event)?;
            Ok(())
        })
    }

    fn destroy(
        &self,
        caller: Address,
        account: Address,
        amount: U256,
        data: Option<Bytes>,
    ) -> TokenResult<CallReceipt> {
        self.execute("burn", |binding| {
            self.only_role(binding, Role::Burner, caller)?;
            self.when_not_paused()?;

            let store = &binding.store;
            let remaining = debit(store.balance_of(account), amount)?;
            let supply = checked_decrease(store.total_supply(), amount)?;
            store.set_balance(self.address, account, remaining)?;
            store.set_total_supply(self.address, supply)?;

            let event = match data {
                Some(data) => TokenEvent::SmartBurn {
                    agent: caller,
                    account,
                    tokens: amount,
                    data,
                },
                None => TokenEvent::Burn {
                    agent: caller,
                    account,
                    tokens: amount,
                },
            };
            store.emit(self.address, event)?;
            Ok(())
        })
    }

    // =========================================================================
    // SUPPLY
    // =========================================================================

    /// Creates `amount` tokens for `account`.
    pub fn mint(&self, caller: Address, account: Address, amount: U256) -> TokenResult<CallReceipt> {
        self.issue(caller, account, amount, None)
    }

    /// Creates tokens and logs `data` with the mint. The payload is not
    /// delivered anywhere else.
    pub fn mint_with_data(
        &self,
        caller: Address,
        account: Address,
        amount: U256,
        data: Bytes,
    ) -> TokenResult<CallReceipt> {
        self.issue(caller, account, amount, Some(data))
    }

    /// Destroys `amount` of `account`'s tokens.
    pub fn burn(&self, caller: Address, account: Address, amount: U256) -> TokenResult<CallReceipt> {
        self.destroy(caller, account, amount, None)
    }

    /// Destroys tokens and logs `data` with the burn.
    pub fn burn_with_data(
        &self,
        caller: Address,
        account: Address,
        amount: U256,
        data: Bytes,
    ) -> TokenResult<CallReceipt> {
        self.destroy(caller, account, amount, Some(data))
    }

    // =========================================================================
    // GOVERNANCE
    // =========================================================================

    /// Grants `role` to `account`. Admin only.
    pub fn add_role(&self, caller: Address, role: Role, account: Address) -> TokenResult<CallReceipt> {
        self.execute("add_role", |binding| {
            self.only_role(binding, Role::Admin, caller)?;
            binding.store.add_role(self.address, role, account)?;
            binding.store.emit(
                self.address,
                TokenEvent::AddRole {
                    agent: caller,
                    account,
                    role,
                },
            )?;
            info!("[st-02] {} granted {} to {}", caller, role, account);
            Ok(())
        })
    }

    /// Revokes `role` from `account`. Admin only; never Admin from the master.
    pub fn remove_role(
        &self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> TokenResult<CallReceipt> {
        self.execute("remove_role", |binding| {
            self.only_role(binding, Role::Admin, caller)?;
            binding.store.remove_role(self.address, role, account)?;
            binding.store.emit(
                self.address,
                TokenEvent::RemoveRole {
                    agent: caller,
                    account,
                    role,
                },
            )?;
            info!("[st-02] {} revoked {} from {}", caller, role, account);
            Ok(())
        })
    }

    /// Hands mastership to another Admin. Current master only.
    pub fn set_master(&self, caller: Address, new_master: Address) -> TokenResult<CallReceipt> {
        self.execute("set_master", |binding| {
            if binding.store.master() != Some(caller) {
                warn!("[st-02] {} attempted set_master without being master", caller);
                return Err(TokenError::OnlyMaster);
            }
            binding.store.set_master(self.address, new_master)?;
            binding.store.emit(
                self.address,
                TokenEvent::SetMaster {
                    agent: caller,
                    account: new_master,
                },
            )?;
            info!("[st-02] Master moved {} -> {}", caller, new_master);
            Ok(())
        })
    }

    /// Bars `account` from sending. Law enforcement only.
    pub fn freeze_account(&self, caller: Address, account: Address) -> TokenResult<CallReceipt> {
        self.execute("freeze_account", |binding| {
            self.only_role(binding, Role::LawEnforcement, caller)?;
            require_account(account)?;
            binding.store.freeze(self.address, account)?;
            binding.store.emit(
                self.address,
                TokenEvent::FreezeAccount {
                    agent: caller,
                    account,
                },
            )?;
            info!("[st-02] {} froze {}", caller, account);
            Ok(())
        })
    }

    /// Lifts a freeze. Law enforcement only.
    pub fn unfreeze_account(&self, caller: Address, account: Address) -> TokenResult<CallReceipt> {
        self.execute("unfreeze_account", |binding| {
            self.only_role(binding, Role::LawEnforcement, caller)?;
            require_account(account)?;
            binding.store.unfreeze(self.address, account)?;
            binding.store.emit(
                self.address,
                TokenEvent::UnfreezeAccount {
                    agent: caller,
                    account,
                },
            )?;
            info!("[st-02] {} unfroze {}", caller, account);
            Ok(())
        })
    }

    /// Destroys a frozen account's whole balance. Admin only.
    pub fn wipe_account(&self, caller: Address, account: Address) -> TokenResult<CallReceipt> {
        self.execute("wipe_account", |binding| {
            self.only_role(binding, Role::Admin, caller)?;
            require_account(account)?;

            let store = &binding.store;
            if !store.is_frozen(account) {
                return Err(TokenError::MustBeFrozen);
            }
            let wiped = store.balance_of(account);
            let supply = checked_decrease(store.total_supply(), wiped)?;
            store.set_balance(self.address, account, U256::zero())?;
            store.set_total_supply(self.address, supply)?;
            store.emit(
                self.address,
                TokenEvent::WipeAccount {
                    agent: caller,
                    account,
                },
            )?;
            info!("[st-02] {} wiped {} ({} tokens)", caller, account, wiped);
            Ok(())
        })
    }

    /// Suspends balance-mutating operations. Admin only.
    pub fn pause(&self, caller: Address) -> TokenResult<CallReceipt> {
        self.execute("pause", |binding| {
            self.only_role(binding, Role::Admin, caller)?;
            self.when_not_paused()?;
            binding
                .store
                .emit(self.address, TokenEvent::Paused { agent: caller })?;
            self.paused.store(true, Ordering::SeqCst);
            info!("[st-02] {} paused by {}", self.address, caller);
            Ok(())
        })
    }

    /// Resumes balance-mutating operations. Admin only.
    pub fn unpause(&self, caller: Address) -> TokenResult<CallReceipt> {
        self.execute("unpause", |binding| {
            self.only_role(binding, Role::Admin, caller)?;
            if !self.is_paused() {
                return Err(TokenError::NotPaused);
            }
            binding
                .store
                .emit(self.address, TokenEvent::Unpaused { agent: caller })?;
            self.paused.store(false, Ordering::SeqCst);
            info!("[st-02] {} unpaused by {}", self.address, caller);
            Ok(())
        })
    }
}

// =============================================================================
// FORWARDED SURFACE
// =============================================================================

impl TokenLogic for StableToken {
    fn address(&self) -> Address {
        self.address
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn transfer_all_args(
        &self,
        caller: Address,
        sender: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt> {
        self.execute("transfer", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, sender)?;
            require_destination(to)?;

            self.move_balance(&binding.store, sender, to, amount)?;
            binding.store.emit(
                self.address,
                TokenEvent::Transfer {
                    from: sender,
                    to,
                    tokens: amount,
                },
            )?;
            Ok(())
        })
    }

    fn approve_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt> {
        self.execute("approve", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, sender)?;
            require_destination(spender)?;

            binding
                .store
                .set_allowance(self.address, sender, spender, amount)?;
            binding.store.emit(
                self.address,
                TokenEvent::Approval {
                    owner: sender,
                    spender,
                    tokens: amount,
                },
            )?;
            Ok(())
        })
    }

    fn increase_allowance_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        added: U256,
    ) -> TokenResult<CallReceipt> {
        self.execute("increase_allowance", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, sender)?;
            require_spender(spender)?;

            let store = &binding.store;
            let updated = checked_increase(store.allowance(sender, spender), added)?;
            store.set_allowance(self.address, sender, spender, updated)?;
            store.emit(
                self.address,
                TokenEvent::Approval {
                    owner: sender,
                    spender,
                    tokens: updated,
                },
            )?;
            Ok(())
        })
    }

    fn decrease_allowance_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        subtracted: U256,
    ) -> TokenResult<CallReceipt> {
        self.execute("decrease_allowance", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, sender)?;
            require_spender(spender)?;

            let store = &binding.store;
            let updated = checked_decrease(store.allowance(sender, spender), subtracted)?;
            store.set_allowance(self.address, sender, spender, updated)?;
            store.emit(
                self.address,
                TokenEvent::Approval {
                    owner: sender,
                    spender,
                    tokens: updated,
                },
            )?;
            Ok(())
        })
    }

    fn transfer_from_all_args(
        &self,
        caller: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt> {
        self.execute("transfer_from", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, spender)?;
            let store = &binding.store;
            if store.is_frozen(from) {
                return Err(TokenError::OwnerFrozen);
            }
            require_recipient(to)?;

            let allowance = debit_allowance(store.allowance(from, spender), amount)?;
            debit(store.balance_of(from), amount)?;

            self.move_balance(store, from, to, amount)?;
            store.set_allowance(self.address, from, spender, allowance)?;
            store.emit(
                self.address,
                TokenEvent::Transfer {
                    from,
                    to,
                    tokens: amount,
                },
            )?;
            Ok(())
        })
    }

    fn transfer_and_call_all_args(
        &self,
        caller: Address,
        sender: Address,
        partner: Address,
        amount: U256,
        data: Bytes,
    ) -> TokenResult<CallReceipt> {
        self.execute("transfer_and_call", |binding| {
            self.only_proxy(binding, caller)?;
            self.when_not_paused()?;
            self.sender_not_frozen(binding, sender)?;
            require_account(partner)?;
            let store = &binding.store;
            if !store.has_role(Role::Partner, partner) {
                return Err(TokenError::PartnerNotRegistered);
            }

            // Effects before the interaction: a re-entering partner sees the
            // committed transfer.
            self.move_balance(store, sender, partner, amount)?;
            store.emit(
                self.address,
                TokenEvent::SmartTransfer {
                    from: sender,
                    to: partner,
                    tokens: amount,
                    data: data.clone(),
                },
            )?;

            let recipient = self.registry.recipient(partner)?;
            recipient.on_token_transfer(sender, amount, &data)
        })
    }

    fn reclaim_token_all_args(
        &self,
        caller: Address,
        sender: Address,
        token: Address,
        to: Address,
    ) -> TokenResult<CallReceipt> {
        self.execute("reclaim_token", |binding| {
            self.only_proxy(binding, caller)?;
            self.only_role(binding, Role::Admin, sender)?;
            require_destination(to)?;

            let foreign = self.registry.foreign_token(token)?;
            let held = foreign.balance_of(binding.proxy);
            binding.store.emit(
                self.address,
                TokenEvent::ReclaimToken {
                    agent: sender,
                    token,
                    to,
                    tokens: held,
                },
            )?;
            foreign.transfer(binding.proxy, to, held)?;
            info!("[st-02] {} reclaimed {} of {} to {}", sender, held, token, to);
            Ok(())
        })
    }

    fn upgrade_token_all_args(
        &self,
        caller: Address,
        sender: Address,
        new_implementation: Address,
    ) -> TokenResult<CallReceipt> {
        self.execute("upgrade_token", |binding| {
            self.only_proxy(binding, caller)?;
            self.only_role(binding, Role::Admin, sender)?;
            require_destination(new_implementation)?;
            if new_implementation == self.address {
                return Err(TokenError::SameImplementation);
            }
            // Refuse to point the store at something the proxy cannot reach.
            self.registry.implementation(new_implementation)?;

            // Emitted first: once the store is repointed this implementation
            // can no longer write to it.
            binding.store.emit(
                self.address,
                TokenEvent::UpgradeToken {
                    agent: sender,
                    new_implementation,
                },
            )?;
            binding
                .store
                .upgrade_implementation(self.address, new_implementation)?;
            info!(
                "[st-02] {} upgraded token {} -> {}",
                sender, self.address, new_implementation
            );
            Ok(())
        })
    }
}

impl std::fmt::Debug for StableToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StableToken")
            .field("address", &self.address)
            .field("proxy", &self.proxy())
            .field("paused", &self.is_paused())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
