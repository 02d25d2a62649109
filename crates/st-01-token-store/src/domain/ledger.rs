//! # Account Ledger
//!
//! Balances, allowances, total supply and the frozen set. These are raw
//! setters: no business rule is checked here beyond checked arithmetic and
//! freeze idempotency. The Store gates who may call them.

use shared_types::{Address, TokenError, TokenResult, U256};
use std::collections::{BTreeMap, BTreeSet};

/// Per-account token state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccountLedger {
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
    total_supply: U256,
    frozen: BTreeSet<Address>,
}

impl AccountLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // READS
    // =========================================================================

    #[must_use]
    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    #[must_use]
    pub fn is_frozen(&self, account: Address) -> bool {
        self.frozen.contains(&account)
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (Address, U256)> + '_ {
        self.balances.iter().map(|(account, balance)| (*account, *balance))
    }

    /// Frozen accounts, in address order.
    pub fn frozen_accounts(&self) -> impl Iterator<Item = Address> + '_ {
        self.frozen.iter().copied()
    }

    /// Sum of every balance, or `None` if it does not fit.
    #[must_use]
    pub fn balance_sum(&self) -> Option<U256> {
        self.balances
            .values()
            .try_fold(U256::zero(), |acc, balance| acc.checked_add(*balance))
    }

    // =========================================================================
    // RAW SETTERS
    // =========================================================================

    pub fn set_balance(&mut self, account: Address, value: U256) {
        if value.is_zero() {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, value);
        }
    }

    /// Adds `delta` to the balance of `account`.
    pub fn add_balance(&mut self, account: Address, delta: U256) -> TokenResult<()> {
        let updated = self
            .balance_of(account)
            .checked_add(delta)
            .ok_or(TokenError::AdditionOverflow)?;
        self.set_balance(account, updated);
        Ok(())
    }

    pub fn set_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        if amount.is_zero() {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    pub fn set_total_supply(&mut self, value: U256) {
        self.total_supply = value;
    }

    /// Marks `account` frozen.
    pub fn freeze(&mut self, account: Address) -> TokenResult<()> {
        if !self.frozen.insert(account) {
            return Err(TokenError::AlreadyFrozen);
        }
        Ok(())
    }

    /// Clears the frozen mark on `account`.
    pub fn unfreeze(&mut self, account: Address) -> TokenResult<()> {
        if !self.frozen.remove(&account) {
            return Err(TokenError::NotFrozen);
        }
        Ok(())
    }
}
