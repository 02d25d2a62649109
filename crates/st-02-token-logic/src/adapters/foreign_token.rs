//! In-memory third-party asset, used to exercise `reclaim_token`.

use parking_lot::RwLock;
use shared_types::{Address, ForeignToken, TokenError, TokenResult, U256};
use std::collections::HashMap;

/// A minimal fungible asset with an unrestricted mint.
#[derive(Debug, Default)]
pub struct InMemoryForeignToken {
    balances: RwLock<HashMap<Address, U256>>,
}

impl InMemoryForeignToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `amount` to `account`.
    pub fn mint(&self, account: Address, amount: U256) -> TokenResult<()> {
        let mut balances = self.balances.write();
        let balance = balances.entry(account).or_default();
        *balance = balance
            .checked_add(amount)
            .ok_or(TokenError::AdditionOverflow)?;
        Ok(())
    }
}

impl ForeignToken for InMemoryForeignToken {
    fn balance_of(&self, account: Address) -> U256 {
        self.balances
            .read()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&self, holder: Address, to: Address, amount: U256) -> TokenResult<()> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddressNotAllowed);
        }
        let mut balances = self.balances.write();
        let balance = |account: &Address| balances.get(account).copied().unwrap_or_default();
        let remaining = balance(&holder)
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientFunds)?;
        if holder == to {
            return Ok(());
        }
        let credited = balance(&to)
            .checked_add(amount)
            .ok_or(TokenError::AdditionOverflow)?;
        balances.insert(holder, remaining);
        balances.insert(to, credited);
        Ok(())
    }
}
