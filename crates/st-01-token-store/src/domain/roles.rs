//! # Role Registry
//!
//! The (role, account) grant set plus the single master account.
//!
//! ## Invariants
//!
//! - Once a master exists it always holds [`Role::Admin`].
//! - Admin can never be removed from the master; only [`RoleRegistry::set_master`]
//!   moves the protection to another Admin.

use shared_types::{Address, Role, TokenError, TokenResult};
use std::collections::BTreeSet;

/// Role grants and the master pointer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    grants: BTreeSet<(Role, Address)>,
    master: Option<Address>,
}

impl RoleRegistry {
    /// Creates an empty registry with no master.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `account` holds `role`.
    #[must_use]
    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.grants.contains(&(role, account))
    }

    /// The current master, if the token has been initialized.
    #[must_use]
    pub fn master(&self) -> Option<Address> {
        self.master
    }

    /// Accounts holding `role`, in address order.
    #[must_use]
    pub fn holders(&self, role: Role) -> Vec<Address> {
        self.grants
            .iter()
            .filter(|(granted, _)| *granted == role)
            .map(|(_, account)| *account)
            .collect()
    }

    /// Total number of grants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.grants.len()
    }

    /// Returns true if no role has been granted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }

    /// Grants `role` to `account`.
    pub fn add_role(&mut self, role: Role, account: Address) -> TokenResult<()> {
        if account.is_zero() {
            return Err(TokenError::AccountIsZero);
        }
        if !self.grants.insert((role, account)) {
            return Err(TokenError::RoleAlreadyGranted);
        }
        Ok(())
    }

    /// Revokes `role` from `account`.
    pub fn remove_role(&mut self, role: Role, account: Address) -> TokenResult<()> {
        if account.is_zero() {
            return Err(TokenError::AccountIsZero);
        }
        if role == Role::Admin && self.master == Some(account) {
            return Err(TokenError::CannotRemoveMaster);
        }
        if !self.grants.remove(&(role, account)) {
            return Err(TokenError::RoleNotGranted);
        }
        Ok(())
    }

    /// Moves mastership to `account`, which must already be an Admin.
    pub fn set_master(&mut self, account: Address) -> TokenResult<()> {
        if account.is_zero() {
            return Err(TokenError::AccountIsZero);
        }
        if !self.has_role(Role::Admin, account) {
            return Err(TokenError::MasterNotAdmin);
        }
        self.master = Some(account);
        Ok(())
    }
}
