//! # Domain Invariants
//!
//! Properties that must hold after every completed call. They are not
//! enforced here; the Store checks them in debug logging and the test suite
//! asserts them over arbitrary call sequences.
//!
//! - Supply: `total_supply == Σ balances`
//! - Master: once a master exists, it holds Admin

use super::ledger::AccountLedger;
use super::roles::RoleRegistry;
use shared_types::Role;

/// Total supply equals the sum of all balances.
#[must_use]
pub fn check_supply_invariant(ledger: &AccountLedger) -> bool {
    ledger.balance_sum() == Some(ledger.total_supply())
}

/// The master, if any, holds Admin.
#[must_use]
pub fn check_master_invariant(roles: &RoleRegistry) -> bool {
    roles
        .master()
        .map_or(true, |master| roles.has_role(Role::Admin, master))
}
