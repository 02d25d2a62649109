//! Domain layer for the token store.

pub mod invariants;
pub mod ledger;
pub mod metadata;
pub mod roles;

pub use invariants::{check_master_invariant, check_supply_invariant};
pub use ledger::AccountLedger;
pub use metadata::TokenMetadata;
pub use roles::RoleRegistry;
