//! Attack simulations against the token.
//!
//! - `post_upgrade_lockout`: superseded logic trying to keep writing
//! - `reentrancy`: partners calling back into the token mid-transfer

pub mod post_upgrade_lockout;
