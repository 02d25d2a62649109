//! # st-01-token-store
//!
//! Durable state for the Stable Token.
//!
//! ## Role in System
//!
//! - **Single Writer**: only the registered implementation may mutate; every
//!   mutator re-checks the caller.
//! - **Survives Upgrades**: balances, allowances, roles, the frozen set and the
//!   log outlive any number of implementation swaps.
//! - **Governance Floor**: the master's Admin role is protected here, below
//!   any business logic.
//!
//! ## Flow
//!
//! ```text
//! [Proxy] ──forward──→ [Implementation] ──mutator(impl_addr, ..)──→ [Store]
//!                                                                    │
//!                                         caller == implementation? ─┘
//! ```

pub mod domain;
pub mod service;

pub use domain::*;
pub use service::TokenStore;
