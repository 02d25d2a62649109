//! # Stable Token Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Deployed token with the usual cast of accounts
//! │
//! ├── exploits/         # Attack simulations
//! │   ├── post_upgrade_lockout.rs
//! │   └── reentrancy.rs
//! │
//! └── integration/      # Cross-component flows
//!     ├── flows.rs
//!     ├── upgrade.rs
//!     └── invariants.rs # proptest properties
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p st-tests
//!
//! # By category
//! cargo test -p st-tests integration::
//! cargo test -p st-tests exploits::
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod exploits;
