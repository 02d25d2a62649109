//! # st-03-token-proxy
//!
//! The stable external entry point of the Stable Token.
//!
//! ## Role in System
//!
//! - **Stable Address**: the only address users ever need; all log entries are
//!   attributed to it.
//! - **Fresh Resolution**: the current implementation is looked up in the
//!   Store on every call.
//! - **Upgrade Trigger**: `upgrade_token` is forwarded like any other call and
//!   performed by the outgoing implementation.
//!
//! ```text
//! user ──transfer(to, amount)──→ [Proxy]
//!                                  │ store.implementation()
//!                                  │ registry.implementation(addr)
//!                                  ↓
//!                [Implementation].transfer_all_args(proxy, user, to, amount)
//! ```

pub mod service;

pub use service::StableProxy;
