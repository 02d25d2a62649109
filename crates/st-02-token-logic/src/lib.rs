//! # st-02-token-logic
//!
//! Business rules for the Stable Token.
//!
//! ## Role in System
//!
//! - **Replaceable**: each generation is a separate [`StableToken`] deployed
//!   at its own address; an upgrade repoints the Store at the next one.
//! - **Stateless**: ledger state lives in `st-01-token-store`; the only local
//!   state is the binding and the pause flag.
//! - **Explicit Identity**: forwarded calls are accepted only from the bound
//!   Proxy and carry the end user as an argument.
//!
//! ## Collaborators
//!
//! Partners and foreign assets are resolved through the
//! [`ContractRegistry`](shared_types::ContractRegistry). In-memory versions of
//! both live in [`adapters`].

pub mod adapters;
pub mod domain;
pub mod service;

pub use adapters::{InMemoryForeignToken, ReceivedTransfer, RecordingPartner};
pub use service::StableToken;
