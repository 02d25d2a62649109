//! # Shared Types Crate
//!
//! This crate contains every type that crosses a component boundary in the
//! Stable Token system: the Store, the replaceable Implementation and the
//! stable Proxy all speak in these terms.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: addresses, roles, events, receipts and the
//!   error taxonomy are defined once, here.
//! - **Explicit Identity**: every entry point receives the immediate caller as
//!   an [`Address`]; forwarded calls additionally carry the true sender.
//! - **Collaborators by Address**: implementations, partners and foreign
//!   assets are reached through the [`ContractRegistry`], never cached.

pub mod contracts;
pub mod entities;
pub mod errors;
pub mod events;
pub mod registry;

pub use contracts::*;
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use registry::{ContractRegistry, DeployedContract};
