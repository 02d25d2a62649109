//! In-memory collaborators: a partner contract and a foreign asset.

pub mod foreign_token;
pub mod partner;

pub use foreign_token::InMemoryForeignToken;
pub use partner::{ReceivedTransfer, RecordingPartner};
