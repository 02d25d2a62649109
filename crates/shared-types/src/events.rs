//! # Event Schema
//!
//! Structured notifications emitted by the token system, plus the records
//! that carry them back to callers.
//!
//! ## Attribution
//!
//! Every event is appended to the Store's log as a [`LogEntry`] whose
//! `address` is the Proxy. History therefore appears to originate from one
//! stable address regardless of how many implementations have come and gone.
//!
//! ## Receipts
//!
//! Each successful mutating call returns a [`CallReceipt`] holding exactly the
//! log entries produced by that call. A failed call produces no receipt and
//! leaves no log entries behind.

use crate::entities::{Address, Bytes, Role, U256};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// TOKEN EVENTS
// =============================================================================

/// A notification emitted by the Implementation.
///
/// `agent` is the account that initiated the action (the true end user, not
/// the Proxy).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "PascalCase")]
pub enum TokenEvent {
    /// New tokens created.
    Mint {
        agent: Address,
        account: Address,
        tokens: U256,
    },
    /// New tokens created with an opaque annotation.
    SmartMint {
        agent: Address,
        account: Address,
        tokens: U256,
        data: Bytes,
    },
    /// Tokens destroyed.
    Burn {
        agent: Address,
        account: Address,
        tokens: U256,
    },
    /// Tokens destroyed with an opaque annotation.
    SmartBurn {
        agent: Address,
        account: Address,
        tokens: U256,
        data: Bytes,
    },
    /// Balance moved between accounts.
    Transfer {
        from: Address,
        to: Address,
        tokens: U256,
    },
    /// Balance moved to a partner that is then called back.
    SmartTransfer {
        from: Address,
        to: Address,
        tokens: U256,
        data: Bytes,
    },
    /// Allowance set to `tokens`.
    Approval {
        owner: Address,
        spender: Address,
        tokens: U256,
    },
    /// Role granted.
    AddRole {
        agent: Address,
        account: Address,
        role: Role,
    },
    /// Role revoked.
    RemoveRole {
        agent: Address,
        account: Address,
        role: Role,
    },
    /// Account frozen by law enforcement.
    FreezeAccount { agent: Address, account: Address },
    /// Account released by law enforcement.
    UnfreezeAccount { agent: Address, account: Address },
    /// Frozen account's balance destroyed.
    WipeAccount { agent: Address, account: Address },
    /// Mastership transferred to `account`.
    SetMaster { agent: Address, account: Address },
    /// Current implementation replaced.
    UpgradeToken {
        agent: Address,
        new_implementation: Address,
    },
    /// Foreign asset held by the Proxy sent to `to`.
    ReclaimToken {
        agent: Address,
        token: Address,
        to: Address,
        tokens: U256,
    },
    /// Balance-mutating operations suspended.
    Paused { agent: Address },
    /// Balance-mutating operations resumed.
    Unpaused { agent: Address },
}

impl TokenEvent {
    /// Event name as it appears in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mint { .. } => "Mint",
            Self::SmartMint { .. } => "SmartMint",
            Self::Burn { .. } => "Burn",
            Self::SmartBurn { .. } => "SmartBurn",
            Self::Transfer { .. } => "Transfer",
            Self::SmartTransfer { .. } => "SmartTransfer",
            Self::Approval { .. } => "Approval",
            Self::AddRole { .. } => "AddRole",
            Self::RemoveRole { .. } => "RemoveRole",
            Self::FreezeAccount { .. } => "FreezeAccount",
            Self::UnfreezeAccount { .. } => "UnfreezeAccount",
            Self::WipeAccount { .. } => "WipeAccount",
            Self::SetMaster { .. } => "SetMaster",
            Self::UpgradeToken { .. } => "UpgradeToken",
            Self::ReclaimToken { .. } => "ReclaimToken",
            Self::Paused { .. } => "Paused",
            Self::Unpaused { .. } => "Unpaused",
        }
    }

    /// Opaque payload carried by the smart variants, if any.
    #[must_use]
    pub fn data(&self) -> Option<&Bytes> {
        match self {
            Self::SmartMint { data, .. }
            | Self::SmartBurn { data, .. }
            | Self::SmartTransfer { data, .. } => Some(data),
            _ => None,
        }
    }
}

// =============================================================================
// LOG RECORDS
// =============================================================================

/// An event as recorded in the Store's log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Emitting address (always the Proxy).
    pub address: Address,
    /// Position in the log, starting at zero.
    pub sequence: u64,
    /// The event itself.
    pub event: TokenEvent,
}

/// Outcome of a successful mutating call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallReceipt {
    /// Correlation id for tracing a call through the components.
    pub call_id: Uuid,
    /// Always true for a returned receipt; failures surface as errors.
    pub success: bool,
    /// Log entries produced by this call, in emission order.
    pub logs: Vec<LogEntry>,
}

impl CallReceipt {
    /// Builds a successful receipt with a fresh correlation id.
    #[must_use]
    pub fn success(logs: Vec<LogEntry>) -> Self {
        Self {
            call_id: Uuid::new_v4(),
            success: true,
            logs,
        }
    }

    /// A successful call that emitted nothing is a bug in the emitter.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        !self.success || !self.logs.is_empty()
    }

    /// Iterates the events in emission order.
    pub fn events(&self) -> impl Iterator<Item = &TokenEvent> {
        self.logs.iter().map(|entry| &entry.event)
    }

    /// Returns true if an event with the given name was emitted.
    #[must_use]
    pub fn emitted(&self, name: &str) -> bool {
        self.events().any(|event| event.name() == name)
    }
}

// =============================================================================
// TESTS
// =============================================================================
