//! # Error Types
//!
//! The single failure type of the token system. Each variant's message is the
//! human-readable failure reason reported to callers; [`TokenError::kind`]
//! classifies it into the failure taxonomy.
//!
//! Every failure is synchronous and total: the call that produced it leaves no
//! state behind.

use crate::entities::{Address, Role};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across all components.
pub type TokenResult<T> = Result<T, TokenError>;

/// Failure classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Wrong role, wrong capability, not-proxy, not-implementation.
    Authorization,
    /// Already initialized, already (un)frozen, paused, not frozen for wipe.
    State,
    /// Zero or malformed address, malformed role, self-referential upgrade.
    Validation,
    /// Balance or allowance too low.
    InsufficientFunds,
    /// Checked arithmetic failed.
    Arithmetic,
    /// An external collaborator refused the call.
    Collaborator,
}

/// Errors produced by the Store, the Implementation and the Proxy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    // -------------------------------------------------------------------------
    // Authorization
    // -------------------------------------------------------------------------
    /// Store mutator invoked by something other than the current implementation.
    #[error("Only implementation")]
    OnlyImplementation,

    /// AllArgs entry point invoked by something other than the bound proxy.
    #[error("Only Proxy")]
    OnlyProxy,

    /// Master-only operation invoked by someone else.
    #[error("Only Master")]
    OnlyMaster,

    /// Caller lacks the role the operation requires.
    #[error("Only {0}")]
    MissingRole(Role),

    // -------------------------------------------------------------------------
    // State
    // -------------------------------------------------------------------------
    /// `init` called twice.
    #[error("Already initialized")]
    AlreadyInitialized,

    /// Operation on an implementation that was never initialized.
    #[error("Not initialized")]
    NotInitialized,

    /// The store already recorded its proxy.
    #[error("Proxy already bound")]
    ProxyAlreadyBound,

    /// Events cannot be attributed before the store knows its proxy.
    #[error("Proxy not bound")]
    ProxyNotBound,

    /// Balance-mutating operation while paused.
    #[error("Contract is paused")]
    Paused,

    /// `unpause` while not paused.
    #[error("Contract is not paused")]
    NotPaused,

    /// The initiating account is frozen.
    #[error("Sender account is frozen")]
    SenderFrozen,

    /// The owner whose tokens `transfer_from` would move is frozen.
    #[error("TokenOwner is frozen")]
    OwnerFrozen,

    /// `freeze` on a frozen account.
    #[error("Account is already frozen")]
    AlreadyFrozen,

    /// `unfreeze` on an account that is not frozen.
    #[error("Account is not frozen")]
    NotFrozen,

    /// `wipe_account` on an account that is not frozen.
    #[error("Account must be frozen by Law")]
    MustBeFrozen,

    /// `add_role` for a role the account already holds.
    #[error("Account already has role")]
    RoleAlreadyGranted,

    /// `remove_role` for a role the account does not hold.
    #[error("Account does not have role")]
    RoleNotGranted,

    /// Removing Admin from the master account.
    #[error("Cannot remove Master from admin role")]
    CannotRemoveMaster,

    /// Transferring mastership to an account without Admin.
    #[error("New Master must have the Admin role")]
    MasterNotAdmin,

    /// `transfer_and_call` target does not hold the Partner role.
    #[error("Partner is not registered")]
    PartnerNotRegistered,

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------
    /// Zero address supplied as a transfer, approval, mint or upgrade target.
    #[error("Zero address not allowed")]
    ZeroAddressNotAllowed,

    /// Zero address supplied as a governed account.
    #[error("Account is the zero address")]
    AccountIsZero,

    /// Zero spender passed to an allowance adjustment.
    #[error("Cannot approve zero address")]
    ApproveToZero,

    /// Zero recipient passed to `transfer_from`.
    #[error("Cannot transfer to zero address")]
    TransferToZero,

    /// Upgrade to the implementation that is already current.
    #[error("Both addresses are the same")]
    SameImplementation,

    /// Role identifier outside the enumerated set.
    #[error("Invalid role identifier: {0}")]
    InvalidRole(u8),

    /// Address text that is not 20 hex-encoded bytes.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// A later implementation was initialized against a different proxy.
    #[error("Proxy mismatch: store is bound to {expected}, got {actual}")]
    ProxyMismatch { expected: Address, actual: Address },

    /// Nothing of the required kind is deployed at the address.
    #[error("No contract deployed at {0}")]
    UnknownContract(Address),

    /// The proxy never accepts the platform's native asset.
    #[error("Native value transfers are not accepted")]
    NativeValueRejected,

    // -------------------------------------------------------------------------
    // Insufficient funds
    // -------------------------------------------------------------------------
    /// Balance lower than the amount.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// Allowance lower than the amount.
    #[error("Insufficient funds in allowance")]
    InsufficientAllowance,

    // -------------------------------------------------------------------------
    // Arithmetic
    // -------------------------------------------------------------------------
    /// Checked subtraction underflowed.
    #[error("SafeMath: subtraction overflow")]
    SubtractionOverflow,

    /// Checked addition overflowed.
    #[error("SafeMath: addition overflow")]
    AdditionOverflow,

    // -------------------------------------------------------------------------
    // Collaborators
    // -------------------------------------------------------------------------
    /// A partner or foreign asset refused the call.
    #[error("Call rejected by collaborator: {0}")]
    Rejected(String),
}

impl TokenError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::OnlyImplementation | Self::OnlyProxy | Self::OnlyMaster | Self::MissingRole(_) => {
                ErrorKind::Authorization
            }
            Self::AlreadyInitialized
            | Self::NotInitialized
            | Self::ProxyAlreadyBound
            | Self::ProxyNotBound
            | Self::Paused
            | Self::NotPaused
            | Self::SenderFrozen
            | Self::OwnerFrozen
            | Self::AlreadyFrozen
            | Self::NotFrozen
            | Self::MustBeFrozen
            | Self::RoleAlreadyGranted
            | Self::RoleNotGranted
            | Self::CannotRemoveMaster
            | Self::MasterNotAdmin
            | Self::PartnerNotRegistered => ErrorKind::State,
            Self::ZeroAddressNotAllowed
            | Self::AccountIsZero
            | Self::ApproveToZero
            | Self::TransferToZero
            | Self::SameImplementation
            | Self::InvalidRole(_)
            | Self::MalformedAddress(_)
            | Self::ProxyMismatch { .. }
            | Self::UnknownContract(_)
            | Self::NativeValueRejected => ErrorKind::Validation,
            Self::InsufficientFunds | Self::InsufficientAllowance => ErrorKind::InsufficientFunds,
            Self::SubtractionOverflow | Self::AdditionOverflow => ErrorKind::Arithmetic,
            Self::Rejected(_) => ErrorKind::Collaborator,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
