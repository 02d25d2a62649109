//! # Recording Partner
//!
//! In-memory partner contract for `transfer_and_call`. Records every
//! notification it receives and can be told to refuse them.

use parking_lot::RwLock;
use shared_types::{Address, Bytes, TokenError, TokenRecipient, TokenResult, U256};

/// One `on_token_transfer` notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivedTransfer {
    pub from: Address,
    pub amount: U256,
    pub data: Bytes,
}

/// A partner that keeps what it is told.
#[derive(Debug, Default)]
pub struct RecordingPartner {
    received: RwLock<Vec<ReceivedTransfer>>,
    rejection: RwLock<Option<String>>,
}

impl RecordingPartner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A partner that refuses every notification with `reason`.
    #[must_use]
    pub fn rejecting(reason: impl Into<String>) -> Self {
        let partner = Self::new();
        partner.set_rejection(Some(reason.into()));
        partner
    }

    /// Starts (`Some`) or stops (`None`) refusing notifications.
    pub fn set_rejection(&self, reason: Option<String>) {
        *self.rejection.write() = reason;
    }

    /// Notifications accepted so far.
    #[must_use]
    pub fn received(&self) -> Vec<ReceivedTransfer> {
        self.received.read().clone()
    }
}

impl TokenRecipient for RecordingPartner {
    fn on_token_transfer(&self, from: Address, amount: U256, data: &Bytes) -> TokenResult<()> {
        if let Some(reason) = self.rejection.read().clone() {
            return Err(TokenError::Rejected(reason));
        }
        self.received.write().push(ReceivedTransfer {
            from,
            amount,
            data: data.clone(),
        });
        Ok(())
    }
}
