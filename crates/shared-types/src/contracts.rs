//! # Collaborator Contracts
//!
//! Traits at the seams between deployed components. Every component is
//! reached by address through the [`ContractRegistry`](crate::ContractRegistry)
//! and spoken to through one of these traits, so the Proxy never depends on a
//! concrete implementation type and upgrades only swap the address.
//!
//! ## Caller identity
//!
//! The first `caller` argument of every method is the immediate caller as the
//! platform authenticates it. Forwarded ("AllArgs") methods additionally take
//! the true end-user `sender`; the implementation accepts them only when
//! `caller` is its bound Proxy.

use crate::entities::{Address, Bytes, U256};
use crate::errors::TokenResult;
use crate::events::CallReceipt;

/// The forwarded surface of a token implementation.
///
/// This is what the Proxy sees of the current implementation. Operations that
/// end users invoke on the implementation directly (minting, roles, freezes)
/// live on the concrete type, not here.
pub trait TokenLogic: Send + Sync {
    /// Address this implementation was deployed at.
    fn address(&self) -> Address;

    /// Whether balance-mutating operations are currently suspended.
    fn is_paused(&self) -> bool;

    /// Moves `amount` from `sender` to `to`.
    fn transfer_all_args(
        &self,
        caller: Address,
        sender: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt>;

    /// Overwrites the allowance of `spender` over `sender`'s balance.
    fn approve_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt>;

    /// Adds `added` to the allowance of `spender`.
    fn increase_allowance_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        added: U256,
    ) -> TokenResult<CallReceipt>;

    /// Subtracts `subtracted` from the allowance of `spender`.
    fn decrease_allowance_all_args(
        &self,
        caller: Address,
        sender: Address,
        spender: Address,
        subtracted: U256,
    ) -> TokenResult<CallReceipt>;

    /// Moves `amount` from `from` to `to` on `spender`'s instruction.
    fn transfer_from_all_args(
        &self,
        caller: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> TokenResult<CallReceipt>;

    /// Transfers to a registered partner, then notifies it with `data`.
    fn transfer_and_call_all_args(
        &self,
        caller: Address,
        sender: Address,
        partner: Address,
        amount: U256,
        data: Bytes,
    ) -> TokenResult<CallReceipt>;

    /// Sends the Proxy's whole balance of a foreign asset to `to`.
    fn reclaim_token_all_args(
        &self,
        caller: Address,
        sender: Address,
        token: Address,
        to: Address,
    ) -> TokenResult<CallReceipt>;

    /// Points the Store at `new_implementation`.
    fn upgrade_token_all_args(
        &self,
        caller: Address,
        sender: Address,
        new_implementation: Address,
    ) -> TokenResult<CallReceipt>;
}

/// A partner contract notified by `transfer_and_call`.
///
/// The callback runs after the transfer is committed; returning an error
/// rolls back the whole call.
pub trait TokenRecipient: Send + Sync {
    /// Receives `amount` tokens from `from` along with the opaque payload.
    fn on_token_transfer(&self, from: Address, amount: U256, data: &Bytes) -> TokenResult<()>;
}

/// A third-party fungible asset, used to reclaim tokens sent to the Proxy by
/// mistake.
pub trait ForeignToken: Send + Sync {
    /// Balance of `account` in this asset.
    fn balance_of(&self, account: Address) -> U256;

    /// Moves `amount` from `holder` (the immediate caller) to `to`.
    fn transfer(&self, holder: Address, to: Address, amount: U256) -> TokenResult<()>;
}
