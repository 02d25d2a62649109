//! # Ledger Arithmetic Rules
//!
//! Pure checks the implementation runs before it touches the Store. Each one
//! maps a failed precondition to the failure reason callers see.

use shared_types::{Address, TokenError, TokenResult, U256};

/// Destination addresses (recipients, spenders, mint targets).
pub fn require_destination(address: Address) -> TokenResult<()> {
    if address.is_zero() {
        return Err(TokenError::ZeroAddressNotAllowed);
    }
    Ok(())
}

/// Spenders named in an allowance adjustment.
pub fn require_spender(spender: Address) -> TokenResult<()> {
    if spender.is_zero() {
        return Err(TokenError::ApproveToZero);
    }
    Ok(())
}

/// Recipients of a delegated transfer.
pub fn require_recipient(to: Address) -> TokenResult<()> {
    if to.is_zero() {
        return Err(TokenError::TransferToZero);
    }
    Ok(())
}

/// Governed accounts (freeze, wipe, partner lookups).
pub fn require_account(account: Address) -> TokenResult<()> {
    if account.is_zero() {
        return Err(TokenError::AccountIsZero);
    }
    Ok(())
}

/// Balance after spending `amount`.
pub fn debit(balance: U256, amount: U256) -> TokenResult<U256> {
    balance
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientFunds)
}

/// Allowance after spending `amount`.
pub fn debit_allowance(allowance: U256, amount: U256) -> TokenResult<U256> {
    allowance
        .checked_sub(amount)
        .ok_or(TokenError::InsufficientAllowance)
}

/// `value + delta`, failing on overflow.
pub fn checked_increase(value: U256, delta: U256) -> TokenResult<U256> {
    value.checked_add(delta).ok_or(TokenError::AdditionOverflow)
}

/// `value - delta`, failing on underflow.
pub fn checked_decrease(value: U256, delta: U256) -> TokenResult<U256> {
    value
        .checked_sub(delta)
        .ok_or(TokenError::SubtractionOverflow)
}
