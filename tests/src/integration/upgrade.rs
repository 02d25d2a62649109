//! # Upgrade Flows
//!
//! Replacing the implementation behind a live Proxy.
//!
//! ## Guarantees Tested:
//!
//! 1. Balances, allowances, frozen accounts, roles, master and supply carry over
//! 2. The Proxy address and its log never change
//! 3. The new implementation is reached on the very next call
//! 4. Bad upgrade targets are refused without side effects

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_types::{Address, Role, TokenError, TokenEvent, TokenLogic};
    use st_02_token_logic::StableToken;

    #[test]
    fn test_upgrade_preserves_state() {
        let mut fx = TokenFixture::new();
        fx.mint(ALICE, 10);
        fx.proxy().transfer(ALICE, BOB, n(4)).unwrap();
        fx.token().burn(BURNER, ALICE, n(1)).unwrap();
        fx.proxy().approve(ALICE, CAROL, n(2)).unwrap();
        fx.token().freeze_account(OFFICER, MALLORY).unwrap();

        let ledger = fx.deployment.store().ledger();
        let roles = fx.deployment.store().roles();
        let proxy_address = fx.proxy().address();

        fx.upgrade();

        assert_eq!(fx.balance(ALICE), n(5));
        assert_eq!(fx.balance(BOB), n(4));
        assert_eq!(fx.supply(), n(9));
        assert_eq!(fx.deployment.store().ledger(), ledger);
        assert_eq!(fx.deployment.store().roles(), roles);
        assert_eq!(fx.deployment.store().master(), Some(ADMIN));
        assert_eq!(fx.proxy().address(), proxy_address);
    }

    #[test]
    fn test_next_call_reaches_new_implementation() {
        let mut fx = TokenFixture::new();
        fx.mint(ALICE, 3);
        let next = fx.upgrade();

        assert_eq!(fx.proxy().implementation(), next.address());
        assert!(next.is_current());

        // Paused flags are per implementation: pausing the new one is what
        // the Proxy observes.
        next.pause(ADMIN).unwrap();
        assert_eq!(
            fx.proxy().transfer(ALICE, BOB, n(1)).unwrap_err(),
            TokenError::Paused
        );
        assert!(!fx.deployment.generations()[0].is_paused());
    }

    #[test]
    fn test_upgrade_event_logged_under_proxy() {
        let fx = TokenFixture::new();
        let next = StableToken::deploy(fx.deployment.registry(), ADMIN);
        next.init(ADMIN, fx.proxy().address(), std::sync::Arc::clone(fx.deployment.store()))
            .unwrap();

        let receipt = fx.proxy().upgrade_token(ADMIN, next.address()).unwrap();
        let entry = receipt.logs.last().unwrap();
        assert_eq!(entry.address, fx.proxy().address());
        assert_eq!(
            entry.event,
            TokenEvent::UpgradeToken {
                agent: ADMIN,
                new_implementation: next.address(),
            }
        );
    }

    #[test]
    fn test_chained_upgrades() {
        let mut fx = TokenFixture::new();
        fx.mint(ALICE, 8);
        for _ in 0..3 {
            fx.upgrade();
            fx.proxy().transfer(ALICE, BOB, n(1)).unwrap();
        }

        assert_eq!(fx.deployment.generations().len(), 4);
        assert_eq!(fx.balance(ALICE), n(5));
        assert_eq!(fx.balance(BOB), n(3));
        let upgrades = fx
            .proxy()
            .logs()
            .iter()
            .filter(|entry| entry.event.name() == "UpgradeToken")
            .count();
        assert_eq!(upgrades, 3);
    }

    #[test]
    fn test_upgrade_to_same_implementation_refused() {
        let fx = TokenFixture::new();
        let current = fx.implementation();
        assert_eq!(
            fx.proxy().upgrade_token(ADMIN, current).unwrap_err().to_string(),
            "Both addresses are the same"
        );
    }

    #[test]
    fn test_upgrade_to_unknown_or_zero_refused() {
        let fx = TokenFixture::new();
        let log_count = fx.deployment.store().log_count();
        let phantom = Address::from_low_u64(0xFEED);

        assert_eq!(
            fx.proxy().upgrade_token(ADMIN, phantom).unwrap_err(),
            TokenError::UnknownContract(phantom)
        );
        assert_eq!(
            fx.proxy().upgrade_token(ADMIN, Address::ZERO).unwrap_err(),
            TokenError::ZeroAddressNotAllowed
        );
        assert_eq!(fx.deployment.store().log_count(), log_count);
        assert_eq!(fx.proxy().implementation(), fx.deployment.generations()[0].address());
    }

    #[test]
    fn test_upgrade_requires_admin_sender() {
        let fx = TokenFixture::new();
        let next = StableToken::deploy(fx.deployment.registry(), ADMIN);
        assert_eq!(
            fx.proxy().upgrade_token(MINTER, next.address()).unwrap_err(),
            TokenError::MissingRole(Role::Admin)
        );
    }

    #[test]
    fn test_late_init_after_upgrade() {
        let fx = TokenFixture::new();
        let next = StableToken::deploy(fx.deployment.registry(), ADMIN);
        fx.proxy().upgrade_token(ADMIN, next.address()).unwrap();

        // Calls fail until the new generation is bound.
        assert_eq!(
            fx.proxy().transfer(ALICE, BOB, n(0)).unwrap_err(),
            TokenError::NotInitialized
        );
        next.init(ADMIN, fx.proxy().address(), std::sync::Arc::clone(fx.deployment.store()))
            .unwrap();
        fx.proxy().transfer(ALICE, BOB, n(0)).unwrap();
    }

    #[test]
    fn test_init_against_foreign_proxy_refused() {
        let fx = TokenFixture::new();
        let next = StableToken::deploy(fx.deployment.registry(), ADMIN);
        let impostor = Address::from_low_u64(0x1337);

        assert_eq!(
            next.init(ADMIN, impostor, std::sync::Arc::clone(fx.deployment.store()))
                .unwrap_err(),
            TokenError::ProxyMismatch {
                expected: fx.proxy().address(),
                actual: impostor,
            }
        );
        assert!(!next.is_initialized());
    }
}
