//! # Superseded Implementation Attacks
//!
//! After an upgrade the old implementation is still deployed and still holds
//! a handle to the Store. Every attempt to write through it must fail, even
//! when the attacker holds every role and claims to be the Proxy.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_types::{Address, Bytes, Role, TokenError, TokenLogic};
    use std::sync::Arc;

    /// Fixture with some history, upgraded once. Returns the old generation.
    fn upgraded() -> (TokenFixture, Arc<st_02_token_logic::StableToken>) {
        let mut fx = TokenFixture::new();
        fx.mint(ALICE, 10);
        let old = fx.token();
        fx.upgrade();
        (fx, old)
    }

    #[test]
    fn test_direct_governance_calls_rejected() {
        let (fx, old) = upgraded();
        let log_count = fx.deployment.store().log_count();

        assert_eq!(
            old.mint(MINTER, MALLORY, n(1_000)).unwrap_err(),
            TokenError::OnlyImplementation
        );
        assert_eq!(
            old.add_role(ADMIN, Role::Minter, MALLORY).unwrap_err(),
            TokenError::OnlyImplementation
        );
        old.freeze_account(OFFICER, ALICE).unwrap_err();
        assert_eq!(
            old.set_master(ADMIN, MINTER).unwrap_err(),
            TokenError::OnlyImplementation
        );

        assert_eq!(fx.balance(MALLORY), n(0));
        assert!(!fx.deployment.store().has_role(Role::Minter, MALLORY));
        assert!(!fx.deployment.store().is_frozen(ALICE));
        assert_eq!(fx.deployment.store().log_count(), log_count);
    }

    #[test]
    fn test_pause_on_old_generation_does_not_stick() {
        let (fx, old) = upgraded();
        assert_eq!(old.pause(ADMIN).unwrap_err(), TokenError::OnlyImplementation);
        assert!(!old.is_paused());
    }

    #[test]
    fn test_forged_proxy_identity_still_rejected() {
        let (fx, old) = upgraded();
        let proxy = fx.proxy().address();

        assert_eq!(
            old.transfer_all_args(proxy, ALICE, MALLORY, n(10))
                .unwrap_err(),
            TokenError::OnlyImplementation
        );
        assert_eq!(
            old.transfer_and_call_all_args(proxy, ALICE, MALLORY, n(1), Bytes::new())
                .unwrap_err(),
            TokenError::PartnerNotRegistered
        );
        assert_eq!(fx.balance(ALICE), n(10));
    }

    #[test]
    fn test_old_generation_cannot_upgrade_again() {
        let (fx, old) = upgraded();
        let rogue = st_02_token_logic::StableToken::deploy(fx.deployment.registry(), MALLORY);

        assert_eq!(
            old.upgrade_token_all_args(fx.proxy().address(), ADMIN, rogue.address())
                .unwrap_err(),
            TokenError::OnlyImplementation
        );
        assert_eq!(fx.proxy().implementation(), fx.implementation());
    }

    #[test]
    fn test_new_generation_and_proxy_keep_working() {
        let (fx, old) = upgraded();
        fx.token().mint(MINTER, BOB, n(2)).unwrap();
        fx.proxy().transfer(ALICE, BOB, n(3)).unwrap();

        assert_eq!(fx.balance(BOB), n(5));
        // Reads through the old generation still see the shared Store.
        assert_eq!(old.balance_of(BOB).unwrap(), n(5));
    }

    #[test]
    fn test_forwarded_call_needs_the_proxy() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 5);
        let current = fx.token();

        assert_eq!(
            current
                .transfer_all_args(MALLORY, ALICE, MALLORY, n(5))
                .unwrap_err(),
            TokenError::OnlyProxy
        );
        assert_eq!(
            current
                .approve_all_args(Address::ZERO, ALICE, MALLORY, n(5))
                .unwrap_err()
                .to_string(),
            "Only Proxy"
        );
        assert_eq!(fx.balance(ALICE), n(5));
    }
}
