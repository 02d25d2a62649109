//! # Integration Test Flows
//!
//! End-user journeys through the Proxy against a token deployed by the
//! runtime's deployment helper.
//!
//! ## Flows Tested:
//!
//! 1. **Supply**: mint, transfer, burn and their events
//! 2. **Allowances**: approve, transferFrom, increase/decrease
//! 3. **Law enforcement**: freeze, wipe, unfreeze
//! 4. **Partners**: transferAndCall delivery and rejection
//! 5. **Recovery**: reclaiming foreign assets sent to the Proxy

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use shared_types::{Bytes, ErrorKind, ForeignToken, Role, TokenError, TokenEvent, U256};
    use st_02_token_logic::{InMemoryForeignToken, RecordingPartner};
    use std::sync::Arc;

    // =============================================================================
    // SUPPLY
    // =============================================================================

    #[test]
    fn test_mint_transfer_burn_scenario() {
        let fx = TokenFixture::new();
        let proxy = fx.proxy();

        fx.mint(ALICE, 10);
        proxy.transfer(ALICE, BOB, n(4)).unwrap();
        fx.token().burn(BURNER, ALICE, n(1)).unwrap();

        assert_eq!(fx.balance(ALICE), n(5));
        assert_eq!(fx.balance(BOB), n(4));
        assert_eq!(fx.supply(), n(9));
        assert!(fx.deployment.store().invariants_hold());
    }

    #[test]
    fn test_every_log_entry_comes_from_the_proxy() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 3);
        fx.proxy().transfer(ALICE, BOB, n(1)).unwrap();

        let logs = fx.proxy().logs();
        assert!(logs.iter().all(|entry| entry.address == fx.proxy().address()));
        let sequences: Vec<u64> = logs.iter().map(|entry| entry.sequence).collect();
        assert_eq!(sequences, (0..logs.len() as u64).collect::<Vec<_>>());
    }

    #[test]
    fn test_transfer_receipt_carries_one_transfer_event() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 10);

        let receipt = fx.proxy().transfer(ALICE, BOB, n(7)).unwrap();
        assert!(receipt.success);
        assert!(receipt.is_consistent());
        assert_eq!(
            receipt.events().cloned().collect::<Vec<_>>(),
            vec![TokenEvent::Transfer {
                from: ALICE,
                to: BOB,
                tokens: n(7),
            }]
        );
    }

    #[test]
    fn test_failed_calls_leave_no_trace() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 2);
        let ledger = fx.deployment.store().ledger();
        let log_count = fx.deployment.store().log_count();

        let err = fx.proxy().transfer(ALICE, BOB, n(3)).unwrap_err();
        assert_eq!(err, TokenError::InsufficientFunds);
        assert_eq!(err.kind(), ErrorKind::InsufficientFunds);

        let err = fx
            .proxy()
            .transfer(ALICE, shared_types::Address::ZERO, n(1))
            .unwrap_err();
        assert_eq!(err, TokenError::ZeroAddressNotAllowed);

        assert_eq!(fx.deployment.store().ledger(), ledger);
        assert_eq!(fx.deployment.store().log_count(), log_count);
    }

    #[test]
    fn test_mint_with_data_logs_payload() {
        let fx = TokenFixture::new();
        let payload = Bytes::from(vec![0xDE, 0xAD, 0xBE, 0xEF]);

        let receipt = fx
            .token()
            .mint_with_data(MINTER, ALICE, n(5), payload.clone())
            .unwrap();
        let event = receipt.events().next().unwrap();
        assert_eq!(event.name(), "SmartMint");
        assert_eq!(event.data(), Some(&payload));

        let receipt = fx
            .token()
            .burn_with_data(BURNER, ALICE, n(2), payload.clone())
            .unwrap();
        assert!(receipt.emitted("SmartBurn"));
        assert_eq!(fx.supply(), n(3));
    }

    #[test]
    fn test_roles_gate_supply() {
        let fx = TokenFixture::new();
        assert_eq!(
            fx.token().mint(ALICE, ALICE, n(1)).unwrap_err(),
            TokenError::MissingRole(Role::Minter)
        );
        assert_eq!(
            fx.token().burn(MINTER, ALICE, n(0)).unwrap_err().to_string(),
            "Only Burner"
        );
    }

    // =============================================================================
    // ALLOWANCES
    // =============================================================================

    #[test]
    fn test_approve_and_transfer_from_scenario() {
        let fx = TokenFixture::new();
        let proxy = fx.proxy();
        fx.mint(ALICE, 10);

        proxy.approve(ALICE, BOB, n(3)).unwrap();
        proxy.transfer_from(BOB, ALICE, CAROL, n(1)).unwrap();
        assert_eq!(proxy.allowance(ALICE, BOB), n(2));
        assert_eq!(fx.balance(CAROL), n(1));

        let err = proxy.transfer_from(BOB, ALICE, CAROL, n(5)).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds in allowance");
        assert_eq!(proxy.allowance(ALICE, BOB), n(2));
    }

    #[test]
    fn test_transfer_from_reports_allowance_before_balance() {
        let fx = TokenFixture::new();
        let proxy = fx.proxy();
        fx.mint(ALICE, 2);

        proxy.approve(ALICE, BOB, n(3)).unwrap();
        proxy.transfer_from(BOB, ALICE, CAROL, n(1)).unwrap();

        // alice holds 1 and bob may spend 2; 5 exceeds both.
        let err = proxy.transfer_from(BOB, ALICE, CAROL, n(5)).unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds in allowance");

        let err = proxy
            .transfer_from(BOB, shared_types::Address::ZERO, CAROL, n(1))
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient funds in allowance");
        assert_eq!(fx.balance(ALICE), n(1));
        assert_eq!(fx.balance(CAROL), n(1));
    }

    #[test]
    fn test_delegated_calls_name_the_zero_address() {
        let fx = TokenFixture::new();
        let proxy = fx.proxy();
        fx.mint(ALICE, 10);
        proxy.approve(ALICE, BOB, n(5)).unwrap();
        let zero = shared_types::Address::ZERO;

        let err = proxy.transfer_from(BOB, ALICE, zero, n(1)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot transfer to zero address");
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = proxy.increase_allowance(ALICE, zero, n(1)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot approve zero address");
        let err = proxy.decrease_allowance(ALICE, zero, n(1)).unwrap_err();
        assert_eq!(err.to_string(), "Cannot approve zero address");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_allowance_adjustments_emit_running_total() {
        let fx = TokenFixture::new();
        let proxy = fx.proxy();

        proxy.increase_allowance(ALICE, BOB, n(5)).unwrap();
        let receipt = proxy.decrease_allowance(ALICE, BOB, n(2)).unwrap();
        assert_eq!(
            receipt.events().next(),
            Some(&TokenEvent::Approval {
                owner: ALICE,
                spender: BOB,
                tokens: n(3),
            })
        );

        let err = proxy.decrease_allowance(ALICE, BOB, n(4)).unwrap_err();
        assert_eq!(err.to_string(), "SafeMath: subtraction overflow");
        assert_eq!(proxy.allowance(ALICE, BOB), n(3));
    }

    #[test]
    fn test_transfer_from_refuses_frozen_owner() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 10);
        fx.proxy().approve(ALICE, BOB, n(10)).unwrap();
        fx.token().freeze_account(OFFICER, ALICE).unwrap();

        let err = fx.proxy().transfer_from(BOB, ALICE, CAROL, n(1)).unwrap_err();
        assert_eq!(err.to_string(), "TokenOwner is frozen");
    }

    // =============================================================================
    // LAW ENFORCEMENT
    // =============================================================================

    #[test]
    fn test_freeze_then_wipe_scenario() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 6);
        fx.mint(BOB, 4);

        fx.token().freeze_account(OFFICER, ALICE).unwrap();
        let err = fx.proxy().transfer(ALICE, BOB, n(1)).unwrap_err();
        assert_eq!(err.to_string(), "Sender account is frozen");

        let receipt = fx.token().wipe_account(ADMIN, ALICE).unwrap();
        assert!(receipt.emitted("WipeAccount"));
        assert_eq!(fx.balance(ALICE), U256::zero());
        assert_eq!(fx.supply(), n(4));
        assert!(fx.deployment.store().is_frozen(ALICE));
    }

    #[test]
    fn test_wipe_requires_freeze() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 6);
        assert_eq!(
            fx.token().wipe_account(ADMIN, ALICE).unwrap_err().to_string(),
            "Account must be frozen by Law"
        );
    }

    #[test]
    fn test_freeze_twice_and_unfreeze_twice_fail() {
        let fx = TokenFixture::new();
        let token = fx.token();

        token.freeze_account(OFFICER, ALICE).unwrap();
        assert_eq!(
            token.freeze_account(OFFICER, ALICE).unwrap_err(),
            TokenError::AlreadyFrozen
        );
        token.unfreeze_account(OFFICER, ALICE).unwrap();
        assert_eq!(
            token.unfreeze_account(OFFICER, ALICE).unwrap_err(),
            TokenError::NotFrozen
        );
    }

    #[test]
    fn test_pause_blocks_movement_not_governance() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 5);
        fx.token().pause(ADMIN).unwrap();

        assert!(fx.proxy().is_paused().unwrap());
        assert_eq!(
            fx.proxy().transfer(ALICE, BOB, n(1)).unwrap_err(),
            TokenError::Paused
        );
        assert_eq!(
            fx.token().mint(MINTER, ALICE, n(1)).unwrap_err(),
            TokenError::Paused
        );
        fx.token().freeze_account(OFFICER, BOB).unwrap();

        fx.token().unpause(ADMIN).unwrap();
        fx.proxy().transfer(ALICE, CAROL, n(1)).unwrap();
    }

    // =============================================================================
    // GOVERNANCE
    // =============================================================================

    #[test]
    fn test_master_handover() {
        let fx = TokenFixture::new();
        let token = fx.token();

        assert_eq!(
            token.set_master(ADMIN, ALICE).unwrap_err(),
            TokenError::MasterNotAdmin
        );
        token.add_role(ADMIN, Role::Admin, ALICE).unwrap();
        token.set_master(ADMIN, ALICE).unwrap();
        assert_eq!(fx.deployment.store().master(), Some(ALICE));

        // The old master can now lose Admin; the new one cannot.
        token.remove_role(ALICE, Role::Admin, ADMIN).unwrap();
        assert_eq!(
            token.remove_role(ALICE, Role::Admin, ALICE).unwrap_err(),
            TokenError::CannotRemoveMaster
        );
        assert_eq!(
            token.set_master(ADMIN, ADMIN).unwrap_err(),
            TokenError::OnlyMaster
        );
    }

    // =============================================================================
    // PARTNERS
    // =============================================================================

    #[test]
    fn test_transfer_and_call_delivers_payload() {
        let fx = TokenFixture::new();
        let partner = Arc::new(RecordingPartner::new());
        let partner_address = fx.deployment.deploy_partner(partner.clone());
        fx.token()
            .add_role(ADMIN, Role::Partner, partner_address)
            .unwrap();
        fx.mint(ALICE, 10);

        let payload = Bytes::from(b"order-42".as_slice());
        let receipt = fx
            .proxy()
            .transfer_and_call(ALICE, partner_address, n(6), payload.clone())
            .unwrap();

        assert!(receipt.emitted("SmartTransfer"));
        assert_eq!(fx.balance(partner_address), n(6));
        let received = partner.received();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].from, ALICE);
        assert_eq!(received[0].amount, n(6));
        assert_eq!(received[0].data, payload);
    }

    #[test]
    fn test_transfer_and_call_requires_partner_role() {
        let fx = TokenFixture::new();
        let partner_address = fx
            .deployment
            .deploy_partner(Arc::new(RecordingPartner::new()));
        fx.mint(ALICE, 10);

        let err = fx
            .proxy()
            .transfer_and_call(ALICE, partner_address, n(1), Bytes::new())
            .unwrap_err();
        assert_eq!(err, TokenError::PartnerNotRegistered);
        assert_eq!(fx.balance(ALICE), n(10));
    }

    #[test]
    fn test_partner_rejection_rolls_back_transfer() {
        let fx = TokenFixture::new();
        let partner_address = fx
            .deployment
            .deploy_partner(Arc::new(RecordingPartner::rejecting("not today")));
        fx.token()
            .add_role(ADMIN, Role::Partner, partner_address)
            .unwrap();
        fx.mint(ALICE, 10);
        let log_count = fx.deployment.store().log_count();

        let err = fx
            .proxy()
            .transfer_and_call(ALICE, partner_address, n(4), Bytes::new())
            .unwrap_err();
        assert_eq!(err, TokenError::Rejected("not today".to_string()));
        assert_eq!(err.kind(), ErrorKind::Collaborator);
        assert_eq!(fx.balance(ALICE), n(10));
        assert_eq!(fx.balance(partner_address), U256::zero());
        assert_eq!(fx.deployment.store().log_count(), log_count);
    }

    // =============================================================================
    // RECOVERY
    // =============================================================================

    #[test]
    fn test_reclaim_foreign_asset_sent_to_proxy() {
        let fx = TokenFixture::new();
        let foreign = Arc::new(InMemoryForeignToken::new());
        let foreign_address = fx.deployment.deploy_foreign_token(foreign.clone());
        foreign.mint(fx.proxy().address(), n(25)).unwrap();

        assert_eq!(
            fx.proxy()
                .reclaim_token(MALLORY, foreign_address, MALLORY)
                .unwrap_err(),
            TokenError::MissingRole(Role::Admin)
        );

        let receipt = fx.proxy().reclaim_token(ADMIN, foreign_address, CAROL).unwrap();
        assert!(receipt.is_consistent());
        assert!(receipt.emitted("ReclaimToken"));
        assert_eq!(foreign.balance_of(CAROL), n(25));
        assert_eq!(foreign.balance_of(fx.proxy().address()), U256::zero());
    }

    #[test]
    fn test_reclaim_unknown_asset() {
        let fx = TokenFixture::new();
        let nowhere = shared_types::Address::from_low_u64(0x404);
        assert_eq!(
            fx.proxy().reclaim_token(ADMIN, nowhere, CAROL).unwrap_err(),
            TokenError::UnknownContract(nowhere)
        );
    }

    #[test]
    fn test_native_value_is_refused() {
        let fx = TokenFixture::new();
        assert_eq!(
            fx.proxy().receive_native(ALICE, n(1)).unwrap_err(),
            TokenError::NativeValueRejected
        );
    }

    #[test]
    fn test_log_serializes_with_event_tag() {
        let fx = TokenFixture::new();
        fx.mint(ALICE, 1);
        let json = serde_json::to_value(fx.proxy().logs()).unwrap();
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|entry| entry["event"]["event"].as_str().unwrap())
            .collect();
        assert_eq!(names.first(), Some(&"AddRole"));
        assert_eq!(names.last(), Some(&"Mint"));
    }
}
