//! End-to-end settlement scenario and ledger properties
//!
//! Walks the professional-liability reference case from policy issue to
//! payment, then checks the ledger's money and numbering rules over
//! generated inputs.

use core_kernel::{CallContext, ClaimId, Currency, EvidenceId, Money, PolicyId};
use domain_claims::{ClaimStatus, ClaimsEvent, PolicyTerms};
use proptest::prelude::*;

use test_utils::{
    assert_ledger_error, assert_money_units, assert_store_unchanged, init_test_tracing,
    over_limit_claim_strategy, positive_usd_strategy, settlement_strategy, MoneyFixtures,
    PrincipalFixtures, StoreSnapshot, TemporalFixtures, TestLedgerBuilder, REFERENCE_EVIDENCE_HASH,
    REFERENCE_EVIDENCE_TYPE,
};

// ============================================================================
// Reference Scenario
// ============================================================================

mod reference_scenario {
    use super::*;

    #[test]
    fn test_policy_to_payment() {
        init_test_tracing();
        let mut h = TestLedgerBuilder::new().build();
        assert_eq!(h.policy_id, PolicyId::new(1));
        assert!(h.ledger.policy(&h.store, h.policy_id).unwrap().active);

        // holder pays the premium, administrator tops up the pool
        let holder = CallContext::new(PrincipalFixtures::freelancer(), TemporalFixtures::submission());
        h.ledger.pay_premium(&mut h.store, &holder, h.policy_id).unwrap();
        let admin = h.admin_ctx();
        let available = h
            .ledger
            .fund_pool(&mut h.store, &admin, MoneyFixtures::usd(18_000))
            .unwrap();
        assert_money_units(&available, 20_000);

        let claim_id = h.submit_reference_claim();
        assert_eq!(claim_id, ClaimId::new(1));
        assert_eq!(
            h.ledger.claim(&h.store, claim_id).unwrap().status,
            ClaimStatus::Submitted
        );

        let claimant = h.claimant_ctx();
        let evidence_id = h
            .ledger
            .add_evidence(
                &mut h.store,
                &claimant,
                claim_id,
                REFERENCE_EVIDENCE_TYPE,
                REFERENCE_EVIDENCE_HASH,
            )
            .unwrap();
        assert_eq!(evidence_id, EvidenceId::new(1));

        h.approve(claim_id, MoneyFixtures::settlement()).unwrap();
        let check = h.ledger.can_process(&h.store, claim_id).unwrap();
        assert!(check.can_process && check.sufficient_funds && check.status_approved);

        let net = h.pay(claim_id).unwrap();
        assert_money_units(&net, 15_000);
        assert_eq!(
            h.ledger.claim(&h.store, claim_id).unwrap().status,
            ClaimStatus::Paid
        );
        assert_money_units(&h.ledger.available_funds(&h.store).unwrap(), 5_000);

        // evidence stays readable after the claim closes
        let evidence = h.ledger.evidence(&h.store, claim_id, evidence_id).unwrap();
        assert_eq!(evidence.content_hash, REFERENCE_EVIDENCE_HASH);

        assert_ledger_error(h.submit(MoneyFixtures::usd(150_000)), "ERR-INSUFFICIENT-COVERAGE");
        assert_ledger_error(h.pay(claim_id), "ERR-ALREADY-PAID");
    }

    #[test]
    fn test_audit_trail() {
        let mut h = TestLedgerBuilder::new()
            .with_funds(MoneyFixtures::usd(50_000))
            .build();
        let claim_id = h.approved_reference_claim();
        h.pay(claim_id).unwrap();

        let types: Vec<&str> = h.store.events().iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "PolicyAdded",
                "PoolFunded",
                "ClaimSubmitted",
                "ClaimApproved",
                "ClaimPaid"
            ]
        );
        assert!(h.store.events()[2..]
            .iter()
            .all(|e| e.claim_id() == Some(claim_id)));
    }

    #[test]
    fn test_paid_event_serializes() {
        let mut h = TestLedgerBuilder::new()
            .with_funds(MoneyFixtures::usd(50_000))
            .build();
        let claim_id = h.approved_reference_claim();
        h.pay(claim_id).unwrap();

        let event = h.store.events().last().unwrap().clone();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("ClaimPaid"));

        let restored: ClaimsEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, event);
    }
}

// ============================================================================
// Ledger Properties
// ============================================================================

mod ledger_properties {
    use super::*;

    fn terms(limit: i64, deductible: i64) -> PolicyTerms {
        PolicyTerms {
            coverage_limit: Money::from_units(limit, Currency::USD),
            deductible: Money::from_units(deductible, Currency::USD),
            premium_amount: MoneyFixtures::premium(),
            duration_days: 365,
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn over_limit_claims_leave_no_trace((terms, amount) in over_limit_claim_strategy()) {
            let mut h = TestLedgerBuilder::new().with_terms(terms).build();
            let before = StoreSnapshot::capture(&h.ledger, &h.store, &PrincipalFixtures::claimant());

            let result = h.submit(amount);
            prop_assert_eq!(result.unwrap_err().code(), "ERR-INSUFFICIENT-COVERAGE");
            prop_assert_eq!(
                before,
                StoreSnapshot::capture(&h.ledger, &h.store, &PrincipalFixtures::claimant())
            );
        }

        #[test]
        fn claims_within_limit_are_accepted(amount in positive_usd_strategy(100_000)) {
            let mut h = TestLedgerBuilder::new().build();

            let claim_id = h.submit(amount).unwrap();
            let claim = h.ledger.claim(&h.store, claim_id).unwrap();
            prop_assert_eq!(claim.amount_requested, amount);
            prop_assert_eq!(claim.status, ClaimStatus::Submitted);
        }

        #[test]
        fn payment_is_settlement_less_deductible((requested, settlement, deductible) in settlement_strategy()) {
            let funds = 5_000_000i64;
            let mut h = TestLedgerBuilder::new()
                .with_terms(terms(requested.max(deductible), deductible))
                .with_funds(Money::from_units(funds, Currency::USD))
                .build();

            let claim_id = h.submit(Money::from_units(requested, Currency::USD)).unwrap();
            h.approve(claim_id, Money::from_units(settlement, Currency::USD)).unwrap();
            let net = h.pay(claim_id).unwrap();

            let expected = (settlement - deductible).max(0);
            prop_assert!(!net.is_negative());
            prop_assert_eq!(net, Money::from_units(expected, Currency::USD));
            prop_assert_eq!(
                h.ledger.available_funds(&h.store).unwrap(),
                Money::from_units(funds - expected, Currency::USD)
            );
            prop_assert_eq!(
                h.ledger.claimant_credit(&h.store, &PrincipalFixtures::claimant()).unwrap(),
                net
            );
        }

        #[test]
        fn underfunded_payment_changes_nothing(funds in 1i64..15_000i64) {
            let mut h = TestLedgerBuilder::new()
                .with_funds(Money::from_units(funds, Currency::USD))
                .build();
            let claim_id = h.approved_reference_claim();
            let before = StoreSnapshot::capture(&h.ledger, &h.store, &PrincipalFixtures::claimant());

            prop_assert_eq!(h.pay(claim_id).unwrap_err().code(), "ERR-INSUFFICIENT-FUNDS");
            assert_store_unchanged(
                &before,
                &StoreSnapshot::capture(&h.ledger, &h.store, &PrincipalFixtures::claimant()),
            );
        }

        #[test]
        fn claim_ids_are_dense(count in 1usize..12) {
            let mut h = TestLedgerBuilder::new().build();
            for expected in 1..=count as u64 {
                prop_assert_eq!(h.submit_reference_claim(), ClaimId::new(expected));
            }
            prop_assert_eq!(h.ledger.claim_count(&h.store).unwrap(), count as u64);
        }
    }
}
