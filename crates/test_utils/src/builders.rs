//! Test Data Builders
//!
//! `TestLedgerBuilder` assembles a ledger, an in-memory store and an issued
//! policy so tests only spell out what they care about.

use chrono::{DateTime, Utc};
use core_kernel::{CallContext, ClaimId, Money, PolicyId, Principal};
use domain_claims::{
    ClaimsLedger, LedgerConfig, LedgerError, MemoryStore, PolicyTerms, ReviewDecision,
};

use crate::fixtures::{
    MoneyFixtures, PrincipalFixtures, TemporalFixtures, TermsFixtures, REFERENCE_DESCRIPTION,
};

/// Builder for a ledger with one issued policy
pub struct TestLedgerBuilder {
    config: LedgerConfig,
    terms: PolicyTerms,
    holder: Principal,
    reviewer: Option<Principal>,
    funds: Option<Money>,
    issued_at: DateTime<Utc>,
}

impl Default for TestLedgerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestLedgerBuilder {
    /// Creates a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LedgerConfig::new(PrincipalFixtures::administrator()),
            terms: TermsFixtures::standard(),
            holder: PrincipalFixtures::freelancer(),
            reviewer: None,
            funds: None,
            issued_at: TemporalFixtures::deployment(),
        }
    }

    pub fn with_config(mut self, config: LedgerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_terms(mut self, terms: PolicyTerms) -> Self {
        self.terms = terms;
        self
    }

    /// Delegates claim review to `reviewer` instead of the administrator
    pub fn with_reviewer(mut self, reviewer: Principal) -> Self {
        self.reviewer = Some(reviewer);
        self
    }

    /// Seeds the treasury with a contribution from the administrator
    pub fn with_funds(mut self, funds: Money) -> Self {
        self.funds = Some(funds);
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = at;
        self
    }

    /// Builds the harness
    ///
    /// # Panics
    ///
    /// Panics if the configured policy or funding is rejected.
    pub fn build(self) -> TestLedger {
        let ledger = ClaimsLedger::new(self.config);
        let mut store = MemoryStore::new();
        let admin = CallContext::new(ledger.config().administrator.clone(), self.issued_at);

        let policy_id = ledger
            .add_policy(&mut store, &admin, self.holder, self.terms)
            .expect("test policy should be accepted");
        if let Some(reviewer) = self.reviewer {
            ledger
                .assign_reviewer(&mut store, &admin, policy_id, reviewer)
                .expect("reviewer assignment should be accepted");
        }
        if let Some(funds) = self.funds {
            ledger
                .fund_pool(&mut store, &admin, funds)
                .expect("test funding should be accepted");
        }

        TestLedger {
            ledger,
            store,
            policy_id,
        }
    }
}

/// A ledger, its store and the id of the policy issued by the builder
pub struct TestLedger {
    pub ledger: ClaimsLedger,
    pub store: MemoryStore,
    pub policy_id: PolicyId,
}

impl TestLedger {
    pub fn admin_ctx(&self) -> CallContext {
        CallContext::new(
            self.ledger.config().administrator.clone(),
            TemporalFixtures::submission(),
        )
    }

    pub fn claimant_ctx(&self) -> CallContext {
        CallContext::new(PrincipalFixtures::claimant(), TemporalFixtures::submission())
    }

    /// Submits the reference claim as the claimant
    pub fn submit(&mut self, amount: Money) -> Result<ClaimId, LedgerError> {
        let ctx = self.claimant_ctx();
        self.ledger.submit_claim(
            &mut self.store,
            &ctx,
            self.policy_id,
            amount,
            REFERENCE_DESCRIPTION,
            TemporalFixtures::incident(),
        )
    }

    /// Submits the reference 25000 claim, panicking on rejection
    pub fn submit_reference_claim(&mut self) -> ClaimId {
        self.submit(MoneyFixtures::claim_amount())
            .expect("reference claim should be accepted")
    }

    /// Approves as the administrator
    pub fn approve(&mut self, claim_id: ClaimId, settlement: Money) -> Result<(), LedgerError> {
        let ctx = self.admin_ctx();
        self.ledger
            .review_claim(
                &mut self.store,
                &ctx,
                claim_id,
                ReviewDecision::Approve { settlement },
            )
            .map(|_| ())
    }

    /// Submits and approves the reference claim with a 20000 settlement
    pub fn approved_reference_claim(&mut self) -> ClaimId {
        let claim_id = self.submit_reference_claim();
        self.approve(claim_id, MoneyFixtures::settlement())
            .expect("reference approval should be accepted");
        claim_id
    }

    pub fn pay(&mut self, claim_id: ClaimId) -> Result<Money, LedgerError> {
        let ctx = self.admin_ctx();
        self.ledger.process_payment(&mut self.store, &ctx, claim_id)
    }
}
