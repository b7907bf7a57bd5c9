//! The claims ledger service
//!
//! `ClaimsLedger` holds only configuration. State lives in a [`LedgerStore`]
//! that the host owns and passes into every call, together with a
//! [`CallContext`] naming the verified caller and the current time.
//!
//! Every mutating operation follows the same shape: load a snapshot, validate
//! everything, then commit exactly one [`WriteBatch`]. A rejected call never
//! reaches `commit`, so it cannot leave partial state behind.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use core_kernel::{CallContext, ClaimId, EvidenceId, Money, PolicyId, PortError, Principal};

use crate::claim::{Claim, ClaimStatus, ReviewDecision};
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::ClaimsEvent;
use crate::evidence::Evidence;
use crate::payment::{net_payment, Processability, Treasury};
use crate::policy::{Policy, PolicyTerms};
use crate::ports::{LedgerStore, WriteBatch};

/// Insurance claims settlement ledger
#[derive(Debug, Clone)]
pub struct ClaimsLedger {
    config: LedgerConfig,
}

impl ClaimsLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // ========================================================================
    // Policy administration
    // ========================================================================

    /// Creates an active policy covering `[now, now + duration_days)`
    ///
    /// Only the administrator may add policies. The administrator becomes
    /// the policy's reviewer until [`ClaimsLedger::assign_reviewer`] says
    /// otherwise.
    ///
    /// # Errors
    ///
    /// - `ERR-UNAUTHORIZED` if the caller is not the administrator
    /// - `ERR-INVALID-TERMS` unless `coverage_limit >= deductible >= 0`,
    ///   the premium is positive and the duration is at least one day
    pub fn add_policy<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        holder: Principal,
        terms: PolicyTerms,
    ) -> Result<PolicyId, LedgerError> {
        logged("add_policy", self.try_add_policy(store, ctx, holder, terms))
    }

    /// Replaces the identity allowed to review claims on a policy
    pub fn assign_reviewer<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
        reviewer: Principal,
    ) -> Result<(), LedgerError> {
        logged("assign_reviewer", self.try_assign_reviewer(store, ctx, policy_id, reviewer))
    }

    /// Deactivates a policy; claims already submitted keep their lifecycle
    pub fn deactivate_policy<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
    ) -> Result<(), LedgerError> {
        logged("deactivate_policy", self.try_deactivate_policy(store, ctx, policy_id))
    }

    /// The holder pays one premium installment into the treasury
    pub fn pay_premium<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
    ) -> Result<Money, LedgerError> {
        logged("pay_premium", self.try_pay_premium(store, ctx, policy_id))
    }

    /// Adds funds to the treasury; returns the new available balance
    pub fn fund_pool<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        amount: Money,
    ) -> Result<Money, LedgerError> {
        logged("fund_pool", self.try_fund_pool(store, ctx, amount))
    }

    // ========================================================================
    // Claim lifecycle
    // ========================================================================

    /// Submits a claim on behalf of the caller
    ///
    /// # Errors
    ///
    /// - `ERR-NOT-FOUND` for an unknown policy
    /// - `ERR-POLICY-INACTIVE` if the policy is deactivated or
    ///   `incident_date` falls outside its coverage window
    /// - `ERR-INVALID-TERMS` for a non-positive amount, wrong currency, or
    ///   an empty or over-long description
    /// - `ERR-INSUFFICIENT-COVERAGE` if `amount` exceeds the coverage limit
    pub fn submit_claim<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
        amount: Money,
        description: impl Into<String>,
        incident_date: DateTime<Utc>,
    ) -> Result<ClaimId, LedgerError> {
        let description = description.into();
        logged(
            "submit_claim",
            self.try_submit_claim(store, ctx, policy_id, amount, description, incident_date),
        )
    }

    /// Approves or denies a submitted claim
    ///
    /// The caller must be the policy's reviewer or the administrator. An
    /// approval needs `0 < settlement <= coverage limit` and
    /// `settlement <= amount requested`.
    pub fn review_claim<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
        decision: ReviewDecision,
    ) -> Result<ClaimStatus, LedgerError> {
        logged("review_claim", self.try_review_claim(store, ctx, claim_id, decision))
    }

    /// Attaches a content digest to an open claim
    ///
    /// Allowed for the claimant, the policy reviewer and the administrator,
    /// while the claim is Submitted or Approved.
    pub fn add_evidence<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
        evidence_type: impl Into<String>,
        content_hash: impl Into<String>,
    ) -> Result<EvidenceId, LedgerError> {
        logged(
            "add_evidence",
            self.try_add_evidence(store, ctx, claim_id, evidence_type.into(), content_hash.into()),
        )
    }

    /// Pays an approved claim and closes it
    ///
    /// Debits `settlement - deductible` (floored at zero) from the treasury
    /// and credits it to the claimant.
    ///
    /// # Errors
    ///
    /// - `ERR-ALREADY-PAID` if the claim was paid before; nothing changes
    /// - `ERR-INVALID-STATUS` for any other status than Approved
    /// - `ERR-INSUFFICIENT-FUNDS` if the treasury cannot cover the net payment
    pub fn process_payment<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
    ) -> Result<Money, LedgerError> {
        logged("process_payment", self.try_process_payment(store, ctx, claim_id))
    }

    /// Reports whether a claim could be paid right now, without changing anything
    ///
    /// A claim with no settlement yet is evaluated against a zero net payment.
    pub fn can_process<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        claim_id: ClaimId,
    ) -> Result<Processability, LedgerError> {
        let claim = load_claim(store, claim_id)?;
        let policy = load_policy(store, claim.policy_id)?;

        let net = match claim.settlement_amount {
            Some(settlement) => net_payment(&settlement, &policy.deductible())?,
            None => Money::zero(self.config.currency),
        };
        let sufficient_funds = self.load_treasury(store)?.can_cover(&net)?;
        let status_approved = claim.status == ClaimStatus::Approved;

        debug!(
            claim_id = %claim_id,
            status_approved,
            sufficient_funds,
            "Processability checked"
        );
        Ok(Processability::new(status_approved, sufficient_funds, net))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn policy<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        policy_id: PolicyId,
    ) -> Result<Policy, LedgerError> {
        load_policy(store, policy_id)
    }

    /// True if the policy exists, is not deactivated and covers `at`
    pub fn is_policy_active<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        policy_id: PolicyId,
        at: DateTime<Utc>,
    ) -> Result<bool, LedgerError> {
        Ok(load_policy(store, policy_id)?.is_active_at(at))
    }

    pub fn claim<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        claim_id: ClaimId,
    ) -> Result<Claim, LedgerError> {
        load_claim(store, claim_id)
    }

    pub fn evidence<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        claim_id: ClaimId,
        evidence_id: EvidenceId,
    ) -> Result<Evidence, LedgerError> {
        store
            .get_evidence(claim_id, evidence_id)?
            .ok_or_else(|| {
                LedgerError::not_found("Evidence", format!("{} on {}", evidence_id, claim_id))
            })
    }

    pub fn list_evidence<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        claim_id: ClaimId,
    ) -> Result<Vec<Evidence>, LedgerError> {
        load_claim(store, claim_id)?;
        Ok(store.list_evidence(claim_id)?)
    }

    /// Number of claims ever submitted
    pub fn claim_count<S: LedgerStore + ?Sized>(&self, store: &S) -> Result<u64, LedgerError> {
        Ok(store.last_claim_id()?.map(|id| id.value()).unwrap_or(0))
    }

    pub fn available_funds<S: LedgerStore + ?Sized>(&self, store: &S) -> Result<Money, LedgerError> {
        Ok(self.load_treasury(store)?.available_funds)
    }

    pub fn treasury<S: LedgerStore + ?Sized>(&self, store: &S) -> Result<Treasury, LedgerError> {
        self.load_treasury(store)
    }

    /// Total paid out to `principal` across all claims
    pub fn claimant_credit<S: LedgerStore + ?Sized>(
        &self,
        store: &S,
        principal: &Principal,
    ) -> Result<Money, LedgerError> {
        Ok(store
            .credit_of(principal)?
            .unwrap_or_else(|| Money::zero(self.config.currency)))
    }

    // ========================================================================
    // Operation bodies, validated in full before the single commit
    // ========================================================================

    fn try_add_policy<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        holder: Principal,
        terms: PolicyTerms,
    ) -> Result<PolicyId, LedgerError> {
        self.require_administrator(ctx, "add policies")?;
        terms.validate(self.config.currency)?;

        let policy_id = store
            .last_policy_id()?
            .map(|id| id.next())
            .unwrap_or(PolicyId::FIRST);
        let policy = Policy::issue(policy_id, holder, terms, ctx.caller.clone(), ctx.now)?;

        let event = ClaimsEvent::PolicyAdded {
            policy_id,
            holder: policy.holder.clone(),
            coverage_limit: policy.coverage_limit(),
            deductible: policy.deductible(),
            expiry: policy.expiry(),
            timestamp: ctx.now,
        };
        store.commit(
            WriteBatch::new()
                .put_policy(policy)
                .allocate_policy_id(policy_id)
                .emit(event),
        )?;

        info!(policy_id = %policy_id, "Policy added");
        Ok(policy_id)
    }

    fn try_assign_reviewer<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
        reviewer: Principal,
    ) -> Result<(), LedgerError> {
        self.require_administrator(ctx, "assign reviewers")?;
        let mut policy = load_policy(store, policy_id)?;

        policy.reviewer = reviewer.clone();
        policy.updated_at = ctx.now;

        store.commit(WriteBatch::new().put_policy(policy).emit(
            ClaimsEvent::ReviewerAssigned {
                policy_id,
                reviewer: reviewer.clone(),
                timestamp: ctx.now,
            },
        ))?;

        info!(policy_id = %policy_id, reviewer = %reviewer, "Reviewer assigned");
        Ok(())
    }

    fn try_deactivate_policy<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
    ) -> Result<(), LedgerError> {
        self.require_administrator(ctx, "deactivate policies")?;
        let mut policy = load_policy(store, policy_id)?;
        if !policy.active {
            debug!(policy_id = %policy_id, "Policy already inactive");
            return Ok(());
        }

        policy.deactivate(ctx.now);
        store.commit(WriteBatch::new().put_policy(policy).emit(
            ClaimsEvent::PolicyDeactivated {
                policy_id,
                timestamp: ctx.now,
            },
        ))?;

        info!(policy_id = %policy_id, "Policy deactivated");
        Ok(())
    }

    fn try_pay_premium<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
    ) -> Result<Money, LedgerError> {
        let mut policy = load_policy(store, policy_id)?;
        if policy.holder != ctx.caller {
            return Err(LedgerError::unauthorized(&ctx.caller, "pay premiums on this policy"));
        }
        if !policy.is_active_at(ctx.now) {
            return Err(LedgerError::PolicyInactive(policy_id.to_string()));
        }

        let premium = policy.terms.premium_amount;
        let mut treasury = self.load_treasury(store)?;
        treasury.receive_premium(&premium)?;
        policy.record_premium(premium, ctx.now)?;

        store.commit(
            WriteBatch::new()
                .put_policy(policy)
                .put_treasury(treasury)
                .emit(ClaimsEvent::PremiumPaid {
                    policy_id,
                    amount: premium,
                    timestamp: ctx.now,
                }),
        )?;

        info!(policy_id = %policy_id, amount = %premium, "Premium paid");
        Ok(premium)
    }

    fn try_fund_pool<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        amount: Money,
    ) -> Result<Money, LedgerError> {
        amount.ensure_currency(self.config.currency)?;
        if !amount.is_positive() {
            return Err(LedgerError::invalid_terms("contribution must be positive"));
        }

        let mut treasury = self.load_treasury(store)?;
        treasury.receive_contribution(&amount)?;
        let available = treasury.available_funds;

        store.commit(WriteBatch::new().put_treasury(treasury).emit(
            ClaimsEvent::PoolFunded {
                contributor: ctx.caller.clone(),
                amount,
                timestamp: ctx.now,
            },
        ))?;

        info!(contributor = %ctx.caller, amount = %amount, available = %available, "Pool funded");
        Ok(available)
    }

    fn try_submit_claim<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        policy_id: PolicyId,
        amount: Money,
        description: String,
        incident_date: DateTime<Utc>,
    ) -> Result<ClaimId, LedgerError> {
        let mut policy = load_policy(store, policy_id)?;
        if !policy.is_active_at(incident_date) {
            return Err(LedgerError::PolicyInactive(policy_id.to_string()));
        }

        amount.ensure_currency(self.config.currency)?;
        if !amount.is_positive() {
            return Err(LedgerError::invalid_terms("claim amount must be positive"));
        }
        self.validate_description(&description)?;

        let limit = policy.coverage_limit();
        if amount.checked_cmp(&limit)? == Ordering::Greater {
            return Err(LedgerError::InsufficientCoverage {
                requested: amount.to_string(),
                limit: limit.to_string(),
            });
        }

        let claim_id = store
            .last_claim_id()?
            .map(|id| id.next())
            .unwrap_or(ClaimId::FIRST);
        let claim = Claim::submit(
            claim_id,
            policy_id,
            ctx.caller.clone(),
            amount,
            description.clone(),
            incident_date,
            ctx.now,
        );
        policy.record_claim(ctx.now);

        store.commit(
            WriteBatch::new()
                .put_claim(claim)
                .put_policy(policy)
                .allocate_claim_id(claim_id)
                .emit(ClaimsEvent::ClaimSubmitted {
                    claim_id,
                    policy_id,
                    claimant: ctx.caller.clone(),
                    amount,
                    timestamp: ctx.now,
                }),
        )?;

        info!(claim_id = %claim_id, policy_id = %policy_id, amount = %amount, "Claim submitted");
        Ok(claim_id)
    }

    fn try_review_claim<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
        decision: ReviewDecision,
    ) -> Result<ClaimStatus, LedgerError> {
        let mut claim = load_claim(store, claim_id)?;
        let policy = load_policy(store, claim.policy_id)?;
        self.require_reviewer(&policy, ctx, "review claims on this policy")?;
        claim.ensure_status(ClaimStatus::Submitted)?;

        if let ReviewDecision::Approve { settlement } = decision {
            self.validate_settlement(&settlement, &claim, &policy)?;
        }
        claim.apply_review(decision, ctx.caller.clone(), ctx.now)?;
        let status = claim.status;

        let event = match decision {
            ReviewDecision::Approve { settlement } => ClaimsEvent::ClaimApproved {
                claim_id,
                reviewer: ctx.caller.clone(),
                settlement_amount: settlement,
                timestamp: ctx.now,
            },
            ReviewDecision::Deny => ClaimsEvent::ClaimDenied {
                claim_id,
                reviewer: ctx.caller.clone(),
                timestamp: ctx.now,
            },
        };
        store.commit(WriteBatch::new().put_claim(claim).emit(event))?;

        info!(claim_id = %claim_id, status = %status, reviewer = %ctx.caller, "Claim reviewed");
        Ok(status)
    }

    fn try_add_evidence<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
        evidence_type: String,
        content_hash: String,
    ) -> Result<EvidenceId, LedgerError> {
        let mut claim = load_claim(store, claim_id)?;
        let policy = load_policy(store, claim.policy_id)?;
        if claim.claimant != ctx.caller {
            self.require_reviewer(&policy, ctx, "add evidence to this claim")?;
        }
        if !claim.status.accepts_evidence() {
            return Err(LedgerError::ClaimClosed(claim_id.to_string()));
        }
        if claim.evidence.len() >= self.config.max_evidence_per_claim {
            return Err(LedgerError::invalid_terms(format!(
                "claim already holds the maximum of {} evidence records",
                self.config.max_evidence_per_claim
            )));
        }

        let evidence_id = claim.next_evidence_id();
        let evidence = Evidence::new(
            evidence_id,
            claim_id,
            evidence_type.clone(),
            content_hash.clone(),
            ctx.caller.clone(),
            ctx.now,
        )?;
        claim.attach_evidence(evidence_id, ctx.now);

        store.commit(
            WriteBatch::new()
                .put_evidence(evidence)
                .put_claim(claim)
                .emit(ClaimsEvent::EvidenceAdded {
                    claim_id,
                    evidence_id,
                    evidence_type: evidence_type.clone(),
                    timestamp: ctx.now,
                }),
        )?;

        info!(claim_id = %claim_id, evidence_id = %evidence_id, "Evidence added");
        Ok(evidence_id)
    }

    fn try_process_payment<S: LedgerStore + ?Sized>(
        &self,
        store: &mut S,
        ctx: &CallContext,
        claim_id: ClaimId,
    ) -> Result<Money, LedgerError> {
        let mut claim = load_claim(store, claim_id)?;
        let policy = load_policy(store, claim.policy_id)?;
        self.require_reviewer(&policy, ctx, "process payments on this policy")?;
        if claim.status == ClaimStatus::Paid {
            return Err(LedgerError::AlreadyPaid(claim_id.to_string()));
        }
        claim.ensure_status(ClaimStatus::Approved)?;

        // approval always records a settlement; its absence means corrupt state
        let settlement = claim.settlement_amount.ok_or_else(|| {
            LedgerError::Storage(PortError::internal(format!(
                "{} is approved without a settlement amount",
                claim_id
            )))
        })?;
        let net = net_payment(&settlement, &policy.deductible())?;

        let mut treasury = self.load_treasury(store)?;
        if !treasury.can_cover(&net)? {
            return Err(LedgerError::InsufficientFunds {
                required: net.to_string(),
                available: treasury.available_funds.to_string(),
            });
        }
        treasury.disburse(&net)?;

        let credit = store
            .credit_of(&claim.claimant)?
            .unwrap_or_else(|| Money::zero(self.config.currency))
            .checked_add(&net)?;
        claim.mark_paid(ctx.now)?;
        let claimant = claim.claimant.clone();

        store.commit(
            WriteBatch::new()
                .put_claim(claim)
                .put_treasury(treasury)
                .put_credit(claimant.clone(), credit)
                .emit(ClaimsEvent::ClaimPaid {
                    claim_id,
                    claimant: claimant.clone(),
                    net_payment: net,
                    timestamp: ctx.now,
                }),
        )?;

        info!(claim_id = %claim_id, claimant = %claimant, net_payment = %net, "Claim paid");
        Ok(net)
    }


    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn load_treasury<S: LedgerStore + ?Sized>(&self, store: &S) -> Result<Treasury, LedgerError> {
        Ok(store
            .treasury()?
            .unwrap_or_else(|| Treasury::empty(self.config.currency)))
    }

    fn require_administrator(&self, ctx: &CallContext, action: &str) -> Result<(), LedgerError> {
        if !self.config.is_administrator(&ctx.caller) {
            return Err(LedgerError::unauthorized(&ctx.caller, action));
        }
        Ok(())
    }

    fn require_reviewer(
        &self,
        policy: &Policy,
        ctx: &CallContext,
        action: &str,
    ) -> Result<(), LedgerError> {
        if policy.reviewer != ctx.caller && !self.config.is_administrator(&ctx.caller) {
            return Err(LedgerError::unauthorized(&ctx.caller, action));
        }
        Ok(())
    }

    fn validate_description(&self, description: &str) -> Result<(), LedgerError> {
        if description.trim().is_empty() {
            return Err(LedgerError::invalid_terms("description must not be empty"));
        }
        let length = description.chars().count();
        if length > self.config.max_description_len {
            return Err(LedgerError::invalid_terms(format!(
                "description is {} characters, limit is {}",
                length, self.config.max_description_len
            )));
        }
        Ok(())
    }

    fn validate_settlement(
        &self,
        settlement: &Money,
        claim: &Claim,
        policy: &Policy,
    ) -> Result<(), LedgerError> {
        settlement.ensure_currency(self.config.currency)?;
        if !settlement.is_positive() {
            return Err(LedgerError::SettlementExceedsLimit(
                "settlement must be positive".to_string(),
            ));
        }
        if settlement.checked_cmp(&policy.coverage_limit())? == Ordering::Greater {
            return Err(LedgerError::SettlementExceedsLimit(format!(
                "{} is above coverage limit {}",
                settlement,
                policy.coverage_limit()
            )));
        }
        if settlement.checked_cmp(&claim.amount_requested)? == Ordering::Greater {
            return Err(LedgerError::SettlementExceedsLimit(format!(
                "{} is above requested amount {}",
                settlement, claim.amount_requested
            )));
        }
        Ok(())
    }
}

fn load_policy<S: LedgerStore + ?Sized>(store: &S, id: PolicyId) -> Result<Policy, LedgerError> {
    store
        .get_policy(id)?
        .ok_or_else(|| LedgerError::not_found("Policy", id))
}

fn load_claim<S: LedgerStore + ?Sized>(store: &S, id: ClaimId) -> Result<Claim, LedgerError> {
    store
        .get_claim(id)?
        .ok_or_else(|| LedgerError::not_found("Claim", id))
}

/// Logs a rejected operation with its taxonomy code
fn logged<T>(operation: &'static str, result: Result<T, LedgerError>) -> Result<T, LedgerError> {
    if let Err(error) = &result {
        warn!(operation, code = error.code(), error = %error, "Ledger operation rejected");
    }
    result
}
