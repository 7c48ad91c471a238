//! Off-chain preview of a join
//!
//! Runs the program's own settlement on copies of fetched accounts, so a
//! quote fails with the same error the transaction would and reports the
//! exact refund and payout. Prices are not reserved: a payout change landing
//! before the join changes the outcome.

use crate::error::Result;
use anchor_lang::prelude::Pubkey;
use referral_chests::settlement::{settle_join, JoinRequest};
use referral_chests::state::{Participant, ReferralStep, Registry};
use serde::Serialize;

/// Expected outcome of a join
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct JoinQuote {
    /// The joining participant
    pub joiner: Pubkey,
    /// Sponsor the join is counted against; pass this as the sponsor wallet
    pub sponsor: Pubkey,
    /// Whether the join registers the joiner
    pub first_join: bool,
    /// Sponsor's chest whose price applies, `None` when nothing is charged
    /// because the repeat join only confirms the sponsor
    pub chest_index: Option<u8>,
    /// Lamports the registry keeps
    pub price_lamports: u64,
    /// Lamports returned to the joiner
    pub refund_lamports: u64,
    /// Whether the join unlocks the sponsor's chest
    pub unlocks_chest: bool,
    /// Lamports released to the sponsor
    pub payout_lamports: u64,
    /// Sponsor's tier after the join
    pub sponsor_tier: u8,
    /// Sponsor's in-tier counter after the join
    pub sponsor_in_tier_count: u32,
}

/// Sponsor a join would be counted against: the recorded sponsor if the
/// joiner has one, the proposal otherwise
#[must_use]
pub fn effective_sponsor(joiner_record: Option<&Participant>, proposed_sponsor: &Pubkey) -> Pubkey {
    joiner_record
        .and_then(Participant::current_sponsor)
        .unwrap_or(*proposed_sponsor)
}

/// Preview a join against fetched account state
///
/// `sponsor_record` must belong to
/// [`effective_sponsor`]`(joiner_record, proposed_sponsor)`; `None` stands for
/// an identity without a record.
///
/// # Errors
/// Returns the program error the join would fail with.
pub fn quote_join(
    registry: &Registry,
    joiner: &Pubkey,
    joiner_record: Option<&Participant>,
    sponsor_record: Option<&Participant>,
    proposed_sponsor: &Pubkey,
    paid_lamports: u64,
) -> Result<JoinQuote> {
    let sponsor = effective_sponsor(joiner_record, proposed_sponsor);

    let mut registry = registry.clone();
    let mut joiner_state = joiner_record
        .cloned()
        .unwrap_or_else(|| Participant::blank(*joiner));
    let mut sponsor_state = sponsor_record
        .cloned()
        .unwrap_or_else(|| Participant::blank(sponsor));
    let chest_before = sponsor_state.tier;

    let settlement = settle_join(
        &mut registry,
        &mut joiner_state,
        &mut sponsor_state,
        &JoinRequest {
            joiner: *joiner,
            sponsor_account: sponsor,
            proposed_sponsor: *proposed_sponsor,
            paid_lamports,
        },
    )?;

    Ok(JoinQuote {
        joiner: *joiner,
        sponsor,
        first_join: settlement.first_join,
        chest_index: settlement.step.map(|_| chest_before),
        price_lamports: settlement.price_lamports,
        refund_lamports: settlement.refund_lamports,
        unlocks_chest: matches!(settlement.step, Some(ReferralStep::Unlocked { .. })),
        payout_lamports: settlement.payout_lamports(),
        sponsor_tier: sponsor_state.tier,
        sponsor_in_tier_count: sponsor_state.current_in_tier_count(),
    })
}
