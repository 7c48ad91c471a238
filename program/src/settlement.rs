//! Join settlement
//!
//! The full referral state machine for one `join`, expressed over plain
//! account structs so it can be exercised without the runtime. The
//! instruction handler only moves lamports according to the returned
//! [`JoinSettlement`].
//!
//! Every check runs before the first write: an `Err` leaves the registry and
//! both participant records exactly as they were.

use anchor_lang::prelude::*;

use crate::errors::ReferralError;
use crate::state::{Participant, ReferralStep, Registry, RepeatJoinPolicy};

/// Inputs of a join that do not live in accounts
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinRequest {
    /// Identity of the joining participant (the signer)
    pub joiner: Pubkey,
    /// Wallet supplied as the sponsor account of the instruction
    pub sponsor_account: Pubkey,
    /// Sponsor the joiner asks for; ignored once a sponsor is on record
    pub proposed_sponsor: Pubkey,
    /// Lamports attached to the join
    pub paid_lamports: u64,
}

/// Fund movements and state change decided for one join
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinSettlement {
    /// The joiner's sponsor after the join
    pub sponsor: Pubkey,
    /// Whether this join registered the joiner
    pub first_join: bool,
    /// Lamports kept by the registry
    pub price_lamports: u64,
    /// Lamports returned to the joiner
    pub refund_lamports: u64,
    /// Effect on the sponsor; `None` when a repeat join only confirmed the sponsor
    pub step: Option<ReferralStep>,
}

impl JoinSettlement {
    /// Lamports released to the sponsor by this join
    #[must_use]
    pub fn payout_lamports(&self) -> u64 {
        self.step
            .as_ref()
            .map_or(0, ReferralStep::payout_lamports)
    }
}

/// Value returned by the `join` instruction
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoinReceipt {
    /// The joiner's sponsor
    pub sponsor: Pubkey,
    /// The joiner's own current tier
    pub tier: u8,
    /// The joiner's own referral counter for that tier
    pub in_tier_count: u32,
    /// Overpayment returned to the joiner
    pub refund_lamports: u64,
    /// Lamports released to the sponsor by this join
    pub payout_lamports: u64,
}

impl JoinReceipt {
    #[must_use]
    pub fn new(settlement: &JoinSettlement, joiner: &Participant) -> Self {
        Self {
            sponsor: settlement.sponsor,
            tier: joiner.tier,
            in_tier_count: joiner.current_in_tier_count(),
            refund_lamports: settlement.refund_lamports,
            payout_lamports: settlement.payout_lamports(),
        }
    }
}

/// Settle one join against the registry and the two participant records
///
/// `sponsor` must be the record of `request.sponsor_account`.
///
/// # Errors
/// - `SelfSponsorship` if the effective sponsor is the joiner
/// - `SponsorMismatch` if `request.sponsor_account` is not the effective sponsor
/// - `ReferralCycle` if a new joiner proposes a sponsor that the joiner referred
/// - `InvalidTierIndex` if the sponsor has already unlocked every chest
/// - `InsufficientPayment` if `paid_lamports` is below the chest payout
/// - `ArithmeticError` on counter or balance overflow
pub fn settle_join(
    registry: &mut Registry,
    joiner: &mut Participant,
    sponsor: &mut Participant,
    request: &JoinRequest,
) -> Result<JoinSettlement> {
    let first_join = !joiner.is_registered();
    // First sponsor wins: the proposal only counts while nothing is on record
    let effective_sponsor = joiner.sponsor.unwrap_or(request.proposed_sponsor);

    require_keys_neq!(
        effective_sponsor,
        request.joiner,
        ReferralError::SelfSponsorship
    );
    require_keys_eq!(
        request.sponsor_account,
        effective_sponsor,
        ReferralError::SponsorMismatch
    );
    if first_join {
        require!(
            sponsor.sponsor != Some(request.joiner),
            ReferralError::ReferralCycle
        );
    }

    let (price_lamports, step) =
        if !first_join && registry.repeat_join_policy == RepeatJoinPolicy::ConfirmOnly {
            (0, None)
        } else {
            let chest = *registry.chest(sponsor.tier)?;
            if request.paid_lamports < chest.payout_lamports {
                msg!(
                    "Insufficient payment: paid {} lamports, chest {} requires {}",
                    request.paid_lamports,
                    sponsor.tier,
                    chest.payout_lamports
                );
                return Err(ReferralError::InsufficientPayment.into());
            }
            (chest.payout_lamports, Some(sponsor.preview_referral(&chest)?))
        };

    let refund_lamports = request
        .paid_lamports
        .checked_sub(price_lamports)
        .ok_or(ReferralError::ArithmeticError)?;
    let payout_lamports = step.as_ref().map_or(0, ReferralStep::payout_lamports);

    // Compute every new total before touching state
    let retained_lamports = registry
        .retained_lamports
        .checked_add(price_lamports)
        .and_then(|retained| retained.checked_sub(payout_lamports))
        .ok_or(ReferralError::ArithmeticError)?;
    let total_collected_lamports = registry
        .total_collected_lamports
        .checked_add(price_lamports)
        .ok_or(ReferralError::ArithmeticError)?;
    let total_refunded_lamports = registry
        .total_refunded_lamports
        .checked_add(refund_lamports)
        .ok_or(ReferralError::ArithmeticError)?;
    let total_paid_out_lamports = registry
        .total_paid_out_lamports
        .checked_add(payout_lamports)
        .ok_or(ReferralError::ArithmeticError)?;
    let participant_count = if first_join {
        registry
            .participant_count
            .checked_add(1)
            .ok_or(ReferralError::ArithmeticError)?
    } else {
        registry.participant_count
    };

    registry.retained_lamports = retained_lamports;
    registry.total_collected_lamports = total_collected_lamports;
    registry.total_refunded_lamports = total_refunded_lamports;
    registry.total_paid_out_lamports = total_paid_out_lamports;
    registry.participant_count = participant_count;

    if let Some(step) = step {
        sponsor.apply_referral(step);
    }
    if first_join {
        joiner.sponsor = Some(effective_sponsor);
    }

    Ok(JoinSettlement {
        sponsor: effective_sponsor,
        first_join,
        price_lamports,
        refund_lamports,
        step,
    })
}
