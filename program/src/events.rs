use anchor_lang::prelude::*;

use crate::constants::CHEST_COUNT;
use crate::state::RepeatJoinPolicy;

/// Event emitted when the registry is created
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryInitialized {
    /// The registry PDA
    pub registry: Pubkey,
    /// Administrator allowed to change chest payouts
    pub admin: Pubkey,
    /// Referral thresholds of every chest, in chest order
    pub referrals_to_unlock: [u32; CHEST_COUNT],
    /// Behaviour of repeat joins
    pub repeat_join_policy: RepeatJoinPolicy,
}

/// Event emitted when the administrator changes a chest payout
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayoutUpdated {
    /// Index of the chest in the table
    pub chest_index: u8,
    /// Payout before the change (in lamports)
    pub old_payout_lamports: u64,
    /// Payout after the change (in lamports)
    pub new_payout_lamports: u64,
}

/// Event emitted for every successful join
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joined {
    /// The joining participant
    pub participant: Pubkey,
    /// The participant's sponsor (stored sponsor on repeat joins)
    pub sponsor: Pubkey,
    /// Whether this join registered the participant
    pub first_join: bool,
    /// Lamports attached to the join
    pub paid_lamports: u64,
    /// Lamports kept by the registry
    pub price_lamports: u64,
    /// Overpayment returned to the participant
    pub refund_lamports: u64,
    /// Sponsor's tier after the join
    pub sponsor_tier: u8,
    /// Sponsor's in-tier counter after the join
    pub sponsor_in_tier_count: u32,
}

/// Event emitted when an overflow join unlocks a sponsor's chest
#[event]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChestUnlocked {
    /// The sponsor receiving the payout
    pub sponsor: Pubkey,
    /// The join that caused the unlock
    pub participant: Pubkey,
    /// Index of the unlocked chest
    pub chest_index: u8,
    /// Lamports paid to the sponsor
    pub payout_lamports: u64,
    /// Tier the sponsor advanced to
    pub next_tier: u8,
}
