use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::constants::{CHEST_COUNT, MAX_CHEST_INDEX};
use crate::errors::ReferralError;

/// One slot of the chest table
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct Chest {
    /// Lamports a joiner pays while the sponsor sits on this chest, and the
    /// amount released to the sponsor when the chest is unlocked
    pub payout_lamports: u64, // 8 bytes
    /// Referrals that fill this chest; the next one unlocks it
    pub referrals_to_unlock: u32, // 4 bytes
}

/// What a `join` from an already-registered participant does
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum RepeatJoinPolicy {
    /// Charge the current price again and count the join against the stored sponsor
    Recount,
    /// Only confirm the stored sponsor: the full payment is refunded and no counter moves
    ConfirmOnly,
}

/// Program-wide registry: administrator, chest table and treasury bookkeeping
/// PDA seeds: `["registry"]`
///
/// The account doubles as the treasury. Its lamport balance is its rent-exempt
/// reserve plus `retained_lamports`.
#[account]
#[derive(Debug, InitSpace)]
pub struct Registry {
    /// Administrator allowed to change chest payouts (fixed at initialization)
    pub admin: Pubkey, // 32 bytes
    /// The chest table
    pub chests: [Chest; CHEST_COUNT], // 8 * 12 bytes
    /// Behaviour of repeat joins
    pub repeat_join_policy: RepeatJoinPolicy, // 1 byte
    /// Lamports held for future payouts
    pub retained_lamports: u64, // 8 bytes
    /// Lamports kept from join payments since initialization
    pub total_collected_lamports: u64, // 8 bytes
    /// Lamports returned to joiners as overpayment refunds
    pub total_refunded_lamports: u64, // 8 bytes
    /// Lamports released to sponsors by chest unlocks
    pub total_paid_out_lamports: u64, // 8 bytes
    /// Number of participants with a sponsor on record
    pub participant_count: u64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

/// Per-identity referral state
/// PDA seeds: `["participant", owner]`
///
/// A record exists either because its owner joined, or because someone named
/// the owner as sponsor and the counters needed a home. Only the first case
/// registers the owner; see [`Participant::is_registered`].
#[account]
#[derive(Debug, InitSpace)]
pub struct Participant {
    /// Identity this record belongs to
    pub owner: Pubkey, // 32 bytes
    /// Sponsor recorded on first join, never rewritten
    pub sponsor: Option<Pubkey>, // 33 bytes
    /// Current chest index; equals `CHEST_COUNT` once every chest is unlocked
    pub tier: u8, // 1 byte
    /// In-tier referral counters, one per chest. Entries below `tier` are
    /// frozen at the chest threshold.
    pub tier_counts: [u32; CHEST_COUNT], // 8 * 4 bytes
    /// Lamports received from chest unlocks
    pub total_payout_lamports: u64, // 8 bytes
    /// PDA bump seed
    pub bump: u8, // 1 byte
}

/// Effect of one referral on a sponsor's counters
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferralStep {
    /// The referral was counted against the sponsor's current chest
    Counted { tier: u8, in_tier_count: u32 },
    /// The current chest was already full: it unlocks, pays out, and the
    /// referral becomes the first one of the next chest
    Unlocked {
        chest_index: u8,
        next_tier: u8,
        payout_lamports: u64,
    },
}

impl ReferralStep {
    /// Lamports released to the sponsor by this step
    #[must_use]
    pub const fn payout_lamports(&self) -> u64 {
        match self {
            Self::Counted { .. } => 0,
            Self::Unlocked {
                payout_lamports, ..
            } => *payout_lamports,
        }
    }
}

pub(crate) fn invalid_chest_index() -> Error {
    msg!("Chest total is {}", MAX_CHEST_INDEX);
    error!(ReferralError::InvalidTierIndex)
}

impl Registry {
    /// Total space: 8 (discriminator) + 32 + 96 + 1 + 8 + 8 + 8 + 8 + 8 + 1 = 178 bytes
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// Build a fresh registry with zero payouts and the given thresholds
    ///
    /// # Errors
    /// Returns `InvalidThreshold` if any chest would need zero referrals.
    pub fn new(
        admin: Pubkey,
        referrals_to_unlock: [u32; CHEST_COUNT],
        repeat_join_policy: RepeatJoinPolicy,
        bump: u8,
    ) -> Result<Self> {
        require!(
            referrals_to_unlock.iter().all(|&count| count > 0),
            ReferralError::InvalidThreshold
        );

        Ok(Self {
            admin,
            chests: referrals_to_unlock.map(|referrals_to_unlock| Chest {
                payout_lamports: 0,
                referrals_to_unlock,
            }),
            repeat_join_policy,
            retained_lamports: 0,
            total_collected_lamports: 0,
            total_refunded_lamports: 0,
            total_paid_out_lamports: 0,
            participant_count: 0,
            bump,
        })
    }

    /// Fail with `Unauthorized` unless `caller` is the administrator
    pub fn ensure_admin(&self, caller: &Pubkey) -> Result<()> {
        require_keys_eq!(*caller, self.admin, ReferralError::Unauthorized);
        Ok(())
    }

    /// Look up a chest by index
    ///
    /// # Errors
    /// Returns `InvalidTierIndex` for indices past [`MAX_CHEST_INDEX`].
    pub fn chest(&self, index: u8) -> Result<&Chest> {
        self.chests
            .get(usize::from(index))
            .ok_or_else(invalid_chest_index)
    }

    /// Overwrite a chest's payout, returning the previous value
    ///
    /// The threshold of the chest is left untouched.
    ///
    /// # Errors
    /// Returns `Unauthorized` if `caller` is not the administrator, then
    /// `InvalidTierIndex` if `index` is out of range.
    pub fn set_payout(&mut self, caller: &Pubkey, index: u8, payout_lamports: u64) -> Result<u64> {
        self.ensure_admin(caller)?;

        let chest = self
            .chests
            .get_mut(usize::from(index))
            .ok_or_else(invalid_chest_index)?;
        let previous = chest.payout_lamports;
        chest.payout_lamports = payout_lamports;
        Ok(previous)
    }
}

/// Fail unless a never-funded wallet could receive `payout_lamports` and end
/// up rent exempt
///
/// Payouts land on plain sponsor wallets, which may hold no lamports at all.
/// The runtime rejects any transaction leaving such a wallet with a nonzero
/// balance below the rent-exempt minimum, so a smaller payout would wedge
/// every sponsor on that chest.
///
/// # Errors
/// Returns `PayoutBelowRentMinimum` for a nonzero payout below
/// `rent.minimum_balance(0)`.
pub fn ensure_payout_receivable(payout_lamports: u64, rent: &Rent) -> Result<()> {
    require!(
        payout_lamports == 0 || payout_lamports >= rent.minimum_balance(0),
        ReferralError::PayoutBelowRentMinimum
    );
    Ok(())
}

impl Participant {
    /// Total space: 8 (discriminator) + 32 + 33 + 1 + 32 + 8 + 1 = 115 bytes
    pub const SPACE: usize = 8 + Self::INIT_SPACE;

    /// The state of an identity nobody has joined under or as: no sponsor,
    /// tier 0, empty counters
    #[must_use]
    pub const fn blank(owner: Pubkey) -> Self {
        Self {
            owner,
            sponsor: None,
            tier: 0,
            tier_counts: [0; CHEST_COUNT],
            total_payout_lamports: 0,
            bump: 0,
        }
    }

    /// Stamp owner and bump onto a freshly allocated record
    ///
    /// Records that already carry an owner are left alone.
    pub fn claim(&mut self, owner: Pubkey, bump: u8) {
        if self.owner == Pubkey::default() {
            self.owner = owner;
            self.bump = bump;
        }
    }

    /// Whether the owner has joined (has a sponsor on record)
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.sponsor.is_some()
    }

    /// The owner's sponsor, `None` while unregistered
    #[must_use]
    pub const fn current_sponsor(&self) -> Option<Pubkey> {
        self.sponsor
    }

    /// Whether every chest has been unlocked
    #[must_use]
    pub const fn has_completed_table(&self) -> bool {
        self.tier as usize >= CHEST_COUNT
    }

    /// Referral counter recorded for `tier`
    ///
    /// Tiers below the current one report their frozen final value; tiers
    /// above report zero.
    ///
    /// # Errors
    /// Returns `InvalidTierIndex` for tiers past [`MAX_CHEST_INDEX`].
    pub fn in_tier_count(&self, tier: u8) -> Result<u32> {
        self.tier_counts
            .get(usize::from(tier))
            .copied()
            .ok_or_else(invalid_chest_index)
    }

    /// Counter of the current tier, zero once the table is completed
    #[must_use]
    pub fn current_in_tier_count(&self) -> u32 {
        self.tier_counts
            .get(usize::from(self.tier))
            .copied()
            .unwrap_or_default()
    }

    /// Work out what one more referral does to this sponsor without mutating
    ///
    /// The counter is incremented first and compared after: a referral that
    /// reaches the threshold is an ordinary member of the chest, and only the
    /// one after it unlocks the chest.
    ///
    /// # Errors
    /// Returns `InvalidTierIndex` if the sponsor has completed the table, or
    /// `ArithmeticError` on counter overflow.
    pub fn preview_referral(&self, chest: &Chest) -> Result<ReferralStep> {
        let current = self.in_tier_count(self.tier)?;
        let next = current
            .checked_add(1)
            .ok_or(ReferralError::ArithmeticError)?;

        if next <= chest.referrals_to_unlock {
            return Ok(ReferralStep::Counted {
                tier: self.tier,
                in_tier_count: next,
            });
        }

        let next_tier = self
            .tier
            .checked_add(1)
            .ok_or(ReferralError::ArithmeticError)?;
        Ok(ReferralStep::Unlocked {
            chest_index: self.tier,
            next_tier,
            payout_lamports: chest.payout_lamports,
        })
    }

    /// Commit a step previously produced by [`Participant::preview_referral`]
    pub fn apply_referral(&mut self, step: ReferralStep) {
        match step {
            ReferralStep::Counted {
                tier,
                in_tier_count,
            } => {
                if let Some(slot) = self.tier_counts.get_mut(usize::from(tier)) {
                    *slot = in_tier_count;
                }
            }
            ReferralStep::Unlocked {
                next_tier,
                payout_lamports,
                ..
            } => {
                self.tier = next_tier;
                // No slot exists past the last chest
                if let Some(slot) = self.tier_counts.get_mut(usize::from(next_tier)) {
                    *slot = 1;
                }
                self.total_payout_lamports =
                    self.total_payout_lamports.saturating_add(payout_lamports);
            }
        }
    }
}
