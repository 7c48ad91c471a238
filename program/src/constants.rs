//! Program constants
//!
//! Sizes and seeds that are fixed for the lifetime of a deployment. The chest
//! table length is baked into every account layout, so changing it requires a
//! fresh registry.

/// Number of chests (payout tiers) in the table.
///
/// Chest indices run from `0` to [`MAX_CHEST_INDEX`] inclusive. Participant
/// accounts reserve one in-tier counter per chest.
pub const CHEST_COUNT: usize = 8;

/// Highest addressable chest index, reported in every out-of-range failure.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_CHEST_INDEX: u8 = (CHEST_COUNT - 1) as u8;

// `ReferralError::InvalidTierIndex` spells the last index out in its message
const _: () = assert!(MAX_CHEST_INDEX == 7);

/// Default referral thresholds, one per chest.
///
/// Each chest needs three times as many referrals as the one before it,
/// starting at three for the first chest.
pub const DEFAULT_REFERRALS_TO_UNLOCK: [u32; CHEST_COUNT] = [3, 9, 27, 81, 243, 729, 2187, 6561];

/// PDA seed for the program-wide registry (and treasury) account.
pub const REGISTRY_SEED: &[u8] = b"registry";

/// PDA seed prefix for participant accounts: `["participant", owner]`.
pub const PARTICIPANT_SEED: &[u8] = b"participant";
