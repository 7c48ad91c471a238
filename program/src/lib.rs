//! Referral Chests Program
//!
//! A single-tree referral ledger. Every participant owns eight reward chests
//! that unlock in order as they sponsor new joiners. Each join pays the
//! current chest's price into the registry; once a participant has sponsored
//! enough joins on their current chest the registry pays that chest out to
//! them and they move on to the next one.
//!
//! ## Core Features
//! - Registry creation by the program upgrade authority
//! - Per-chest payouts tunable by the administrator
//! - Joins with exact refunds of any overpayment
//! - Tier advancement and chest payouts to the sponsor
//! - Read-only queries served through return data

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(unexpected_cfgs)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::needless_pass_by_value)] // Anchor handlers must take owned Context
#![allow(deprecated)] // Anchor framework uses deprecated AccountInfo::realloc internally

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
mod init_registry;
mod join;
mod queries;
mod set_payout;
pub mod settlement;
pub mod state;

use init_registry::*;
use join::*;
use queries::*;
use set_payout::*;

pub use init_registry::InitRegistryArgs;
pub use join::JoinArgs;
pub use set_payout::SetPayoutArgs;
pub use settlement::JoinReceipt;
pub use state::{Chest, RepeatJoinPolicy};

declare_id!("25mmsSwNKbtZHMESA5e13QScAKeQ7bkpn9DPwFHu689i");

#[program]
pub mod referral_chests {
    use super::*;

    /// Create the registry and treasury with every chest payout at zero
    ///
    /// # Errors
    /// Returns an error if:
    /// - The registry already exists
    /// - The signer is not the program upgrade authority
    /// - The program data account is not this program's
    /// - Any referral threshold is zero
    pub fn init_registry(ctx: Context<InitRegistry>, args: InitRegistryArgs) -> Result<()> {
        init_registry::handler(ctx, args)
    }

    /// Change the payout of one chest
    ///
    /// # Errors
    /// Returns an error if:
    /// - The signer is not the registry administrator
    /// - The chest index is greater than 7
    pub fn set_payout(ctx: Context<SetPayout>, args: SetPayoutArgs) -> Result<()> {
        set_payout::handler(ctx, args)
    }

    /// Join under a sponsor, or repeat a join under the recorded sponsor
    ///
    /// Charges the sponsor's current chest payout, refunds the rest of
    /// `paid_lamports` and pays the chest out when the join unlocks it.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The joiner names themselves as sponsor
    /// - The sponsor account does not match the recorded sponsor
    /// - The proposed sponsor was referred by the joiner
    /// - `paid_lamports` is below the sponsor's current chest payout
    /// - The sponsor has already unlocked every chest
    /// - The joiner cannot cover `paid_lamports`
    pub fn join(ctx: Context<Join>, args: JoinArgs) -> Result<JoinReceipt> {
        join::handler(ctx, args)
    }

    /// Read the payout and referral threshold of one chest
    ///
    /// # Errors
    /// Returns an error if the chest index is greater than 7
    pub fn get_chest(ctx: Context<GetChest>, chest_index: u8) -> Result<Chest> {
        queries::get_chest(ctx, chest_index)
    }

    /// The signer's recorded sponsor, `None` for a participant who never joined
    ///
    /// # Errors
    /// Returns an error if the participant record cannot be deserialized
    pub fn current_sponsor(ctx: Context<CurrentSponsor>) -> Result<Option<Pubkey>> {
        queries::current_sponsor(ctx)
    }

    /// Current chest index of any identity
    ///
    /// # Errors
    /// Returns an error if the participant record cannot be deserialized
    pub fn tier_of(ctx: Context<ParticipantQuery>) -> Result<u8> {
        queries::tier_of(ctx)
    }

    /// Referral counter of any identity on one tier
    ///
    /// # Errors
    /// Returns an error if:
    /// - The tier index is greater than 7
    /// - The participant record cannot be deserialized
    pub fn in_tier_count(ctx: Context<ParticipantQuery>, tier: u8) -> Result<u32> {
        queries::in_tier_count(ctx, tier)
    }
}
