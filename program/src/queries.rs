//! Read-only instructions
//!
//! Each returns its answer as Anchor return data, so they can be simulated by
//! clients or invoked through CPI. None of them writes to an account.

use anchor_lang::prelude::*;

use crate::constants::{PARTICIPANT_SEED, REGISTRY_SEED};
use crate::state::{Chest, Participant, Registry};

#[derive(Accounts)]
pub struct GetChest<'info> {
    #[account(
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,
}

/// Caller-scoped: the identity must sign
#[derive(Accounts)]
pub struct CurrentSponsor<'info> {
    pub caller: Signer<'info>,

    /// CHECK: Address pinned by seeds; may not exist yet
    #[account(
        seeds = [PARTICIPANT_SEED, caller.key().as_ref()],
        bump
    )]
    pub participant_record: UncheckedAccount<'info>,
}

#[derive(Accounts)]
pub struct ParticipantQuery<'info> {
    /// CHECK: Any identity; only its address is used
    pub identity: UncheckedAccount<'info>,

    /// CHECK: Address pinned by seeds; may not exist yet
    #[account(
        seeds = [PARTICIPANT_SEED, identity.key().as_ref()],
        bump
    )]
    pub participant_record: UncheckedAccount<'info>,
}

/// Deserialize a participant record, `None` if it was never allocated
pub(crate) fn load_participant(
    record: &AccountInfo,
    program_id: &Pubkey,
) -> Result<Option<Participant>> {
    if record.owner != program_id || record.data_is_empty() {
        return Ok(None);
    }

    let data = record.try_borrow_data()?;
    let mut bytes: &[u8] = &data;
    let participant = Participant::try_deserialize(&mut bytes)?;
    Ok(Some(participant))
}

pub fn get_chest(ctx: Context<GetChest>, chest_index: u8) -> Result<Chest> {
    ctx.accounts.registry.chest(chest_index).copied()
}

pub fn current_sponsor(ctx: Context<CurrentSponsor>) -> Result<Option<Pubkey>> {
    let record = load_participant(&ctx.accounts.participant_record, ctx.program_id)?;
    Ok(record.and_then(|participant| participant.current_sponsor()))
}

pub fn tier_of(ctx: Context<ParticipantQuery>) -> Result<u8> {
    let record = load_participant(&ctx.accounts.participant_record, ctx.program_id)?;
    Ok(record.map_or(0, |participant| participant.tier))
}

pub fn in_tier_count(ctx: Context<ParticipantQuery>, tier: u8) -> Result<u32> {
    let record = load_participant(&ctx.accounts.participant_record, ctx.program_id)?;
    match record {
        Some(participant) => participant.in_tier_count(tier),
        // Unknown identities still get the bounds check
        None => Participant::blank(Pubkey::default()).in_tier_count(tier),
    }
}
