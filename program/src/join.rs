use anchor_lang::prelude::*;
use anchor_lang::system_program;

use crate::constants::{PARTICIPANT_SEED, REGISTRY_SEED};
use crate::errors::ReferralError;
use crate::settlement::{settle_join, JoinReceipt, JoinRequest};
use crate::state::{Participant, ReferralStep, Registry};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct JoinArgs {
    /// Sponsor to record on first join; ignored once a sponsor is on record
    pub sponsor: Pubkey,
    /// Lamports the joiner attaches; anything above the price is refunded
    pub paid_lamports: u64,
}

#[derive(Accounts)]
pub struct Join<'info> {
    /// Registry and treasury
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(
        init_if_needed,
        payer = joiner,
        space = Participant::SPACE,
        seeds = [PARTICIPANT_SEED, joiner.key().as_ref()],
        bump
    )]
    pub joiner_record: Account<'info, Participant>,

    /// Counters of the sponsor; allocated on the sponsor's first referral
    #[account(
        init_if_needed,
        payer = joiner,
        space = Participant::SPACE,
        seeds = [PARTICIPANT_SEED, sponsor.key().as_ref()],
        bump
    )]
    pub sponsor_record: Account<'info, Participant>,

    /// Sponsor wallet receiving chest payouts
    /// CHECK: Compared against the effective sponsor in the handler; only ever credited
    #[account(mut)]
    pub sponsor: UncheckedAccount<'info>,

    #[account(mut)]
    pub joiner: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Move lamports out of a program-owned account
fn release_lamports(from: &AccountInfo, to: &AccountInfo, amount: u64) -> Result<()> {
    let from_balance = from
        .lamports()
        .checked_sub(amount)
        .ok_or(ReferralError::ArithmeticError)?;
    **from.try_borrow_mut_lamports()? = from_balance;

    let to_balance = to
        .lamports()
        .checked_add(amount)
        .ok_or(ReferralError::ArithmeticError)?;
    **to.try_borrow_mut_lamports()? = to_balance;
    Ok(())
}

/// The treasury cannot stand in as a sponsor wallet: a payout to itself
/// would shrink `retained_lamports` without moving any lamports
fn ensure_sponsor_wallet(sponsor: &Pubkey, registry: &Pubkey) -> Result<()> {
    require_keys_neq!(*sponsor, *registry, ReferralError::SponsorMismatch);
    Ok(())
}

pub fn handler(ctx: Context<Join>, args: JoinArgs) -> Result<JoinReceipt> {
    let joiner_key = ctx.accounts.joiner.key();
    let sponsor_key = ctx.accounts.sponsor.key();
    ensure_sponsor_wallet(&sponsor_key, &ctx.accounts.registry.key())?;

    ctx.accounts
        .joiner_record
        .claim(joiner_key, ctx.bumps.joiner_record);
    ctx.accounts
        .sponsor_record
        .claim(sponsor_key, ctx.bumps.sponsor_record);

    let request = JoinRequest {
        joiner: joiner_key,
        sponsor_account: sponsor_key,
        proposed_sponsor: args.sponsor,
        paid_lamports: args.paid_lamports,
    };
    let settlement = settle_join(
        &mut ctx.accounts.registry,
        &mut ctx.accounts.joiner_record,
        &mut ctx.accounts.sponsor_record,
        &request,
    )?;

    // Payment in, then refund and payout out of the registry. The registry
    // already holds the price when the payout leaves, so retained funds
    // never dip below what earlier joins left behind.
    if args.paid_lamports > 0 {
        system_program::transfer(
            CpiContext::new(
                ctx.accounts.system_program.to_account_info(),
                system_program::Transfer {
                    from: ctx.accounts.joiner.to_account_info(),
                    to: ctx.accounts.registry.to_account_info(),
                },
            ),
            args.paid_lamports,
        )?;
    }

    let registry_info = ctx.accounts.registry.to_account_info();
    if settlement.refund_lamports > 0 {
        release_lamports(
            &registry_info,
            &ctx.accounts.joiner.to_account_info(),
            settlement.refund_lamports,
        )?;
    }

    let sponsor_record = &ctx.accounts.sponsor_record;
    if let Some(ReferralStep::Unlocked {
        chest_index,
        next_tier,
        payout_lamports,
    }) = settlement.step
    {
        if payout_lamports > 0 {
            release_lamports(
                &registry_info,
                &ctx.accounts.sponsor.to_account_info(),
                payout_lamports,
            )?;
        }

        msg!(
            "Chest {} unlocked for {}: {} lamports paid, now on tier {}",
            chest_index,
            sponsor_key,
            payout_lamports,
            next_tier
        );

        emit!(crate::events::ChestUnlocked {
            sponsor: sponsor_key,
            participant: joiner_key,
            chest_index,
            payout_lamports,
            next_tier,
        });
    }

    emit!(crate::events::Joined {
        participant: joiner_key,
        sponsor: settlement.sponsor,
        first_join: settlement.first_join,
        paid_lamports: args.paid_lamports,
        price_lamports: settlement.price_lamports,
        refund_lamports: settlement.refund_lamports,
        sponsor_tier: sponsor_record.tier,
        sponsor_in_tier_count: sponsor_record.current_in_tier_count(),
    });

    Ok(JoinReceipt::new(&settlement, &ctx.accounts.joiner_record))
}
