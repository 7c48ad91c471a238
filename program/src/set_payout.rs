use anchor_lang::prelude::*;

use crate::constants::REGISTRY_SEED;
use crate::state::{ensure_payout_receivable, Registry};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetPayoutArgs {
    /// Index of the chest to change (0 through 7)
    pub chest_index: u8,
    /// New payout in lamports; also the price of joining under a sponsor on this chest
    pub payout_lamports: u64,
}

#[derive(Accounts)]
pub struct SetPayout<'info> {
    #[account(
        mut,
        seeds = [REGISTRY_SEED],
        bump = registry.bump
    )]
    pub registry: Account<'info, Registry>,

    /// Must be the registry administrator; checked in the handler
    pub admin: Signer<'info>,
}

pub fn handler(ctx: Context<SetPayout>, args: SetPayoutArgs) -> Result<()> {
    let admin = ctx.accounts.admin.key();
    let registry = &mut ctx.accounts.registry;

    registry.ensure_admin(&admin)?;
    registry.chest(args.chest_index)?;
    ensure_payout_receivable(args.payout_lamports, &Rent::get()?)?;

    let old_payout_lamports = registry.set_payout(&admin, args.chest_index, args.payout_lamports)?;

    msg!(
        "Chest {} payout: {} -> {} lamports",
        args.chest_index,
        old_payout_lamports,
        args.payout_lamports
    );

    emit!(crate::events::PayoutUpdated {
        chest_index: args.chest_index,
        old_payout_lamports,
        new_payout_lamports: args.payout_lamports,
    });

    Ok(())
}
