use anchor_lang::prelude::*;
use anchor_lang::solana_program::bpf_loader_upgradeable::{self, UpgradeableLoaderState};

use crate::constants::{CHEST_COUNT, REGISTRY_SEED};
use crate::errors::ReferralError;
use crate::state::{Registry, RepeatJoinPolicy};

// Example CLI command to initialize the registry:
// cargo run --package referral-chests-cli -- init-registry \
//   --referrals-to-unlock 3,9,27,81,243,729,2187,6561 \
//   --repeat-join-policy recount

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitRegistryArgs {
    /// Referral threshold of every chest, in chest order
    pub referrals_to_unlock: [u32; CHEST_COUNT],
    pub repeat_join_policy: RepeatJoinPolicy,
}

#[derive(Accounts)]
pub struct InitRegistry<'info> {
    #[account(
        init,
        payer = admin,
        space = Registry::SPACE,
        seeds = [REGISTRY_SEED],
        bump
    )]
    pub registry: Account<'info, Registry>,

    #[account(mut)]
    pub admin: Signer<'info>,

    /// Program data account for upgrade authority validation
    /// CHECK: Validated in handler by deserializing and checking upgrade authority
    pub program_data: UncheckedAccount<'info>,

    pub system_program: Program<'info, System>,
}

/// Gets the expected program data address for the current program
pub(crate) fn get_program_data_address(program_id: &Pubkey) -> Pubkey {
    let (program_data_address, _) =
        Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id());
    program_data_address
}

/// Read the upgrade authority out of raw program data account bytes
fn upgrade_authority_of(program_data: &[u8]) -> Result<Option<Pubkey>> {
    let state: UpgradeableLoaderState =
        bincode::deserialize(program_data).map_err(|_| ReferralError::InvalidProgramData)?;

    let UpgradeableLoaderState::ProgramData {
        upgrade_authority_address,
        ..
    } = state
    else {
        return Err(ReferralError::InvalidProgramData.into());
    };

    Ok(upgrade_authority_address)
}

pub fn handler(ctx: Context<InitRegistry>, args: InitRegistryArgs) -> Result<()> {
    // Only the upgrade authority may create the registry, so nobody can
    // claim the admin seat between deployment and initialization
    let expected_program_data = get_program_data_address(ctx.program_id);
    require_keys_eq!(
        ctx.accounts.program_data.key(),
        expected_program_data,
        ReferralError::InvalidProgramData
    );

    let upgrade_authority = {
        let program_data_bytes = ctx.accounts.program_data.try_borrow_data()?;
        upgrade_authority_of(&program_data_bytes)?
    }
    .ok_or(ReferralError::Unauthorized)?;

    require_keys_eq!(
        ctx.accounts.admin.key(),
        upgrade_authority,
        ReferralError::Unauthorized
    );

    let registry = Registry::new(
        ctx.accounts.admin.key(),
        args.referrals_to_unlock,
        args.repeat_join_policy,
        ctx.bumps.registry,
    )?;
    ctx.accounts.registry.set_inner(registry);

    msg!(
        "Registry initialized: admin {}, thresholds {:?}",
        ctx.accounts.admin.key(),
        args.referrals_to_unlock
    );

    emit!(crate::events::RegistryInitialized {
        registry: ctx.accounts.registry.key(),
        admin: ctx.accounts.admin.key(),
        referrals_to_unlock: args.referrals_to_unlock,
        repeat_join_policy: args.repeat_join_policy,
    });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_program_data_address() {
        let program_id = Pubkey::new_unique();
        let program_data_address = get_program_data_address(&program_id);

        let (expected, _bump) =
            Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id());

        assert_eq!(program_data_address, expected);
    }

    #[test]
    fn test_upgrade_authority_of_program_data() {
        let upgrade_authority = Pubkey::new_unique();
        let serialized = bincode::serialize(&UpgradeableLoaderState::ProgramData {
            slot: 42,
            upgrade_authority_address: Some(upgrade_authority),
        })
        .unwrap();

        assert_eq!(
            upgrade_authority_of(&serialized).unwrap(),
            Some(upgrade_authority)
        );
    }

    #[test]
    fn test_upgrade_authority_of_immutable_program() {
        let serialized = bincode::serialize(&UpgradeableLoaderState::ProgramData {
            slot: 42,
            upgrade_authority_address: None,
        })
        .unwrap();

        assert_eq!(upgrade_authority_of(&serialized).unwrap(), None);
    }

    #[test]
    fn test_upgrade_authority_of_wrong_loader_state() {
        let serialized = bincode::serialize(&UpgradeableLoaderState::Uninitialized).unwrap();
        assert!(upgrade_authority_of(&serialized).is_err());
    }

    #[test]
    fn test_upgrade_authority_of_garbage() {
        assert!(upgrade_authority_of(&[]).is_err());
    }
}
