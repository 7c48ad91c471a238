//! Transaction building utilities for registry and join flows

use crate::{
    error::{ReferralSdkError, Result},
    pda, program_id,
};
use anchor_client::solana_sdk::instruction::Instruction;
use anchor_lang::prelude::*;
use anchor_lang::{system_program, InstructionData};
use referral_chests::constants::{CHEST_COUNT, DEFAULT_REFERRALS_TO_UNLOCK, MAX_CHEST_INDEX};
use referral_chests::{InitRegistryArgs, JoinArgs, RepeatJoinPolicy, SetPayoutArgs};

/// Builder for the one-time registry initialization
#[derive(Clone, Debug, Default)]
pub struct InitRegistryBuilder {
    admin: Option<Pubkey>,
    referrals_to_unlock: Option<[u32; CHEST_COUNT]>,
    repeat_join_policy: Option<RepeatJoinPolicy>,
    program_id: Option<Pubkey>,
}

/// Builder for administrator payout changes
#[derive(Clone, Debug, Default)]
pub struct SetPayoutBuilder {
    admin: Option<Pubkey>,
    chest_index: Option<u8>,
    payout_lamports: Option<u64>,
    program_id: Option<Pubkey>,
}

/// Builder for join transactions
#[derive(Clone, Debug, Default)]
pub struct JoinBuilder {
    joiner: Option<Pubkey>,
    sponsor: Option<Pubkey>,
    proposed_sponsor: Option<Pubkey>,
    paid_lamports: Option<u64>,
    program_id: Option<Pubkey>,
}

impl InitRegistryBuilder {
    /// Create a new init registry builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the administrator (signer); must be the program upgrade authority
    #[must_use]
    pub const fn admin(mut self, admin: Pubkey) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Set the referral thresholds, defaults to powers of three
    #[must_use]
    pub const fn referrals_to_unlock(mut self, referrals_to_unlock: [u32; CHEST_COUNT]) -> Self {
        self.referrals_to_unlock = Some(referrals_to_unlock);
        self
    }

    /// Set the repeat join policy, defaults to `Recount`
    #[must_use]
    pub const fn repeat_join_policy(mut self, policy: RepeatJoinPolicy) -> Self {
        self.repeat_join_policy = Some(policy);
        self
    }

    /// Set the program ID to use
    #[must_use]
    pub const fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = Some(program_id);
        self
    }

    /// Build the transaction instruction
    ///
    /// # Returns
    /// * `Ok(Instruction)` - The `init_registry` instruction
    /// * `Err(ReferralSdkError)` - If the admin is missing or a threshold is zero
    pub fn build_instruction(self) -> Result<Instruction> {
        let admin = self.admin.ok_or("Admin not set")?;
        let referrals_to_unlock = self
            .referrals_to_unlock
            .unwrap_or(DEFAULT_REFERRALS_TO_UNLOCK);
        if referrals_to_unlock.contains(&0) {
            return Err(ReferralSdkError::InvalidThreshold);
        }

        let program_id = self.program_id.unwrap_or_else(program_id);

        let accounts = referral_chests::accounts::InitRegistry {
            registry: pda::registry_address_with_program_id(&program_id),
            admin,
            program_data: pda::program_data_address(&program_id),
            system_program: system_program::ID,
        };

        let data = referral_chests::instruction::InitRegistry {
            args: InitRegistryArgs {
                referrals_to_unlock,
                repeat_join_policy: self.repeat_join_policy.unwrap_or(RepeatJoinPolicy::Recount),
            },
        };

        Ok(Instruction {
            program_id,
            accounts: accounts.to_account_metas(None),
            data: data.data(),
        })
    }
}

impl SetPayoutBuilder {
    /// Create a new set payout builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the administrator (signer)
    #[must_use]
    pub const fn admin(mut self, admin: Pubkey) -> Self {
        self.admin = Some(admin);
        self
    }

    /// Set the chest to change
    #[must_use]
    pub const fn chest_index(mut self, chest_index: u8) -> Self {
        self.chest_index = Some(chest_index);
        self
    }

    /// Set the new payout in lamports
    #[must_use]
    pub const fn payout_lamports(mut self, payout_lamports: u64) -> Self {
        self.payout_lamports = Some(payout_lamports);
        self
    }

    /// Set the program ID to use
    #[must_use]
    pub const fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = Some(program_id);
        self
    }

    /// Build the transaction instruction
    ///
    /// # Returns
    /// * `Ok(Instruction)` - The `set_payout` instruction
    /// * `Err(ReferralSdkError)` - If a field is missing or the index is past the last chest
    pub fn build_instruction(self) -> Result<Instruction> {
        let admin = self.admin.ok_or("Admin not set")?;
        let chest_index = self.chest_index.ok_or("Chest index not set")?;
        let payout_lamports = self.payout_lamports.ok_or("Payout not set")?;
        if chest_index > MAX_CHEST_INDEX {
            return Err(ReferralSdkError::InvalidTierIndex);
        }

        let program_id = self.program_id.unwrap_or_else(program_id);

        let accounts = referral_chests::accounts::SetPayout {
            registry: pda::registry_address_with_program_id(&program_id),
            admin,
        };

        let data = referral_chests::instruction::SetPayout {
            args: SetPayoutArgs {
                chest_index,
                payout_lamports,
            },
        };

        Ok(Instruction {
            program_id,
            accounts: accounts.to_account_metas(None),
            data: data.data(),
        })
    }
}

impl JoinBuilder {
    /// Create a new join builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the joining participant (signer and payer)
    #[must_use]
    pub const fn joiner(mut self, joiner: Pubkey) -> Self {
        self.joiner = Some(joiner);
        self
    }

    /// Set the sponsor wallet: the recorded sponsor on repeat joins, the
    /// proposed sponsor otherwise
    #[must_use]
    pub const fn sponsor(mut self, sponsor: Pubkey) -> Self {
        self.sponsor = Some(sponsor);
        self
    }

    /// Set the sponsor named in the instruction arguments, defaults to `sponsor`
    #[must_use]
    pub const fn proposed_sponsor(mut self, proposed_sponsor: Pubkey) -> Self {
        self.proposed_sponsor = Some(proposed_sponsor);
        self
    }

    /// Set the lamports attached to the join
    #[must_use]
    pub const fn paid_lamports(mut self, paid_lamports: u64) -> Self {
        self.paid_lamports = Some(paid_lamports);
        self
    }

    /// Set the program ID to use
    #[must_use]
    pub const fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = Some(program_id);
        self
    }

    /// Build the transaction instruction
    ///
    /// # Returns
    /// * `Ok(Instruction)` - The `join` instruction
    /// * `Err(ReferralSdkError)` - If a field is missing or the joiner names itself
    pub fn build_instruction(self) -> Result<Instruction> {
        let joiner = self.joiner.ok_or("Joiner not set")?;
        let sponsor = self.sponsor.ok_or("Sponsor not set")?;
        let paid_lamports = self.paid_lamports.ok_or("Paid lamports not set")?;
        if sponsor == joiner {
            return Err(ReferralSdkError::SelfSponsorship);
        }

        let program_id = self.program_id.unwrap_or_else(program_id);

        let accounts = referral_chests::accounts::Join {
            registry: pda::registry_address_with_program_id(&program_id),
            joiner_record: pda::participant_address_with_program_id(&joiner, &program_id),
            sponsor_record: pda::participant_address_with_program_id(&sponsor, &program_id),
            sponsor,
            joiner,
            system_program: system_program::ID,
        };

        let data = referral_chests::instruction::Join {
            args: JoinArgs {
                sponsor: self.proposed_sponsor.unwrap_or(sponsor),
                paid_lamports,
            },
        };

        Ok(Instruction {
            program_id,
            accounts: accounts.to_account_metas(None),
            data: data.data(),
        })
    }
}

/// Start building an `init_registry` instruction
#[must_use]
pub fn init_registry() -> InitRegistryBuilder {
    InitRegistryBuilder::new()
}

/// Start building a `set_payout` instruction
#[must_use]
pub fn set_payout() -> SetPayoutBuilder {
    SetPayoutBuilder::new()
}

/// Start building a `join` instruction
#[must_use]
pub fn join() -> JoinBuilder {
    JoinBuilder::new()
}
