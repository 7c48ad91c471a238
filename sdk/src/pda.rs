//! Program Derived Address (PDA) computation utilities

use anchor_lang::prelude::Pubkey;
use anchor_lang::solana_program::bpf_loader_upgradeable;
use referral_chests::constants::{PARTICIPANT_SEED, REGISTRY_SEED};

use crate::program_id;

/// Compute the registry PDA (which is also the treasury)
///
/// # Returns
/// * `(Pubkey, u8)` - The PDA address and bump seed
#[must_use]
pub fn registry() -> (Pubkey, u8) {
    registry_with_program_id(&program_id())
}

/// Compute the registry PDA address only (without bump)
#[must_use]
pub fn registry_address() -> Pubkey {
    registry().0
}

/// Compute the registry PDA with custom program ID
///
/// # Arguments
/// * `program_id` - The program ID to use for PDA computation
///
/// # Returns
/// * `(Pubkey, u8)` - The PDA address and bump seed
#[must_use]
pub fn registry_with_program_id(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[REGISTRY_SEED], program_id)
}

/// Compute the registry PDA address only (without bump) with custom program ID
#[must_use]
pub fn registry_address_with_program_id(program_id: &Pubkey) -> Pubkey {
    registry_with_program_id(program_id).0
}

/// Compute the participant record PDA of an identity
///
/// # Arguments
/// * `identity` - The participant's wallet
///
/// # Returns
/// * `(Pubkey, u8)` - The PDA address and bump seed
#[must_use]
pub fn participant(identity: &Pubkey) -> (Pubkey, u8) {
    participant_with_program_id(identity, &program_id())
}

/// Compute the participant record PDA address only (without bump)
#[must_use]
pub fn participant_address(identity: &Pubkey) -> Pubkey {
    participant(identity).0
}

/// Compute the participant record PDA with custom program ID
///
/// # Arguments
/// * `identity` - The participant's wallet
/// * `program_id` - The program ID to use for PDA computation
#[must_use]
pub fn participant_with_program_id(identity: &Pubkey, program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PARTICIPANT_SEED, identity.as_ref()], program_id)
}

/// Compute the participant record PDA address only (without bump) with custom program ID
#[must_use]
pub fn participant_address_with_program_id(identity: &Pubkey, program_id: &Pubkey) -> Pubkey {
    participant_with_program_id(identity, program_id).0
}

/// Program data account of an upgradeable program, needed by `init_registry`
#[must_use]
pub fn program_data_address(program_id: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[program_id.as_ref()], &bpf_loader_upgradeable::id()).0
}
