//! Blocking RPC client for registry queries and joins

use crate::{
    error::{ReferralSdkError, Result},
    events::{parse_events_from_logs, ReferralEvent},
    pda, program_id,
    quote::{self, JoinQuote},
};
use anchor_client::solana_client::rpc_client::RpcClient;
use anchor_client::solana_client::rpc_config::RpcTransactionConfig;
use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use anchor_client::solana_sdk::instruction::Instruction;
use anchor_client::solana_sdk::signature::{Signature, Signer};
use anchor_client::solana_sdk::transaction::Transaction;
use anchor_lang::prelude::Pubkey;
use anchor_lang::AccountDeserialize;
use referral_chests::constants::CHEST_COUNT;
use referral_chests::state::{Participant, Registry};
use referral_chests::{Chest, RepeatJoinPolicy};
use std::str::FromStr;
use tracing::{debug, info};

/// Client for the referral chests program
pub struct ReferralClient {
    /// RPC client for queries
    pub rpc_client: RpcClient,
    /// Program ID
    pub program_id: Pubkey,
}

impl ReferralClient {
    /// Create a client for the default program ID
    ///
    /// # Arguments
    /// * `cluster_url` - RPC endpoint URL
    ///
    /// # Errors
    /// Returns an error if client creation fails
    pub fn new(cluster_url: &str) -> Result<Self> {
        Ok(Self::with_program_id(cluster_url, program_id()))
    }

    /// Create a client with custom program ID
    ///
    /// # Arguments
    /// * `cluster_url` - RPC endpoint URL
    /// * `program_id` - Base58 program ID
    ///
    /// # Errors
    /// Returns an error if the program ID cannot be parsed
    pub fn new_with_program_id(cluster_url: &str, program_id: &str) -> Result<Self> {
        let program_id = Pubkey::from_str(program_id).map_err(|e| {
            ReferralSdkError::Generic(format!("Invalid program ID '{program_id}': {e}"))
        })?;
        Ok(Self::with_program_id(cluster_url, program_id))
    }

    fn with_program_id(cluster_url: &str, program_id: Pubkey) -> Self {
        let rpc_client = RpcClient::new_with_commitment(cluster_url, CommitmentConfig::confirmed());
        Self {
            rpc_client,
            program_id,
        }
    }

    /// Get the program ID
    #[must_use]
    pub const fn program_id(&self) -> Pubkey {
        self.program_id
    }

    /// Get the RPC client
    #[must_use]
    pub const fn rpc(&self) -> &RpcClient {
        &self.rpc_client
    }

    /// Registry PDA for this client's program
    #[must_use]
    pub fn registry_address(&self) -> Pubkey {
        pda::registry_address_with_program_id(&self.program_id)
    }

    /// Participant record PDA for this client's program
    #[must_use]
    pub fn participant_address(&self, identity: &Pubkey) -> Pubkey {
        pda::participant_address_with_program_id(identity, &self.program_id)
    }

    /// Fetch raw account data, `None` if the account does not exist
    fn fetch_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let account = self
            .rpc_client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .map_err(|e| ReferralSdkError::RpcError(format!("Failed to fetch account {address}: {e}")))?
            .value;

        Ok(account
            .filter(|account| account.owner == self.program_id)
            .map(|account| account.data))
    }

    /// Check if an account exists
    ///
    /// # Errors
    /// Returns an error if the RPC call fails
    pub fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        Ok(self
            .rpc_client
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .map_err(|e| ReferralSdkError::RpcError(format!("Failed to fetch account {address}: {e}")))?
            .value
            .is_some())
    }

    /// Get the registry account
    ///
    /// # Errors
    /// Returns `AccountNotFound` before `init_registry`, or an error if the
    /// account can't be deserialized
    pub fn get_registry(&self) -> Result<Registry> {
        let address = self.registry_address();
        let data = self
            .fetch_account_data(&address)?
            .ok_or_else(|| ReferralSdkError::AccountNotFound(format!("registry {address}")))?;

        Registry::try_deserialize(&mut data.as_slice())
            .map_err(|e| ReferralSdkError::ParseError(format!("Failed to deserialize registry: {e}")))
    }

    /// Get the participant record of an identity, `None` if it has none
    ///
    /// # Errors
    /// Returns an error if the RPC call fails or the account can't be deserialized
    pub fn get_participant(&self, identity: &Pubkey) -> Result<Option<Participant>> {
        let address = self.participant_address(identity);
        let Some(data) = self.fetch_account_data(&address)? else {
            return Ok(None);
        };

        let participant = Participant::try_deserialize(&mut data.as_slice()).map_err(|e| {
            ReferralSdkError::ParseError(format!("Failed to deserialize participant: {e}"))
        })?;
        Ok(Some(participant))
    }

    /// Get one chest of the table
    ///
    /// # Errors
    /// Returns `InvalidTierIndex` for indices past 7, or an error if the
    /// registry can't be fetched
    pub fn get_chest(&self, chest_index: u8) -> Result<Chest> {
        let registry = self.get_registry()?;
        Ok(*registry.chest(chest_index)?)
    }

    /// Get the whole chest table
    ///
    /// # Errors
    /// Returns an error if the registry can't be fetched
    pub fn get_chests(&self) -> Result<[Chest; CHEST_COUNT]> {
        Ok(self.get_registry()?.chests)
    }

    /// The recorded sponsor of `identity`, `None` if it never joined
    ///
    /// # Errors
    /// Returns an error if the participant record can't be fetched
    pub fn current_sponsor_of(&self, identity: &Pubkey) -> Result<Option<Pubkey>> {
        Ok(self
            .get_participant(identity)?
            .and_then(|participant| participant.current_sponsor()))
    }

    /// Current chest index of `identity`, 0 without a record
    ///
    /// # Errors
    /// Returns an error if the participant record can't be fetched
    pub fn tier_of(&self, identity: &Pubkey) -> Result<u8> {
        Ok(self
            .get_participant(identity)?
            .map_or(0, |participant| participant.tier))
    }

    /// Referral counter of `identity` on `tier`
    ///
    /// # Errors
    /// Returns `InvalidTierIndex` for tiers past 7, or an error if the
    /// participant record can't be fetched
    pub fn in_tier_count(&self, identity: &Pubkey, tier: u8) -> Result<u32> {
        let participant = self
            .get_participant(identity)?
            .unwrap_or_else(|| Participant::blank(*identity));
        Ok(participant.in_tier_count(tier)?)
    }

    /// Preview a join against current chain state
    ///
    /// # Errors
    /// Returns the program error the join would fail with, or an error if
    /// accounts can't be fetched
    pub fn quote_join(
        &self,
        joiner: &Pubkey,
        proposed_sponsor: &Pubkey,
        paid_lamports: u64,
    ) -> Result<JoinQuote> {
        let registry = self.get_registry()?;
        let joiner_record = self.get_participant(joiner)?;
        let sponsor = quote::effective_sponsor(joiner_record.as_ref(), proposed_sponsor);
        let sponsor_record = self.get_participant(&sponsor)?;

        quote::quote_join(
            &registry,
            joiner,
            joiner_record.as_ref(),
            sponsor_record.as_ref(),
            proposed_sponsor,
            paid_lamports,
        )
    }

    /// Submit and confirm a transaction
    ///
    /// # Errors
    /// Returns the mapped program error if the transaction fails on-chain
    pub fn submit_transaction<T: Signer>(
        &self,
        transaction: &mut Transaction,
        signers: &[&T],
    ) -> Result<Signature> {
        let recent_blockhash = self
            .rpc_client
            .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
            .map_err(|e| ReferralSdkError::RpcError(format!("Failed to get recent blockhash: {e}")))?
            .0;

        transaction.sign(signers, recent_blockhash);

        let signature = self
            .rpc_client
            .send_and_confirm_transaction_with_spinner(transaction)?;

        debug!(%signature, "Transaction confirmed");
        Ok(signature)
    }

    /// Submit instruction with automatic transaction handling
    ///
    /// The first signer pays the fee.
    ///
    /// # Errors
    /// Returns an error if transaction submission or confirmation fails
    pub fn submit_instruction<T: Signer>(
        &self,
        instruction: Instruction,
        signers: &[&T],
    ) -> Result<Signature> {
        let payer = signers.first().ok_or("At least one signer is required")?;
        let mut transaction = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
        self.submit_transaction(&mut transaction, signers)
    }

    /// Create the registry; `admin` must be the program upgrade authority
    ///
    /// # Errors
    /// Returns an error if the registry already exists or the transaction fails
    pub fn init_registry<T: Signer>(
        &self,
        admin: &T,
        referrals_to_unlock: [u32; CHEST_COUNT],
        repeat_join_policy: RepeatJoinPolicy,
    ) -> Result<(Pubkey, Signature)> {
        let registry = self.registry_address();
        if self.account_exists(&registry)? {
            return Err(ReferralSdkError::Generic(format!(
                "Registry already exists at address: {registry}"
            )));
        }

        let instruction = crate::transaction_builder::init_registry()
            .admin(admin.pubkey())
            .referrals_to_unlock(referrals_to_unlock)
            .repeat_join_policy(repeat_join_policy)
            .program_id(self.program_id)
            .build_instruction()?;

        let signature = self.submit_instruction(instruction, &[admin])?;
        info!(%registry, %signature, "Registry initialized");
        Ok((registry, signature))
    }

    /// Change the payout of one chest
    ///
    /// # Errors
    /// Returns an error if the signer is not the administrator or the
    /// transaction fails
    pub fn set_payout<T: Signer>(
        &self,
        admin: &T,
        chest_index: u8,
        payout_lamports: u64,
    ) -> Result<Signature> {
        let instruction = crate::transaction_builder::set_payout()
            .admin(admin.pubkey())
            .chest_index(chest_index)
            .payout_lamports(payout_lamports)
            .program_id(self.program_id)
            .build_instruction()?;

        let signature = self.submit_instruction(instruction, &[admin])?;
        info!(chest_index, payout_lamports, %signature, "Payout updated");
        Ok(signature)
    }

    /// Join under `proposed_sponsor`, or repeat a join under the recorded sponsor
    ///
    /// The sponsor wallet passed to the program is resolved from chain state,
    /// so repeat joins work whatever sponsor is proposed.
    ///
    /// # Errors
    /// Returns the mapped program error if the join fails
    pub fn join<T: Signer>(
        &self,
        joiner: &T,
        proposed_sponsor: &Pubkey,
        paid_lamports: u64,
    ) -> Result<Signature> {
        let joiner_key = joiner.pubkey();
        let joiner_record = self.get_participant(&joiner_key)?;
        let sponsor = quote::effective_sponsor(joiner_record.as_ref(), proposed_sponsor);

        let instruction = crate::transaction_builder::join()
            .joiner(joiner_key)
            .sponsor(sponsor)
            .proposed_sponsor(*proposed_sponsor)
            .paid_lamports(paid_lamports)
            .program_id(self.program_id)
            .build_instruction()?;

        let signature = self.submit_instruction(instruction, &[joiner])?;
        info!(joiner = %joiner_key, %sponsor, paid_lamports, %signature, "Joined");
        Ok(signature)
    }

    /// Events the program emitted in a confirmed transaction
    ///
    /// # Errors
    /// Returns an error if the transaction can't be fetched
    pub fn get_transaction_events(&self, signature: &Signature) -> Result<Vec<ReferralEvent>> {
        let config = RpcTransactionConfig {
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
            ..RpcTransactionConfig::default()
        };
        let transaction = self
            .rpc_client
            .get_transaction_with_config(signature, config)
            .map_err(|e| ReferralSdkError::RpcError(format!("Failed to get transaction {signature}: {e}")))?;

        let logs: Vec<String> = transaction
            .transaction
            .meta
            .and_then(|meta| Option::<Vec<String>>::from(meta.log_messages))
            .unwrap_or_default();

        Ok(parse_events_from_logs(&logs, &self.program_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ReferralClient::new("http://localhost:8899").unwrap();
        assert_eq!(client.program_id(), referral_chests::ID);
        assert_eq!(client.registry_address(), pda::registry_address());
    }

    #[test]
    fn test_client_with_custom_program_id() {
        let program_id = Pubkey::new_unique();
        let client =
            ReferralClient::new_with_program_id("http://localhost:8899", &program_id.to_string())
                .unwrap();

        assert_eq!(client.program_id(), program_id);
        let identity = Pubkey::new_unique();
        assert_eq!(
            client.participant_address(&identity),
            pda::participant_address_with_program_id(&identity, &program_id)
        );
    }

    #[test]
    fn test_client_rejects_invalid_program_id() {
        let result = ReferralClient::new_with_program_id("http://localhost:8899", "not-a-key");
        assert!(result.is_err());
    }
}
