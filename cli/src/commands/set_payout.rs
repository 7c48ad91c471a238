//! Set payout command implementation

use crate::config::ReferralCliConfig;
use crate::utils::formatting::{to_json, OutputFormat};
use anchor_client::solana_sdk::signature::Signer;
use anyhow::Result;
use referral_chests_sdk::{load_keypair, ReferralClient};
use tracing::info;

/// Execute the set payout command
///
/// # Errors
/// Returns error if the signer is not the registry administrator, the chest
/// index is out of range, or the transaction fails
pub fn execute(
    client: &ReferralClient,
    admin_path: Option<&str>,
    chest_index: u8,
    payout_lamports: u64,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let admin = load_keypair(admin_path)?;
    info!(admin = %admin.pubkey(), chest_index, payout_lamports, "Setting chest payout");

    let previous = client.get_chest(chest_index)?.payout_lamports;
    let signature = client.set_payout(&admin, chest_index, payout_lamports)?;

    match output_format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "chest_index": chest_index,
            "old_payout_lamports": previous,
            "new_payout_lamports": payout_lamports,
            "signature": signature.to_string(),
        })),
        OutputFormat::Human => Ok(format!(
            "Chest {chest_index} payout updated!\nOld payout: {previous} lamports ({:.9} SOL)\nNew payout: {payout_lamports} lamports ({:.9} SOL)\nTransaction signature: {signature}",
            config.format_sol(previous),
            config.format_sol(payout_lamports)
        )),
    }
}
