//! Init registry command implementation

use crate::utils::args::parse_referrals_to_unlock;
use crate::utils::formatting::{to_json, OutputFormat};
use anchor_client::solana_sdk::signature::Signer;
use anyhow::Result;
use referral_chests_sdk::{
    load_keypair, ReferralClient, RepeatJoinPolicy, DEFAULT_REFERRALS_TO_UNLOCK,
};
use tracing::info;

/// Execute the init registry command
///
/// `referrals_to_unlock` is a comma-separated list of one threshold per chest;
/// the powers of three are used when it is omitted. The signer must be the
/// program's upgrade authority.
///
/// # Errors
/// Returns error if the thresholds are malformed, the registry already exists,
/// or the transaction fails
pub fn execute(
    client: &ReferralClient,
    admin_path: Option<&str>,
    referrals_to_unlock: Option<&str>,
    repeat_join_policy: RepeatJoinPolicy,
    output_format: OutputFormat,
) -> Result<String> {
    info!("Starting registry initialization");

    let thresholds = referrals_to_unlock
        .map(parse_referrals_to_unlock)
        .transpose()?
        .unwrap_or(DEFAULT_REFERRALS_TO_UNLOCK);

    let admin = load_keypair(admin_path)?;
    info!("Using admin: {}", admin.pubkey());

    let (registry, signature) = client.init_registry(&admin, thresholds, repeat_join_policy)?;
    info!("Transaction confirmed: {}", signature);

    match output_format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "registry": registry.to_string(),
            "admin": admin.pubkey().to_string(),
            "referrals_to_unlock": thresholds,
            "repeat_join_policy": format!("{repeat_join_policy:?}"),
            "signature": signature.to_string(),
        })),
        OutputFormat::Human => {
            let thresholds: Vec<String> = thresholds.iter().map(ToString::to_string).collect();
            Ok(format!(
                "Registry initialized successfully!\nRegistry PDA: {registry}\nTransaction signature: {signature}\nAdmin: {}\nReferrals to unlock: [{}]\nRepeat joins: {repeat_join_policy:?}\nEvery chest pays 0 lamports until set-payout is used",
                admin.pubkey(),
                thresholds.join(", ")
            ))
        }
    }
}
