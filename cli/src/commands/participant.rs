//! Participant command implementation

use crate::config::ReferralCliConfig;
use crate::utils::args::parse_pubkey;
use crate::utils::formatting::{format_participant_human, to_json, OutputFormat, ParticipantInfo};
use anyhow::Result;
use referral_chests_sdk::ReferralClient;

/// Execute the participant command: sponsor, tier and per-tier counters
///
/// Identities the program has never seen are reported as unregistered on
/// tier 0 rather than as an error.
///
/// # Errors
/// Returns error if the address is invalid or the account can't be fetched
pub fn execute(
    client: &ReferralClient,
    identity_str: &str,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let identity = parse_pubkey("participant", identity_str)?;
    let record = client.get_participant(&identity)?;
    let info = ParticipantInfo::new(
        &identity,
        &client.participant_address(&identity),
        record.as_ref(),
    );

    match output_format {
        OutputFormat::Human => Ok(format_participant_human(&info, config)),
        OutputFormat::Json => to_json(&info),
    }
}
