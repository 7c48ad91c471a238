//! Chests command implementation

use crate::config::ReferralCliConfig;
use crate::utils::formatting::{format_chests_human, to_json, ChestInfo, OutputFormat};
use anyhow::Result;
use referral_chests_sdk::ReferralClient;

/// Execute the chests command, listing the whole chest table
///
/// # Errors
/// Returns error if the registry can't be fetched
pub fn execute(
    client: &ReferralClient,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let chests: Vec<ChestInfo> = client
        .get_chests()?
        .iter()
        .zip(0u8..)
        .map(|(chest, index)| ChestInfo::new(index, chest, config))
        .collect();

    match output_format {
        OutputFormat::Human => Ok(format_chests_human(&chests)),
        OutputFormat::Json => to_json(&chests),
    }
}
