//! Chest command implementation

use crate::config::ReferralCliConfig;
use crate::utils::formatting::{format_chest_human, to_json, ChestInfo, OutputFormat};
use anyhow::Result;
use referral_chests_sdk::ReferralClient;

/// Execute the chest command
///
/// # Errors
/// Returns error if the index is past the last chest or the registry can't be
/// fetched
pub fn execute(
    client: &ReferralClient,
    chest_index: u8,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let chest = client.get_chest(chest_index)?;
    let info = ChestInfo::new(chest_index, &chest, config);

    match output_format {
        OutputFormat::Human => Ok(format_chest_human(&info)),
        OutputFormat::Json => to_json(&info),
    }
}
