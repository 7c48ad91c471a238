//! Quote command implementation

use crate::config::ReferralCliConfig;
use crate::utils::args::parse_pubkey;
use crate::utils::formatting::{format_quote_human, quote_json, to_json, OutputFormat};
use anchor_lang::prelude::Pubkey;
use anyhow::Result;
use referral_chests_sdk::quote::effective_sponsor;
use referral_chests_sdk::ReferralClient;

/// Execute the quote command: preview a join without sending it
///
/// # Errors
/// Returns the program error the join would fail with, or an error if the
/// addresses are invalid or accounts can't be fetched
pub fn execute(
    client: &ReferralClient,
    joiner_str: &str,
    sponsor_str: &str,
    paid_lamports: Option<u64>,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let joiner = parse_pubkey("joiner", joiner_str)?;
    let sponsor = parse_pubkey("sponsor", sponsor_str)?;
    let paid_lamports = match paid_lamports {
        Some(paid) => paid,
        None => current_price(client, &joiner, &sponsor)?,
    };

    let quote = client.quote_join(&joiner, &sponsor, paid_lamports)?;

    match output_format {
        OutputFormat::Human => Ok(format_quote_human(&quote, config)),
        OutputFormat::Json => to_json(&quote_json(&quote)),
    }
}

/// Payout of the chest the effective sponsor currently sits on, or zero once
/// the sponsor has completed the table
///
/// # Errors
/// Returns an error if accounts can't be fetched
pub fn current_price(
    client: &ReferralClient,
    joiner: &Pubkey,
    proposed_sponsor: &Pubkey,
) -> Result<u64> {
    let joiner_record = client.get_participant(joiner)?;
    let sponsor = effective_sponsor(joiner_record.as_ref(), proposed_sponsor);
    let tier = client.tier_of(&sponsor)?;
    Ok(client
        .get_chests()?
        .get(usize::from(tier))
        .map_or(0, |chest| chest.payout_lamports))
}
