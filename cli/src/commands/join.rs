//! Join command implementation

use crate::commands::quote::current_price;
use crate::config::ReferralCliConfig;
use crate::utils::args::parse_pubkey;
use crate::utils::formatting::{format_event_human, quote_json, to_json, OutputFormat};
use anchor_client::solana_sdk::signature::Signer;
use anyhow::Result;
use referral_chests_sdk::{load_keypair, ReferralClient, ReferralEvent};
use std::fmt::Write;
use tracing::{info, warn};

/// Execute the join command
///
/// Without `paid_lamports` the current price of the sponsor's chest is paid.
/// The join is previewed first so program errors surface before anything is
/// signed.
///
/// # Errors
/// Returns error if the keypair can't be loaded, the join would be rejected,
/// or the transaction fails
pub fn execute(
    client: &ReferralClient,
    joiner_path: Option<&str>,
    sponsor_str: &str,
    paid_lamports: Option<u64>,
    output_format: OutputFormat,
    config: &ReferralCliConfig,
) -> Result<String> {
    let joiner = load_keypair(joiner_path)?;
    let joiner_key = joiner.pubkey();
    let sponsor = parse_pubkey("sponsor", sponsor_str)?;
    info!("Joining as {} under {}", joiner_key, sponsor);

    let paid_lamports = match paid_lamports {
        Some(paid) => paid,
        None => current_price(client, &joiner_key, &sponsor)?,
    };

    let quote = client.quote_join(&joiner_key, &sponsor, paid_lamports)?;
    let signature = client.join(&joiner, &sponsor, paid_lamports)?;
    info!("Transaction confirmed: {}", signature);

    let events = client.get_transaction_events(&signature).unwrap_or_else(|e| {
        warn!("Could not fetch events for {signature}: {e}");
        Vec::new()
    });

    match output_format {
        OutputFormat::Json => {
            let events: Vec<String> = events.iter().map(format_event_human).collect();
            to_json(&serde_json::json!({
                "signature": signature.to_string(),
                "paid_lamports": paid_lamports,
                "quote": quote_json(&quote),
                "events": events,
            }))
        }
        OutputFormat::Human => Ok(format_join_human(
            &signature.to_string(),
            paid_lamports,
            &events,
            config,
        )),
    }
}

fn format_join_human(
    signature: &str,
    paid_lamports: u64,
    events: &[ReferralEvent],
    config: &ReferralCliConfig,
) -> String {
    let mut output = format!(
        "Join confirmed!\nTransaction signature: {signature}\nPaid: {paid_lamports} lamports ({:.9} SOL)\n",
        config.format_sol(paid_lamports)
    );
    if events.is_empty() {
        output.push_str("No events found in the transaction log");
    } else {
        output.push_str("Events:");
        for event in events {
            let _ = write!(output, "\n  {}", format_event_human(event));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::prelude::Pubkey;
    use referral_chests_sdk::events::Joined;

    #[test]
    fn test_format_join_lists_events() {
        let config = ReferralCliConfig::from_lookup(|_| None);
        let events = vec![ReferralEvent::Joined(Joined {
            participant: Pubkey::new_unique(),
            sponsor: Pubkey::new_unique(),
            first_join: true,
            paid_lamports: 150,
            price_lamports: 100,
            refund_lamports: 50,
            sponsor_tier: 0,
            sponsor_in_tier_count: 1,
        })];

        let output = format_join_human("sig", 150, &events, &config);

        assert!(output.contains("Transaction signature: sig"));
        assert!(output.contains("Events:\n  Joined:"));
        assert!(output.contains("refunded 50"));
    }

    #[test]
    fn test_format_join_without_events() {
        let config = ReferralCliConfig::from_lookup(|_| None);

        let output = format_join_human("sig", 0, &[], &config);

        assert!(output.ends_with("No events found in the transaction log"));
    }
}
