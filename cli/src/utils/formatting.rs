//! Output formatting utilities for the referral chests CLI

use crate::config::ReferralCliConfig;
use anchor_lang::prelude::Pubkey;
use anyhow::{anyhow, Result};
use referral_chests_sdk::{Chest, JoinQuote, Participant, ReferralEvent, CHEST_COUNT};
use serde::Serialize;
use std::fmt::Write;

/// Output format shared by every command
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

/// Parse output format from string
///
/// # Errors
/// Returns an error for anything other than `human` or `json`
pub fn parse_output_format(format_str: &str) -> Result<OutputFormat> {
    match format_str.to_lowercase().as_str() {
        "human" => Ok(OutputFormat::Human),
        "json" => Ok(OutputFormat::Json),
        _ => Err(anyhow!("Invalid output format: {format_str}")),
    }
}

/// Chest information for display
#[derive(Debug, Serialize)]
pub struct ChestInfo {
    pub index: u8,
    pub referrals_to_unlock: u32,
    pub payout_lamports: u64,
    pub payout_sol: f64,
}

impl ChestInfo {
    #[must_use]
    pub fn new(index: u8, chest: &Chest, config: &ReferralCliConfig) -> Self {
        Self {
            index,
            referrals_to_unlock: chest.referrals_to_unlock,
            payout_lamports: chest.payout_lamports,
            payout_sol: config.format_sol(chest.payout_lamports),
        }
    }
}

/// Participant information for display
#[derive(Debug, Serialize)]
pub struct ParticipantInfo {
    pub identity: String,
    pub record: String,
    pub registered: bool,
    pub sponsor: Option<String>,
    pub tier: u8,
    pub completed: bool,
    pub in_tier_count: u32,
    pub tier_counts: [u32; CHEST_COUNT],
    pub total_payout_lamports: u64,
}

impl ParticipantInfo {
    /// Summarize a participant; `None` stands for an identity without a record
    #[must_use]
    pub fn new(identity: &Pubkey, record_address: &Pubkey, record: Option<&Participant>) -> Self {
        let blank = Participant::blank(*identity);
        let participant = record.unwrap_or(&blank);
        Self {
            identity: identity.to_string(),
            record: record_address.to_string(),
            registered: participant.current_sponsor().is_some(),
            sponsor: participant.current_sponsor().map(|s| s.to_string()),
            tier: participant.tier,
            completed: usize::from(participant.tier) >= CHEST_COUNT,
            in_tier_count: participant.current_in_tier_count(),
            tier_counts: participant.tier_counts,
            total_payout_lamports: participant.total_payout_lamports,
        }
    }
}

/// Serialize any display value as pretty JSON
///
/// # Errors
/// Returns an error if JSON serialization fails
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| anyhow!("Failed to serialize to JSON: {e}"))
}

/// Format the chest table for human-readable output
#[must_use]
pub fn format_chests_human(chests: &[ChestInfo]) -> String {
    let mut output = String::from("Chest table\n\n");
    let _ = writeln!(
        output,
        "{:<6} {:<20} {:<20} {:<14}",
        "Chest", "Referrals to unlock", "Payout (lamports)", "Payout (SOL)"
    );
    output.push_str(&"-".repeat(63));
    output.push('\n');

    for chest in chests {
        let _ = writeln!(
            output,
            "{:<6} {:<20} {:<20} {:<14.9}",
            chest.index, chest.referrals_to_unlock, chest.payout_lamports, chest.payout_sol
        );
    }

    let total: u64 = chests.iter().map(|chest| chest.payout_lamports).sum();
    let _ = write!(output, "\nPayout of a completed table: {total} lamports");
    output
}

/// Format a single chest for human-readable output
#[must_use]
pub fn format_chest_human(chest: &ChestInfo) -> String {
    format!(
        "Chest {}\nReferrals to unlock: {}\nPayout: {} lamports ({:.9} SOL)",
        chest.index, chest.referrals_to_unlock, chest.payout_lamports, chest.payout_sol
    )
}

/// Format a participant for human-readable output
#[must_use]
pub fn format_participant_human(info: &ParticipantInfo, config: &ReferralCliConfig) -> String {
    let mut output = format!("Participant: {}\nRecord: {}\n", info.identity, info.record);
    if info.registered {
        let _ = writeln!(
            output,
            "Sponsor: {}",
            info.sponsor.as_deref().unwrap_or_default()
        );
    } else {
        output.push_str("Sponsor: none (not registered)\n");
    }

    if info.completed {
        output.push_str("Tier: completed (every chest unlocked)\n");
    } else {
        let _ = writeln!(
            output,
            "Tier: {} ({} referrals counted)",
            info.tier, info.in_tier_count
        );
    }

    let counts: Vec<String> = info.tier_counts.iter().map(ToString::to_string).collect();
    let _ = writeln!(output, "Referrals per tier: [{}]", counts.join(", "));
    let _ = write!(
        output,
        "Total paid out: {} lamports ({:.9} SOL)",
        info.total_payout_lamports,
        config.format_sol(info.total_payout_lamports)
    );
    output
}

/// JSON view of a join quote with base58 addresses
#[must_use]
pub fn quote_json(quote: &JoinQuote) -> serde_json::Value {
    serde_json::json!({
        "joiner": quote.joiner.to_string(),
        "sponsor": quote.sponsor.to_string(),
        "first_join": quote.first_join,
        "chest_index": quote.chest_index,
        "price_lamports": quote.price_lamports,
        "refund_lamports": quote.refund_lamports,
        "unlocks_chest": quote.unlocks_chest,
        "payout_lamports": quote.payout_lamports,
        "sponsor_tier": quote.sponsor_tier,
        "sponsor_in_tier_count": quote.sponsor_in_tier_count,
    })
}

/// Format a join quote for human-readable output
#[must_use]
pub fn format_quote_human(quote: &JoinQuote, config: &ReferralCliConfig) -> String {
    let mut output = format!(
        "Join preview for {}\nSponsor: {}\n",
        quote.joiner, quote.sponsor
    );
    output.push_str(if quote.first_join {
        "Kind: first join\n"
    } else {
        "Kind: repeat join\n"
    });
    match quote.chest_index {
        Some(index) => {
            let _ = writeln!(
                output,
                "Price: {} lamports ({:.9} SOL, sponsor chest {index})",
                quote.price_lamports,
                config.format_sol(quote.price_lamports)
            );
        }
        None => output.push_str("Price: nothing charged, sponsor confirmed only\n"),
    }
    let _ = writeln!(output, "Refund: {} lamports", quote.refund_lamports);
    if quote.unlocks_chest {
        let _ = writeln!(
            output,
            "Unlocks sponsor chest: {} lamports paid to the sponsor",
            quote.payout_lamports
        );
    }
    let _ = write!(
        output,
        "Sponsor after join: tier {}, {} referrals counted",
        quote.sponsor_tier, quote.sponsor_in_tier_count
    );
    output
}

/// One-line description of a program event
#[must_use]
pub fn format_event_human(event: &ReferralEvent) -> String {
    match event {
        ReferralEvent::RegistryInitialized(e) => format!(
            "RegistryInitialized: registry {} administered by {}",
            e.registry, e.admin
        ),
        ReferralEvent::PayoutUpdated(e) => format!(
            "PayoutUpdated: chest {} {} -> {} lamports",
            e.chest_index, e.old_payout_lamports, e.new_payout_lamports
        ),
        ReferralEvent::Joined(e) => format!(
            "Joined: {} under {} paid {}, kept {}, refunded {}; sponsor on tier {} with {} referrals",
            e.participant,
            e.sponsor,
            e.paid_lamports,
            e.price_lamports,
            e.refund_lamports,
            e.sponsor_tier,
            e.sponsor_in_tier_count
        ),
        ReferralEvent::ChestUnlocked(e) => format!(
            "ChestUnlocked: chest {} paid {} lamports to {}, now on tier {}",
            e.chest_index, e.payout_lamports, e.sponsor, e.next_tier
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use referral_chests_sdk::events::ChestUnlocked;

    fn config() -> ReferralCliConfig {
        ReferralCliConfig::from_lookup(|_| None)
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("human").unwrap(), OutputFormat::Human);
        assert_eq!(parse_output_format("JSON").unwrap(), OutputFormat::Json);
        assert!(parse_output_format("yaml").is_err());
    }

    #[test]
    fn test_format_chests_human() {
        let config = config();
        let chests = [
            ChestInfo::new(
                0,
                &Chest {
                    payout_lamports: 100,
                    referrals_to_unlock: 3,
                },
                &config,
            ),
            ChestInfo::new(
                1,
                &Chest {
                    payout_lamports: 250,
                    referrals_to_unlock: 9,
                },
                &config,
            ),
        ];

        let output = format_chests_human(&chests);

        assert!(output.contains("Referrals to unlock"));
        assert!(output.contains("Payout of a completed table: 350 lamports"));
        assert_eq!(output.lines().filter(|l| l.starts_with('1')).count(), 1);
    }

    #[test]
    fn test_chest_json() {
        let info = ChestInfo::new(
            7,
            &Chest {
                payout_lamports: 1_500_000_000,
                referrals_to_unlock: 2187,
            },
            &config(),
        );

        let value: serde_json::Value = serde_json::from_str(&to_json(&info).unwrap()).unwrap();

        assert_eq!(value["index"], 7);
        assert_eq!(value["referrals_to_unlock"], 2187);
        assert_eq!(value["payout_lamports"], 1_500_000_000_u64);
        assert!((value["payout_sol"].as_f64().unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unknown_identity_is_unregistered() {
        let identity = Pubkey::new_unique();
        let info = ParticipantInfo::new(&identity, &Pubkey::new_unique(), None);

        assert!(!info.registered);
        assert!(!info.completed);
        assert_eq!(info.tier, 0);
        assert_eq!(info.in_tier_count, 0);
        assert!(format_participant_human(&info, &config()).contains("not registered"));
    }

    #[test]
    fn test_completed_participant() {
        let identity = Pubkey::new_unique();
        let sponsor = Pubkey::new_unique();
        let record = Participant {
            sponsor: Some(sponsor),
            tier: 8,
            tier_counts: [1, 1, 1, 1, 1, 1, 1, 1],
            total_payout_lamports: 800,
            ..Participant::blank(identity)
        };

        let info = ParticipantInfo::new(&identity, &Pubkey::new_unique(), Some(&record));
        let output = format_participant_human(&info, &config());

        assert!(info.registered);
        assert!(info.completed);
        assert_eq!(info.sponsor, Some(sponsor.to_string()));
        assert!(output.contains("Tier: completed"));
        assert!(output.contains("Referrals per tier: [1, 1, 1, 1, 1, 1, 1, 1]"));
        assert!(output.contains("Total paid out: 800 lamports"));
    }

    #[test]
    fn test_quote_output() {
        let quote = JoinQuote {
            joiner: Pubkey::new_unique(),
            sponsor: Pubkey::new_unique(),
            first_join: true,
            chest_index: Some(0),
            price_lamports: 100,
            refund_lamports: 50,
            unlocks_chest: true,
            payout_lamports: 100,
            sponsor_tier: 1,
            sponsor_in_tier_count: 1,
        };

        let human = format_quote_human(&quote, &config());
        let json = quote_json(&quote);

        assert!(human.contains("Kind: first join"));
        assert!(human.contains("Refund: 50 lamports"));
        assert!(human.contains("Unlocks sponsor chest: 100 lamports"));
        assert_eq!(json["sponsor"], quote.sponsor.to_string());
        assert_eq!(json["chest_index"], 0);
    }

    #[test]
    fn test_confirm_only_quote_output() {
        let quote = JoinQuote {
            joiner: Pubkey::new_unique(),
            sponsor: Pubkey::new_unique(),
            first_join: false,
            chest_index: None,
            price_lamports: 0,
            refund_lamports: 100,
            unlocks_chest: false,
            payout_lamports: 0,
            sponsor_tier: 0,
            sponsor_in_tier_count: 2,
        };

        let human = format_quote_human(&quote, &config());

        assert!(human.contains("Kind: repeat join"));
        assert!(human.contains("nothing charged"));
        assert!(!human.contains("Unlocks"));
        assert!(quote_json(&quote)["chest_index"].is_null());
    }

    #[test]
    fn test_format_unlock_event() {
        let event = ReferralEvent::ChestUnlocked(ChestUnlocked {
            sponsor: Pubkey::new_unique(),
            participant: Pubkey::new_unique(),
            chest_index: 2,
            payout_lamports: 500,
            next_tier: 3,
        });

        let line = format_event_human(&event);

        assert!(line.starts_with("ChestUnlocked: chest 2 paid 500 lamports"));
        assert!(line.ends_with("now on tier 3"));
    }
}
