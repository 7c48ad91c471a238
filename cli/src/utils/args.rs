//! Parsing of command-line values into program types

use anchor_lang::prelude::Pubkey;
use anyhow::{anyhow, Result};
use referral_chests_sdk::{RepeatJoinPolicy, CHEST_COUNT};
use std::str::FromStr;

/// Repeat-join policy as accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum RepeatJoinPolicyArg {
    /// Charge again and count the join against the stored sponsor
    Recount,
    /// Refund everything and only confirm the stored sponsor
    ConfirmOnly,
}

impl From<RepeatJoinPolicyArg> for RepeatJoinPolicy {
    fn from(arg: RepeatJoinPolicyArg) -> Self {
        match arg {
            RepeatJoinPolicyArg::Recount => Self::Recount,
            RepeatJoinPolicyArg::ConfirmOnly => Self::ConfirmOnly,
        }
    }
}

/// Parse a base58 address, naming the argument in the error
///
/// # Errors
/// Returns an error if `value` is not a valid public key
pub fn parse_pubkey(label: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).map_err(|e| anyhow!("Invalid {label} address '{value}': {e}"))
}

/// Parse a comma-separated list of one referral threshold per chest
///
/// # Errors
/// Returns an error unless exactly one positive integer per chest is given
pub fn parse_referrals_to_unlock(value: &str) -> Result<[u32; CHEST_COUNT]> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != CHEST_COUNT {
        return Err(anyhow!(
            "Expected {CHEST_COUNT} comma-separated thresholds, got {}",
            parts.len()
        ));
    }

    let mut thresholds = [0u32; CHEST_COUNT];
    for (index, (slot, part)) in thresholds.iter_mut().zip(parts).enumerate() {
        let threshold: u32 = part
            .parse()
            .map_err(|e| anyhow!("Invalid threshold '{part}' for chest {index}: {e}"))?;
        if threshold == 0 {
            return Err(anyhow!("Threshold for chest {index} must be at least 1"));
        }
        *slot = threshold;
    }
    Ok(thresholds)
}
