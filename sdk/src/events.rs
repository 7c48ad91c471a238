//! Event parsing for referral chests transactions
//!
//! Anchor writes each emitted event to the transaction log as
//! `Program data: <base64>`, where the payload is the event discriminator
//! followed by the borsh-serialized event. Only lines written while the
//! referral chests program is the innermost running program are considered.

use crate::error::{ReferralSdkError, Result};
use anchor_lang::prelude::Pubkey;
use anchor_lang::{AnchorDeserialize, Discriminator};
use base64::prelude::*;
pub use referral_chests::events::{ChestUnlocked, Joined, PayoutUpdated, RegistryInitialized};
use tracing::debug;

const PROGRAM_DATA_PREFIX: &str = "Program data: ";

/// Every event the program emits
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReferralEvent {
    /// The registry was created
    RegistryInitialized(RegistryInitialized),
    /// The administrator changed a chest payout
    PayoutUpdated(PayoutUpdated),
    /// A join succeeded
    Joined(Joined),
    /// A join unlocked the sponsor's chest
    ChestUnlocked(ChestUnlocked),
}

impl ReferralEvent {
    /// Event name as declared by the program
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RegistryInitialized(_) => "RegistryInitialized",
            Self::PayoutUpdated(_) => "PayoutUpdated",
            Self::Joined(_) => "Joined",
            Self::ChestUnlocked(_) => "ChestUnlocked",
        }
    }
}

fn decode<T: AnchorDeserialize>(name: &str, data: &[u8]) -> Result<T> {
    T::try_from_slice(data)
        .map_err(|e| ReferralSdkError::ParseError(format!("Failed to deserialize {name} event: {e}")))
}

/// Parse a single event from base64-encoded data
///
/// # Errors
/// Returns `ParseError` for invalid base64, short data, unknown
/// discriminators or payloads that do not deserialize.
pub fn parse_single_event(data: &str) -> Result<ReferralEvent> {
    let decoded = BASE64_STANDARD
        .decode(data.trim())
        .map_err(|e| ReferralSdkError::ParseError(format!("Failed to decode base64: {e}")))?;

    if decoded.len() < 8 {
        return Err(ReferralSdkError::ParseError(
            "Event data too short, must be at least 8 bytes for discriminator".to_string(),
        ));
    }
    let (discriminator, payload) = decoded.split_at(8);

    if discriminator == RegistryInitialized::DISCRIMINATOR {
        decode("RegistryInitialized", payload).map(ReferralEvent::RegistryInitialized)
    } else if discriminator == PayoutUpdated::DISCRIMINATOR {
        decode("PayoutUpdated", payload).map(ReferralEvent::PayoutUpdated)
    } else if discriminator == Joined::DISCRIMINATOR {
        decode("Joined", payload).map(ReferralEvent::Joined)
    } else if discriminator == ChestUnlocked::DISCRIMINATOR {
        decode("ChestUnlocked", payload).map(ReferralEvent::ChestUnlocked)
    } else {
        Err(ReferralSdkError::ParseError(format!(
            "Unknown event discriminator: {discriminator:?}"
        )))
    }
}

/// Parse the program's events from a transaction's log messages
///
/// Lines that fail to parse are skipped.
///
/// # Arguments
/// * `logs` - Log messages of one transaction
/// * `program_id` - The referral chests program ID
#[must_use]
pub fn parse_events_from_logs(logs: &[String], program_id: &Pubkey) -> Vec<ReferralEvent> {
    let program = program_id.to_string();
    let mut invocation_stack: Vec<&str> = Vec::new();
    let mut events = Vec::new();

    for log in logs {
        if let Some(data) = log.strip_prefix(PROGRAM_DATA_PREFIX) {
            if invocation_stack.last() != Some(&program.as_str()) {
                continue;
            }
            match parse_single_event(data) {
                Ok(event) => events.push(event),
                Err(e) => debug!(error = %e, "Skipping unparseable program data"),
            }
            continue;
        }

        let Some(rest) = log.strip_prefix("Program ") else {
            continue;
        };
        let mut words = rest.split_whitespace();
        let (Some(id), Some(action)) = (words.next(), words.next()) else {
            continue;
        };
        match action {
            "invoke" => invocation_stack.push(id),
            "success" | "failed:" => {
                invocation_stack.pop();
            }
            _ => {}
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use anchor_lang::AnchorSerialize;
    use referral_chests::RepeatJoinPolicy;

    fn encode<T: AnchorSerialize + Discriminator>(event: &T) -> String {
        let mut data = T::DISCRIMINATOR.to_vec();
        event.serialize(&mut data).unwrap();
        BASE64_STANDARD.encode(data)
    }

    fn joined() -> Joined {
        Joined {
            participant: Pubkey::new_unique(),
            sponsor: Pubkey::new_unique(),
            first_join: true,
            paid_lamports: 150,
            price_lamports: 100,
            refund_lamports: 50,
            sponsor_tier: 0,
            sponsor_in_tier_count: 1,
        }
    }

    fn wrap(program_id: &Pubkey, data_lines: &[String]) -> Vec<String> {
        let mut logs = vec![format!("Program {program_id} invoke [1]")];
        logs.push("Program log: Instruction: Join".to_string());
        logs.extend(data_lines.iter().map(|line| format!("{PROGRAM_DATA_PREFIX}{line}")));
        logs.push(format!("Program {program_id} success"));
        logs
    }

    #[test]
    fn test_parse_joined_event() {
        let event = joined();

        let parsed = parse_single_event(&encode(&event)).unwrap();

        assert_eq!(parsed, ReferralEvent::Joined(event));
        assert_eq!(parsed.name(), "Joined");
    }

    #[test]
    fn test_parse_registry_initialized_event() {
        let event = RegistryInitialized {
            registry: Pubkey::new_unique(),
            admin: Pubkey::new_unique(),
            referrals_to_unlock: [3, 9, 27, 81, 243, 729, 2187, 6561],
            repeat_join_policy: RepeatJoinPolicy::ConfirmOnly,
        };

        let parsed = parse_single_event(&encode(&event)).unwrap();

        assert_eq!(parsed, ReferralEvent::RegistryInitialized(event));
    }

    #[test]
    fn test_parse_single_event_invalid_base64() {
        let result = parse_single_event("invalid_base64_!@#$%");
        assert!(matches!(result, Err(ReferralSdkError::ParseError(msg)) if msg.contains("base64")));
    }

    #[test]
    fn test_parse_single_event_too_short() {
        let result = parse_single_event(&BASE64_STANDARD.encode([1, 2, 3]));
        assert!(matches!(result, Err(ReferralSdkError::ParseError(msg)) if msg.contains("too short")));
    }

    #[test]
    fn test_parse_single_event_unknown_discriminator() {
        let result = parse_single_event(&BASE64_STANDARD.encode([0_u8; 16]));
        assert!(
            matches!(result, Err(ReferralSdkError::ParseError(msg)) if msg.contains("Unknown event"))
        );
    }

    #[test]
    fn test_parse_events_from_logs_in_order() {
        let program_id = Pubkey::new_unique();
        let join = joined();
        let unlock = ChestUnlocked {
            sponsor: join.sponsor,
            participant: join.participant,
            chest_index: 0,
            payout_lamports: 100,
            next_tier: 1,
        };
        let logs = wrap(&program_id, &[encode(&unlock), encode(&join)]);

        let events = parse_events_from_logs(&logs, &program_id);

        assert_eq!(
            events,
            vec![ReferralEvent::ChestUnlocked(unlock), ReferralEvent::Joined(join)]
        );
    }

    #[test]
    fn test_parse_events_skips_other_programs() {
        let program_id = Pubkey::new_unique();
        let other_program = Pubkey::new_unique();
        let logs = wrap(&other_program, &[encode(&joined())]);

        assert!(parse_events_from_logs(&logs, &program_id).is_empty());
    }

    #[test]
    fn test_parse_events_ignores_nested_system_program() {
        let program_id = Pubkey::new_unique();
        let event = joined();
        let logs = vec![
            format!("Program {program_id} invoke [1]"),
            "Program 11111111111111111111111111111111 invoke [2]".to_string(),
            "Program 11111111111111111111111111111111 success".to_string(),
            format!("{PROGRAM_DATA_PREFIX}{}", encode(&event)),
            format!("Program {program_id} consumed 12000 of 200000 compute units"),
            format!("Program {program_id} success"),
        ];

        let events = parse_events_from_logs(&logs, &program_id);

        assert_eq!(events, vec![ReferralEvent::Joined(event)]);
    }

    #[test]
    fn test_parse_events_skips_malformed_lines() {
        let program_id = Pubkey::new_unique();
        let event = joined();
        let logs = wrap(
            &program_id,
            &["invalid_base64_!@#$%".to_string(), encode(&event)],
        );

        let events = parse_events_from_logs(&logs, &program_id);

        assert_eq!(events, vec![ReferralEvent::Joined(event)]);
    }
}
