//! Unit tests for tier progression under a single sponsor
//!
//! These tests drive `settle_join` the way the `join` instruction does: each
//! join works on copies of the registry and the two participant records, and
//! the copies replace the stored state only when settlement succeeds.
//! For full integration tests with BPF runtime, use `anchor test`.
//!
//! Test coverage:
//! - The reference scenario (thresholds 3 and 9, chest 0 payout 100)
//! - Payout joins land exactly one join after each chest fills
//! - Completed chests keep their threshold as the frozen counter
//! - Payout amount is read from the chest the sponsor was on
//! - Unlocking the last chest completes the table; later joins fail
//! - Sponsor records are allocated without registering the sponsor

use std::collections::HashMap;

use anchor_lang::error::Error;
use anchor_lang::prelude::*;
use referral_chests::constants::{CHEST_COUNT, DEFAULT_REFERRALS_TO_UNLOCK};
use referral_chests::settlement::{settle_join, JoinRequest, JoinSettlement};
use referral_chests::state::{Participant, ReferralStep, Registry, RepeatJoinPolicy};

struct Ledger {
    admin: Pubkey,
    registry: Registry,
    records: HashMap<Pubkey, Participant>,
}

impl Ledger {
    fn new(referrals_to_unlock: [u32; CHEST_COUNT]) -> Self {
        let admin = Pubkey::new_unique();
        let registry =
            Registry::new(admin, referrals_to_unlock, RepeatJoinPolicy::Recount, 255).unwrap();
        Self {
            admin,
            registry,
            records: HashMap::new(),
        }
    }

    fn set_payout(&mut self, index: u8, payout_lamports: u64) {
        let admin = self.admin;
        self.registry
            .set_payout(&admin, index, payout_lamports)
            .unwrap();
    }

    fn record(&self, identity: Pubkey) -> Participant {
        self.records
            .get(&identity)
            .cloned()
            .unwrap_or_else(|| Participant::blank(identity))
    }

    fn join(&mut self, joiner: Pubkey, sponsor: Pubkey, paid_lamports: u64) -> Result<JoinSettlement> {
        let mut registry = self.registry.clone();
        let mut joiner_record = self.record(joiner);
        let mut sponsor_record = self.record(sponsor);

        let settlement = settle_join(
            &mut registry,
            &mut joiner_record,
            &mut sponsor_record,
            &JoinRequest {
                joiner,
                sponsor_account: sponsor,
                proposed_sponsor: sponsor,
                paid_lamports,
            },
        )?;

        self.registry = registry;
        self.records.insert(joiner, joiner_record);
        self.records.insert(sponsor, sponsor_record);
        Ok(settlement)
    }

    /// Join under `sponsor` with a fresh identity paying the current price
    fn fresh_join(&mut self, sponsor: Pubkey) -> JoinSettlement {
        let tier = self.record(sponsor).tier;
        let price = self.registry.chest(tier).unwrap().payout_lamports;
        self.join(Pubkey::new_unique(), sponsor, price).unwrap()
    }
}

fn error_code(error: Error) -> u32 {
    match error {
        Error::AnchorError(anchor_error) => anchor_error.error_code_number,
        Error::ProgramError(_) => panic!("Expected AnchorError variant"),
    }
}

/// Three joins fill chest 0, the fourth unlocks it, two more count on tier 1
#[test]
fn test_reference_scenario() {
    let mut ledger = Ledger::new(DEFAULT_REFERRALS_TO_UNLOCK);
    ledger.set_payout(0, 100);
    let sponsor = Pubkey::new_unique();

    for _ in 0..3 {
        let settlement = ledger.join(Pubkey::new_unique(), sponsor, 100).unwrap();
        assert_eq!(settlement.payout_lamports(), 0);
    }
    let record = ledger.record(sponsor);
    assert_eq!(record.tier, 0);
    assert_eq!(record.in_tier_count(0).unwrap(), 3);

    let fourth = ledger.join(Pubkey::new_unique(), sponsor, 100).unwrap();
    assert_eq!(fourth.payout_lamports(), 100, "Fourth join releases chest 0");
    let record = ledger.record(sponsor);
    assert_eq!(record.tier, 1);
    assert_eq!(record.in_tier_count(1).unwrap(), 1);
    assert_eq!(record.total_payout_lamports, 100);

    // Chest 1 is free, so the next joins pay 100 and get all of it back
    for _ in 0..2 {
        let settlement = ledger.join(Pubkey::new_unique(), sponsor, 100).unwrap();
        assert_eq!(settlement.price_lamports, 0);
        assert_eq!(settlement.refund_lamports, 100);
    }
    let record = ledger.record(sponsor);
    assert_eq!(record.tier, 1);
    assert_eq!(record.in_tier_count(1).unwrap(), 3);
}

/// With threshold k on every chest the sponsor is paid on joins
/// k + 1, 2k + 1, 3k + 1 and so on, never earlier
#[test]
fn test_payout_joins_for_uniform_threshold() {
    for k in [1_u32, 2, 3, 5] {
        let mut ledger = Ledger::new([k; CHEST_COUNT]);
        for index in 0..8 {
            ledger.set_payout(index, 7);
        }
        let sponsor = Pubkey::new_unique();

        let mut payout_joins = Vec::new();
        for join_number in 1..=(3 * k + 1) {
            if ledger.fresh_join(sponsor).payout_lamports() > 0 {
                payout_joins.push(join_number);
            }
        }

        assert_eq!(
            payout_joins,
            vec![k + 1, 2 * k + 1, 3 * k + 1],
            "Unexpected payout joins for threshold {k}"
        );
        assert_eq!(ledger.record(sponsor).tier, 3);
        assert_eq!(ledger.record(sponsor).total_payout_lamports, 21);
    }
}

/// The tier advances by exactly one per payout
#[test]
fn test_tier_advances_one_step_per_payout() {
    let mut ledger = Ledger::new([2; CHEST_COUNT]);
    let sponsor = Pubkey::new_unique();

    let mut previous_tier = 0;
    for _ in 0..12 {
        let settlement = ledger.fresh_join(sponsor);
        let tier = ledger.record(sponsor).tier;
        if matches!(settlement.step, Some(ReferralStep::Unlocked { .. })) {
            assert_eq!(tier, previous_tier + 1);
        } else {
            assert_eq!(tier, previous_tier);
        }
        previous_tier = tier;
    }
    // 12 joins with threshold 2: unlocks on joins 3, 5, 7, 9, 11
    assert_eq!(previous_tier, 5);
}

#[test]
fn test_completed_tiers_report_threshold() {
    let thresholds = [2, 3, 4, 5, 6, 7, 8, 9];
    let mut ledger = Ledger::new(thresholds);
    let sponsor = Pubkey::new_unique();

    // Chest 0: joins 1-2 fill, 3 unlocks. Chest 1: 3 counted, 4-5 fill, 6 unlocks.
    // Chest 2: 6 counted, 7-9 fill, 10 unlocks and counts as 1 on chest 3.
    for _ in 0..11 {
        ledger.fresh_join(sponsor);
    }

    let record = ledger.record(sponsor);
    assert_eq!(record.tier, 3);
    for tier in 0..3 {
        assert_eq!(
            record.in_tier_count(tier).unwrap(),
            thresholds[usize::from(tier)],
            "Completed tier {tier} should be frozen at its threshold"
        );
    }
    assert_eq!(record.in_tier_count(3).unwrap(), 2);
    for tier in 4..8 {
        assert_eq!(record.in_tier_count(tier).unwrap(), 0);
    }
}

/// The payout is the one of the chest read before the advance
#[test]
fn test_payout_uses_chest_being_left() {
    let mut ledger = Ledger::new([1; CHEST_COUNT]);
    ledger.set_payout(0, 100);
    ledger.set_payout(1, 250);
    let sponsor = Pubkey::new_unique();

    assert_eq!(ledger.join(Pubkey::new_unique(), sponsor, 100).unwrap().payout_lamports(), 0);

    let unlock = ledger.join(Pubkey::new_unique(), sponsor, 100).unwrap();
    assert_eq!(unlock.price_lamports, 100);
    assert_eq!(unlock.payout_lamports(), 100);

    // Chest 1 already holds the unlocking join, so the next one unlocks it
    let next = ledger.join(Pubkey::new_unique(), sponsor, 250).unwrap();
    assert_eq!(next.price_lamports, 250);
    assert_eq!(next.payout_lamports(), 250);
    assert_eq!(ledger.record(sponsor).tier, 2);
    assert_eq!(ledger.record(sponsor).in_tier_count(1).unwrap(), 1);
    assert_eq!(ledger.record(sponsor).total_payout_lamports, 350);
}

#[test]
fn test_last_chest_completes_table() {
    let mut ledger = Ledger::new([1; CHEST_COUNT]);
    ledger.set_payout(7, 500);
    let sponsor = Pubkey::new_unique();

    // Chest 0 takes two joins, every later chest one more
    for _ in 0..8 {
        ledger.fresh_join(sponsor);
    }
    let record = ledger.record(sponsor);
    assert_eq!(record.tier, 7);
    assert_eq!(record.in_tier_count(7).unwrap(), 1);

    let last = ledger.join(Pubkey::new_unique(), sponsor, 500).unwrap();
    assert_eq!(last.payout_lamports(), 500);

    let record = ledger.record(sponsor);
    assert_eq!(usize::from(record.tier), CHEST_COUNT);
    assert!(record.has_completed_table());
    assert_eq!(record.current_in_tier_count(), 0);
    assert_eq!(record.in_tier_count(7).unwrap(), 1);

    let before = ledger.registry.clone();
    let late_joiner = Pubkey::new_unique();
    let err = ledger.join(late_joiner, sponsor, 500).unwrap_err();
    assert_eq!(error_code(err), 6001, "Completed sponsor has no chest left");
    assert_eq!(ledger.registry.total_collected_lamports, before.total_collected_lamports);
    assert_eq!(ledger.registry.participant_count, before.participant_count);
    assert!(!ledger.records.contains_key(&late_joiner));
}

/// Being named as a sponsor allocates counters but does not register
#[test]
fn test_sponsor_record_is_not_registration() {
    let mut ledger = Ledger::new(DEFAULT_REFERRALS_TO_UNLOCK);
    let sponsor = Pubkey::new_unique();
    let joiner = Pubkey::new_unique();

    ledger.join(joiner, sponsor, 0).unwrap();

    let sponsor_record = ledger.record(sponsor);
    assert!(!sponsor_record.is_registered());
    assert_eq!(sponsor_record.current_sponsor(), None);
    assert_eq!(sponsor_record.in_tier_count(0).unwrap(), 1);

    let joiner_record = ledger.record(joiner);
    assert!(joiner_record.is_registered());
    assert_eq!(joiner_record.current_sponsor(), Some(sponsor));
    assert_eq!(ledger.registry.participant_count, 1);
}

/// A sponsored identity can itself sponsor and climb independently
#[test]
fn test_two_level_tree() {
    let mut ledger = Ledger::new([1; CHEST_COUNT]);
    let root = Pubkey::new_unique();
    let middle = Pubkey::new_unique();

    ledger.join(middle, root, 0).unwrap();
    for _ in 0..2 {
        ledger.fresh_join(middle);
    }

    assert_eq!(ledger.record(middle).tier, 1);
    assert_eq!(ledger.record(middle).current_sponsor(), Some(root));
    assert_eq!(ledger.record(root).tier, 0);
    assert_eq!(ledger.record(root).in_tier_count(0).unwrap(), 1);
}
