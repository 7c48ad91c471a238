//! Referral Chests SDK - Rust SDK for the referral chests program
//!
//! This crate provides the client side of the referral chests program:
//!
//! - Computing Program Derived Addresses (PDAs) for the registry and participants
//! - Building `init_registry`, `set_payout` and `join` instructions
//! - Fetching and decoding registry and participant accounts
//! - Previewing joins off-chain with the program's own settlement logic
//! - Parsing program events out of transaction logs
//!
//! # Example Usage
//!
//! ```no_run
//! use referral_chests_sdk::{pda, ReferralClient};
//! use anchor_lang::prelude::Pubkey;
//!
//! # fn main() -> referral_chests_sdk::Result<()> {
//! let client = ReferralClient::new("https://api.devnet.solana.com")?;
//!
//! let sponsor = Pubkey::new_unique();
//! let record = pda::participant_address(&sponsor);
//!
//! let chest = client.get_chest(0)?;
//! let quote = client.quote_join(&Pubkey::new_unique(), &sponsor, chest.payout_lamports)?;
//! println!("{record}: price {} lamports", quote.price_lamports);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod error;
pub mod events;
pub mod keypair;
pub mod pda;
pub mod quote;
pub mod simple_client;
pub mod transaction_builder;

// Re-export commonly used items
pub use error::{ReferralSdkError, Result};
pub use events::{parse_events_from_logs, parse_single_event, ReferralEvent};
pub use keypair::load_keypair;
pub use quote::{quote_join, JoinQuote};
pub use simple_client::ReferralClient;
pub use transaction_builder::{
    init_registry, join, set_payout, InitRegistryBuilder, JoinBuilder, SetPayoutBuilder,
};

// Re-export program types
pub use referral_chests::constants::{CHEST_COUNT, DEFAULT_REFERRALS_TO_UNLOCK, MAX_CHEST_INDEX};
pub use referral_chests::state::{Participant, Registry};
pub use referral_chests::{Chest, RepeatJoinPolicy};

// Re-export commonly used external types
pub use anchor_client::solana_client;
pub use anchor_client::solana_sdk;
pub use anchor_client::ClientError;

/// The program ID the program crate was built with
#[must_use]
pub const fn program_id() -> anchor_lang::prelude::Pubkey {
    referral_chests::ID
}
