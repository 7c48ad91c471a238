//! Command implementations for the referral chests CLI
//!
//! Each command lives in its own file and returns the text to print, already
//! rendered in the requested output format.

pub mod chest;
pub mod chests;
pub mod init_registry;
pub mod join;
pub mod participant;
pub mod quote;
pub mod set_payout;

// Re-export command execution functions for easy access
pub use chest::execute as execute_chest;
pub use chests::execute as execute_chests;
pub use init_registry::execute as execute_init_registry;
pub use join::execute as execute_join;
pub use participant::execute as execute_participant;
pub use quote::execute as execute_quote;
pub use set_payout::execute as execute_set_payout;
