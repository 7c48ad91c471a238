//! Configuration management for the referral chests CLI
//!
//! Values come from environment variables with sensible defaults; command-line
//! flags override them in `main`.

use anchor_client::solana_sdk::native_token::LAMPORTS_PER_SOL;
use std::env;

/// Centralized configuration for the referral chests CLI
#[derive(Debug, Clone)]
pub struct ReferralCliConfig {
    /// Default RPC URL for Solana connections
    pub default_rpc_url: String,

    /// Default output format for CLI commands
    pub default_output_format: String,

    /// Lamports per displayed SOL unit
    pub lamports_per_sol: u64,
}

impl ReferralCliConfig {
    /// Create a new configuration instance with values from environment variables
    /// or sensible defaults if not set
    #[must_use]
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            default_rpc_url: lookup("REFERRAL_RPC_URL")
                .unwrap_or_else(|| "https://api.devnet.solana.com".to_string()),

            default_output_format: lookup("REFERRAL_DEFAULT_OUTPUT_FORMAT")
                .unwrap_or_else(|| "human".to_string()),

            lamports_per_sol: lookup("REFERRAL_LAMPORTS_PER_SOL")
                .and_then(|s| s.parse().ok())
                .filter(|divisor| *divisor > 0)
                .unwrap_or(LAMPORTS_PER_SOL),
        }
    }

    /// Convert lamports to SOL for display
    #[allow(clippy::cast_precision_loss)] // Acceptable for display formatting
    #[must_use]
    pub fn format_sol(&self, lamports: u64) -> f64 {
        lamports as f64 / self.lamports_per_sol as f64
    }
}

impl Default for ReferralCliConfig {
    fn default() -> Self {
        Self::new()
    }
}
