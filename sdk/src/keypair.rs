//! Keypair loading utilities

use crate::error::{ReferralSdkError, Result};
use anchor_client::solana_sdk::signature::{read_keypair_file, Keypair};
use std::path::PathBuf;

/// Path of the Solana CLI default keypair, `~/.config/solana/id.json`
///
/// # Errors
/// Returns an error if the home directory cannot be determined
pub fn default_keypair_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .ok_or_else(|| ReferralSdkError::Generic("Cannot determine home directory".to_string()))?
        .join(".config")
        .join("solana")
        .join("id.json"))
}

/// Load a keypair from file path or use default Solana CLI keypair
///
/// # Arguments
/// * `keypair_path` - Optional path to keypair file
///
/// # Returns
/// * `Ok(Keypair)` - The loaded keypair
/// * `Err(ReferralSdkError)` - If loading fails
pub fn load_keypair(keypair_path: Option<&str>) -> Result<Keypair> {
    if let Some(path) = keypair_path {
        read_keypair_file(path).map_err(|e| {
            ReferralSdkError::Generic(format!("Failed to load keypair from {path}: {e}"))
        })
    } else {
        let default_path = default_keypair_path()?;

        read_keypair_file(&default_path).map_err(|e| {
            ReferralSdkError::Generic(format!(
                "Failed to load default keypair from {}: {}. Use --keypair to specify a keypair file.",
                default_path.display(),
                e
            ))
        })
    }
}
