//! Error types for the referral chests SDK
//!
//! Program error codes are mapped to dedicated variants so callers can match
//! on the failure instead of parsing log output:
//!
//! - **6000**: `Unauthorized`
//! - **6001**: `InvalidTierIndex`
//! - **6002**: `InsufficientPayment`
//! - **6003**: `InvalidThreshold`
//! - **6004**: `SelfSponsorship`
//! - **6005**: `ReferralCycle`
//! - **6006**: `SponsorMismatch`
//! - **6007**: `ArithmeticError`
//! - **6008**: `InvalidProgramData`
//! - **6009**: `PayoutBelowRentMinimum`
//!
//! # Example
//!
//! ```no_run
//! use referral_chests_sdk::{ReferralClient, ReferralSdkError};
//! use anchor_lang::prelude::Pubkey;
//!
//! let client = ReferralClient::new("https://api.devnet.solana.com").unwrap();
//! match client.quote_join(&Pubkey::new_unique(), &Pubkey::new_unique(), 100) {
//!     Ok(quote) => println!("Price: {} lamports", quote.price_lamports),
//!     Err(ReferralSdkError::InsufficientPayment) => println!("Attach more lamports"),
//!     Err(other) => println!("Other error: {other}"),
//! }
//! ```

use anchor_client::solana_client::client_error::ClientError as RpcClientError;
use anchor_client::solana_sdk::instruction::InstructionError;
use anchor_client::solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, ReferralSdkError>;

/// Error types that can occur when using the SDK
#[derive(Error, Debug)]
pub enum ReferralSdkError {
    /// Error from Anchor framework
    #[error("Anchor error: {0}")]
    Anchor(anchor_lang::error::Error),

    /// Error from Anchor client
    #[error("Anchor client error: {0}")]
    AnchorClient(Box<anchor_client::ClientError>),

    /// Malformed public key string
    #[error("Invalid public key: {0}")]
    InvalidPubkey(#[from] anchor_client::solana_sdk::pubkey::ParsePubkeyError),

    /// Error from serde JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("Referral SDK error: {0}")]
    Generic(String),

    /// Event or account parsing error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Account not found
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// RPC error for blockchain queries
    #[error("RPC error: {0}")]
    RpcError(String),

    // Program error variants (Anchor error codes 6000-6009)
    /// Signer is not the registry administrator (program error 6000)
    #[error("Unauthorized. Only the registry administrator can perform this action.")]
    Unauthorized,

    /// Chest index outside the table (program error 6001)
    #[error("Invalid chest index. Chest total is 7: valid indices are 0 through 7.")]
    InvalidTierIndex,

    /// Payment below the sponsor's current chest payout (program error 6002)
    #[error("Insufficient payment. Pay at least the payout of the sponsor's current chest.")]
    InsufficientPayment,

    /// Zero referral threshold at initialization (program error 6003)
    #[error("Invalid chest threshold. Every chest must require at least one referral.")]
    InvalidThreshold,

    /// Participant named itself as sponsor (program error 6004)
    #[error("A participant cannot sponsor itself.")]
    SelfSponsorship,

    /// Proposed sponsor was referred by the joiner (program error 6005)
    #[error("Referral cycle detected. The proposed sponsor was referred by the joining participant.")]
    ReferralCycle,

    /// Sponsor wallet does not match the participant's sponsor (program error 6006)
    #[error("Sponsor account does not match the participant's sponsor.")]
    SponsorMismatch,

    /// Checked arithmetic failed on-chain (program error 6007)
    #[error("Arithmetic operation would result in overflow or underflow.")]
    ArithmeticError,

    /// Wrong or malformed program data account (program error 6008)
    #[error("Invalid program data account.")]
    InvalidProgramData,

    /// Nonzero payout below the rent-exempt minimum of an empty wallet (program error 6009)
    #[error("Payout below the rent-exempt minimum. Use 0 or at least the rent-exempt balance of an empty account.")]
    PayoutBelowRentMinimum,
}

impl From<anchor_client::ClientError> for ReferralSdkError {
    fn from(error: anchor_client::ClientError) -> Self {
        Self::from_anchor_client_error(error)
    }
}

impl From<anchor_lang::error::Error> for ReferralSdkError {
    fn from(error: anchor_lang::error::Error) -> Self {
        Self::from_anchor_error(error)
    }
}

impl From<RpcClientError> for ReferralSdkError {
    fn from(error: RpcClientError) -> Self {
        Self::from_rpc_error(error)
    }
}

impl From<String> for ReferralSdkError {
    fn from(msg: String) -> Self {
        Self::Generic(msg)
    }
}

impl From<&str> for ReferralSdkError {
    fn from(msg: &str) -> Self {
        Self::Generic(msg.to_string())
    }
}

impl ReferralSdkError {
    /// Map a custom program error code to its variant
    ///
    /// Returns `None` for codes the program does not define.
    #[must_use]
    pub const fn from_program_code(code: u32) -> Option<Self> {
        match code {
            6000 => Some(Self::Unauthorized),
            6001 => Some(Self::InvalidTierIndex),
            6002 => Some(Self::InsufficientPayment),
            6003 => Some(Self::InvalidThreshold),
            6004 => Some(Self::SelfSponsorship),
            6005 => Some(Self::ReferralCycle),
            6006 => Some(Self::SponsorMismatch),
            6007 => Some(Self::ArithmeticError),
            6008 => Some(Self::InvalidProgramData),
            6009 => Some(Self::PayoutBelowRentMinimum),
            _ => None,
        }
    }

    /// The program error code this variant stands for, if any
    #[must_use]
    pub const fn program_code(&self) -> Option<u32> {
        match self {
            Self::Unauthorized => Some(6000),
            Self::InvalidTierIndex => Some(6001),
            Self::InsufficientPayment => Some(6002),
            Self::InvalidThreshold => Some(6003),
            Self::SelfSponsorship => Some(6004),
            Self::ReferralCycle => Some(6005),
            Self::SponsorMismatch => Some(6006),
            Self::ArithmeticError => Some(6007),
            Self::InvalidProgramData => Some(6008),
            Self::PayoutBelowRentMinimum => Some(6009),
            _ => None,
        }
    }

    /// Map an Anchor error to a program variant, falling back to `Anchor`
    #[must_use]
    pub fn from_anchor_error(anchor_error: anchor_lang::error::Error) -> Self {
        use anchor_lang::error::Error;

        let code = match &anchor_error {
            Error::AnchorError(anchor_err) => Some(anchor_err.error_code_number),
            Error::ProgramError(_) => None,
        };

        code.and_then(Self::from_program_code)
            .unwrap_or(Self::Anchor(anchor_error))
    }

    /// Map a failed transaction's custom error code, if it carries one
    fn from_transaction_error(error: Option<TransactionError>) -> Option<Self> {
        match error {
            Some(TransactionError::InstructionError(_, InstructionError::Custom(code))) => {
                Self::from_program_code(code)
            }
            _ => None,
        }
    }

    /// Map Anchor client errors to program variants where possible
    pub fn from_anchor_client_error(client_error: anchor_client::ClientError) -> Self {
        if let anchor_client::ClientError::SolanaClientError(solana_err) = &client_error {
            if let Some(mapped) = Self::from_transaction_error(solana_err.get_transaction_error())
            {
                return mapped;
            }
        }

        Self::AnchorClient(Box::new(client_error))
    }

    /// Map RPC client errors to program variants where possible
    pub fn from_rpc_error(rpc_error: RpcClientError) -> Self {
        Self::from_transaction_error(rpc_error.get_transaction_error())
            .unwrap_or_else(|| Self::RpcError(rpc_error.to_string()))
    }
}
