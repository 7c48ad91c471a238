use anchor_lang::prelude::*;

/// Custom error codes for the referral chests program
///
/// Note: Anchor automatically assigns error codes starting from 6000.
#[error_code]
pub enum ReferralError {
    /// Error Code: 6000
    /// When a privileged instruction is signed by someone other than the administrator
    #[msg("Unauthorized access. Only the registry administrator can perform this action.")]
    Unauthorized,

    /// Error Code: 6001
    /// When a chest index is outside the table
    #[msg("Invalid chest index. Chest total is 7: valid indices are 0 through 7.")]
    InvalidTierIndex,

    /// Error Code: 6002
    /// When the attached payment is below the sponsor's current chest payout
    #[msg("Insufficient payment. Pay at least the payout of the sponsor's current chest.")]
    InsufficientPayment,

    /// Error Code: 6003
    /// When a chest is configured with a zero referral threshold
    #[msg("Invalid chest threshold. Every chest must require at least one referral.")]
    InvalidThreshold,

    /// Error Code: 6004
    /// When a participant names itself as sponsor
    #[msg("A participant cannot sponsor itself.")]
    SelfSponsorship,

    /// Error Code: 6005
    /// When the proposed sponsor was itself sponsored by the joining participant
    #[msg("Referral cycle detected. The proposed sponsor was referred by the joining participant.")]
    ReferralCycle,

    /// Error Code: 6006
    /// When the sponsor wallet passed to join is not the participant's effective sponsor
    #[msg("Sponsor account does not match the participant's sponsor.")]
    SponsorMismatch,

    /// Error Code: 6007
    /// When arithmetic operations would overflow/underflow
    #[msg("Arithmetic operation would result in overflow or underflow.")]
    ArithmeticError,

    /// Error Code: 6008
    /// When the program data account is invalid or cannot be deserialized
    #[msg("Invalid program data account. Ensure the account is the correct program data account for this program.")]
    InvalidProgramData,

    /// Error Code: 6009
    /// When a nonzero chest payout could not keep an empty sponsor wallet rent exempt
    #[msg("Payout below the rent-exempt minimum. Use 0 or at least the rent-exempt balance of an empty account.")]
    PayoutBelowRentMinimum,
}
