use anchor_lang::prelude::*;

#[error_code]
pub enum VaultError {
    // Deposit Errors (6000-6009)
    #[msg("Invalid amount: must be greater than zero")]
    InvalidAmount,

    #[msg("Identity already has an active position")]
    PositionAlreadyActive,

    #[msg("Lock duration is below the minimum qualifying duration")]
    LockDurationTooShort,

    #[msg("Reserve cannot cover the committed payout")]
    InsufficientReserve,

    #[msg("Token transfer failed")]
    TransferFailed,

    // Withdraw Errors (6010-6019)
    #[msg("No active position for this identity")]
    NoActivePosition,

    #[msg("Position has not reached maturity")]
    PositionNotMature,

    // Reserve Errors (6020-6029)
    #[msg("No reserve is free of committed payouts")]
    NoFreeReserve,

    // Authorization Errors (6030-6039)
    #[msg("Unauthorized: operator only")]
    NotAuthorized,

    #[msg("Invalid authority")]
    InvalidAuthority,

    // Math & Ledger Errors (6040-6049)
    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Math underflow")]
    MathUnderflow,

    #[msg("Vault is busy with another operation")]
    VaultBusy,

    #[msg("Ledger invariant violated")]
    InvariantViolation,

    // Account Validation Errors (6050-6059)
    #[msg("Invalid token mint")]
    InvalidMint,

    #[msg("Invalid token account owner")]
    InvalidTokenAccountOwner,
}
