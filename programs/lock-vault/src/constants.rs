// =============================================================================
// Lock Vault Constants
// =============================================================================

// PDA Seeds
pub const VAULT_SEED: &[u8] = b"vault";
pub const TOKEN_VAULT_SEED: &[u8] = b"token_vault";
pub const POSITION_SEED: &[u8] = b"position";

// Time
pub const SECONDS_PER_DAY: u64 = 86_400;

// =============================================================================
// Interest tiers
// =============================================================================
// A year counts as 360 days for tiering. Each entry is the minimum lock
// duration (in days) that qualifies for the paired bonus percentage.
// Entries must stay sorted by duration.

/// Shortest lock duration accepted by the vault
pub const MIN_LOCK_DAYS: u64 = 90;

pub const INTEREST_TIERS: [(u64, u64); 5] = [
    (MIN_LOCK_DAYS, 3), // 3 months
    (180, 8),           // 6 months
    (360, 20),          // 1 year
    (720, 50),          // 2 years
    (1080, 100),        // 3 years
];

/// Denominator for bonus percentages
pub const PERCENT_DENOMINATOR: u128 = 100;
