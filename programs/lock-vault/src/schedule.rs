// =============================================================================
// Interest Schedule
// =============================================================================
// Maps a lock duration (seconds) to the bonus a position earns at maturity.
// The bonus depends only on the duration chosen at deposit time, never on how
// long the position was actually held.
// =============================================================================

use anchor_lang::prelude::*;

use crate::constants::{INTEREST_TIERS, PERCENT_DENOMINATOR, SECONDS_PER_DAY};
use crate::error::VaultError;

/// Bonus percentage for a lock duration
///
/// Fails with `LockDurationTooShort` when the duration is under the first tier.
pub fn tier_bonus_percent(lock_duration: u64) -> Result<u64> {
    INTEREST_TIERS
        .iter()
        .rev()
        .find(|(min_days, _)| lock_duration >= min_days * SECONDS_PER_DAY)
        .map(|&(_, bonus)| bonus)
        .ok_or_else(|| error!(VaultError::LockDurationTooShort))
}

/// Interest earned on `principal` for the tier of `lock_duration`
/// Formula: interest = principal * bonus / 100 (multiply first, floor)
pub fn interest_for(principal: u64, lock_duration: u64) -> Result<u64> {
    let bonus = tier_bonus_percent(lock_duration)?;

    let interest = (principal as u128)
        .checked_mul(bonus as u128)
        .ok_or(VaultError::MathOverflow)?
        / PERCENT_DENOMINATOR;

    u64::try_from(interest).map_err(|_| error!(VaultError::MathOverflow))
}

/// Total owed at maturity: principal plus tier interest
pub fn committed_payout(principal: u64, lock_duration: u64) -> Result<u64> {
    let interest = interest_for(principal, lock_duration)?;

    principal
        .checked_add(interest)
        .ok_or_else(|| error!(VaultError::MathOverflow))
}
