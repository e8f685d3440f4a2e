use anchor_lang::prelude::*;

use crate::schedule;

/// Per-depositor lock position
/// PDA: ["position", vault, owner]
///
/// A position that was never opened and one that was withdrawn look the
/// same: `active == false` with zeroed amounts.
#[account]
#[derive(Default, Debug, PartialEq, Eq, InitSpace)]
pub struct Position {
    /// The vault this position belongs to
    pub vault: Pubkey,

    /// Owner of this position
    pub owner: Pubkey,

    /// Whether a lock is currently open
    pub active: bool,

    /// Amount of tokens locked
    pub principal: u64,

    /// Lock duration in seconds chosen at deposit, selects the interest tier
    pub lock_duration: u64,

    /// Timestamp of the deposit
    pub deposit_time: i64,

    /// deposit_time + lock_duration
    pub maturity_time: i64,

    /// PDA bump seed
    pub bump: u8,
}

impl Position {
    pub fn is_mature(&self, now: i64) -> bool {
        now >= self.maturity_time
    }

    /// Amount owed at maturity, from the tier of the stored lock duration
    pub fn payout(&self) -> Result<u64> {
        schedule::committed_payout(self.principal, self.lock_duration)
    }

    /// Record a new lock
    pub fn open(&mut self, principal: u64, lock_duration: u64, now: i64, maturity_time: i64) {
        self.active = true;
        self.principal = principal;
        self.lock_duration = lock_duration;
        self.deposit_time = now;
        self.maturity_time = maturity_time;
    }

    /// Reset the lock, keeping the PDA identity fields
    pub fn close(&mut self) {
        self.active = false;
        self.principal = 0;
        self.lock_duration = 0;
        self.deposit_time = 0;
        self.maturity_time = 0;
    }
}
