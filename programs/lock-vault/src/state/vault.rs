use anchor_lang::prelude::*;

use crate::error::VaultError;

/// Global vault ledger
/// PDA: ["vault", token_mint]
#[account]
#[derive(Default, Debug, PartialEq, Eq, InitSpace)]
pub struct Vault {
    /// Operator who funds and drains the reserve
    pub operator: Pubkey,

    /// Token locked by depositors and paid out at maturity
    pub token_mint: Pubkey,

    /// Custody token account, owned by this vault PDA
    /// PDA: ["token_vault", vault]
    pub token_vault: Pubkey,

    /// Operator-funded liquidity backing every future payout
    pub reserve: u64,

    /// Principal + interest promised to all active positions
    pub committed_debt: u64,

    /// Principal currently locked across active positions
    pub active_contribution: u64,

    /// Total ever paid out to depositors (lifetime)
    pub cumulative_payout: u64,

    /// Total principal ever pulled in from depositors (lifetime)
    pub total_principal_received: u64,

    /// Number of open positions
    pub active_positions: u64,

    /// Set while a ledger operation is in flight
    pub locked: bool,

    /// PDA bump seed
    pub bump: u8,

    /// Token vault bump seed
    pub token_vault_bump: u8,
}

impl Vault {
    /// Reserve not backing any active position's payout
    pub fn free_reserve(&self) -> Result<u64> {
        self.reserve
            .checked_sub(self.committed_debt)
            .ok_or_else(|| error!(VaultError::InvariantViolation))
    }

    /// Whether `payout` more can be promised without exceeding the reserve
    pub fn can_commit(&self, payout: u64) -> Result<bool> {
        let debt = self
            .committed_debt
            .checked_add(payout)
            .ok_or(VaultError::MathOverflow)?;

        Ok(debt <= self.reserve)
    }

    /// Solvency checks: committed_debt <= reserve, active_contribution <= committed_debt
    pub fn check_invariants(&self) -> Result<()> {
        require!(
            self.committed_debt <= self.reserve,
            VaultError::InvariantViolation
        );
        require!(
            self.active_contribution <= self.committed_debt,
            VaultError::InvariantViolation
        );

        Ok(())
    }

    /// Mark a ledger operation as started, rejecting nested entry
    pub fn enter(&mut self) -> Result<()> {
        require!(!self.locked, VaultError::VaultBusy);
        self.locked = true;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.locked = false;
    }
}
