// =============================================================================
// Ledger Engine
// =============================================================================
// Every accounting transition of the vault lives here. Instruction handlers
// only gather accounts, read the clock and call into these functions.
//
// Each operation runs in three steps:
// 1. Validate preconditions and compute every new value (checked math)
// 2. Move tokens through the TokenTransfer collaborator
// 3. Commit the precomputed values
//
// Nothing is written before step 3, so a failed precondition or a failed
// transfer leaves the Vault and Position exactly as they were.
// =============================================================================

use anchor_lang::error::Error;
use anchor_lang::prelude::*;

use crate::error::VaultError;
use crate::schedule;
use crate::state::{Position, Vault};
use crate::token::TokenTransfer;

/// Lock `principal` for `lock_duration` seconds on behalf of `position.owner`
///
/// Returns the payout committed to the position.
pub fn deposit<T: TokenTransfer>(
    vault: &mut Vault,
    position: &mut Position,
    principal: u64,
    lock_duration: u64,
    now: i64,
    token: &mut T,
) -> Result<u64> {
    guarded(vault, |vault| {
        require!(principal > 0, VaultError::InvalidAmount);
        require!(!position.active, VaultError::PositionAlreadyActive);

        let payout = schedule::committed_payout(principal, lock_duration)?;

        // Solvency gate: the reserve must already cover the new promise
        require!(vault.can_commit(payout)?, VaultError::InsufficientReserve);

        let maturity_time = i64::try_from(lock_duration)
            .ok()
            .and_then(|duration| now.checked_add(duration))
            .ok_or(VaultError::MathOverflow)?;

        let mut next = vault.clone();
        next.committed_debt = next
            .committed_debt
            .checked_add(payout)
            .ok_or(VaultError::MathOverflow)?;
        next.active_contribution = next
            .active_contribution
            .checked_add(principal)
            .ok_or(VaultError::MathOverflow)?;
        next.total_principal_received = next
            .total_principal_received
            .checked_add(principal)
            .ok_or(VaultError::MathOverflow)?;
        next.active_positions = next
            .active_positions
            .checked_add(1)
            .ok_or(VaultError::MathOverflow)?;
        next.check_invariants()?;

        token
            .pull(&position.owner, principal)
            .map_err(transfer_failed)?;

        *vault = next;
        position.open(principal, lock_duration, now, maturity_time);

        Ok(payout)
    })
}

/// Close a matured position and pay principal + interest to its owner
///
/// Returns the amount paid.
pub fn withdraw<T: TokenTransfer>(
    vault: &mut Vault,
    position: &mut Position,
    now: i64,
    token: &mut T,
) -> Result<u64> {
    guarded(vault, |vault| {
        require!(position.active, VaultError::NoActivePosition);
        require!(position.is_mature(now), VaultError::PositionNotMature);

        // Tier comes from the stored lock duration, not from elapsed time
        let payout = position.payout()?;

        let mut next = vault.clone();
        next.committed_debt = next
            .committed_debt
            .checked_sub(payout)
            .ok_or(VaultError::MathUnderflow)?;
        next.active_contribution = next
            .active_contribution
            .checked_sub(position.principal)
            .ok_or(VaultError::MathUnderflow)?;
        next.reserve = next
            .reserve
            .checked_sub(payout)
            .ok_or(VaultError::MathUnderflow)?;
        next.cumulative_payout = next
            .cumulative_payout
            .checked_add(payout)
            .ok_or(VaultError::MathOverflow)?;
        next.active_positions = next
            .active_positions
            .checked_sub(1)
            .ok_or(VaultError::MathUnderflow)?;
        next.check_invariants()?;

        token.push(&position.owner, payout).map_err(transfer_failed)?;

        *vault = next;
        position.close();

        Ok(payout)
    })
}

/// Fund the reserve from the operator
pub fn add_reserve<T: TokenTransfer>(
    vault: &mut Vault,
    caller: &Pubkey,
    amount: u64,
    token: &mut T,
) -> Result<()> {
    guarded(vault, |vault| {
        require_keys_eq!(*caller, vault.operator, VaultError::NotAuthorized);
        require!(amount > 0, VaultError::InvalidAmount);

        let reserve = vault
            .reserve
            .checked_add(amount)
            .ok_or(VaultError::MathOverflow)?;

        token.pull(caller, amount).map_err(transfer_failed)?;

        vault.reserve = reserve;

        Ok(())
    })
}

/// Return every token of reserve not backing a committed payout to the operator
///
/// Returns the amount removed.
pub fn remove_reserve<T: TokenTransfer>(
    vault: &mut Vault,
    caller: &Pubkey,
    token: &mut T,
) -> Result<u64> {
    guarded(vault, |vault| {
        require_keys_eq!(*caller, vault.operator, VaultError::NotAuthorized);

        let free = vault.free_reserve()?;
        require!(free > 0, VaultError::NoFreeReserve);

        token.push(caller, free).map_err(transfer_failed)?;

        vault.reserve = vault.committed_debt;

        Ok(free)
    })
}

/// Run `op` with the vault marked busy; the mark is cleared on every path
fn guarded<R>(vault: &mut Vault, op: impl FnOnce(&mut Vault) -> Result<R>) -> Result<R> {
    vault.enter()?;
    let outcome = op(vault);
    vault.leave();
    outcome
}

fn transfer_failed(err: Error) -> Error {
    msg!("Token transfer rejected: {}", err);
    error!(VaultError::TransferFailed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::constants::SECONDS_PER_DAY;

    const DAY: u64 = SECONDS_PER_DAY;
    const THREE_YEARS: u64 = 1080 * DAY;
    const START: i64 = 1_700_000_000;

    /// In-memory token ledger standing in for SPL Token
    #[derive(Default)]
    struct MockToken {
        balances: HashMap<Pubkey, u64>,
        custody: u64,
        reject_all: bool,
    }

    impl MockToken {
        fn fund(&mut self, who: Pubkey, amount: u64) {
            *self.balances.entry(who).or_default() += amount;
        }

        fn balance(&self, who: &Pubkey) -> u64 {
            self.balances.get(who).copied().unwrap_or_default()
        }
    }

    impl TokenTransfer for MockToken {
        fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
            if self.reject_all {
                return Err(ProgramError::Custom(1).into());
            }
            let balance = self.balances.entry(*from).or_default();
            if *balance < amount {
                return Err(ProgramError::InsufficientFunds.into());
            }
            *balance -= amount;
            self.custody += amount;
            Ok(())
        }

        fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
            if self.reject_all || self.custody < amount {
                return Err(ProgramError::InsufficientFunds.into());
            }
            self.custody -= amount;
            *self.balances.entry(*to).or_default() += amount;
            Ok(())
        }
    }

    struct Harness {
        vault: Vault,
        token: MockToken,
        operator: Pubkey,
        now: i64,
    }

    impl Harness {
        fn with_reserve(reserve: u64) -> Self {
            let operator = Pubkey::new_unique();
            let mut harness = Self {
                vault: Vault {
                    operator,
                    ..Vault::default()
                },
                token: MockToken::default(),
                operator,
                now: START,
            };
            if reserve > 0 {
                harness.token.fund(operator, reserve);
                add_reserve(&mut harness.vault, &operator, reserve, &mut harness.token)
                    .unwrap();
            }
            harness
        }

        fn depositor(&mut self, balance: u64) -> Position {
            let owner = Pubkey::new_unique();
            self.token.fund(owner, balance);
            Position {
                owner,
                ..Position::default()
            }
        }

        fn deposit(
            &mut self,
            position: &mut Position,
            principal: u64,
            lock_duration: u64,
        ) -> Result<u64> {
            deposit(
                &mut self.vault,
                position,
                principal,
                lock_duration,
                self.now,
                &mut self.token,
            )
        }

        fn withdraw(&mut self, position: &mut Position) -> Result<u64> {
            withdraw(&mut self.vault, position, self.now, &mut self.token)
        }

        fn remove_reserve(&mut self) -> Result<u64> {
            let operator = self.operator;
            remove_reserve(&mut self.vault, &operator, &mut self.token)
        }

        fn advance(&mut self, seconds: u64) {
            self.now += seconds as i64;
        }

        /// Custody always holds the reserve plus every principal ever pulled in
        fn assert_conserved(&self) {
            self.vault.check_invariants().unwrap();
            assert!(!self.vault.locked);
            assert_eq!(
                self.token.custody,
                self.vault.reserve + self.vault.total_principal_received
            );
            assert!(self.token.custody >= self.vault.committed_debt);
        }
    }

    fn assert_error<T: std::fmt::Debug>(result: Result<T>, expected: VaultError) {
        assert_eq!(result.unwrap_err(), Error::from(expected));
    }

    #[test]
    fn test_scenario_fully_committed_reserve_cannot_be_removed() {
        let mut h = Harness::with_reserve(200);
        let mut position = h.depositor(100);

        assert_eq!(h.deposit(&mut position, 100, THREE_YEARS).unwrap(), 200);
        assert_eq!(h.vault.committed_debt, 200);
        assert_eq!(h.vault.reserve, 200);

        let before = h.vault.clone();
        assert_error(h.remove_reserve(), VaultError::NoFreeReserve);
        assert_eq!(h.vault, before);
        h.assert_conserved();
    }

    #[test]
    fn test_scenario_free_reserve_is_removed() {
        let mut h = Harness::with_reserve(400);
        let mut position = h.depositor(100);
        h.deposit(&mut position, 100, THREE_YEARS).unwrap();
        assert_eq!(h.vault.committed_debt, 200);

        assert_eq!(h.remove_reserve().unwrap(), 200);
        assert_eq!(h.vault.reserve, 200);
        assert_eq!(h.token.balance(&h.operator), 200);
        h.assert_conserved();

        assert_error(h.remove_reserve(), VaultError::NoFreeReserve);
    }

    #[test]
    fn test_scenario_matured_withdraw_pays_principal_and_interest() {
        let mut h = Harness::with_reserve(20);
        let mut position = h.depositor(10);
        let owner = position.owner;

        h.deposit(&mut position, 10, THREE_YEARS).unwrap();
        assert_eq!(h.token.balance(&owner), 0);

        h.advance(THREE_YEARS);
        assert_eq!(h.withdraw(&mut position).unwrap(), 20);

        assert_eq!(h.token.balance(&owner), 20);
        assert_eq!(h.vault.reserve, 0);
        assert_eq!(h.vault.committed_debt, 0);
        assert_eq!(h.vault.active_contribution, 0);
        assert_eq!(h.vault.cumulative_payout, 20);
        assert_eq!(h.vault.active_positions, 0);
        assert!(!position.active);
        assert_eq!(position.principal, 0);
        assert_eq!(position.owner, owner);
        h.assert_conserved();
    }

    #[test]
    fn test_scenario_short_lock_rejected_regardless_of_reserve() {
        let mut h = Harness::with_reserve(1_000_000);
        let mut position = h.depositor(100);

        let before = (h.vault.clone(), position.clone());
        assert_error(
            h.deposit(&mut position, 100, 89 * DAY),
            VaultError::LockDurationTooShort,
        );
        assert_error(
            h.deposit(&mut position, 100, 90 * DAY - 1),
            VaultError::LockDurationTooShort,
        );
        assert_eq!((h.vault.clone(), position.clone()), before);
        assert_eq!(h.token.balance(&position.owner), 100);
    }

    #[test]
    fn test_scenario_second_deposit_rejected_until_withdraw() {
        let mut h = Harness::with_reserve(10_000);
        let mut position = h.depositor(300);
        let duration = 180 * DAY;

        h.deposit(&mut position, 200, duration).unwrap();

        let before = (h.vault.clone(), position.clone());
        assert_error(
            h.deposit(&mut position, 100, duration),
            VaultError::PositionAlreadyActive,
        );
        assert_eq!((h.vault.clone(), position.clone()), before);

        h.advance(duration);
        assert_eq!(h.withdraw(&mut position).unwrap(), 216);

        h.deposit(&mut position, 100, duration).unwrap();
        assert!(position.active);
        assert_eq!(position.principal, 100);
        h.assert_conserved();
    }

    #[test]
    fn test_deposit_precondition_order() {
        let mut h = Harness::with_reserve(100);
        let mut position = h.depositor(1_000);

        // Zero amount is checked before the lock duration
        assert_error(h.deposit(&mut position, 0, 0), VaultError::InvalidAmount);
        // Duration is checked before solvency
        assert_error(
            h.deposit(&mut position, 1_000, DAY),
            VaultError::LockDurationTooShort,
        );
        assert_error(
            h.deposit(&mut position, 1_000, THREE_YEARS),
            VaultError::InsufficientReserve,
        );
    }

    #[test]
    fn test_insufficient_reserve_leaves_state_unchanged() {
        let mut h = Harness::with_reserve(199);
        let mut position = h.depositor(100);

        let before = (h.vault.clone(), position.clone());
        assert_error(
            h.deposit(&mut position, 100, THREE_YEARS),
            VaultError::InsufficientReserve,
        );
        assert_eq!((h.vault.clone(), position.clone()), before);
        assert_eq!(h.token.balance(&position.owner), 100);
        h.assert_conserved();
    }

    #[test]
    fn test_failed_pull_leaves_state_unchanged() {
        let mut h = Harness::with_reserve(1_000);
        // Balance is short of the principal
        let mut position = h.depositor(50);

        let before = (h.vault.clone(), position.clone());
        assert_error(
            h.deposit(&mut position, 100, 360 * DAY),
            VaultError::TransferFailed,
        );
        assert_eq!((h.vault.clone(), position.clone()), before);
        h.assert_conserved();
    }

    #[test]
    fn test_failed_push_leaves_state_unchanged() {
        let mut h = Harness::with_reserve(1_000);
        let mut position = h.depositor(100);
        h.deposit(&mut position, 100, 360 * DAY).unwrap();
        h.advance(360 * DAY);

        h.token.reject_all = true;
        let before = (h.vault.clone(), position.clone());
        assert_error(h.withdraw(&mut position), VaultError::TransferFailed);
        assert_eq!((h.vault.clone(), position.clone()), before);

        let vault_before = h.vault.clone();
        assert_error(h.remove_reserve(), VaultError::TransferFailed);
        assert_eq!(h.vault, vault_before);

        h.token.reject_all = false;
        assert_eq!(h.withdraw(&mut position).unwrap(), 120);
        h.assert_conserved();
    }

    #[test]
    fn test_withdraw_preconditions() {
        let mut h = Harness::with_reserve(1_000);
        let mut never_opened = h.depositor(0);
        assert_error(h.withdraw(&mut never_opened), VaultError::NoActivePosition);

        let mut position = h.depositor(100);
        h.deposit(&mut position, 100, 90 * DAY).unwrap();

        h.advance(90 * DAY - 1);
        let before = (h.vault.clone(), position.clone());
        assert_error(h.withdraw(&mut position), VaultError::PositionNotMature);
        assert_eq!((h.vault.clone(), position.clone()), before);

        h.advance(1);
        assert_eq!(h.withdraw(&mut position).unwrap(), 103);
        assert_error(h.withdraw(&mut position), VaultError::NoActivePosition);
    }

    #[test]
    fn test_late_withdraw_earns_chosen_tier_only() {
        let mut h = Harness::with_reserve(10_000);
        let mut position = h.depositor(1_000);
        h.deposit(&mut position, 1_000, 90 * DAY).unwrap();

        // Held ten years past a 3 month lock
        h.advance(90 * DAY + 3_600 * DAY);
        assert_eq!(h.withdraw(&mut position).unwrap(), 1_030);
        assert_eq!(h.vault.cumulative_payout, 1_030);
        h.assert_conserved();
    }

    #[test]
    fn test_maturity_is_fixed_at_deposit() {
        let mut h = Harness::with_reserve(1_000);
        let mut position = h.depositor(100);
        h.advance(42);
        h.deposit(&mut position, 100, 180 * DAY).unwrap();

        assert_eq!(position.deposit_time, START + 42);
        assert_eq!(position.maturity_time, START + 42 + (180 * DAY) as i64);
        assert_eq!(position.lock_duration, 180 * DAY);
    }

    #[test]
    fn test_reserve_operations_require_operator() {
        let mut h = Harness::with_reserve(500);
        let stranger = Pubkey::new_unique();
        h.token.fund(stranger, 1_000);

        let before = h.vault.clone();
        assert_error(
            add_reserve(&mut h.vault, &stranger, 1_000, &mut h.token),
            VaultError::NotAuthorized,
        );
        assert_error(
            remove_reserve(&mut h.vault, &stranger, &mut h.token),
            VaultError::NotAuthorized,
        );
        assert_eq!(h.vault, before);
        assert_eq!(h.token.balance(&stranger), 1_000);
    }

    #[test]
    fn test_add_reserve() {
        let mut h = Harness::with_reserve(0);
        let operator = h.operator;

        assert_error(
            add_reserve(&mut h.vault, &operator, 0, &mut h.token),
            VaultError::InvalidAmount,
        );
        // Operator holds nothing yet
        assert_error(
            add_reserve(&mut h.vault, &operator, 10, &mut h.token),
            VaultError::TransferFailed,
        );
        assert_eq!(h.vault.reserve, 0);

        h.token.fund(operator, 300);
        add_reserve(&mut h.vault, &operator, 100, &mut h.token).unwrap();
        add_reserve(&mut h.vault, &operator, 200, &mut h.token).unwrap();
        assert_eq!(h.vault.reserve, 300);
        h.assert_conserved();
    }

    #[test]
    fn test_busy_vault_rejects_every_operation() {
        let mut h = Harness::with_reserve(1_000);
        let mut position = h.depositor(100);
        let operator = h.operator;

        h.vault.locked = true;
        assert_error(
            h.deposit(&mut position, 100, 90 * DAY),
            VaultError::VaultBusy,
        );
        assert_error(h.withdraw(&mut position), VaultError::VaultBusy);
        assert_error(
            add_reserve(&mut h.vault, &operator, 1, &mut h.token),
            VaultError::VaultBusy,
        );
        assert_error(h.remove_reserve(), VaultError::VaultBusy);
        assert!(h.vault.locked);
        assert_eq!(h.vault.reserve, 1_000);
    }

    #[test]
    fn test_many_depositors_never_exceed_reserve() {
        let mut h = Harness::with_reserve(10_000);
        let durations = [90 * DAY, 180 * DAY, 360 * DAY, 720 * DAY, THREE_YEARS];
        let mut positions = Vec::new();
        let mut rejected = 0;

        for i in 0..40u64 {
            let mut position = h.depositor(1_000);
            let principal = 100 + (i * 37) % 400;
            match h.deposit(&mut position, principal, durations[(i % 5) as usize]) {
                Ok(_) => positions.push(position),
                Err(err) => {
                    assert_eq!(err, Error::from(VaultError::InsufficientReserve));
                    rejected += 1;
                }
            }
            h.assert_conserved();
        }
        assert!(rejected > 0);
        assert_eq!(h.vault.active_positions, positions.len() as u64);

        h.advance(THREE_YEARS);
        for position in positions.iter_mut() {
            h.withdraw(position).unwrap();
            h.assert_conserved();
        }
        assert_eq!(h.vault.committed_debt, 0);
        assert_eq!(h.vault.active_contribution, 0);
        assert_eq!(h.vault.active_positions, 0);
        assert_eq!(h.vault.cumulative_payout, 10_000 - h.vault.reserve);
    }
}
