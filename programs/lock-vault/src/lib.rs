use anchor_lang::prelude::*;

pub mod constants;
pub mod error;
pub mod instructions;
pub mod ledger;
pub mod schedule;
pub mod state;
pub mod token;

use instructions::*;

// Program ID - will be updated after first deploy
declare_id!("DwVS7hVPDmvmkXe7aYPsSJfPa6tmriqgTJ8gMA3rNivW");

#[program]
pub mod lock_vault {
    use super::*;

    /// Initialize a new lock vault
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    ///
    /// # Accounts
    /// * `operator` - Vault operator (signer, payer)
    /// * `vault` - Vault PDA to create
    /// * `token_mint` - Token locked and paid out
    /// * `token_vault` - Custody account for reserve and principal
    ///
    pub fn initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
        instructions::initialize::handler_initialize_vault(ctx)
    }

    /// Lock tokens until maturity
    ///
    /// Fails unless the reserve already covers principal plus interest.
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    /// * `principal` - Amount of tokens to lock
    /// * `lock_duration` - Lock duration in seconds (90 days minimum)
    ///
    pub fn deposit(ctx: Context<Deposit>, principal: u64, lock_duration: u64) -> Result<()> {
        instructions::deposit::handler_deposit(ctx, principal, lock_duration)
    }

    /// Withdraw principal plus interest once the position has matured
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    ///
    pub fn withdraw(ctx: Context<Withdraw>) -> Result<()> {
        instructions::withdraw::handler_withdraw(ctx)
    }

    /// Add tokens to the reserve (operator only)
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    /// * `amount` - Amount of tokens to add
    ///
    pub fn add_reserve(ctx: Context<AddReserve>, amount: u64) -> Result<()> {
        instructions::add_reserve::handler_add_reserve(ctx, amount)
    }

    /// Withdraw the reserve not backing any committed payout (operator only)
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    ///
    pub fn remove_reserve(ctx: Context<RemoveReserve>) -> Result<()> {
        instructions::remove_reserve::handler_remove_reserve(ctx)
    }

    /// Transfer operator rights to a new address (operator only)
    ///
    /// # Arguments
    /// * `ctx` - Context containing all required accounts
    ///
    pub fn transfer_operator(ctx: Context<TransferOperator>) -> Result<()> {
        instructions::admin::transfer_operator(ctx)
    }
}
