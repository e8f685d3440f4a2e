use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{TOKEN_VAULT_SEED, VAULT_SEED};
use crate::state::Vault;

/// Initialize a new lock vault
///
/// # Arguments
/// * `ctx` - The context containing all accounts
///
/// # Accounts
/// * `operator` - The operator who will fund the reserve (signer, payer)
/// * `vault` - The vault PDA to create
/// * `token_mint` - The token depositors lock and get paid in
/// * `token_vault` - The custody account for reserve and principal
///
#[derive(Accounts)]
pub struct InitializeVault<'info> {
    /// Operator who will control this vault's reserve
    #[account(mut)]
    pub operator: Signer<'info>,

    /// Vault PDA
    #[account(
        init,
        payer = operator,
        space = 8 + Vault::INIT_SPACE,
        seeds = [VAULT_SEED, token_mint.key().as_ref()],
        bump
    )]
    pub vault: Account<'info, Vault>,

    /// Token locked and paid out by the vault
    pub token_mint: Account<'info, Mint>,

    /// Custody account holding reserve and locked principal
    #[account(
        init,
        payer = operator,
        seeds = [TOKEN_VAULT_SEED, vault.key().as_ref()],
        bump,
        token::mint = token_mint,
        token::authority = vault
    )]
    pub token_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_initialize_vault(ctx: Context<InitializeVault>) -> Result<()> {
    let vault = &mut ctx.accounts.vault;

    vault.operator = ctx.accounts.operator.key();
    vault.token_mint = ctx.accounts.token_mint.key();
    vault.token_vault = ctx.accounts.token_vault.key();

    // Ledger starts empty
    vault.reserve = 0;
    vault.committed_debt = 0;
    vault.active_contribution = 0;
    vault.cumulative_payout = 0;
    vault.total_principal_received = 0;
    vault.active_positions = 0;
    vault.locked = false;

    vault.bump = ctx.bumps.vault;
    vault.token_vault_bump = ctx.bumps.token_vault;

    msg!(
        "Lock vault initialized: token_mint={}, operator={}",
        vault.token_mint,
        vault.operator
    );

    Ok(())
}
