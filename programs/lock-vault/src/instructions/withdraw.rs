use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{POSITION_SEED, TOKEN_VAULT_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::ledger;
use crate::state::{Position, Vault};
use crate::token::SplTokenTransfer;

/// Withdraw a matured position
///
/// # Arguments
/// * `ctx` - The context containing all accounts
///
/// # Flow
/// 1. Validate the position is active and mature
/// 2. Transfer principal + interest from token vault to owner
/// 3. Close the position and release its committed payout from the reserve
///
#[derive(Accounts)]
pub struct Withdraw<'info> {
    /// Position owner
    #[account(mut)]
    pub owner: Signer<'info>,

    /// Vault
    #[account(
        mut,
        seeds = [VAULT_SEED, vault.token_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    /// Owner's position
    #[account(
        mut,
        seeds = [POSITION_SEED, vault.key().as_ref(), owner.key().as_ref()],
        bump = position.bump,
        constraint = position.owner == owner.key() @ VaultError::InvalidAuthority
    )]
    pub position: Account<'info, Position>,

    #[account(
        constraint = token_mint.key() == vault.token_mint @ VaultError::InvalidMint
    )]
    pub token_mint: Account<'info, Mint>,

    /// Owner's token account
    #[account(
        mut,
        token::mint = token_mint,
        token::authority = owner
    )]
    pub owner_token_account: Account<'info, TokenAccount>,

    /// Vault custody account
    #[account(
        mut,
        seeds = [TOKEN_VAULT_SEED, vault.key().as_ref()],
        bump = vault.token_vault_bump,
        token::mint = token_mint,
        token::authority = vault
    )]
    pub token_vault: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

pub fn handler_withdraw(ctx: Context<Withdraw>) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    // Vault PDA signs the payout
    let token_mint = ctx.accounts.vault.token_mint;
    let bump = [ctx.accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, token_mint.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let mut token = SplTokenTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        token_vault: &ctx.accounts.token_vault,
        vault_authority: ctx.accounts.vault.to_account_info(),
        vault_signer_seeds: signer_seeds,
        counterparty: &ctx.accounts.owner_token_account,
        counterparty_authority: ctx.accounts.owner.to_account_info(),
    };

    let payout = ledger::withdraw(
        &mut ctx.accounts.vault,
        &mut ctx.accounts.position,
        now,
        &mut token,
    )?;

    let vault = &ctx.accounts.vault;
    msg!(
        "Withdrew {}. Reserve: {}, Committed debt: {}, Cumulative payout: {}",
        payout,
        vault.reserve,
        vault.committed_debt,
        vault.cumulative_payout
    );

    Ok(())
}
