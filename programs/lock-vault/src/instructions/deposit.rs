use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{POSITION_SEED, TOKEN_VAULT_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::ledger;
use crate::state::{Position, Vault};
use crate::token::SplTokenTransfer;

/// Lock tokens for a chosen duration
///
/// # Arguments
/// * `ctx` - The context containing all accounts
/// * `principal` - Amount of tokens to lock
/// * `lock_duration` - Lock duration in seconds, selects the interest tier
///
/// # Flow
/// 1. Validate amount, position and lock duration
/// 2. Check the reserve covers the committed payout
/// 3. Transfer tokens from depositor to token vault
/// 4. Open the position and update vault totals
///
#[derive(Accounts)]
pub struct Deposit<'info> {
    /// User locking their tokens
    #[account(mut)]
    pub depositor: Signer<'info>,

    /// Vault
    #[account(
        mut,
        seeds = [VAULT_SEED, vault.token_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    /// Depositor's position (created on first deposit)
    #[account(
        init_if_needed,
        payer = depositor,
        space = 8 + Position::INIT_SPACE,
        seeds = [POSITION_SEED, vault.key().as_ref(), depositor.key().as_ref()],
        bump
    )]
    pub position: Account<'info, Position>,

    #[account(
        constraint = token_mint.key() == vault.token_mint @ VaultError::InvalidMint
    )]
    pub token_mint: Account<'info, Mint>,

    /// Depositor's token account
    #[account(
        mut,
        token::mint = token_mint,
        token::authority = depositor
    )]
    pub depositor_token_account: Account<'info, TokenAccount>,

    /// Vault custody account
    #[account(
        mut,
        seeds = [TOKEN_VAULT_SEED, vault.key().as_ref()],
        bump = vault.token_vault_bump,
        token::mint = token_mint,
        token::authority = vault
    )]
    pub token_vault: Account<'info, TokenAccount>,

    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

pub fn handler_deposit(ctx: Context<Deposit>, principal: u64, lock_duration: u64) -> Result<()> {
    let now = Clock::get()?.unix_timestamp;

    let vault_key = ctx.accounts.vault.key();
    let depositor_key = ctx.accounts.depositor.key();

    // Initialize position if new
    let position = &mut ctx.accounts.position;
    if position.owner == Pubkey::default() {
        position.vault = vault_key;
        position.owner = depositor_key;
        position.bump = ctx.bumps.position;
    }

    let mut token = SplTokenTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        token_vault: &ctx.accounts.token_vault,
        vault_authority: ctx.accounts.vault.to_account_info(),
        vault_signer_seeds: &[],
        counterparty: &ctx.accounts.depositor_token_account,
        counterparty_authority: ctx.accounts.depositor.to_account_info(),
    };

    let payout = ledger::deposit(
        &mut ctx.accounts.vault,
        &mut ctx.accounts.position,
        principal,
        lock_duration,
        now,
        &mut token,
    )?;

    let vault = &ctx.accounts.vault;
    msg!(
        "Locked {} until {}. Payout at maturity: {}. Committed debt: {}, Reserve: {}",
        principal,
        ctx.accounts.position.maturity_time,
        payout,
        vault.committed_debt,
        vault.reserve
    );

    Ok(())
}
