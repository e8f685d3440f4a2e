use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{TOKEN_VAULT_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::ledger;
use crate::state::Vault;
use crate::token::SplTokenTransfer;

/// Withdraw all free reserve to the operator (operator only)
///
/// Free reserve is whatever the reserve holds beyond the committed debt.
/// Afterwards reserve == committed_debt.
///
#[derive(Accounts)]
pub struct RemoveReserve<'info> {
    /// Must be the vault operator, checked by the ledger
    pub operator: Signer<'info>,

    /// Vault
    #[account(
        mut,
        seeds = [VAULT_SEED, vault.token_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        constraint = token_mint.key() == vault.token_mint @ VaultError::InvalidMint
    )]
    pub token_mint: Account<'info, Mint>,

    /// Destination of the freed reserve
    #[account(
        mut,
        token::mint = token_mint,
        token::authority = operator
    )]
    pub operator_token_account: Account<'info, TokenAccount>,

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

pub fn handler_remove_reserve(ctx: Context<RemoveReserve>) -> Result<()> {
    let operator = ctx.accounts.operator.key();

    // Vault PDA signs the transfer out
    let token_mint = ctx.accounts.vault.token_mint;
    let bump = [ctx.accounts.vault.bump];
    let seeds: &[&[u8]] = &[VAULT_SEED, token_mint.as_ref(), &bump];
    let signer_seeds = &[seeds];

    let mut token = SplTokenTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        token_vault: &ctx.accounts.token_vault,
        vault_authority: ctx.accounts.vault.to_account_info(),
        vault_signer_seeds: signer_seeds,
        counterparty: &ctx.accounts.operator_token_account,
        counterparty_authority: ctx.accounts.operator.to_account_info(),
    };

    let removed = ledger::remove_reserve(&mut ctx.accounts.vault, &operator, &mut token)?;

    msg!(
        "Removed {} free reserve. Reserve: {}, Committed debt: {}",
        removed,
        ctx.accounts.vault.reserve,
        ctx.accounts.vault.committed_debt
    );

    Ok(())
}
