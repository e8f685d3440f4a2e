use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

use crate::constants::{TOKEN_VAULT_SEED, VAULT_SEED};
use crate::error::VaultError;
use crate::ledger;
use crate::state::Vault;
use crate::token::SplTokenTransfer;

/// Fund the reserve (operator only)
///
/// # Arguments
/// * `ctx` - The context containing all accounts
/// * `amount` - Amount of tokens to add to the reserve
///
#[derive(Accounts)]
pub struct AddReserve<'info> {
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

    /// Source of the reserve funds
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

pub fn handler_add_reserve(ctx: Context<AddReserve>, amount: u64) -> Result<()> {
    let operator = ctx.accounts.operator.key();

    let mut token = SplTokenTransfer {
        token_program: ctx.accounts.token_program.to_account_info(),
        token_vault: &ctx.accounts.token_vault,
        vault_authority: ctx.accounts.vault.to_account_info(),
        vault_signer_seeds: &[],
        counterparty: &ctx.accounts.operator_token_account,
        counterparty_authority: ctx.accounts.operator.to_account_info(),
    };

    ledger::add_reserve(&mut ctx.accounts.vault, &operator, amount, &mut token)?;

    msg!(
        "Added {} to reserve. Reserve: {}, Committed debt: {}",
        amount,
        ctx.accounts.vault.reserve,
        ctx.accounts.vault.committed_debt
    );

    Ok(())
}
