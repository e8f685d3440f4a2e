use anchor_lang::prelude::*;

use crate::constants::VAULT_SEED;
use crate::error::VaultError;
use crate::state::Vault;

// =============================================================================
// Transfer Operator
// =============================================================================

#[derive(Accounts)]
pub struct TransferOperator<'info> {
    #[account(
        constraint = operator.key() == vault.operator @ VaultError::NotAuthorized
    )]
    pub operator: Signer<'info>,

    #[account(
        mut,
        seeds = [VAULT_SEED, vault.token_mint.as_ref()],
        bump = vault.bump
    )]
    pub vault: Account<'info, Vault>,

    /// CHECK: New operator address, validated to not be default
    #[account(
        constraint = new_operator.key() != Pubkey::default() @ VaultError::InvalidAuthority,
        constraint = new_operator.key() != operator.key() @ VaultError::InvalidAuthority
    )]
    pub new_operator: UncheckedAccount<'info>,
}

pub fn transfer_operator(ctx: Context<TransferOperator>) -> Result<()> {
    let old_operator = ctx.accounts.vault.operator;
    ctx.accounts.vault.operator = ctx.accounts.new_operator.key();

    msg!(
        "Operator transferred from {} to {}",
        old_operator,
        ctx.accounts.new_operator.key()
    );

    Ok(())
}
