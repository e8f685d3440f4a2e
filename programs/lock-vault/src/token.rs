// =============================================================================
// Token Collaborator
// =============================================================================
// The ledger never touches token balances directly. It asks a TokenTransfer
// implementation to move tokens in or out of custody and only records the
// movement once the call returned Ok.
//
// On-chain the implementation is SplTokenTransfer (SPL Token CPI). Tests use
// an in-memory ledger.
// =============================================================================

use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::error::VaultError;

/// Moves tokens between an identity and vault custody
pub trait TokenTransfer {
    /// Move `amount` from `from` into vault custody
    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()>;

    /// Move `amount` out of vault custody to `to`
    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

/// SPL Token transfers between one counterparty token account and the vault's
/// custody account
pub struct SplTokenTransfer<'a, 'info> {
    pub token_program: AccountInfo<'info>,

    /// Vault custody account
    pub token_vault: &'a Account<'info, TokenAccount>,

    /// Vault PDA, authority of `token_vault`
    pub vault_authority: AccountInfo<'info>,

    /// Seeds the vault PDA signs pushes with
    pub vault_signer_seeds: &'a [&'a [&'a [u8]]],

    /// Depositor's or operator's token account
    pub counterparty: &'a Account<'info, TokenAccount>,

    /// Signer authorizing pulls out of `counterparty`
    pub counterparty_authority: AccountInfo<'info>,
}

impl TokenTransfer for SplTokenTransfer<'_, '_> {
    fn pull(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(
            self.counterparty.owner,
            *from,
            VaultError::InvalidTokenAccountOwner
        );
        require!(
            self.counterparty.amount >= amount,
            VaultError::TransferFailed
        );

        token::transfer(
            CpiContext::new(
                self.token_program.clone(),
                Transfer {
                    from: self.counterparty.to_account_info(),
                    to: self.token_vault.to_account_info(),
                    authority: self.counterparty_authority.clone(),
                },
            ),
            amount,
        )
    }

    fn push(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        require_keys_eq!(
            self.counterparty.owner,
            *to,
            VaultError::InvalidTokenAccountOwner
        );
        require!(
            self.token_vault.amount >= amount,
            VaultError::TransferFailed
        );

        // Vault PDA signs as authority
        token::transfer(
            CpiContext::new_with_signer(
                self.token_program.clone(),
                Transfer {
                    from: self.token_vault.to_account_info(),
                    to: self.counterparty.to_account_info(),
                    authority: self.vault_authority.clone(),
                },
                self.vault_signer_seeds,
            ),
            amount,
        )
    }
}
