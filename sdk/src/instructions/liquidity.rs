use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::{InstructionBuilder, VaultInstructions};
use crate::{
    core::{DepositWithdrawAccounts, SdkResult},
    impl_instruction,
};

const DEPOSIT_DISCRIMINATOR: [u8; 8] = [242, 35, 198, 137, 82, 225, 242, 182];
const WITHDRAW_DISCRIMINATOR: [u8; 8] = [183, 18, 70, 156, 148, 109, 161, 34];

/// Mint `lp_amount` vault shares, paying at most the given token amounts
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct DepositParams {
    pub lp_amount: u64,
    pub max_amount_a: u64,
    pub max_amount_b: u64,
}

impl_instruction!(DepositParams, DEPOSIT_DISCRIMINATOR);

/// Burn `lp_amount` vault shares, receiving at least the given token amounts
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct WithdrawParams {
    pub lp_amount: u64,
    pub min_amount_a: u64,
    pub min_amount_b: u64,
}

impl_instruction!(WithdrawParams, WITHDRAW_DISCRIMINATOR);

impl VaultInstructions {
    pub fn deposit(
        &self,
        accounts: &DepositWithdrawAccounts,
        params: DepositParams,
    ) -> SdkResult<Instruction> {
        self.deposit_withdraw(accounts, &params)
    }

    pub fn withdraw(
        &self,
        accounts: &DepositWithdrawAccounts,
        params: WithdrawParams,
    ) -> SdkResult<Instruction> {
        self.deposit_withdraw(accounts, &params)
    }

    // Deposit and withdraw share one account layout
    fn deposit_withdraw<T: InstructionBuilder>(
        &self,
        accounts: &DepositWithdrawAccounts,
        params: &T,
    ) -> SdkResult<Instruction> {
        let vault = &accounts.vault;
        Ok(self
            .vault_program()
            .add_readonly_signer(accounts.user_signer)
            .add_writable(vault.vault_account)
            .add_writable(vault.lp_mint)
            .add_writable(vault.input_token_a_account)
            .add_writable(vault.input_token_b_account)
            .add_writable(accounts.user_lp_token_account)
            .add_writable(accounts.user_token_a_account)
            .add_writable(accounts.user_token_b_account)
            .add_readonly(self.whirlpool_program_id)
            .add_accounts(accounts.position.to_account_metas())
            .add_writable(accounts.pool_token_vault_a)
            .add_writable(accounts.pool_token_vault_b)
            .add_readonly(spl_token::id())
            .with_args(params)?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PositionAddresses, VaultAddresses};

    fn accounts() -> DepositWithdrawAccounts {
        DepositWithdrawAccounts {
            user_signer: Pubkey::new_unique(),
            vault: VaultAddresses {
                vault_account: Pubkey::new_unique(),
                lp_mint: Pubkey::new_unique(),
                input_token_a_account: Pubkey::new_unique(),
                input_token_b_account: Pubkey::new_unique(),
            },
            user_lp_token_account: Pubkey::new_unique(),
            user_token_a_account: Pubkey::new_unique(),
            user_token_b_account: Pubkey::new_unique(),
            position: PositionAddresses {
                whirlpool: Pubkey::new_unique(),
                position: Pubkey::new_unique(),
                position_mint: Pubkey::new_unique(),
                position_token_account: Pubkey::new_unique(),
                tick_array_lower: Pubkey::new_unique(),
                tick_array_upper: Pubkey::new_unique(),
            },
            pool_token_vault_a: Pubkey::new_unique(),
            pool_token_vault_b: Pubkey::new_unique(),
        }
    }

    // Deposit and withdraw keys, spelled out field by field
    fn expected_keys(accounts: &DepositWithdrawAccounts, whirlpool_program_id: Pubkey) -> Vec<Pubkey> {
        let vault = &accounts.vault;
        let position = &accounts.position;
        vec![
            accounts.user_signer,
            vault.vault_account,
            vault.lp_mint,
            vault.input_token_a_account,
            vault.input_token_b_account,
            accounts.user_lp_token_account,
            accounts.user_token_a_account,
            accounts.user_token_b_account,
            whirlpool_program_id,
            position.whirlpool,
            position.position,
            position.position_token_account,
            position.tick_array_lower,
            position.tick_array_upper,
            accounts.pool_token_vault_a,
            accounts.pool_token_vault_b,
            spl_token::id(),
        ]
    }

    #[test]
    fn test_deposit_account_order() {
        let ixs = VaultInstructions::default();
        let accounts = accounts();
        let ix = ixs
            .deposit(
                &accounts,
                DepositParams {
                    lp_amount: 1,
                    max_amount_a: 2,
                    max_amount_b: 3,
                },
            )
            .unwrap();

        let keys: Vec<Pubkey> = ix.accounts.iter().map(|m| m.pubkey).collect();
        assert_eq!(keys, expected_keys(&accounts, ixs.whirlpool_program_id));
        assert!(ix.accounts[0].is_signer);
        // Position token account is only read
        assert!(!ix.accounts[11].is_writable);
        assert_eq!(&ix.data[..8], &DEPOSIT_DISCRIMINATOR);
        assert_eq!(ix.data.len(), 8 + 24);
    }

    #[test]
    fn test_withdraw_shares_layout_with_deposit() {
        let ixs = VaultInstructions::default();
        let accounts = accounts();
        let deposit = ixs
            .deposit(&accounts, DepositParams { lp_amount: 5, max_amount_a: 0, max_amount_b: 0 })
            .unwrap();
        let withdraw = ixs
            .withdraw(&accounts, WithdrawParams { lp_amount: 5, min_amount_a: 0, min_amount_b: 0 })
            .unwrap();
        assert_eq!(deposit.accounts, withdraw.accounts);
        assert_eq!(&withdraw.data[..8], &WITHDRAW_DISCRIMINATOR);
        assert_eq!(&deposit.data[8..], &withdraw.data[8..]);
    }
}
