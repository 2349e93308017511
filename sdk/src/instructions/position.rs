use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};

use super::VaultInstructions;
use crate::{
    core::{PositionAddresses, SdkResult, VaultAddresses},
    impl_instruction,
};

const OPEN_POSITION_DISCRIMINATOR: [u8; 8] = [135, 128, 47, 77, 15, 152, 240, 49];
const CLOSE_POSITION_DISCRIMINATOR: [u8; 8] = [123, 134, 81, 0, 49, 68, 98, 98];
const REBALANCE_DISCRIMINATOR: [u8; 8] = [108, 158, 77, 9, 210, 52, 88, 62];

/// Parameters for opening a vault position
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct OpenPositionParams {
    pub position_bump: u8,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
}

impl_instruction!(OpenPositionParams, OPEN_POSITION_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct ClosePositionParams {}

impl_instruction!(ClosePositionParams, CLOSE_POSITION_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct RebalanceParams {}

impl_instruction!(RebalanceParams, REBALANCE_DISCRIMINATOR);

impl VaultInstructions {
    /// Open a new AMM position owned by the vault. The tick arrays covering
    /// both bounds must exist before this runs.
    pub fn open_position(
        &self,
        user_signer: Pubkey,
        vault_account: Pubkey,
        position: &PositionAddresses,
        params: OpenPositionParams,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_signer(user_signer)
            .add_writable(vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(position.position)
            .add_signer(position.position_mint)
            .add_writable(position.position_token_account)
            .add_readonly(position.whirlpool)
            .add_readonly(spl_token::id())
            .add_readonly(system_program::id())
            .add_readonly(sysvar::rent::id())
            .add_readonly(spl_associated_token_account::id())
            .with_args(&params)?
            .build())
    }

    pub fn close_position(
        &self,
        user_signer: Pubkey,
        vault_account: Pubkey,
        position: &PositionAddresses,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_signer(user_signer)
            .add_writable(vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(position.position)
            .add_writable(position.position_mint)
            .add_writable(position.position_token_account)
            .add_readonly(spl_token::id())
            .with_args(&ClosePositionParams::default())?
            .build())
    }

    /// Move the vault's liquidity from `current` into `new_position`
    pub fn rebalance(
        &self,
        user_signer: Pubkey,
        vault: &VaultAddresses,
        pool_token_vaults: [Pubkey; 2],
        current: &PositionAddresses,
        new_position: &PositionAddresses,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_signer(user_signer)
            .add_writable(vault.vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(vault.input_token_a_account)
            .add_writable(vault.input_token_b_account)
            .add_writable(pool_token_vaults[0])
            .add_writable(pool_token_vaults[1])
            .add_accounts(current.to_account_metas())
            .add_accounts(new_position.to_account_metas())
            .add_readonly(spl_token::id())
            .with_args(&RebalanceParams::default())?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> PositionAddresses {
        PositionAddresses {
            whirlpool: Pubkey::new_unique(),
            position: Pubkey::new_unique(),
            position_mint: Pubkey::new_unique(),
            position_token_account: Pubkey::new_unique(),
            tick_array_lower: Pubkey::new_unique(),
            tick_array_upper: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_open_position_signers_and_args() {
        let ixs = VaultInstructions::default();
        let position = bundle();
        let ix = ixs
            .open_position(
                Pubkey::new_unique(),
                Pubkey::new_unique(),
                &position,
                OpenPositionParams {
                    position_bump: 254,
                    tick_lower_index: -128,
                    tick_upper_index: 64,
                },
            )
            .unwrap();

        assert_eq!(ix.accounts.len(), 11);
        assert_eq!(ix.accounts[2].pubkey, ixs.whirlpool_program_id);
        // The position mint is created by the instruction and signs for it
        assert_eq!(ix.accounts[4].pubkey, position.position_mint);
        assert!(ix.accounts[4].is_signer);
        assert_eq!(ix.accounts[6].pubkey, position.whirlpool);

        let mut expected = OPEN_POSITION_DISCRIMINATOR.to_vec();
        expected.push(254);
        expected.extend_from_slice(&(-128i32).to_le_bytes());
        expected.extend_from_slice(&64i32.to_le_bytes());
        assert_eq!(ix.data, expected);
    }

    #[test]
    fn test_close_position_has_no_args() {
        let ix = VaultInstructions::default()
            .close_position(Pubkey::new_unique(), Pubkey::new_unique(), &bundle())
            .unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert_eq!(ix.data, CLOSE_POSITION_DISCRIMINATOR.to_vec());
    }

    #[test]
    fn test_rebalance_lists_both_bundles() {
        let current = bundle();
        let new_position = bundle();
        let vault = VaultAddresses {
            vault_account: Pubkey::new_unique(),
            lp_mint: Pubkey::new_unique(),
            input_token_a_account: Pubkey::new_unique(),
            input_token_b_account: Pubkey::new_unique(),
        };
        let ix = VaultInstructions::default()
            .rebalance(
                Pubkey::new_unique(),
                &vault,
                [Pubkey::new_unique(), Pubkey::new_unique()],
                &current,
                &new_position,
            )
            .unwrap();

        assert_eq!(ix.accounts.len(), 7 + 5 + 5 + 1);
        assert_eq!(ix.accounts[7].pubkey, current.whirlpool);
        assert_eq!(ix.accounts[8].pubkey, current.position);
        assert_eq!(ix.accounts[13].pubkey, new_position.position);
        assert_eq!(ix.accounts[16].pubkey, new_position.tick_array_upper);
    }
}
