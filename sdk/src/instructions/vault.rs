use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};

use super::VaultInstructions;
use crate::{
    core::{SdkResult, VaultAddresses},
    impl_instruction,
    protocol::associated_token_address,
};

const INITIALIZE_VAULT_DISCRIMINATOR: [u8; 8] = [48, 191, 163, 44, 71, 129, 63, 164];
const SET_VAULT_FEE_DISCRIMINATOR: [u8; 8] = [111, 127, 236, 243, 38, 32, 53, 217];
const SET_VAULT_PAUSE_STATUS_DISCRIMINATOR: [u8; 8] = [192, 68, 106, 238, 59, 59, 156, 65];
const SET_MIN_SLOTS_BETWEEN_REINVEST_DISCRIMINATOR: [u8; 8] = [24, 181, 74, 60, 173, 196, 243, 35];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeVaultParams {
    pub vault_id: u8,
}

impl_instruction!(InitializeVaultParams, INITIALIZE_VAULT_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetVaultFeeParams {
    pub fee: u64,
}

impl_instruction!(SetVaultFeeParams, SET_VAULT_FEE_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetVaultPauseStatusParams {
    pub is_paused: bool,
}

impl_instruction!(SetVaultPauseStatusParams, SET_VAULT_PAUSE_STATUS_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SetMinSlotsBetweenReinvestParams {
    pub slots: u64,
}

impl_instruction!(
    SetMinSlotsBetweenReinvestParams,
    SET_MIN_SLOTS_BETWEEN_REINVEST_DISCRIMINATOR
);

impl VaultInstructions {
    /// Create the vault, its LP mint and input token accounts, and the DAO
    /// treasury's LP token account
    pub fn initialize_vault(
        &self,
        user_signer: Pubkey,
        whirlpool: Pubkey,
        token_mints: [Pubkey; 2],
        vault: &VaultAddresses,
        dao_treasury: Pubkey,
        params: InitializeVaultParams,
    ) -> SdkResult<Instruction> {
        let dao_treasury_lp_token_account = associated_token_address(&dao_treasury, &vault.lp_mint);

        Ok(self
            .vault_program()
            .add_signer(user_signer)
            .add_readonly(whirlpool)
            .add_readonly(token_mints[0])
            .add_readonly(token_mints[1])
            .add_writable(vault.vault_account)
            .add_writable(vault.lp_mint)
            .add_writable(vault.input_token_a_account)
            .add_writable(vault.input_token_b_account)
            .add_writable(dao_treasury_lp_token_account)
            .add_readonly(dao_treasury)
            .add_readonly(system_program::id())
            .add_readonly(spl_associated_token_account::id())
            .add_readonly(spl_token::id())
            .add_readonly(sysvar::rent::id())
            .with_args(&params)?
            .build())
    }

    pub fn set_vault_fee(&self, admin: Pubkey, vault_account: Pubkey, fee: u64) -> SdkResult<Instruction> {
        self.admin_setter(admin, vault_account, &SetVaultFeeParams { fee })
    }

    pub fn set_vault_pause_status(
        &self,
        admin: Pubkey,
        vault_account: Pubkey,
        is_paused: bool,
    ) -> SdkResult<Instruction> {
        self.admin_setter(admin, vault_account, &SetVaultPauseStatusParams { is_paused })
    }

    pub fn set_min_slots_between_reinvest(
        &self,
        admin: Pubkey,
        vault_account: Pubkey,
        slots: u64,
    ) -> SdkResult<Instruction> {
        self.admin_setter(
            admin,
            vault_account,
            &SetMinSlotsBetweenReinvestParams { slots },
        )
    }

    fn admin_setter<T: super::InstructionBuilder>(
        &self,
        admin: Pubkey,
        vault_account: Pubkey,
        params: &T,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_readonly_signer(admin)
            .add_writable(vault_account)
            .with_args(params)?
            .build())
    }
}
