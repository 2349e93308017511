//! Fee and reward collection, reward swaps and reinvestment.

use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

use super::VaultInstructions;
use crate::{
    core::{PositionAddresses, RewardAccounts, SdkResult, VaultAddresses, MAX_SWAP_TICK_ARRAYS},
    impl_instruction,
};

const COLLECT_FEES_DISCRIMINATOR: [u8; 8] = [164, 152, 207, 99, 30, 186, 19, 182];
const COLLECT_REWARDS_DISCRIMINATOR: [u8; 8] = [63, 130, 90, 197, 39, 16, 143, 176];
const SWAP_REWARDS_DISCRIMINATOR: [u8; 8] = [92, 41, 172, 30, 190, 65, 174, 90];
const REINVEST_DISCRIMINATOR: [u8; 8] = [107, 29, 95, 200, 217, 52, 155, 76];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct CollectFeesParams {}

impl_instruction!(CollectFeesParams, COLLECT_FEES_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct CollectRewardsParams {
    pub reward_index: u8,
}

impl_instruction!(CollectRewardsParams, COLLECT_REWARDS_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct SwapRewardsParams {
    pub min_amount_out: u64,
}

impl_instruction!(SwapRewardsParams, SWAP_REWARDS_DISCRIMINATOR);

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, Default)]
pub struct ReinvestParams {}

impl_instruction!(ReinvestParams, REINVEST_DISCRIMINATOR);

/// AMM accounts of one swap leg: the pool, its token vaults, the tick
/// arrays the swap may cross and the pool oracle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapLegAccounts {
    pub whirlpool: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_arrays: [Pubkey; MAX_SWAP_TICK_ARRAYS],
    pub oracle: Pubkey,
}

impl VaultInstructions {
    pub fn collect_fees(
        &self,
        user_signer: Pubkey,
        vault: &VaultAddresses,
        pool_token_vaults: [Pubkey; 2],
        position: &PositionAddresses,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_readonly_signer(user_signer)
            .add_writable(vault.vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(vault.input_token_a_account)
            .add_writable(vault.input_token_b_account)
            .add_writable(pool_token_vaults[0])
            .add_writable(pool_token_vaults[1])
            .add_accounts(position.to_account_metas())
            .add_readonly(spl_token::id())
            .with_args(&CollectFeesParams::default())?
            .build())
    }

    pub fn collect_rewards(
        &self,
        user_signer: Pubkey,
        vault_account: Pubkey,
        reward: &RewardAccounts,
        position: &PositionAddresses,
    ) -> SdkResult<Instruction> {
        Ok(self
            .vault_program()
            .add_readonly_signer(user_signer)
            .add_writable(vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(reward.vault_reward_token_account)
            .add_writable(reward.reward_vault)
            .add_accounts(position.to_account_metas())
            .add_readonly(spl_token::id())
            .with_args(&CollectRewardsParams {
                reward_index: reward.reward_index,
            })?
            .build())
    }

    /// Swap a collected reward through `route` into `destination`, one of the
    /// vault's input token accounts
    pub fn swap_rewards(
        &self,
        user_signer: Pubkey,
        vault_account: Pubkey,
        reward_token_account: Pubkey,
        destination_token_account: Pubkey,
        route: &SwapLegAccounts,
        params: SwapRewardsParams,
    ) -> SdkResult<Instruction> {
        let builder = self
            .vault_program()
            .add_readonly_signer(user_signer)
            .add_writable(vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(route.whirlpool)
            .add_writable(reward_token_account)
            .add_writable(destination_token_account)
            .add_writable(route.token_vault_a)
            .add_writable(route.token_vault_b);

        Ok(route
            .tick_arrays
            .iter()
            .fold(builder, |builder, tick_array| builder.add_writable(*tick_array))
            .add_readonly(route.oracle)
            .add_readonly(spl_token::id())
            .with_args(&params)?
            .build())
    }

    /// Compound idle vault balances into the active position, swapping
    /// through the vault's own pool first
    pub fn reinvest(
        &self,
        user_signer: Pubkey,
        vault: &VaultAddresses,
        position: &PositionAddresses,
        pool_leg: &SwapLegAccounts,
    ) -> SdkResult<Instruction> {
        let builder = self
            .vault_program()
            .add_readonly_signer(user_signer)
            .add_writable(vault.vault_account)
            .add_readonly(self.whirlpool_program_id)
            .add_writable(vault.input_token_a_account)
            .add_writable(vault.input_token_b_account)
            .add_writable(pool_leg.token_vault_a)
            .add_writable(pool_leg.token_vault_b)
            .add_accounts(position.to_account_metas());

        Ok(pool_leg
            .tick_arrays
            .iter()
            .fold(builder, |builder, tick_array| builder.add_writable(*tick_array))
            .add_readonly(pool_leg.oracle)
            .add_readonly(spl_token::id())
            .with_args(&ReinvestParams::default())?
            .build())
    }
}
