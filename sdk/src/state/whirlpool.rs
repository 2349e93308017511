use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

use super::{decode_anchor_account, AccountDecoder, AccountKind};
use crate::core::NUM_REWARDS;

/// Anchor discriminator of the AMM pool account (sha256("account:Whirlpool")[..8])
pub const WHIRLPOOL_DISCRIMINATOR: [u8; 8] = [63, 149, 209, 12, 225, 128, 99, 9];

/// Reward emission slot of a pool
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WhirlpoolRewardInfo {
    pub mint: Pubkey,
    pub vault: Pubkey,
    pub authority: Pubkey,
    pub emissions_per_second_x64: u128,
    pub growth_global_x64: u128,
}

impl WhirlpoolRewardInfo {
    /// Uninitialized slots carry the default mint
    pub fn is_active(&self) -> bool {
        self.mint != Pubkey::default()
    }
}

/// Snapshot of an AMM pool. A refresh produces a new value, never an update.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Whirlpool {
    pub whirlpools_config: Pubkey,
    pub whirlpool_bump: [u8; 1],
    pub tick_spacing: u16,
    pub tick_spacing_seed: [u8; 2],
    pub fee_rate: u16,
    pub protocol_fee_rate: u16,
    pub liquidity: u128,
    /// Q64.64
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub protocol_fee_owed_a: u64,
    pub protocol_fee_owed_b: u64,
    pub token_mint_a: Pubkey,
    pub token_vault_a: Pubkey,
    pub fee_growth_global_a: u128,
    pub token_mint_b: Pubkey,
    pub token_vault_b: Pubkey,
    pub fee_growth_global_b: u128,
    pub reward_last_updated_timestamp: u64,
    pub reward_infos: [WhirlpoolRewardInfo; NUM_REWARDS],
}

impl Whirlpool {
    /// Reward slots with an initialized mint, paired with their slot index
    pub fn active_reward_infos(&self) -> impl Iterator<Item = (u8, &WhirlpoolRewardInfo)> {
        self.reward_infos
            .iter()
            .enumerate()
            .filter(|(_, info)| info.is_active())
            .map(|(i, info)| (i as u8, info))
    }

    pub fn token_mints(&self) -> [Pubkey; 2] {
        [self.token_mint_a, self.token_mint_b]
    }
}

impl AccountDecoder for Whirlpool {
    const KIND: AccountKind = AccountKind::Whirlpool;

    fn decode(data: &[u8]) -> Result<Self, String> {
        let pool: Whirlpool = decode_anchor_account(data, &WHIRLPOOL_DISCRIMINATOR)?;
        if pool.tick_spacing == 0 {
            return Err("tick spacing is zero".to_string());
        }
        Ok(pool)
    }
}
