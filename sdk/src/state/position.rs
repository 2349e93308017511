use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

use super::{decode_anchor_account, AccountDecoder, AccountKind};
use crate::core::NUM_REWARDS;

/// Anchor discriminator of the AMM position account (sha256("account:Position")[..8])
pub const POSITION_DISCRIMINATOR: [u8; 8] = [170, 188, 143, 228, 122, 64, 247, 208];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PositionRewardInfo {
    pub growth_inside_checkpoint: u128,
    pub amount_owed: u64,
}

/// Snapshot of an AMM position. Many positions reference one pool.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct WhirlpoolPosition {
    pub whirlpool: Pubkey,
    pub position_mint: Pubkey,
    pub liquidity: u128,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub fee_growth_checkpoint_a: u128,
    pub fee_owed_a: u64,
    pub fee_growth_checkpoint_b: u128,
    pub fee_owed_b: u64,
    pub reward_infos: [PositionRewardInfo; NUM_REWARDS],
}

impl AccountDecoder for WhirlpoolPosition {
    const KIND: AccountKind = AccountKind::Position;

    fn decode(data: &[u8]) -> Result<Self, String> {
        let position: WhirlpoolPosition = decode_anchor_account(data, &POSITION_DISCRIMINATOR)?;
        if position.tick_lower_index >= position.tick_upper_index {
            return Err(format!(
                "tick bounds out of order ({} >= {})",
                position.tick_lower_index, position.tick_upper_index
            ));
        }
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_anchor_account, position_fixture};

    #[test]
    fn test_decode_position() {
        let pool = Pubkey::new_unique();
        let position = position_fixture(pool, Pubkey::new_unique(), -128, 256, 5_000);
        let data = encode_anchor_account(&POSITION_DISCRIMINATOR, &position);
        assert_eq!(WhirlpoolPosition::decode(&data).unwrap(), position);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let position = position_fixture(Pubkey::new_unique(), Pubkey::new_unique(), 64, 64, 0);
        let data = encode_anchor_account(&POSITION_DISCRIMINATOR, &position);
        assert!(WhirlpoolPosition::decode(&data).unwrap_err().contains("out of order"));
    }

    #[test]
    fn test_pool_bytes_are_not_a_position() {
        let pool = crate::testing::WhirlpoolFixture::new(64, 0).build();
        let data = encode_anchor_account(&crate::state::WHIRLPOOL_DISCRIMINATOR, &pool);
        assert!(WhirlpoolPosition::decode(&data).is_err());
    }
}
