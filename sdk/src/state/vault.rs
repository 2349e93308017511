use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

use super::{decode_anchor_account, AccountDecoder, AccountKind};

/// Anchor discriminator of the vault account (sha256("account:VaultAccount")[..8])
pub const VAULT_ACCOUNT_DISCRIMINATOR: [u8; 8] = [230, 251, 241, 83, 139, 202, 93, 28];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VaultBumps {
    pub vault: u8,
    pub lp_token_mint: u8,
}

/// A position tracked by the vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultPosition {
    pub pubkey: Pubkey,
    pub lower_tick: i32,
    pub upper_tick: i32,
}

/// On-chain state of a vault
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct VaultAccount {
    pub version: u8,
    pub bumps: VaultBumps,
    pub vault_id: u8,
    pub whirlpool_id: Pubkey,
    pub input_token_a_mint: Pubkey,
    pub input_token_b_mint: Pubkey,
    /// Protocol fee in basis points of collected fees and rewards
    pub fee: u64,
    pub min_slots_between_reinvest: u64,
    pub last_reinvestment_slot: u64,
    pub is_paused: bool,
    /// Open position first
    pub positions: Vec<VaultPosition>,
}

impl VaultAccount {
    /// The vault's current open position
    pub fn active_position(&self) -> Option<&VaultPosition> {
        self.positions.first()
    }
}

impl AccountDecoder for VaultAccount {
    const KIND: AccountKind = AccountKind::Vault;

    fn decode(data: &[u8]) -> Result<Self, String> {
        decode_anchor_account(data, &VAULT_ACCOUNT_DISCRIMINATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{encode_anchor_account, vault_fixture};

    #[test]
    fn test_decode_vault_with_padding() {
        let position = VaultPosition {
            pubkey: Pubkey::new_unique(),
            lower_tick: -64,
            upper_tick: 64,
        };
        let vault = vault_fixture(Pubkey::new_unique(), 7, vec![position]);
        let mut data = encode_anchor_account(&VAULT_ACCOUNT_DISCRIMINATOR, &vault);
        data.extend_from_slice(&[0u8; 128]);

        let decoded = VaultAccount::decode(&data).unwrap();
        assert_eq!(decoded.vault_id, 7);
        assert_eq!(decoded.active_position(), Some(&position));
    }

    #[test]
    fn test_empty_position_list() {
        let vault = vault_fixture(Pubkey::new_unique(), 0, vec![]);
        let data = encode_anchor_account(&VAULT_ACCOUNT_DISCRIMINATOR, &vault);
        assert!(VaultAccount::decode(&data).unwrap().active_position().is_none());
    }
}
