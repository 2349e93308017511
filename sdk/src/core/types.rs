use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

/// Logical identity of a vault: the AMM pool it manages plus its numeric id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VaultKey {
    pub pool: Pubkey,
    pub vault_id: u8,
}

impl VaultKey {
    pub fn new(pool: Pubkey, vault_id: u8) -> Self {
        Self { pool, vault_id }
    }
}

/// Addresses derived for one vault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultAddresses {
    pub vault_account: Pubkey,
    pub lp_mint: Pubkey,
    pub input_token_a_account: Pubkey,
    pub input_token_b_account: Pubkey,
}

/// Accounts identifying one AMM position held by a vault.
///
/// The tick-array addresses depend on the pool's tick spacing, so a bundle is
/// only valid for the pool snapshot it was computed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionAddresses {
    pub whirlpool: Pubkey,
    pub position: Pubkey,
    pub position_mint: Pubkey,
    pub position_token_account: Pubkey,
    pub tick_array_lower: Pubkey,
    pub tick_array_upper: Pubkey,
}

impl PositionAddresses {
    /// Position bundle in the order the vault program declares it
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.whirlpool, false),
            AccountMeta::new(self.position, false),
            AccountMeta::new_readonly(self.position_token_account, false),
            AccountMeta::new(self.tick_array_lower, false),
            AccountMeta::new(self.tick_array_upper, false),
        ]
    }
}

/// Everything deposit and withdraw need
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DepositWithdrawAccounts {
    pub user_signer: Pubkey,
    pub vault: VaultAddresses,
    pub user_lp_token_account: Pubkey,
    pub user_token_a_account: Pubkey,
    pub user_token_b_account: Pubkey,
    pub position: PositionAddresses,
    pub pool_token_vault_a: Pubkey,
    pub pool_token_vault_b: Pubkey,
}

/// One active pool reward as seen from a vault
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewardAccounts {
    pub reward_index: u8,
    pub mint: Pubkey,
    pub reward_vault: Pubkey,
    pub vault_reward_token_account: Pubkey,
}

/// Swap direction on the AMM
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwapDirection {
    /// Token A in, token B out (price decreases)
    AToB,
    /// Token B in, token A out (price increases)
    BToA,
}

impl SwapDirection {
    pub fn from_a_to_b(a_to_b: bool) -> Self {
        if a_to_b {
            SwapDirection::AToB
        } else {
            SwapDirection::BToA
        }
    }

    pub fn is_a_to_b(self) -> bool {
        matches!(self, SwapDirection::AToB)
    }
}
