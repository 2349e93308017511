use solana_program::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_token::state::{Account as SplTokenAccount, Mint as SplMint};

use super::{AccountDecoder, AccountKind};

/// The fields of an SPL mint this crate consumes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MintInfo {
    pub decimals: u8,
    pub supply: u64,
}

impl AccountDecoder for MintInfo {
    const KIND: AccountKind = AccountKind::Mint;

    fn decode(data: &[u8]) -> Result<Self, String> {
        let body = data
            .get(..SplMint::LEN)
            .ok_or_else(|| format!("mint data too short ({} bytes)", data.len()))?;
        let mint = SplMint::unpack(body).map_err(|e| e.to_string())?;
        Ok(Self {
            decimals: mint.decimals,
            supply: mint.supply,
        })
    }
}

/// The fields of an SPL token account this crate consumes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenAccountInfo {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
}

impl AccountDecoder for TokenAccountInfo {
    const KIND: AccountKind = AccountKind::TokenAccount;

    fn decode(data: &[u8]) -> Result<Self, String> {
        let body = data
            .get(..SplTokenAccount::LEN)
            .ok_or_else(|| format!("token account data too short ({} bytes)", data.len()))?;
        let account = SplTokenAccount::unpack(body).map_err(|e| e.to_string())?;
        Ok(Self {
            mint: account.mint,
            owner: account.owner,
            amount: account.amount,
        })
    }
}
