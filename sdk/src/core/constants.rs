use solana_sdk::{pubkey, pubkey::Pubkey};

/// Program ID of the vault program
pub const PROGRAM_ID: Pubkey = pubkey!("8ASrDisGKCvLhpXkeuHY7CNbH2yPkmsdm7rwwTB1PYjF");

/// Program ID of the concentrated-liquidity AMM the vault provides liquidity to
pub const WHIRLPOOL_PROGRAM_ID: Pubkey = pubkey!("whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc");

/// Owner of the treasury LP account that receives the vault's protocol fee
pub const DAO_TREASURY: Pubkey = pubkey!("8XhNoDjjNoLP5Rys1pBJKGdE8acEC1HJsWGkfkMt6JP1");

/// Get the vault program ID
pub fn program_id() -> Pubkey {
    PROGRAM_ID
}

/// Seeds for program-derived addresses
pub mod seeds {
    pub const VAULT: &[u8] = b"vault";
    pub const LP_MINT: &[u8] = b"mint";
    pub const TICK_ARRAY: &[u8] = b"tick_array";
    pub const POSITION: &[u8] = b"position";
    pub const ORACLE: &[u8] = b"oracle";
}

pub use orca_whirlpools_core::{
    MAX_SQRT_PRICE, MAX_TICK_INDEX, MIN_SQRT_PRICE, MIN_TICK_INDEX, NUM_REWARDS, TICK_ARRAY_SIZE,
};

/// Tick arrays a swap-bearing AMM instruction takes
pub const MAX_SWAP_TICK_ARRAYS: usize = 3;

/// Upper bound of `getMultipleAccounts` per request
pub const MAX_ACCOUNTS_PER_RPC_REQUEST: usize = 100;
