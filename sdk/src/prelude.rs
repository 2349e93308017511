//! Common imports for SDK users

pub use anchor_lang::{AnchorDeserialize, AnchorSerialize};
pub use solana_sdk::{instruction::Instruction, pubkey::Pubkey};

pub use crate::{
    cache::{AccountCache, AccountReader, RpcAccountReader},
    client::VaultClient,
    config::SdkConfig,
    core::{SdkError, SdkResult, SwapDirection, VaultAddresses, VaultKey},
    instructions::{DepositParams, WithdrawParams},
    resolver::AddressResolver,
};
