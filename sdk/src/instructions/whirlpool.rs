//! Calls into the AMM program itself.

use anchor_lang::prelude::{borsh, AnchorDeserialize, AnchorSerialize};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program};

use super::{RawInstructionBuilder, VaultInstructions};
use crate::{core::SdkResult, impl_instruction};

const INITIALIZE_TICK_ARRAY_DISCRIMINATOR: [u8; 8] = [11, 188, 193, 214, 141, 91, 149, 184];

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug)]
pub struct InitializeTickArrayParams {
    pub start_tick_index: i32,
}

impl_instruction!(InitializeTickArrayParams, INITIALIZE_TICK_ARRAY_DISCRIMINATOR);

impl VaultInstructions {
    /// AMM instruction creating the tick array starting at `start_tick_index`
    pub fn initialize_tick_array(
        &self,
        whirlpool: Pubkey,
        funder: Pubkey,
        tick_array: Pubkey,
        start_tick_index: i32,
    ) -> SdkResult<Instruction> {
        Ok(RawInstructionBuilder::new(self.whirlpool_program_id)
            .add_readonly(whirlpool)
            .add_signer(funder)
            .add_writable(tick_array)
            .add_readonly(system_program::id())
            .with_args(&InitializeTickArrayParams { start_tick_index })?
            .build())
    }
}
