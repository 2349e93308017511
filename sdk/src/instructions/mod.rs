//! Instruction builders for the vault program and the AMM calls it needs.
//!
//! Builders only order accounts and encode arguments; every address comes
//! in already resolved.

pub mod builder;
pub mod harvest;
pub mod liquidity;
pub mod position;
pub mod vault;
pub mod whirlpool;

pub use builder::*;
pub use harvest::*;
pub use liquidity::*;
pub use position::*;
pub use vault::*;
pub use whirlpool::*;

use solana_sdk::pubkey::Pubkey;

use crate::core::{program_id, WHIRLPOOL_PROGRAM_ID};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VaultInstructions {
    pub program_id: Pubkey,
    pub whirlpool_program_id: Pubkey,
}

impl VaultInstructions {
    pub fn new(program_id: Pubkey, whirlpool_program_id: Pubkey) -> Self {
        Self {
            program_id,
            whirlpool_program_id,
        }
    }

    fn vault_program(&self) -> RawInstructionBuilder {
        RawInstructionBuilder::new(self.program_id)
    }
}

impl Default for VaultInstructions {
    fn default() -> Self {
        Self::new(program_id(), WHIRLPOOL_PROGRAM_ID)
    }
}
