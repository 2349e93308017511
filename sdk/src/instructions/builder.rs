use anchor_lang::AnchorSerialize;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::core::{SdkError, SdkResult};

/// Instruction arguments with their Anchor discriminator
pub trait InstructionBuilder: AnchorSerialize {
    /// The 8-byte instruction discriminator
    const DISCRIMINATOR: [u8; 8];

    /// Discriminator followed by the borsh-encoded arguments
    fn build_data(&self) -> SdkResult<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|e| SdkError::Serialization(e.to_string()))?;
        Ok(data)
    }
}

/// Ordered account list plus data for one program instruction
pub struct RawInstructionBuilder {
    program_id: Pubkey,
    accounts: Vec<AccountMeta>,
    data: Vec<u8>,
}

impl RawInstructionBuilder {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            accounts: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Add a writable signer account
    pub fn add_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, true));
        self
    }

    pub fn add_readonly_signer(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, true));
        self
    }

    /// Add a writable non-signer account
    pub fn add_writable(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new(pubkey, false));
        self
    }

    /// Add a readonly account
    pub fn add_readonly(mut self, pubkey: Pubkey) -> Self {
        self.accounts.push(AccountMeta::new_readonly(pubkey, false));
        self
    }

    /// Add multiple accounts
    pub fn add_accounts(mut self, accounts: Vec<AccountMeta>) -> Self {
        self.accounts.extend(accounts);
        self
    }

    /// Encode `args` as the instruction data
    pub fn with_args<T: InstructionBuilder>(mut self, args: &T) -> SdkResult<Self> {
        self.data = args.build_data()?;
        Ok(self)
    }

    pub fn build(self) -> Instruction {
        Instruction {
            program_id: self.program_id,
            accounts: self.accounts,
            data: self.data,
        }
    }
}

/// Implement [`InstructionBuilder`] for an arguments struct
#[macro_export]
macro_rules! impl_instruction {
    ($name:ident, $discriminator:expr) => {
        impl $crate::instructions::InstructionBuilder for $name {
            const DISCRIMINATOR: [u8; 8] = $discriminator;
        }
    };
}
