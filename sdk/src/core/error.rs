use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::state::AccountKind;

#[derive(Error, Debug)]
pub enum SdkError {
    /// The remote reader returned no account for this address
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Bytes were present but do not match the expected layout
    #[error("Failed to decode {address} as {kind}: {reason}")]
    Decode {
        address: Pubkey,
        kind: AccountKind,
        reason: String,
    },

    /// A logical precondition on on-chain or local configuration is unmet
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Tick index {0} is outside the valid tick range")]
    TickOutOfRange(i32),

    #[error("Math overflow")]
    MathOverflow,

    #[error("Config file error: {0}")]
    ConfigFile(String),
}

impl SdkError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        SdkError::Configuration(msg.into())
    }

    /// Whether this error names a missing or malformed remote account
    pub fn is_account_error(&self) -> bool {
        matches!(self, SdkError::AccountNotFound(_) | SdkError::Decode { .. })
    }
}

impl From<solana_client::client_error::ClientError> for SdkError {
    fn from(err: solana_client::client_error::ClientError) -> Self {
        SdkError::Rpc(err.to_string())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_account() {
        let address = Pubkey::new_unique();
        let err = SdkError::AccountNotFound(address);
        assert!(err.to_string().contains(&address.to_string()));
        assert!(err.is_account_error());

        let err = SdkError::Decode {
            address,
            kind: AccountKind::Whirlpool,
            reason: "discriminator mismatch".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("whirlpool"));
        assert!(msg.contains("discriminator mismatch"));

        assert!(!SdkError::configuration("no route").is_account_error());
    }
}
