//! Typed views over raw account bytes.
//!
//! The set of decoders is closed: every account the resolver reads is one of
//! the [`AccountKind`]s below, and the call site selects the decoder through
//! the type parameter of [`crate::cache::AccountCache::get`].

pub mod position;
pub mod token;
pub mod vault;
pub mod whirlpool;

use std::fmt;

use anchor_lang::AnchorDeserialize;

pub use position::*;
pub use token::*;
pub use vault::*;
pub use whirlpool::*;

/// Entity kinds the cache knows how to decode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccountKind {
    Whirlpool,
    Position,
    Vault,
    Mint,
    TokenAccount,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Whirlpool => "whirlpool",
            AccountKind::Position => "position",
            AccountKind::Vault => "vault",
            AccountKind::Mint => "mint",
            AccountKind::TokenAccount => "token account",
        };
        f.write_str(name)
    }
}

/// Parse raw account bytes into a typed view.
///
/// Implementations return `Err` with a human-readable reason rather than a
/// partially filled value; the cache attaches the address and kind.
pub trait AccountDecoder: Sized {
    const KIND: AccountKind;

    fn decode(data: &[u8]) -> Result<Self, String>;
}

/// Check the 8-byte Anchor discriminator and borsh-decode the body.
///
/// Trailing bytes are allowed: Anchor accounts are allocated with headroom.
pub(crate) fn decode_anchor_account<T: AnchorDeserialize>(
    data: &[u8],
    discriminator: &[u8; 8],
) -> Result<T, String> {
    if data.len() < 8 {
        return Err(format!("account data too short ({} bytes)", data.len()));
    }
    if data[..8] != discriminator[..] {
        return Err("discriminator mismatch".to_string());
    }
    let mut body = &data[8..];
    T::deserialize(&mut body).map_err(|e| e.to_string())
}
