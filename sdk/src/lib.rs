//! Client-side SDK for an automated-liquidity vault on a concentrated-liquidity AMM
//!
//! Resolves every account a vault operation needs and builds the unsigned
//! instructions:
//! - Account cache with batched, memoized reads
//! - Address resolution for vaults, positions and rewards
//! - Tick-array windows for swap-bearing instructions
//! - Swap direction for reinvestment
//! - Instruction assembly for every vault operation
pub mod cache;
pub mod client;
pub mod config;
pub mod core;
pub mod instructions;
pub mod prelude;
pub mod protocol;
pub mod resolver;
pub mod state;
pub mod testing;

pub use cache::{AccountCache, AccountReader, RpcAccountReader};
pub use client::VaultClient;
pub use config::{SdkConfig, SwapRouteConfig};
pub use crate::core::*;
pub use resolver::AddressResolver;
