//! Resolve and print the accounts of one vault.
//!
//! Usage: resolve_vault <POOL> [VAULT_ID] [CONFIG_TOML]
//!
//! Without a config file the mainnet preset is used; `RPC_URL` overrides the
//! endpoint. Set `RUST_LOG=clmm_vault_sdk=debug` to watch the reads.

use std::{env, str::FromStr};

use anyhow::{bail, Context, Result};
use clmm_vault_sdk::{SdkConfig, VaultClient, VaultKey};
use solana_sdk::pubkey::Pubkey;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let Some(pool) = args.next() else {
        bail!("usage: resolve_vault <POOL> [VAULT_ID] [CONFIG_TOML]");
    };
    let pool = Pubkey::from_str(&pool).context("invalid pool address")?;
    let vault_id: u8 = match args.next() {
        Some(id) => id.parse().context("invalid vault id")?,
        None => 0,
    };

    let mut config = match args.next() {
        Some(path) => SdkConfig::load(&path)?,
        None => SdkConfig::mainnet(),
    };
    if let Ok(rpc_url) = env::var("RPC_URL") {
        config = config.with_rpc_url(rpc_url);
    }

    let client = VaultClient::new(config)?;
    let key = VaultKey::new(pool, vault_id);

    let vault = client.resolver().vault_addresses(key).await?;
    println!("vault:           {}", vault.vault_account);
    println!("lp mint:         {}", vault.lp_mint);
    println!("input token A:   {}", vault.input_token_a_account);
    println!("input token B:   {}", vault.input_token_b_account);

    match client.resolver().active_position(key).await {
        Ok(position) => {
            let position = client.resolver().position_addresses(&position, key).await?;
            println!("position:        {}", position.position);
            println!("position mint:   {}", position.position_mint);
            println!("tick array low:  {}", position.tick_array_lower);
            println!("tick array high: {}", position.tick_array_upper);
        }
        Err(err) => println!("no active position: {err}"),
    }

    for reward in client.resolver().reward_accounts(key).await? {
        println!(
            "reward {}:        {} -> {}",
            reward.reward_index, reward.mint, reward.vault_reward_token_account
        );
    }

    let (idle_a, idle_b) = client.resolver().idle_balances(key).await?;
    println!("idle balances:   {idle_a} / {idle_b}");

    Ok(())
}
