//! Address resolution for vault operations.
//!
//! Seed-only derivations go straight to [`PdaBuilder`] and never touch the
//! cache. Anything that depends on pool, position or vault state reads that
//! state through the shared [`AccountCache`] first, in explicit stages:
//! position before its pool, pool before the associated accounts that need
//! its mints.

use std::sync::{Arc, PoisonError, RwLock};

use ahash::AHashMap;
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, instrument};

use crate::{
    cache::AccountCache,
    core::{
        DepositWithdrawAccounts, PositionAddresses, RewardAccounts, SdkError, SdkResult,
        VaultAddresses, VaultKey,
    },
    protocol::{associated_token_address, checked_start_tick_index, PdaBuilder},
    state::{TokenAccountInfo, VaultAccount, Whirlpool, WhirlpoolPosition},
};

pub struct AddressResolver {
    cache: Arc<AccountCache>,
    pda: PdaBuilder,
    vaults: RwLock<AHashMap<VaultKey, VaultAddresses>>,
}

impl AddressResolver {
    pub fn new(cache: Arc<AccountCache>, pda: PdaBuilder) -> Self {
        Self {
            cache,
            pda,
            vaults: RwLock::new(AHashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<AccountCache> {
        &self.cache
    }

    pub fn pda(&self) -> &PdaBuilder {
        &self.pda
    }

    /// Vault account address; seed-only, no fetch
    pub fn vault_account(&self, key: VaultKey) -> Pubkey {
        self.pda.vault(&key.pool, key.vault_id).0
    }

    /// Vault account, LP mint and the vault's two input token accounts.
    ///
    /// The first call per key reads the pool (for its mints); later calls are
    /// served from the memo without any fetch.
    #[instrument(skip_all, fields(pool = %key.pool, vault_id = key.vault_id))]
    pub async fn vault_addresses(&self, key: VaultKey) -> SdkResult<VaultAddresses> {
        if let Some(addresses) = self
            .vaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(*addresses);
        }

        let pool: Whirlpool = self.cache.get(&key.pool, false).await?;
        let vault_account = self.vault_account(key);
        let (lp_mint, _) = self.pda.lp_mint(&vault_account);
        let derived = VaultAddresses {
            vault_account,
            lp_mint,
            input_token_a_account: associated_token_address(&vault_account, &pool.token_mint_a),
            input_token_b_account: associated_token_address(&vault_account, &pool.token_mint_b),
        };
        debug!(vault = %vault_account, lp_mint = %lp_mint, "derived vault addresses");

        // Concurrent first calls derive the same bundle; keep whichever landed first
        let mut vaults = self.vaults.write().unwrap_or_else(PoisonError::into_inner);
        Ok(*vaults.entry(key).or_insert(derived))
    }

    /// Accounts of an existing position held by the vault
    #[instrument(skip_all, fields(position = %position, pool = %key.pool))]
    pub async fn position_addresses(
        &self,
        position: &Pubkey,
        key: VaultKey,
    ) -> SdkResult<PositionAddresses> {
        let view: WhirlpoolPosition = self.cache.get(position, false).await?;
        if view.whirlpool != key.pool {
            return Err(SdkError::Configuration(format!(
                "position {} belongs to pool {}, not {}",
                position, view.whirlpool, key.pool
            )));
        }

        let pool: Whirlpool = self.cache.get(&view.whirlpool, false).await?;
        let vault = self.vault_addresses(key).await?;
        let mut addresses = self.position_bundle(
            &pool,
            key.pool,
            view.position_mint,
            view.tick_lower_index,
            view.tick_upper_index,
            &vault.vault_account,
        )?;
        addresses.position = *position;
        Ok(addresses)
    }

    /// Accounts of a position that is about to be opened with `position_mint`
    pub async fn position_addresses_for_ticks(
        &self,
        key: VaultKey,
        position_mint: &Pubkey,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> SdkResult<PositionAddresses> {
        if tick_lower_index >= tick_upper_index {
            return Err(SdkError::InvalidParameters(format!(
                "tick bounds out of order ({} >= {})",
                tick_lower_index, tick_upper_index
            )));
        }
        let pool: Whirlpool = self.cache.get(&key.pool, false).await?;
        let vault = self.vault_addresses(key).await?;
        self.position_bundle(
            &pool,
            key.pool,
            *position_mint,
            tick_lower_index,
            tick_upper_index,
            &vault.vault_account,
        )
    }

    /// The vault's current open position, read fresh from chain
    #[instrument(skip_all, fields(pool = %key.pool, vault_id = key.vault_id))]
    pub async fn active_position(&self, key: VaultKey) -> SdkResult<Pubkey> {
        let vault_account = self.vault_account(key);
        let vault: VaultAccount = self.cache.get(&vault_account, true).await?;
        vault
            .active_position()
            .map(|position| position.pubkey)
            .ok_or_else(|| {
                SdkError::Configuration(format!(
                    "vault {} (pool {}, id {}) has no open position",
                    vault_account, key.pool, key.vault_id
                ))
            })
    }

    /// Accounts for deposit and withdraw by `user`.
    ///
    /// Vault addresses (pool read) and the active position (vault read) are
    /// independent and resolved together; the position bundle then needs
    /// both. The user's associated accounts are pure derivations.
    #[instrument(skip_all, fields(user = %user, pool = %key.pool, vault_id = key.vault_id))]
    pub async fn deposit_withdraw_accounts(
        &self,
        user: &Pubkey,
        key: VaultKey,
    ) -> SdkResult<DepositWithdrawAccounts> {
        let (vault, active) = tokio::try_join!(self.vault_addresses(key), self.active_position(key))?;
        let position = self.position_addresses(&active, key).await?;
        let pool: Whirlpool = self.cache.get(&key.pool, false).await?;

        Ok(DepositWithdrawAccounts {
            user_signer: *user,
            vault,
            user_lp_token_account: associated_token_address(user, &vault.lp_mint),
            user_token_a_account: associated_token_address(user, &pool.token_mint_a),
            user_token_b_account: associated_token_address(user, &pool.token_mint_b),
            position,
            pool_token_vault_a: pool.token_vault_a,
            pool_token_vault_b: pool.token_vault_b,
        })
    }

    /// Reward mint, pool reward vault and vault-owned reward account for
    /// every active reward slot of the pool
    pub async fn reward_accounts(&self, key: VaultKey) -> SdkResult<Vec<RewardAccounts>> {
        let pool: Whirlpool = self.cache.get(&key.pool, false).await?;
        let vault = self.vault_addresses(key).await?;
        Ok(pool
            .active_reward_infos()
            .map(|(reward_index, info)| RewardAccounts {
                reward_index,
                mint: info.mint,
                reward_vault: info.vault,
                vault_reward_token_account: associated_token_address(
                    &vault.vault_account,
                    &info.mint,
                ),
            })
            .collect())
    }

    /// Current balances of the vault's input token accounts, read fresh in
    /// one batch
    pub async fn idle_balances(&self, key: VaultKey) -> SdkResult<(u64, u64)> {
        let vault = self.vault_addresses(key).await?;
        let accounts: Vec<TokenAccountInfo> = self
            .cache
            .get_many(
                &[vault.input_token_a_account, vault.input_token_b_account],
                true,
            )
            .await?;
        match accounts.as_slice() {
            [a, b] => Ok((a.amount, b.amount)),
            _ => Err(SdkError::Rpc(format!(
                "expected 2 token accounts, got {}",
                accounts.len()
            ))),
        }
    }

    fn position_bundle(
        &self,
        pool: &Whirlpool,
        whirlpool: Pubkey,
        position_mint: Pubkey,
        tick_lower_index: i32,
        tick_upper_index: i32,
        vault_account: &Pubkey,
    ) -> SdkResult<PositionAddresses> {
        let start_lower = checked_start_tick_index(tick_lower_index, pool.tick_spacing)?;
        let start_upper = checked_start_tick_index(tick_upper_index, pool.tick_spacing)?;
        Ok(PositionAddresses {
            whirlpool,
            position: self.pda.position(&position_mint).0,
            position_mint,
            position_token_account: associated_token_address(vault_account, &position_mint),
            tick_array_lower: self.pda.tick_array(&whirlpool, start_lower).0,
            tick_array_upper: self.pda.tick_array(&whirlpool, start_upper).0,
        })
    }
}
