//! Vault client: resolves every account an operation needs and hands back
//! unsigned instructions.

use std::sync::Arc;

use solana_sdk::{instruction::Instruction, pubkey::Pubkey};
use spl_associated_token_account::instruction::create_associated_token_account;
use tracing::{debug, instrument};

use crate::{
    cache::{AccountCache, AccountReader, RpcAccountReader},
    config::SdkConfig,
    core::{SdkError, SdkResult, SwapDirection, VaultKey},
    instructions::{
        DepositParams, InitializeVaultParams, OpenPositionParams, SwapLegAccounts,
        SwapRewardsParams, VaultInstructions, WithdrawParams,
    },
    protocol::{
        checked_start_tick_index, initializable_tick_index, is_token_a_to_b,
        liquidity_from_token_amounts, price_to_tick_index, swap_tick_arrays, tick_array_window,
        tick_sqrt_price, token_amounts_from_liquidity, PdaBuilder,
    },
    resolver::AddressResolver,
    state::{MintInfo, Whirlpool, WhirlpoolPosition},
};

pub struct VaultClient {
    config: SdkConfig,
    resolver: AddressResolver,
    instructions: VaultInstructions,
}

impl VaultClient {
    /// Client reading accounts over JSON-RPC at `config.rpc_url`
    pub fn new(config: SdkConfig) -> SdkResult<Self> {
        config.validate()?;
        let reader = RpcAccountReader::from_url(&config.rpc_url, config.commitment_config()?);
        Self::with_reader(config, Arc::new(reader))
    }

    /// Client over any account source; one cache is created per client
    pub fn with_reader(config: SdkConfig, reader: Arc<dyn AccountReader>) -> SdkResult<Self> {
        config.validate()?;
        let cache = Arc::new(AccountCache::new(reader));
        let pda = PdaBuilder::new(config.program_id, config.whirlpool_program_id);
        Ok(Self {
            resolver: AddressResolver::new(cache, pda),
            instructions: VaultInstructions::new(config.program_id, config.whirlpool_program_id),
            config,
        })
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn resolver(&self) -> &AddressResolver {
        &self.resolver
    }

    pub fn cache(&self) -> &Arc<AccountCache> {
        self.resolver.cache()
    }

    pub fn instructions(&self) -> &VaultInstructions {
        &self.instructions
    }

    fn pda(&self) -> &PdaBuilder {
        self.resolver.pda()
    }

    /// Vault creation followed by one associated-account creation per active
    /// pool reward, owned by the vault
    #[instrument(skip_all, fields(pool = %key.pool, vault_id = key.vault_id))]
    pub async fn initialize_vault(&self, user: Pubkey, key: VaultKey) -> SdkResult<Vec<Instruction>> {
        let pool: Whirlpool = self.cache().get(&key.pool, false).await?;
        let vault = self.resolver.vault_addresses(key).await?;
        let rewards = self.resolver.reward_accounts(key).await?;

        let mut ixs = vec![self.instructions.initialize_vault(
            user,
            key.pool,
            pool.token_mints(),
            &vault,
            self.config.dao_treasury,
            InitializeVaultParams {
                vault_id: key.vault_id,
            },
        )?];
        ixs.extend(rewards.iter().map(|reward| {
            create_associated_token_account(&user, &vault.vault_account, &reward.mint, &spl_token::id())
        }));
        debug!(rewards = rewards.len(), "built initialize_vault");
        Ok(ixs)
    }

    /// Open a position between two human-readable prices.
    ///
    /// Both bounds are snapped to the pool's tick spacing. The returned list
    /// starts with the AMM calls creating the tick arrays for the bounds;
    /// `position_mint` must sign the final instruction.
    #[instrument(skip_all, fields(pool = %key.pool, lower_price = lower_price, upper_price = upper_price))]
    pub async fn open_position(
        &self,
        user: Pubkey,
        key: VaultKey,
        position_mint: Pubkey,
        lower_price: f64,
        upper_price: f64,
    ) -> SdkResult<Vec<Instruction>> {
        let pool: Whirlpool = self.cache().get(&key.pool, false).await?;
        let mints: Vec<MintInfo> = self.cache().get_many(&pool.token_mints(), false).await?;
        let (decimals_a, decimals_b) = match mints.as_slice() {
            [a, b] => (a.decimals, b.decimals),
            _ => return Err(SdkError::Rpc(format!("expected 2 mints, got {}", mints.len()))),
        };

        let tick_lower_index = initializable_tick_index(
            price_to_tick_index(lower_price, decimals_a, decimals_b)?,
            pool.tick_spacing,
        );
        let tick_upper_index = initializable_tick_index(
            price_to_tick_index(upper_price, decimals_a, decimals_b)?,
            pool.tick_spacing,
        );

        let position = self
            .resolver
            .position_addresses_for_ticks(key, &position_mint, tick_lower_index, tick_upper_index)
            .await?;
        let vault_account = self.resolver.vault_account(key);

        let start_lower = checked_start_tick_index(tick_lower_index, pool.tick_spacing)?;
        let start_upper = checked_start_tick_index(tick_upper_index, pool.tick_spacing)?;
        let mut ixs = vec![self.instructions.initialize_tick_array(
            key.pool,
            user,
            position.tick_array_lower,
            start_lower,
        )?];
        if start_upper != start_lower {
            ixs.push(self.instructions.initialize_tick_array(
                key.pool,
                user,
                position.tick_array_upper,
                start_upper,
            )?);
        }

        ixs.push(self.instructions.open_position(
            user,
            vault_account,
            &position,
            OpenPositionParams {
                position_bump: self.pda().position(&position_mint).1,
                tick_lower_index,
                tick_upper_index,
            },
        )?);
        debug!(tick_lower_index, tick_upper_index, "built open_position");
        Ok(ixs)
    }

    pub async fn close_position(&self, user: Pubkey, key: VaultKey, position: &Pubkey) -> SdkResult<Instruction> {
        let position = self.resolver.position_addresses(position, key).await?;
        self.instructions
            .close_position(user, self.resolver.vault_account(key), &position)
    }

    pub async fn deposit(&self, user: Pubkey, key: VaultKey, params: DepositParams) -> SdkResult<Instruction> {
        let accounts = self.resolver.deposit_withdraw_accounts(&user, key).await?;
        self.instructions.deposit(&accounts, params)
    }

    pub async fn withdraw(&self, user: Pubkey, key: VaultKey, params: WithdrawParams) -> SdkResult<Instruction> {
        let accounts = self.resolver.deposit_withdraw_accounts(&user, key).await?;
        self.instructions.withdraw(&accounts, params)
    }

    pub async fn collect_fees(&self, user: Pubkey, key: VaultKey) -> SdkResult<Instruction> {
        let (vault, active) = tokio::try_join!(
            self.resolver.vault_addresses(key),
            self.resolver.active_position(key)
        )?;
        let position = self.resolver.position_addresses(&active, key).await?;
        let pool: Whirlpool = self.cache().get(&key.pool, false).await?;
        self.instructions.collect_fees(
            user,
            &vault,
            [pool.token_vault_a, pool.token_vault_b],
            &position,
        )
    }

    pub async fn collect_rewards(&self, user: Pubkey, key: VaultKey, reward_index: u8) -> SdkResult<Instruction> {
        let vault = self.resolver.vault_addresses(key).await?;
        let (rewards, active) = tokio::try_join!(
            self.resolver.reward_accounts(key),
            self.resolver.active_position(key)
        )?;
        let reward = rewards
            .into_iter()
            .find(|reward| reward.reward_index == reward_index)
            .ok_or_else(|| {
                SdkError::configuration(format!(
                    "pool {} has no active reward at index {}",
                    key.pool, reward_index
                ))
            })?;
        let position = self.resolver.position_addresses(&active, key).await?;
        self.instructions
            .collect_rewards(user, vault.vault_account, &reward, &position)
    }

    /// Swap the collected reward at `reward_index` into one of the vault's
    /// input tokens through the route configured for its mint
    #[instrument(skip_all, fields(pool = %key.pool, reward_index = reward_index))]
    pub async fn swap_rewards(
        &self,
        user: Pubkey,
        key: VaultKey,
        reward_index: u8,
        min_amount_out: u64,
    ) -> SdkResult<Instruction> {
        let vault = self.resolver.vault_addresses(key).await?;
        let reward = self
            .resolver
            .reward_accounts(key)
            .await?
            .into_iter()
            .find(|reward| reward.reward_index == reward_index)
            .ok_or_else(|| {
                SdkError::configuration(format!(
                    "pool {} has no active reward at index {}",
                    key.pool, reward_index
                ))
            })?;
        let route = self.config.swap_route(&reward.mint)?;

        let (pool, route_pool) = tokio::try_join!(
            self.cache().get::<Whirlpool>(&key.pool, false),
            self.cache().get::<Whirlpool>(&route.whirlpool, true)
        )?;

        let (direction, destination_mint) = if route_pool.token_mint_a == reward.mint {
            (SwapDirection::AToB, route_pool.token_mint_b)
        } else if route_pool.token_mint_b == reward.mint {
            (SwapDirection::BToA, route_pool.token_mint_a)
        } else {
            return Err(SdkError::configuration(format!(
                "route pool {} does not trade reward mint {}",
                route.whirlpool, reward.mint
            )));
        };
        let destination = if destination_mint == pool.token_mint_a {
            vault.input_token_a_account
        } else if destination_mint == pool.token_mint_b {
            vault.input_token_b_account
        } else {
            return Err(SdkError::configuration(format!(
                "route pool {} pairs reward {} with {}, which the vault does not hold",
                route.whirlpool, reward.mint, destination_mint
            )));
        };

        let leg = self.swap_leg(route.whirlpool, &route_pool, direction)?;
        debug!(route = %route.whirlpool, ?direction, "built swap_rewards");
        self.instructions.swap_rewards(
            user,
            vault.vault_account,
            reward.vault_reward_token_account,
            destination,
            &leg,
            SwapRewardsParams { min_amount_out },
        )
    }

    /// Compound idle balances into the active position.
    ///
    /// Pool, position and idle balances are read fresh; the swap direction
    /// and the tick arrays follow from them.
    #[instrument(skip_all, fields(pool = %key.pool, vault_id = key.vault_id))]
    pub async fn reinvest(&self, user: Pubkey, key: VaultKey) -> SdkResult<Instruction> {
        let (vault, active) = tokio::try_join!(
            self.resolver.vault_addresses(key),
            self.resolver.active_position(key)
        )?;
        let (pool, position, (idle_a, idle_b)) = tokio::try_join!(
            self.cache().get::<Whirlpool>(&key.pool, true),
            self.cache().get::<WhirlpoolPosition>(&active, true),
            self.resolver.idle_balances(key)
        )?;

        let a_to_b = is_token_a_to_b(
            pool.sqrt_price,
            position.liquidity,
            position.tick_lower_index,
            position.tick_upper_index,
            idle_a,
            idle_b,
        )?;
        debug!(idle_a, idle_b, a_to_b, "swap direction for reinvest");

        let position_addresses = self.resolver.position_addresses(&active, key).await?;
        let leg = self.swap_leg(key.pool, &pool, SwapDirection::from_a_to_b(a_to_b))?;
        self.instructions
            .reinvest(user, &vault, &position_addresses, &leg)
    }

    /// Move liquidity from the active position into `new_position`
    pub async fn rebalance(&self, user: Pubkey, key: VaultKey, new_position: &Pubkey) -> SdkResult<Instruction> {
        let (vault, active) = tokio::try_join!(
            self.resolver.vault_addresses(key),
            self.resolver.active_position(key)
        )?;
        let (current, next) = tokio::try_join!(
            self.resolver.position_addresses(&active, key),
            self.resolver.position_addresses(new_position, key)
        )?;
        let pool: Whirlpool = self.cache().get(&key.pool, false).await?;
        self.instructions.rebalance(
            user,
            &vault,
            [pool.token_vault_a, pool.token_vault_b],
            &current,
            &next,
        )
    }

    pub fn set_vault_fee(&self, admin: Pubkey, key: VaultKey, fee: u64) -> SdkResult<Instruction> {
        self.instructions
            .set_vault_fee(admin, self.resolver.vault_account(key), fee)
    }

    pub fn set_vault_pause_status(&self, admin: Pubkey, key: VaultKey, is_paused: bool) -> SdkResult<Instruction> {
        self.instructions
            .set_vault_pause_status(admin, self.resolver.vault_account(key), is_paused)
    }

    pub fn set_min_slots_between_reinvest(&self, admin: Pubkey, key: VaultKey, slots: u64) -> SdkResult<Instruction> {
        self.instructions
            .set_min_slots_between_reinvest(admin, self.resolver.vault_account(key), slots)
    }

    /// LP amount the given token amounts are worth in the active position
    pub async fn lp_from_token_amounts(&self, key: VaultKey, amount_a: u64, amount_b: u64) -> SdkResult<u128> {
        let (pool, position) = self.fresh_pool_and_position(key).await?;
        liquidity_from_token_amounts(
            pool.tick_current_index,
            position.tick_lower_index,
            position.tick_upper_index,
            amount_a,
            amount_b,
        )
    }

    /// Token amounts backing `lp_amount` in the active position, rounded down
    pub async fn token_amounts_from_lp(&self, key: VaultKey, lp_amount: u128) -> SdkResult<(u64, u64)> {
        let (pool, position) = self.fresh_pool_and_position(key).await?;
        token_amounts_from_liquidity(
            lp_amount,
            tick_sqrt_price(pool.tick_current_index)?,
            tick_sqrt_price(position.tick_lower_index)?,
            tick_sqrt_price(position.tick_upper_index)?,
            false,
        )
    }

    async fn fresh_pool_and_position(&self, key: VaultKey) -> SdkResult<(Whirlpool, WhirlpoolPosition)> {
        let active = self.resolver.active_position(key).await?;
        tokio::try_join!(
            self.cache().get::<Whirlpool>(&key.pool, true),
            self.cache().get::<WhirlpoolPosition>(&active, true)
        )
    }

    /// Swap accounts on `whirlpool` for a trade starting at its current tick
    pub fn swap_leg(
        &self,
        whirlpool: Pubkey,
        pool: &Whirlpool,
        direction: SwapDirection,
    ) -> SdkResult<SwapLegAccounts> {
        let window = tick_array_window(
            self.pda(),
            &whirlpool,
            pool.tick_current_index,
            pool.tick_spacing,
            direction,
            self.config.max_swap_tick_arrays,
        );
        Ok(SwapLegAccounts {
            whirlpool,
            token_vault_a: pool.token_vault_a,
            token_vault_b: pool.token_vault_b,
            tick_arrays: swap_tick_arrays(&window, pool.tick_current_index)?,
            oracle: self.pda().oracle(&whirlpool).0,
        })
    }
}
