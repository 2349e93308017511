//! Testing utilities for the vault SDK
//!
//! An in-memory [`AccountReader`] plus encoders that produce account bytes in
//! the exact layouts the decoders expect, so resolver and client behavior can
//! be exercised without a validator.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use ahash::AHashMap;
use anchor_lang::AnchorSerialize;
use async_trait::async_trait;
use orca_whirlpools_core::tick_index_to_sqrt_price;
use solana_program::{program_option::COption, program_pack::Pack};
use solana_sdk::pubkey::Pubkey;
use spl_token::state::{Account as SplTokenAccount, AccountState, Mint as SplMint};

use crate::{
    cache::{AccountCache, AccountReader},
    core::{SdkError, SdkResult, VaultKey, MAX_TICK_INDEX, MIN_TICK_INDEX, NUM_REWARDS},
    protocol::{associated_token_address, PdaBuilder},
    state::{
        PositionRewardInfo, VaultAccount, VaultBumps, VaultPosition, Whirlpool,
        WhirlpoolPosition, WhirlpoolRewardInfo, POSITION_DISCRIMINATOR,
        VAULT_ACCOUNT_DISCRIMINATOR, WHIRLPOOL_DISCRIMINATOR,
    },
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// In-memory account source that records every batch it serves
#[derive(Default)]
pub struct MockAccountReader {
    accounts: Mutex<AHashMap<Pubkey, Vec<u8>>>,
    calls: Mutex<Vec<Vec<Pubkey>>>,
    fail_next: Mutex<Option<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockAccountReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, address: Pubkey, data: Vec<u8>) {
        lock(&self.accounts).insert(address, data);
    }

    pub fn remove(&self, address: &Pubkey) {
        lock(&self.accounts).remove(address);
    }

    /// Every `batch_get` request seen so far, in order
    pub fn calls(&self) -> Vec<Vec<Pubkey>> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Most `batch_get` calls ever outstanding at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Make the next `batch_get` fail with an RPC error
    pub fn fail_next(&self, message: &str) {
        *lock(&self.fail_next) = Some(message.to_string());
    }
}

#[async_trait]
impl AccountReader for MockAccountReader {
    async fn batch_get(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>> {
        lock(&self.calls).push(addresses.to_vec());

        // Yield once so reads joined by the caller overlap
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(message) = lock(&self.fail_next).take() {
            return Err(SdkError::Rpc(message));
        }
        let accounts = lock(&self.accounts);
        Ok(addresses
            .iter()
            .map(|address| accounts.get(address).cloned())
            .collect())
    }
}

/// Anchor account bytes: discriminator followed by the borsh body
pub fn encode_anchor_account<T: AnchorSerialize>(discriminator: &[u8; 8], value: &T) -> Vec<u8> {
    let mut data = discriminator.to_vec();
    value
        .serialize(&mut data)
        .expect("serializing into a Vec cannot fail");
    data
}

/// SPL mint bytes with the given decimals
pub fn mint_data(decimals: u8) -> Vec<u8> {
    let mint = SplMint {
        mint_authority: COption::None,
        supply: 1_000_000_000,
        decimals,
        is_initialized: true,
        freeze_authority: COption::None,
    };
    let mut data = vec![0u8; SplMint::LEN];
    mint.pack_into_slice(&mut data);
    data
}

/// SPL token account bytes
pub fn token_account_data(mint: Pubkey, owner: Pubkey, amount: u64) -> Vec<u8> {
    let account = SplTokenAccount {
        mint,
        owner,
        amount,
        delegate: COption::None,
        state: AccountState::Initialized,
        is_native: COption::None,
        delegated_amount: 0,
        close_authority: COption::None,
    };
    let mut data = vec![0u8; SplTokenAccount::LEN];
    account.pack_into_slice(&mut data);
    data
}

/// Builder for pool snapshots with fresh mints and vaults
pub struct WhirlpoolFixture {
    pool: Whirlpool,
}

impl WhirlpoolFixture {
    pub fn new(tick_spacing: u16, tick_current_index: i32) -> Self {
        let sqrt_price = if (MIN_TICK_INDEX..=MAX_TICK_INDEX).contains(&tick_current_index) {
            u128::from(tick_index_to_sqrt_price(tick_current_index))
        } else {
            0
        };
        Self {
            pool: Whirlpool {
                whirlpools_config: Pubkey::new_unique(),
                whirlpool_bump: [255],
                tick_spacing,
                tick_spacing_seed: tick_spacing.to_le_bytes(),
                fee_rate: 3000,
                protocol_fee_rate: 300,
                liquidity: 1 << 40,
                sqrt_price,
                tick_current_index,
                protocol_fee_owed_a: 0,
                protocol_fee_owed_b: 0,
                token_mint_a: Pubkey::new_unique(),
                token_vault_a: Pubkey::new_unique(),
                fee_growth_global_a: 0,
                token_mint_b: Pubkey::new_unique(),
                token_vault_b: Pubkey::new_unique(),
                fee_growth_global_b: 0,
                reward_last_updated_timestamp: 0,
                reward_infos: [WhirlpoolRewardInfo::default(); NUM_REWARDS],
            },
        }
    }

    pub fn with_mints(mut self, mint_a: Pubkey, mint_b: Pubkey) -> Self {
        self.pool.token_mint_a = mint_a;
        self.pool.token_mint_b = mint_b;
        self
    }

    /// Activate reward slot `index` for `mint` with a fresh reward vault
    pub fn with_reward(mut self, index: usize, mint: Pubkey) -> Self {
        self.pool.reward_infos[index] = WhirlpoolRewardInfo {
            mint,
            vault: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            emissions_per_second_x64: 1 << 64,
            growth_global_x64: 0,
        };
        self
    }

    pub fn build(self) -> Whirlpool {
        self.pool
    }
}

pub fn position_fixture(
    whirlpool: Pubkey,
    position_mint: Pubkey,
    tick_lower_index: i32,
    tick_upper_index: i32,
    liquidity: u128,
) -> WhirlpoolPosition {
    WhirlpoolPosition {
        whirlpool,
        position_mint,
        liquidity,
        tick_lower_index,
        tick_upper_index,
        fee_growth_checkpoint_a: 0,
        fee_owed_a: 0,
        fee_growth_checkpoint_b: 0,
        fee_owed_b: 0,
        reward_infos: [PositionRewardInfo::default(); NUM_REWARDS],
    }
}

pub fn vault_fixture(whirlpool: Pubkey, vault_id: u8, positions: Vec<VaultPosition>) -> VaultAccount {
    VaultAccount {
        version: 1,
        bumps: VaultBumps::default(),
        vault_id,
        whirlpool_id: whirlpool,
        input_token_a_mint: Pubkey::new_unique(),
        input_token_b_mint: Pubkey::new_unique(),
        fee: 1000,
        min_slots_between_reinvest: 0,
        last_reinvestment_slot: 0,
        is_paused: false,
        positions,
    }
}

/// A consistent on-chain world for one vault: pool, both mints, the vault
/// account and, optionally, an open position, reward slots and idle balances.
///
/// Every builder step writes the affected accounts into `reader`.
pub struct VaultScenario {
    pub reader: Arc<MockAccountReader>,
    pub key: VaultKey,
    pub pool: Whirlpool,
    pub vault: VaultAccount,
    pub vault_address: Pubkey,
    pub position: Option<(Pubkey, WhirlpoolPosition)>,
    pub decimals: (u8, u8),
}

impl VaultScenario {
    pub fn new(tick_spacing: u16, tick_current_index: i32, vault_id: u8) -> Self {
        let pda = PdaBuilder::default();
        let key = VaultKey::new(Pubkey::new_unique(), vault_id);
        let pool = WhirlpoolFixture::new(tick_spacing, tick_current_index).build();

        let mut vault = vault_fixture(key.pool, vault_id, vec![]);
        vault.input_token_a_mint = pool.token_mint_a;
        vault.input_token_b_mint = pool.token_mint_b;

        let scenario = Self {
            reader: Arc::new(MockAccountReader::new()),
            key,
            pool,
            vault,
            vault_address: pda.vault(&key.pool, vault_id).0,
            position: None,
            decimals: (9, 6),
        };
        scenario.sync();
        scenario
    }

    /// Activate reward slot `index` with a fresh mint
    pub fn with_reward(mut self, index: usize) -> Self {
        let pool = WhirlpoolFixture { pool: self.pool };
        self.pool = pool.with_reward(index, Pubkey::new_unique()).build();
        self.sync();
        self
    }

    /// Open a position and track it as the vault's active one
    pub fn with_position(mut self, tick_lower_index: i32, tick_upper_index: i32, liquidity: u128) -> Self {
        let position_mint = Pubkey::new_unique();
        let address = PdaBuilder::default().position(&position_mint).0;
        let position = position_fixture(
            self.key.pool,
            position_mint,
            tick_lower_index,
            tick_upper_index,
            liquidity,
        );

        self.reader
            .insert(address, encode_anchor_account(&POSITION_DISCRIMINATOR, &position));
        self.vault.positions.insert(
            0,
            VaultPosition {
                pubkey: address,
                lower_tick: tick_lower_index,
                upper_tick: tick_upper_index,
            },
        );
        self.position = Some((address, position));
        self.sync();
        self
    }

    /// Fund the vault's input token accounts
    pub fn with_idle_balances(self, amount_a: u64, amount_b: u64) -> Self {
        for (mint, amount) in [(self.pool.token_mint_a, amount_a), (self.pool.token_mint_b, amount_b)] {
            self.reader.insert(
                associated_token_address(&self.vault_address, &mint),
                token_account_data(mint, self.vault_address, amount),
            );
        }
        self
    }

    pub fn position_address(&self) -> Option<Pubkey> {
        self.position.as_ref().map(|(address, _)| *address)
    }

    pub fn cache(&self) -> Arc<AccountCache> {
        Arc::new(AccountCache::new(self.reader.clone()))
    }

    /// Rewrite pool, mints and vault into the reader
    pub fn sync(&self) {
        self.reader.insert(
            self.key.pool,
            encode_anchor_account(&WHIRLPOOL_DISCRIMINATOR, &self.pool),
        );
        self.reader.insert(self.pool.token_mint_a, mint_data(self.decimals.0));
        self.reader.insert(self.pool.token_mint_b, mint_data(self.decimals.1));
        self.reader.insert(
            self.vault_address,
            encode_anchor_account(&VAULT_ACCOUNT_DISCRIMINATOR, &self.vault),
        );
    }
}
