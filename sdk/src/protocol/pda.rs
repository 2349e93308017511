use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use solana_sdk::pubkey::Pubkey;

use crate::core::{program_id, seeds, WHIRLPOOL_PROGRAM_ID};

/// Memo key for a seed-only derivation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum PdaKey {
    Vault(Pubkey, u8),
    LpMint(Pubkey),
    TickArray(Pubkey, i32),
    Position(Pubkey),
    Oracle(Pubkey),
}

/// PDA cache to avoid recomputing addresses
struct PdaCache {
    cache: RwLock<HashMap<PdaKey, (Pubkey, u8)>>,
}

impl PdaCache {
    fn new() -> Self {
        Self {
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn get_or_compute<F>(&self, key: PdaKey, compute: F) -> (Pubkey, u8)
    where
        F: FnOnce() -> (Pubkey, u8),
    {
        if let Some(cached) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return *cached;
        }

        let result = compute();
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, result);
        result
    }
}

/// Seed-only address derivations for the vault program and the AMM.
///
/// Pure functions of their inputs: no account state is read here.
pub struct PdaBuilder {
    cache: PdaCache,
    pub program_id: Pubkey,
    pub whirlpool_program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(program_id: Pubkey, whirlpool_program_id: Pubkey) -> Self {
        Self {
            cache: PdaCache::new(),
            program_id,
            whirlpool_program_id,
        }
    }

    pub fn vault(&self, pool: &Pubkey, vault_id: u8) -> (Pubkey, u8) {
        self.cache.get_or_compute(PdaKey::Vault(*pool, vault_id), || {
            Pubkey::find_program_address(
                &[seeds::VAULT, pool.as_ref(), &[vault_id]],
                &self.program_id,
            )
        })
    }

    pub fn lp_mint(&self, vault: &Pubkey) -> (Pubkey, u8) {
        self.cache.get_or_compute(PdaKey::LpMint(*vault), || {
            Pubkey::find_program_address(&[seeds::LP_MINT, vault.as_ref()], &self.program_id)
        })
    }

    /// AMM tick array; the start index is seeded as its decimal string
    pub fn tick_array(&self, whirlpool: &Pubkey, start_tick_index: i32) -> (Pubkey, u8) {
        self.cache
            .get_or_compute(PdaKey::TickArray(*whirlpool, start_tick_index), || {
                find_tick_array_address(&self.whirlpool_program_id, whirlpool, start_tick_index)
            })
    }

    pub fn position(&self, position_mint: &Pubkey) -> (Pubkey, u8) {
        self.cache.get_or_compute(PdaKey::Position(*position_mint), || {
            Pubkey::find_program_address(
                &[seeds::POSITION, position_mint.as_ref()],
                &self.whirlpool_program_id,
            )
        })
    }

    pub fn oracle(&self, whirlpool: &Pubkey) -> (Pubkey, u8) {
        self.cache.get_or_compute(PdaKey::Oracle(*whirlpool), || {
            Pubkey::find_program_address(
                &[seeds::ORACLE, whirlpool.as_ref()],
                &self.whirlpool_program_id,
            )
        })
    }
}

impl Default for PdaBuilder {
    fn default() -> Self {
        Self::new(program_id(), WHIRLPOOL_PROGRAM_ID)
    }
}

/// Derive an AMM tick-array address without a memo
pub fn find_tick_array_address(
    whirlpool_program_id: &Pubkey,
    whirlpool: &Pubkey,
    start_tick_index: i32,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            seeds::TICK_ARRAY,
            whirlpool.as_ref(),
            start_tick_index.to_string().as_bytes(),
        ],
        whirlpool_program_id,
    )
}

/// Associated token account of `owner` for `mint` (owner may be off-curve)
pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    spl_associated_token_account::get_associated_token_address(owner, mint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vault_derivation_is_deterministic() {
        let pool = Pubkey::new_unique();
        let a = PdaBuilder::default();
        let b = PdaBuilder::default();

        assert_eq!(a.vault(&pool, 7), b.vault(&pool, 7));
        assert_eq!(a.vault(&pool, 7), a.vault(&pool, 7));
        assert_ne!(a.vault(&pool, 7).0, a.vault(&pool, 8).0);

        let expected = Pubkey::find_program_address(&[b"vault", pool.as_ref(), &[7]], &program_id());
        assert_eq!(a.vault(&pool, 7), expected);
    }

    #[test]
    fn test_lp_mint_seeded_by_vault() {
        let pda = PdaBuilder::default();
        let (vault, _) = pda.vault(&Pubkey::new_unique(), 0);
        let expected = Pubkey::find_program_address(&[b"mint", vault.as_ref()], &program_id());
        assert_eq!(pda.lp_mint(&vault), expected);
    }

    #[test]
    fn test_tick_array_uses_decimal_seed() {
        let pool = Pubkey::new_unique();
        let pda = PdaBuilder::default();
        let expected = Pubkey::find_program_address(
            &[b"tick_array", pool.as_ref(), b"-5632"],
            &WHIRLPOOL_PROGRAM_ID,
        );
        assert_eq!(pda.tick_array(&pool, -5632), expected);
        assert_ne!(pda.tick_array(&pool, 0).0, pda.tick_array(&pool, 5632).0);
    }

    #[test]
    fn test_associated_token_address_matches_spl() {
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        assert_eq!(
            associated_token_address(&owner, &mint),
            spl_associated_token_account::get_associated_token_address(&owner, &mint)
        );
    }
}
