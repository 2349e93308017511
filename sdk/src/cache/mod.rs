//! Process-wide account cache.
//!
//! Raw bytes are memoized by address and decoded on demand; the cache itself
//! is type-agnostic. Entries are inserted on first fetch and replaced
//! wholesale by a forced refresh; nothing is evicted within a session.
//! Overlapping fetches of the same address are idempotent, so there is no
//! per-key locking.

pub mod reader;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ahash::{AHashMap, AHashSet};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

pub use reader::{AccountReader, RpcAccountReader};

use crate::{
    core::{SdkError, SdkResult},
    state::AccountDecoder,
};

/// Raw account bytes as fetched for `address`. Never mutated after insertion.
#[derive(Clone, Debug)]
pub struct AccountBlob {
    pub address: Pubkey,
    pub data: Arc<[u8]>,
}

impl AccountBlob {
    pub fn decode<T: AccountDecoder>(&self) -> SdkResult<T> {
        T::decode(&self.data).map_err(|reason| SdkError::Decode {
            address: self.address,
            kind: T::KIND,
            reason,
        })
    }
}

pub struct AccountCache {
    reader: Arc<dyn AccountReader>,
    entries: RwLock<AHashMap<Pubkey, AccountBlob>>,
}

impl AccountCache {
    pub fn new(reader: Arc<dyn AccountReader>) -> Self {
        Self {
            reader,
            entries: RwLock::new(AHashMap::new()),
        }
    }

    /// Decode the account at `address`, fetching it first if it is not cached
    /// or `force_refresh` is set.
    pub async fn get<T: AccountDecoder>(&self, address: &Pubkey, force_refresh: bool) -> SdkResult<T> {
        if !force_refresh {
            if let Some(blob) = self.blob(address) {
                return blob.decode();
            }
        }

        self.fetch_many(&[*address], true).await?;
        self.blob(address)
            .ok_or(SdkError::AccountNotFound(*address))?
            .decode()
    }

    /// Fetch and decode several accounts of one kind with a single remote read
    pub async fn get_many<T: AccountDecoder>(
        &self,
        addresses: &[Pubkey],
        force_refresh: bool,
    ) -> SdkResult<Vec<T>> {
        self.fetch_many(addresses, force_refresh).await?;
        addresses
            .iter()
            .map(|address| {
                self.blob(address)
                    .ok_or(SdkError::AccountNotFound(*address))?
                    .decode()
            })
            .collect()
    }

    /// Fetch every address that is not cached (all of them when forced) in
    /// one batched read and store each returned blob under its address.
    ///
    /// Accounts that were found are cached even when another address in the
    /// batch is missing; the first missing address is reported.
    pub async fn fetch_many(&self, addresses: &[Pubkey], force_refresh: bool) -> SdkResult<()> {
        let mut seen = AHashSet::with_capacity(addresses.len());
        let pending: Vec<Pubkey> = {
            let entries = self.read();
            addresses
                .iter()
                .copied()
                .filter(|address| seen.insert(*address))
                .filter(|address| force_refresh || !entries.contains_key(address))
                .collect()
        };

        if pending.is_empty() {
            return Ok(());
        }

        debug!(count = pending.len(), force_refresh, "fetching accounts");
        let results = self.reader.batch_get(&pending).await?;
        if results.len() != pending.len() {
            return Err(SdkError::Rpc(format!(
                "reader returned {} accounts for {} addresses",
                results.len(),
                pending.len()
            )));
        }

        let mut missing = None;
        let mut entries = self.write();
        for (address, data) in pending.into_iter().zip(results) {
            match data {
                Some(data) => {
                    entries.insert(
                        address,
                        AccountBlob {
                            address,
                            data: data.into(),
                        },
                    );
                }
                None => {
                    warn!(%address, "account not found");
                    entries.remove(&address);
                    missing.get_or_insert(address);
                }
            }
        }

        match missing {
            Some(address) => Err(SdkError::AccountNotFound(address)),
            None => Ok(()),
        }
    }

    /// Cached raw blob, without touching the network
    pub fn blob(&self, address: &Pubkey) -> Option<AccountBlob> {
        self.read().get(address).cloned()
    }

    pub fn contains(&self, address: &Pubkey) -> bool {
        self.read().contains_key(address)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, AHashMap<Pubkey, AccountBlob>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, AHashMap<Pubkey, AccountBlob>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}
