use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};
use tracing::trace;

use crate::core::{SdkError, SdkResult, MAX_ACCOUNTS_PER_RPC_REQUEST};

/// Remote account source.
///
/// One entry per requested address, in request order; `None` means the
/// account does not exist. Retries and timeouts belong to the implementation.
#[async_trait]
pub trait AccountReader: Send + Sync {
    async fn batch_get(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>>;
}

/// [`AccountReader`] backed by a Solana JSON-RPC endpoint
pub struct RpcAccountReader {
    rpc: Arc<RpcClient>,
}

impl RpcAccountReader {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self { rpc }
    }

    pub fn from_url(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self::new(Arc::new(RpcClient::new_with_commitment(
            rpc_url.to_string(),
            commitment,
        )))
    }

    /// Get the RPC client
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }
}

#[async_trait]
impl AccountReader for RpcAccountReader {
    async fn batch_get(&self, addresses: &[Pubkey]) -> SdkResult<Vec<Option<Vec<u8>>>> {
        // getMultipleAccounts caps the number of keys per request; chunks go
        // out concurrently and come back in request order
        let chunks = try_join_all(addresses.chunks(MAX_ACCOUNTS_PER_RPC_REQUEST).map(|chunk| async move {
            trace!(count = chunk.len(), "getMultipleAccounts");
            let accounts = self.rpc.get_multiple_accounts(chunk).await?;
            if accounts.len() != chunk.len() {
                return Err(SdkError::Rpc(format!(
                    "getMultipleAccounts returned {} entries for {} keys",
                    accounts.len(),
                    chunk.len()
                )));
            }
            Ok::<_, SdkError>(accounts)
        }))
        .await?;

        Ok(chunks
            .into_iter()
            .flatten()
            .map(|account| account.map(|account| account.data))
            .collect())
    }
}
