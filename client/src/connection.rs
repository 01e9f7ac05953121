use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, pubkey::Pubkey, signature::Signature,
    transaction::Transaction,
};
use tracing::debug;

use crate::config::Cluster;
use crate::error::Result;

/// Access to a ledger endpoint: account reads and transaction submission.
#[async_trait]
pub trait Connection: Send + Sync {
    /// Raw data of the account at `address`, `None` if it does not exist.
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    async fn latest_blockhash(&self) -> Result<Hash>;

    /// Submit a signed transaction and wait until it is confirmed.
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}

/// RPC client for `cluster` at `confirmed` commitment.
pub fn rpc_connection(cluster: &Cluster) -> RpcClient {
    debug!(url = %cluster.url(), "Opening RPC connection");
    RpcClient::new_with_commitment(cluster.url().to_string(), CommitmentConfig::confirmed())
}

#[async_trait]
impl Connection for RpcClient {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .get_account_with_commitment(address, self.commitment())
            .await?;
        Ok(response.value.map(|account| account.data))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.get_latest_blockhash().await?)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        Ok(self.send_and_confirm_transaction(transaction).await?)
    }
}
