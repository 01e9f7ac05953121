//! Wallet adapters.
//!
//! An adapter holds or proxies a signing key. It starts disconnected; once
//! connected it reports a public key and signs transactions on request.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
    transaction::Transaction,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::WalletError;

#[async_trait]
pub trait WalletAdapter: Send + Sync {
    fn name(&self) -> &str;

    async fn connect(&self) -> Result<Pubkey, WalletError>;

    async fn disconnect(&self);

    /// Public key of the connected account, `None` while disconnected.
    async fn public_key(&self) -> Option<Pubkey>;

    /// Sign `transaction` as fee payer against `blockhash`.
    async fn sign_transaction(
        &self,
        transaction: Transaction,
        blockhash: Hash,
    ) -> Result<Transaction, WalletError>;
}

enum KeySource {
    File(String),
    Base58(String),
    Loaded(Arc<Keypair>),
}

/// Wallet backed by a local keypair: a JSON keypair file, a base58 secret
/// key, or an in-memory keypair.
pub struct KeypairWallet {
    name: String,
    source: KeySource,
    active: RwLock<Option<Arc<Keypair>>>,
}

impl KeypairWallet {
    pub const NAME: &'static str = "Keypair";

    /// Interprets `source` as a file path when the file exists, as a base58
    /// secret key otherwise.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let source = if Path::new(&source).exists() {
            KeySource::File(source)
        } else {
            KeySource::Base58(source)
        };
        Self {
            name: Self::NAME.to_string(),
            source,
            active: RwLock::new(None),
        }
    }

    pub fn from_keypair(keypair: Keypair) -> Self {
        Self {
            name: Self::NAME.to_string(),
            source: KeySource::Loaded(Arc::new(keypair)),
            active: RwLock::new(None),
        }
    }

    /// Register the adapter under `name` instead of [`Self::NAME`].
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    fn load(&self) -> Result<Arc<Keypair>, WalletError> {
        match &self.source {
            KeySource::File(path) => read_keypair_file(path)
                .map(Arc::new)
                .map_err(|e| WalletError::Keypair {
                    source_name: path.clone(),
                    reason: e.to_string(),
                }),
            KeySource::Base58(secret) => {
                let invalid = |reason: String| WalletError::Keypair {
                    source_name: "base58 secret".to_string(),
                    reason,
                };
                let bytes = bs58::decode(secret.trim())
                    .into_vec()
                    .map_err(|e| invalid(e.to_string()))?;
                Keypair::try_from(bytes.as_slice())
                    .map(Arc::new)
                    .map_err(|e| invalid(e.to_string()))
            }
            KeySource::Loaded(keypair) => Ok(keypair.clone()),
        }
    }
}

#[async_trait]
impl WalletAdapter for KeypairWallet {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self) -> Result<Pubkey, WalletError> {
        let mut active = self.active.write().await;
        if let Some(keypair) = active.as_ref() {
            return Ok(keypair.pubkey());
        }
        let keypair = self.load()?;
        let pubkey = keypair.pubkey();
        *active = Some(keypair);
        info!(wallet = %pubkey, "Wallet connected");
        Ok(pubkey)
    }

    async fn disconnect(&self) {
        if let Some(keypair) = self.active.write().await.take() {
            info!(wallet = %keypair.pubkey(), "Wallet disconnected");
        }
    }

    async fn public_key(&self) -> Option<Pubkey> {
        self.active.read().await.as_ref().map(|keypair| keypair.pubkey())
    }

    async fn sign_transaction(
        &self,
        mut transaction: Transaction,
        blockhash: Hash,
    ) -> Result<Transaction, WalletError> {
        let keypair = self
            .active
            .read()
            .await
            .clone()
            .ok_or_else(|| WalletError::NotConnected(self.name().to_string()))?;
        transaction
            .try_sign(&[keypair.as_ref()], blockhash)
            .map_err(|e| WalletError::Signing(e.to_string()))?;
        debug!(wallet = %keypair.pubkey(), "Transaction signed");
        Ok(transaction)
    }
}
