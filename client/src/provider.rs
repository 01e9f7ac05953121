//! Wallet context: the cluster connection and the wallet adapters shared
//! by every view of the application.

use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tokio::sync::{watch, RwLock};
use tracing::{info, warn};

use crate::config::Cluster;
use crate::error::WalletError;
use crate::wallet::WalletAdapter;

pub struct WalletProvider<C> {
    cluster: Cluster,
    connection: Arc<C>,
    wallets: Vec<Arc<dyn WalletAdapter>>,
    selected: RwLock<usize>,
    auto_connect: bool,
    changes: watch::Sender<Option<Pubkey>>,
}

impl<C> WalletProvider<C> {
    pub fn new(
        cluster: Cluster,
        connection: Arc<C>,
        wallets: Vec<Arc<dyn WalletAdapter>>,
        auto_connect: bool,
    ) -> Self {
        let (changes, _) = watch::channel(None);
        Self {
            cluster,
            connection,
            wallets,
            selected: RwLock::new(0),
            auto_connect,
            changes,
        }
    }

    pub fn cluster(&self) -> &Cluster {
        &self.cluster
    }

    pub fn connection(&self) -> Arc<C> {
        self.connection.clone()
    }

    pub fn wallets(&self) -> impl Iterator<Item = &str> {
        self.wallets.iter().map(|wallet| wallet.name())
    }

    /// Connects the selected wallet if auto-connect is enabled.
    pub async fn start(&self) -> Result<Option<Pubkey>, WalletError> {
        if !self.auto_connect {
            return Ok(None);
        }
        self.connect().await.map(Some)
    }

    /// Make the wallet called `name` the selected one, disconnecting the
    /// previous selection.
    pub async fn select(&self, name: &str) -> Result<(), WalletError> {
        let index = self
            .wallets
            .iter()
            .position(|wallet| wallet.name() == name)
            .ok_or_else(|| WalletError::UnknownWallet(name.to_string()))?;

        let mut selected = self.selected.write().await;
        if *selected != index {
            if let Some(previous) = self.wallets.get(*selected) {
                previous.disconnect().await;
            }
            *selected = index;
            self.changes.send_replace(None);
        }
        Ok(())
    }

    pub async fn connect(&self) -> Result<Pubkey, WalletError> {
        let adapter = self.selected_adapter().await?;
        match adapter.connect().await {
            Ok(pubkey) => {
                self.changes.send_replace(Some(pubkey));
                Ok(pubkey)
            }
            Err(e) => {
                warn!(wallet = adapter.name(), error = %e, "Wallet connection failed");
                Err(e)
            }
        }
    }

    pub async fn disconnect(&self) {
        if let Ok(adapter) = self.selected_adapter().await {
            adapter.disconnect().await;
        }
        self.changes.send_replace(None);
        info!("Wallet context cleared");
    }

    /// The selected adapter, if it is connected.
    pub async fn wallet(&self) -> Option<Arc<dyn WalletAdapter>> {
        let adapter = self.selected_adapter().await.ok()?;
        adapter.public_key().await?;
        Some(adapter)
    }

    /// Watch the connected public key; `None` while disconnected.
    pub fn subscribe(&self) -> watch::Receiver<Option<Pubkey>> {
        self.changes.subscribe()
    }

    async fn selected_adapter(&self) -> Result<Arc<dyn WalletAdapter>, WalletError> {
        let selected = *self.selected.read().await;
        self.wallets
            .get(selected)
            .cloned()
            .ok_or_else(|| WalletError::UnknownWallet(format!("#{selected}")))
    }
}
