//! Counter view: what the user sees and the actions they can take.
//!
//! The view model sits behind an `Arc<RwLock<_>>` so a renderer can take
//! snapshots while an operation is in flight. User operations are
//! serialised by the `loading` flag alone: an action whose control is
//! disabled is ignored, never queued.

use std::fmt::{self, Write};
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::connection::Connection;
use crate::error::ClientError;
use crate::notification::{Notification, Notifier};
use crate::program::CounterProgram;
use crate::provider::WalletProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Initialize,
    Increment,
    Decrement,
    Refresh,
}

/// Whether an action ran or was dropped because its control was disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Completed,
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Unmounted,
    Disconnected,
    Connected {
        wallet: Pubkey,
        /// `None` until a fetch succeeds; shown as "Not initialized".
        counter: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Controls {
    pub initialize: bool,
    pub increment: bool,
    pub decrement: bool,
    pub refresh: bool,
}

impl Controls {
    pub fn enabled(&self, action: Action) -> bool {
        match action {
            Action::Initialize => self.initialize,
            Action::Increment => self.increment,
            Action::Decrement => self.decrement,
            Action::Refresh => self.refresh,
        }
    }
}

#[derive(Debug, Default)]
struct ViewModel {
    mounted: bool,
    wallet: Option<Pubkey>,
    counter: Option<u64>,
    loading: bool,
    /// A wallet change arrived while busy; fetch once the busy flag drops.
    pending_fetch: bool,
}

impl ViewModel {
    fn state(&self) -> ViewState {
        match (self.mounted, self.wallet) {
            (false, _) => ViewState::Unmounted,
            (true, None) => ViewState::Disconnected,
            (true, Some(wallet)) => ViewState::Connected {
                wallet,
                counter: self.counter,
            },
        }
    }

    fn controls(&self) -> Controls {
        if !self.mounted || self.loading {
            return Controls::default();
        }
        let connected = self.wallet.is_some();
        let known = connected && self.counter.is_some();
        Controls {
            initialize: connected,
            increment: known,
            decrement: known,
            refresh: connected,
        }
    }
}

/// Point-in-time copy of the view, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub title: String,
    pub state: ViewState,
    pub loading: bool,
    pub controls: Controls,
}

impl Snapshot {
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        let (wallet, counter) = match self.state {
            ViewState::Unmounted => {
                writeln!(out, "Loading...")?;
                return Ok(out);
            }
            ViewState::Disconnected => (None, None),
            ViewState::Connected { wallet, counter } => (Some(wallet), counter),
        };

        writeln!(out, "{}", self.title)?;
        match wallet {
            Some(wallet) => writeln!(out, "Wallet: {wallet}")?,
            None => writeln!(out, "Wallet: Not connected")?,
        }
        match counter {
            Some(count) => writeln!(out, "Counter: {count}")?,
            None => writeln!(out, "Counter: Not initialized")?,
        }

        let button = |label: &str, enabled: bool| {
            if enabled {
                format!("[{label}]")
            } else {
                format!("({label})")
            }
        };
        write!(
            out,
            "{} {} {} {}",
            button("Initialize", self.controls.initialize),
            button("Increment", self.controls.increment),
            button("Decrement", self.controls.decrement),
            button("Refresh", self.controls.refresh),
        )?;
        if self.loading {
            write!(out, "  loading...")?;
        }
        writeln!(out)?;
        Ok(out)
    }
}

pub struct CounterView<C> {
    provider: Arc<WalletProvider<C>>,
    program: CounterProgram<C>,
    model: Arc<RwLock<ViewModel>>,
    notifier: Notifier,
}

impl<C> Clone for CounterView<C> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            program: self.program.clone(),
            model: self.model.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

impl<C: Connection + 'static> CounterView<C> {
    pub fn new(
        provider: Arc<WalletProvider<C>>,
        program: CounterProgram<C>,
        notifier: Notifier,
    ) -> Self {
        Self {
            provider,
            program,
            model: Arc::new(RwLock::new(ViewModel::default())),
            notifier,
        }
    }

    pub async fn snapshot(&self) -> Snapshot {
        let model = self.model.read().await;
        Snapshot {
            title: format!("Solana Counter ({})", self.provider.cluster().label()),
            state: model.state(),
            loading: model.loading,
            controls: model.controls(),
        }
    }

    /// Mount the view and fetch the counter if a wallet is already connected.
    pub async fn mount(&self) {
        self.model.write().await.mounted = true;
        debug!("Counter view mounted");
        self.sync_wallet().await;
    }

    pub async fn unmount(&self) {
        let mut model = self.model.write().await;
        model.mounted = false;
        model.counter = None;
        model.pending_fetch = false;
    }

    /// Bring the view in line with the provider's connected wallet. A newly
    /// connected wallet triggers a fetch; disconnecting forgets the counter.
    pub async fn sync_wallet(&self) {
        let wallet = match self.provider.wallet().await {
            Some(adapter) => adapter.public_key().await,
            None => None,
        };
        let should_fetch = {
            let mut model = self.model.write().await;
            if model.wallet != wallet {
                model.wallet = wallet;
                model.counter = None;
            }
            if !model.mounted || wallet.is_none() {
                false
            } else if model.loading {
                debug!("Busy, fetch deferred until the current operation finishes");
                model.pending_fetch = true;
                false
            } else {
                true
            }
        };
        if should_fetch {
            self.refresh().await;
        }
    }

    /// Follow wallet changes published by the provider until it goes away.
    pub fn spawn_wallet_sync(&self) -> JoinHandle<()> {
        let view = self.clone();
        let mut changes = self.provider.subscribe();
        tokio::spawn(async move {
            while changes.changed().await.is_ok() {
                view.sync_wallet().await;
            }
        })
    }

    pub async fn dispatch(&self, action: Action) -> Dispatch {
        match action {
            Action::Initialize => self.initialize().await,
            Action::Increment => self.increment().await,
            Action::Decrement => self.decrement().await,
            Action::Refresh => self.refresh().await,
        }
    }

    pub async fn refresh(&self) -> Dispatch {
        let Some(authority) = self.begin(Action::Refresh).await else {
            return Dispatch::Ignored;
        };
        self.fetch_count(authority).await;
        self.finish().await;
        Dispatch::Completed
    }

    pub async fn initialize(&self) -> Dispatch {
        if self.begin(Action::Initialize).await.is_none() {
            return Dispatch::Ignored;
        }
        let result = match self.provider.wallet().await {
            Some(wallet) => self.program.initialize(wallet.as_ref()).await,
            None => Err(ClientError::WalletNotConnected),
        };
        match result {
            Ok(signature) => {
                info!(%signature, "Initialize confirmed");
                self.notifier.notify(Notification::initialized());
                self.refetch().await;
            }
            Err(e) => {
                error!(error = %e, "Error initializing counter");
                self.notifier.notify(Notification::initialize_failed(&e));
            }
        }
        self.finish().await;
        Dispatch::Completed
    }

    pub async fn increment(&self) -> Dispatch {
        if self.begin(Action::Increment).await.is_none() {
            return Dispatch::Ignored;
        }
        let result = match self.provider.wallet().await {
            Some(wallet) => self.program.increment(wallet.as_ref()).await,
            None => Err(ClientError::WalletNotConnected),
        };
        match result {
            Ok(signature) => {
                info!(%signature, "Increment confirmed");
                self.notifier.notify(Notification::incremented());
                self.refetch().await;
            }
            Err(e) => {
                error!(error = %e, "Error incrementing counter");
                self.notifier.notify(Notification::increment_failed(&e));
            }
        }
        self.finish().await;
        Dispatch::Completed
    }

    /// The program has no decrement; the control only explains that.
    pub async fn decrement(&self) -> Dispatch {
        if !self.model.read().await.controls().decrement {
            return Dispatch::Ignored;
        }
        self.notifier.notify(Notification::decrement_unavailable());
        Dispatch::Completed
    }

    /// Claim the busy flag for `action` if its control is enabled, returning
    /// the wallet it acts for.
    async fn begin(&self, action: Action) -> Option<Pubkey> {
        let mut model = self.model.write().await;
        if !model.controls().enabled(action) {
            debug!(?action, "Action ignored, control disabled");
            return None;
        }
        model.loading = true;
        model.wallet
    }

    /// Release the busy flag, first running any fetch deferred by a wallet
    /// change that arrived mid-operation.
    async fn finish(&self) {
        loop {
            let authority = {
                let mut model = self.model.write().await;
                let deferred = std::mem::take(&mut model.pending_fetch);
                match (deferred, model.mounted, model.wallet) {
                    (true, true, Some(wallet)) => wallet,
                    _ => {
                        model.loading = false;
                        return;
                    }
                }
            };
            self.fetch_count(authority).await;
        }
    }

    async fn refetch(&self) {
        let wallet = self.model.read().await.wallet;
        if let Some(authority) = wallet {
            self.fetch_count(authority).await;
        }
    }

    async fn fetch_count(&self, authority: Pubkey) {
        let address = self.program.counter_address(&authority);
        let result = self.program.fetch(&address).await;

        let mut model = self.model.write().await;
        if model.wallet != Some(authority) {
            debug!(counter = %address, "Wallet changed during fetch, result dropped");
            return;
        }
        match result {
            Ok(account) => {
                model.counter = Some(account.count);
                self.notifier.notify(Notification::fetch_succeeded());
            }
            Err(e) => {
                error!(counter = %address, error = %e, "Error fetching counter");
                model.counter = None;
                self.notifier.notify(Notification::fetch_failed(&e));
            }
        }
    }
}
