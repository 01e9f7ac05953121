//! Wallet-connected client for the Solana counter program.
//!
//! [`provider::WalletProvider`] owns the cluster connection and the wallet
//! adapters, [`view::CounterView`] drives the counter on top of
//! [`program::CounterProgram`], and [`boundary::ErrorBoundary`] guards
//! rendering.

pub mod address;
pub mod boundary;
pub mod config;
pub mod connection;
pub mod error;
pub mod notification;
pub mod program;
pub mod provider;
pub mod view;
pub mod wallet;

#[cfg(test)]
mod testing;

pub use address::counter_address;
pub use error::{ClientError, Result, WalletError};
pub use program::{CounterAccount, CounterProgram};
pub use provider::WalletProvider;
pub use view::{Action, CounterView, Dispatch, Snapshot, ViewState};
pub use wallet::{KeypairWallet, WalletAdapter};
