use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// Failures raised by a wallet adapter.
#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Wallet {0} is not connected")]
    NotConnected(String),

    #[error("Failed to load keypair from {source_name}: {reason}")]
    Keypair { source_name: String, reason: String },

    #[error("Failed to sign transaction: {0}")]
    Signing(String),

    #[error("No wallet named {0}")]
    UnknownWallet(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Account does not exist or has no data: {0}")]
    AccountNotFound(Pubkey),

    #[error("Failed to decode counter account {address}: {reason}")]
    Decode { address: Pubkey, reason: String },

    #[error(transparent)]
    Rpc(#[from] solana_client::client_error::ClientError),

    #[error("Transaction rejected: {0}")]
    Rejected(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
