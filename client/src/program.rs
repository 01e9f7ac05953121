//! Client-side handle on the counter program: fetch, initialize, increment.

use std::sync::Arc;

use anchor_lang::{system_program, AccountDeserialize, InstructionData, ToAccountMetas};
use solana_counter::state::Counter;
use solana_sdk::{
    instruction::Instruction, pubkey::Pubkey, signature::Signature, transaction::Transaction,
};
use tracing::{debug, info};

use crate::address::counter_address;
use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::wallet::WalletAdapter;

/// Decoded counter account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterAccount {
    pub authority: Pubkey,
    pub count: u64,
}

impl From<Counter> for CounterAccount {
    fn from(counter: Counter) -> Self {
        Self {
            authority: counter.authority,
            count: counter.count,
        }
    }
}

pub struct CounterProgram<C> {
    connection: Arc<C>,
    program_id: Pubkey,
}

impl<C> Clone for CounterProgram<C> {
    fn clone(&self) -> Self {
        Self {
            connection: self.connection.clone(),
            program_id: self.program_id,
        }
    }
}

impl<C: Connection> CounterProgram<C> {
    pub fn new(connection: Arc<C>, program_id: Pubkey) -> Self {
        Self {
            connection,
            program_id,
        }
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn counter_address(&self, authority: &Pubkey) -> Pubkey {
        counter_address(&self.program_id, authority)
    }

    pub async fn fetch(&self, address: &Pubkey) -> Result<CounterAccount> {
        let data = self
            .connection
            .account_data(address)
            .await?
            .filter(|data| !data.is_empty())
            .ok_or(ClientError::AccountNotFound(*address))?;

        let counter =
            Counter::try_deserialize(&mut data.as_slice()).map_err(|e| ClientError::Decode {
                address: *address,
                reason: e.to_string(),
            })?;
        debug!(counter = %address, count = counter.count, "Fetched counter");
        Ok(counter.into())
    }

    pub fn initialize_instruction(&self, authority: &Pubkey) -> Instruction {
        let accounts = solana_counter::accounts::Initialize {
            counter: self.counter_address(authority),
            authority: *authority,
            system_program: system_program::ID,
        };
        Instruction {
            program_id: self.program_id,
            accounts: accounts.to_account_metas(None),
            data: solana_counter::instruction::Initialize {}.data(),
        }
    }

    pub fn increment_instruction(&self, authority: &Pubkey) -> Instruction {
        let accounts = solana_counter::accounts::Increment {
            counter: self.counter_address(authority),
            authority: *authority,
        };
        Instruction {
            program_id: self.program_id,
            accounts: accounts.to_account_metas(None),
            data: solana_counter::instruction::Increment {}.data(),
        }
    }

    /// Create the counter of the connected wallet.
    pub async fn initialize(&self, wallet: &dyn WalletAdapter) -> Result<Signature> {
        let authority = connected_key(wallet).await?;
        let signature = self
            .send(wallet, authority, self.initialize_instruction(&authority))
            .await?;
        info!(authority = %authority, %signature, "Counter initialized");
        Ok(signature)
    }

    pub async fn increment(&self, wallet: &dyn WalletAdapter) -> Result<Signature> {
        let authority = connected_key(wallet).await?;
        let signature = self
            .send(wallet, authority, self.increment_instruction(&authority))
            .await?;
        info!(authority = %authority, %signature, "Counter incremented");
        Ok(signature)
    }

    async fn send(
        &self,
        wallet: &dyn WalletAdapter,
        payer: Pubkey,
        instruction: Instruction,
    ) -> Result<Signature> {
        let blockhash = self.connection.latest_blockhash().await?;
        let transaction = Transaction::new_with_payer(&[instruction], Some(&payer));
        let transaction = wallet.sign_transaction(transaction, blockhash).await?;
        self.connection.send_and_confirm(&transaction).await
    }
}

async fn connected_key(wallet: &dyn WalletAdapter) -> Result<Pubkey> {
    wallet
        .public_key()
        .await
        .ok_or(ClientError::WalletNotConnected)
}
