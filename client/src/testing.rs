//! In-memory ledger that runs the counter program's instructions against
//! Anchor-serialised account data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anchor_lang::{AccountDeserialize, AccountSerialize, InstructionData};
use async_trait::async_trait;
use solana_counter::constants::INITIAL_COUNT;
use solana_counter::state::Counter;
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};
use tokio::sync::{Mutex, Semaphore};

use crate::address::counter_address;
use crate::connection::Connection;
use crate::error::{ClientError, Result};

pub struct MemoryLedger {
    program_id: Pubkey,
    state: Mutex<LedgerState>,
    gate: Option<Arc<Semaphore>>,
    offline: AtomicBool,
}

#[derive(Default)]
struct LedgerState {
    accounts: HashMap<Pubkey, Vec<u8>>,
    transactions: usize,
}

fn rejected(reason: &str) -> ClientError {
    ClientError::Rejected(reason.to_string())
}

fn serialize(counter: &Counter) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    counter
        .try_serialize(&mut data)
        .map_err(|e| rejected(&e.to_string()))?;
    Ok(data)
}

impl MemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            state: Mutex::new(LedgerState::default()),
            gate: None,
            offline: AtomicBool::new(false),
        }
    }

    /// A ledger whose submissions each wait for one permit on the returned
    /// semaphore.
    pub fn gated(program_id: Pubkey) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let ledger = Self {
            gate: Some(gate.clone()),
            ..Self::new(program_id)
        };
        (ledger, gate)
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub async fn insert_raw(&self, address: Pubkey, data: Vec<u8>) {
        self.state.lock().await.accounts.insert(address, data);
    }

    pub async fn insert_counter(&self, authority: Pubkey, count: u64) {
        let address = counter_address(&self.program_id, &authority);
        let data = serialize(&Counter { authority, count }).unwrap();
        self.insert_raw(address, data).await;
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(rejected("network unreachable"));
        }
        Ok(())
    }

    fn execute(
        &self,
        accounts: &mut HashMap<Pubkey, Vec<u8>>,
        transaction: &Transaction,
    ) -> Result<()> {
        if !transaction.is_signed() {
            return Err(rejected("missing signature"));
        }
        let message = &transaction.message;
        let initialize_data = solana_counter::instruction::Initialize {}.data();
        let increment_data = solana_counter::instruction::Increment {}.data();

        for ix in &message.instructions {
            if message.account_keys[ix.program_id_index as usize] != self.program_id {
                return Err(rejected("unsupported program"));
            }
            let key = |position: usize| -> Result<(Pubkey, usize)> {
                let index = *ix
                    .accounts
                    .get(position)
                    .ok_or_else(|| rejected("not enough account keys"))?
                    as usize;
                Ok((message.account_keys[index], index))
            };
            let (counter, _) = key(0)?;
            let (authority, authority_index) = key(1)?;

            if !message.is_signer(authority_index) {
                return Err(rejected("authority did not sign"));
            }
            let seeds_match = counter == counter_address(&self.program_id, &authority);

            if ix.data == initialize_data {
                if !seeds_match {
                    return Err(rejected("seeds constraint violated"));
                }
                if accounts.contains_key(&counter) {
                    return Err(rejected("account already in use"));
                }
                let created = Counter {
                    authority,
                    count: INITIAL_COUNT,
                };
                accounts.insert(counter, serialize(&created)?);
            } else if ix.data == increment_data {
                let data = accounts
                    .get(&counter)
                    .ok_or_else(|| rejected("account not initialized"))?;
                let mut stored = Counter::try_deserialize(&mut data.as_slice())
                    .map_err(|e| rejected(&e.to_string()))?;
                // has_one is checked ahead of the seeds
                if stored.authority != authority {
                    return Err(rejected("unauthorized"));
                }
                if !seeds_match {
                    return Err(rejected("seeds constraint violated"));
                }
                stored.count = stored.next_count().ok_or_else(|| rejected("overflow"))?;
                accounts.insert(counter, serialize(&stored)?);
            } else {
                return Err(rejected("unknown instruction"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Connection for MemoryLedger {
    async fn account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        self.check_online()?;
        Ok(self.state.lock().await.accounts.get(address).cloned())
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.check_online()?;
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| rejected("ledger closed"))?
                .forget();
        }
        self.check_online()?;

        let mut state = self.state.lock().await;
        let mut accounts = state.accounts.clone();
        self.execute(&mut accounts, transaction)?;
        state.accounts = accounts;
        state.transactions += 1;
        Ok(transaction.signatures[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::CounterProgram;
    use crate::wallet::{KeypairWallet, WalletAdapter};
    use solana_sdk::{instruction::Instruction, signature::Keypair};

    async fn signed(wallet: &KeypairWallet, instruction: Instruction) -> Transaction {
        let payer = wallet.public_key().await.unwrap();
        let transaction = Transaction::new_with_payer(&[instruction], Some(&payer));
        wallet
            .sign_transaction(transaction, Hash::new_unique())
            .await
            .unwrap()
    }

    async fn stored_counter(ledger: &MemoryLedger, address: &Pubkey) -> Counter {
        let data = ledger.account_data(address).await.unwrap().unwrap();
        Counter::try_deserialize(&mut data.as_slice()).unwrap()
    }

    #[tokio::test]
    async fn test_executes_initialize_and_increment() {
        let ledger = Arc::new(MemoryLedger::new(solana_counter::ID));
        let program = CounterProgram::new(ledger.clone(), solana_counter::ID);
        let owner = KeypairWallet::from_keypair(Keypair::new());
        let owner_key = owner.connect().await.unwrap();

        let init = signed(&owner, program.initialize_instruction(&owner_key)).await;
        ledger.send_and_confirm(&init).await.unwrap();
        let inc = signed(&owner, program.increment_instruction(&owner_key)).await;
        ledger.send_and_confirm(&inc).await.unwrap();

        let counter = stored_counter(&ledger, &program.counter_address(&owner_key)).await;
        assert_eq!(
            counter,
            Counter {
                authority: owner_key,
                count: 1
            }
        );
        assert_eq!(ledger.transaction_count().await, 2);
    }

    #[tokio::test]
    async fn test_increment_by_other_authority_is_unauthorized() {
        let ledger = Arc::new(MemoryLedger::new(solana_counter::ID));
        let program = CounterProgram::new(ledger.clone(), solana_counter::ID);
        let owner = KeypairWallet::from_keypair(Keypair::new());
        let owner_key = owner.connect().await.unwrap();
        let intruder = KeypairWallet::from_keypair(Keypair::new());
        let intruder_key = intruder.connect().await.unwrap();

        let init = signed(&owner, program.initialize_instruction(&owner_key)).await;
        ledger.send_and_confirm(&init).await.unwrap();

        // Intruder signs for the owner's counter
        let owner_counter = program.counter_address(&owner_key);
        let mut instruction = program.increment_instruction(&intruder_key);
        instruction.accounts[0].pubkey = owner_counter;
        let result = ledger
            .send_and_confirm(&signed(&intruder, instruction).await)
            .await;

        assert!(matches!(
            result,
            Err(ClientError::Rejected(reason)) if reason == "unauthorized"
        ));
        assert_eq!(stored_counter(&ledger, &owner_counter).await.count, 0);
        assert_eq!(ledger.transaction_count().await, 1);
    }
}
