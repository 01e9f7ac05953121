use anchor_lang::prelude::*;

/// Per-wallet counter, stored at the PDA `["counter", authority]`.
#[account]
#[derive(InitSpace, Debug, PartialEq, Eq)]
pub struct Counter {
    /// Wallet that created the counter and may increment it
    pub authority: Pubkey,

    /// Number of successful increments since initialization
    pub count: u64,
}

impl Counter {
    pub fn next_count(&self) -> Option<u64> {
        self.count.checked_add(1)
    }
}
