use anchor_lang::prelude::*;

use crate::constants::*;
use crate::errors::CounterError;
use crate::events::CounterIncremented;
use crate::state::Counter;

#[derive(Accounts)]
pub struct Increment<'info> {
    #[account(
        mut,
        seeds = [COUNTER_SEED, authority.key().as_ref()],
        bump,
        has_one = authority @ CounterError::Unauthorized
    )]
    pub counter: Account<'info, Counter>,

    pub authority: Signer<'info>,
}

pub fn increment(ctx: Context<Increment>) -> Result<()> {
    let counter = &mut ctx.accounts.counter;
    counter.count = counter.next_count().ok_or(CounterError::Overflow)?;

    emit!(CounterIncremented {
        counter: counter.key(),
        authority: counter.authority,
        count: counter.count,
    });

    Ok(())
}
