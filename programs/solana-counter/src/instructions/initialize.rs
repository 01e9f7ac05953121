use anchor_lang::prelude::*;

use crate::constants::*;
use crate::events::CounterInitialized;
use crate::state::Counter;

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(
        init,
        payer = authority,
        space = 8 + Counter::INIT_SPACE,
        seeds = [COUNTER_SEED, authority.key().as_ref()],
        bump
    )]
    pub counter: Account<'info, Counter>,

    #[account(mut)]
    pub authority: Signer<'info>,

    pub system_program: Program<'info, System>,
}

/// Create the counter PDA for the signing wallet.
///
/// Fails if the account already exists, since `init` refuses an
/// allocated address.
pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
    let counter = &mut ctx.accounts.counter;
    counter.authority = ctx.accounts.authority.key();
    counter.count = INITIAL_COUNT;

    msg!("Counter initialized for {}", counter.authority);

    emit!(CounterInitialized {
        counter: counter.key(),
        authority: counter.authority,
    });

    Ok(())
}
