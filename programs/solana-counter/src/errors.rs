use anchor_lang::prelude::*;

#[error_code]
pub enum CounterError {
    #[msg("Unauthorized: signer is not the counter authority")]
    Unauthorized,

    #[msg("Overflow")]
    Overflow,
}
