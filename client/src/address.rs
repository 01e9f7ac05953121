//! Counter address derivation.

use solana_counter::constants::COUNTER_SEED;
use solana_sdk::pubkey::Pubkey;

/// Program-derived address of the counter owned by `authority`, with its bump.
pub fn find_counter_address(program_id: &Pubkey, authority: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COUNTER_SEED, authority.as_ref()], program_id)
}

pub fn counter_address(program_id: &Pubkey, authority: &Pubkey) -> Pubkey {
    find_counter_address(program_id, authority).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let authority = Pubkey::new_unique();
        let first = counter_address(&solana_counter::ID, &authority);
        let second = counter_address(&solana_counter::ID, &authority);
        assert_eq!(first, second);
    }

    #[test]
    fn test_derivation_depends_on_authority_and_program() {
        let authority = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        let base = counter_address(&solana_counter::ID, &authority);

        assert_ne!(base, counter_address(&solana_counter::ID, &other));
        assert_ne!(base, counter_address(&Pubkey::new_unique(), &authority));
    }

    #[test]
    fn test_matches_program_seeds() {
        let authority = Pubkey::new_unique();
        let (address, bump) = find_counter_address(&solana_counter::ID, &authority);

        let recreated = Pubkey::create_program_address(
            &[b"counter", authority.as_ref(), &[bump]],
            &solana_counter::ID,
        )
        .unwrap();
        assert_eq!(address, recreated);
    }
}
