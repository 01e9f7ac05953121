pub const COUNTER_SEED: &[u8] = b"counter";

pub const INITIAL_COUNT: u64 = 0;
