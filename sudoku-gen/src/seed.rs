use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

pub fn rng_from_u64(seed: u64) -> ChaCha20Rng {
    // Deterministic across platforms and Rust versions for the same algorithm.
    ChaCha20Rng::seed_from_u64(seed)
}
