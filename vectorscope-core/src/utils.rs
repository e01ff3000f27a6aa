use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

/// Draws a level for a new node by flipping a fair coin until it comes up tails,
/// stopping at `max_level`. Level `l` has probability `2^-(l+1)` below the cap.
pub(crate) fn generate_random_level(max_level: usize, rng: &mut impl Rng) -> usize {
    let mut level = 0;
    while level < max_level && rng.gen_bool(0.5) {
        level += 1;
    }
    level
}

/// Creates a seeded random number generator or a default one.
pub fn create_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}
