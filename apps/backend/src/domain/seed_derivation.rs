//! RNG seed derivation for cosmetic randomness.
//!
//! Narration phrase picks are seeded per round so a round always reads the
//! same for the same match, without feeding back into game state.

/// Derive the narration seed for one round of a match.
///
/// `match_seed` is drawn once from the arena rng when the match forms.
pub fn derive_narration_seed(match_seed: u64, round_no: u32) -> u64 {
    match_seed
        .wrapping_add((round_no as u64).wrapping_mul(1_000_003))
        .wrapping_add(7)
}
