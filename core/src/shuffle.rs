//! Fisher–Yates shuffle driven by a PuzzleRng.

use crate::rng::PuzzleRng;

/// Return a shuffled copy of `items`.
///
/// Walks from the last index down to 1, swapping index i with
/// `floor(next_f64() * (i + 1))`. Consumes exactly `len - 1` draws
/// (none for empty or single-element input).
pub fn shuffle<T: Clone>(items: &[T], rng: &mut PuzzleRng) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.next_below(i + 1);
        out.swap(i, j);
    }
    out
}
