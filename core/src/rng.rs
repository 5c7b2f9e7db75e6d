//! Deterministic random number generation.
//!
//! RULE: Nothing in puzzle generation may call any platform RNG.
//! All randomness flows through a PuzzleRng created from the pass seed
//! and threaded by `&mut` through every call of that pass.
//!
//! Seeding:
//!   - String seeds are hashed left-to-right (h = 31*h + unit) over their
//!     UTF-16 code units, so anagrams land on different states.
//!   - The accumulated hash goes through a 32-bit avalanche finalizer so
//!     adjacent dates ("2025-01-01" vs "2025-01-02") decorrelate at once.
//!   - A mixed state of zero is replaced by ZERO_STATE_FALLBACK.
//!
//! Output is mulberry32 over a Weyl-incremented u32 state. All arithmetic
//! is wrapping u32, so streams are bit-identical on every platform.

use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64Mcg;

/// Substituted for an all-zero mixed seed.
pub const ZERO_STATE_FALLBACK: u32 = 0x9E37_79B9;

const WEYL_INCREMENT: u32 = 0x6D2B_79F5;
const SEED_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FRESH_SEED_LEN: usize = 10;

/// The seeded generator for one puzzle-generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleRng {
    state: u32,
}

impl PuzzleRng {
    /// Seed from an opaque string (a date for daily puzzles, a random
    /// token otherwise).
    pub fn from_seed_str(seed: &str) -> Self {
        Self::from_hash(accumulate(seed))
    }

    /// Seed from an integer. The value is folded to 32 bits
    /// (low word XOR high word) before mixing.
    pub fn from_int(seed: u64) -> Self {
        let folded = (seed as u32) ^ ((seed >> 32) as u32);
        Self::from_hash(folded)
    }

    fn from_hash(hash: u32) -> Self {
        let mixed = avalanche(hash);
        let state = if mixed == 0 { ZERO_STATE_FALLBACK } else { mixed };
        Self { state }
    }

    /// Draw a raw u32 (full range).
    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(WEYL_INCREMENT);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }

    /// Roll an index in [0, n) as `floor(next_f64() * n)`.
    /// Returns 0 for n == 0 without consuming a draw.
    pub fn next_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        let idx = (self.next_f64() * n as f64) as usize;
        idx.min(n - 1)
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

impl RngCore for PuzzleRng {
    fn next_u32(&mut self) -> u32 {
        PuzzleRng::next_u32(self)
    }

    fn next_u64(&mut self) -> u64 {
        let hi = u64::from(PuzzleRng::next_u32(self));
        let lo = u64::from(PuzzleRng::next_u32(self));
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = PuzzleRng::next_u32(self).to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Order-sensitive multiplicative hash over the seed's UTF-16 units.
fn accumulate(seed: &str) -> u32 {
    seed.encode_utf16()
        .fold(0u32, |h, unit| h.wrapping_mul(31).wrapping_add(u32::from(unit)))
}

/// murmur3 fmix32.
fn avalanche(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85EB_CA6B);
    h ^= h >> 13;
    h = h.wrapping_mul(0xC2B2_AE35);
    h ^= h >> 16;
    h
}

/// A fresh 10-character base-36 seed for non-daily modes.
///
/// The caller supplies the entropy (the runner uses wall-clock nanos);
/// this function itself is pure.
pub fn fresh_seed(entropy: u64) -> String {
    let mut pcg = Pcg64Mcg::seed_from_u64(entropy);
    (0..FRESH_SEED_LEN)
        .map(|_| char::from(SEED_ALPHABET[pcg.gen_range(0..SEED_ALPHABET.len())]))
        .collect()
}
