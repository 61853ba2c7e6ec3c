// Portable pseudo-random number generator for the flood-flock workspace.
//
// Implements xoshiro256++ (Blackman & Vigna, 2019) with SplitMix64 seeding.
// The generator core is hand-rolled so the same seed yields the same island
// and the same opening flock on every platform.
//
// Two consumers draw from this crate: the heightfield generator in
// `flood_flock_sim::heightfield` (noise permutation seeds) and `SimState`
// (sheep wandering, slot jitter, neighbour shuffles). Players type a seed as
// free text, so `GameRng::from_seed_str` hashes the text with CRC32 before
// expanding it through SplitMix64.
//
// **Critical constraint: determinism.** The integer core must not touch
// floating point, OS entropy, or the standard library hashers.

use serde::{Deserialize, Serialize};

/// Xoshiro256++ PRNG.
///
/// Each subsystem owns its own `GameRng`, seeded from the game seed, so
/// terrain generation and the agent simulation never share a stream.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRng {
    s: [u64; 4],
}

impl GameRng {
    /// Create a new PRNG seeded from a `u64`.
    ///
    /// Uses SplitMix64 to expand the seed into the 256-bit internal state.
    pub fn new(seed: u64) -> Self {
        let mut sm = seed;
        Self {
            s: [
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
                splitmix64(&mut sm),
            ],
        }
    }

    /// Create a PRNG from a player-facing text seed.
    ///
    /// `stream` separates independent consumers of the same seed text
    /// (terrain vs. agents) without correlating their outputs.
    pub fn from_seed_str(seed: &str, stream: u64) -> Self {
        Self::new(seed_hash(seed) ^ stream.wrapping_mul(0x9e37_79b9_7f4a_7c15))
    }

    /// Generate the next `u64` in the sequence.
    pub fn next_u64(&mut self) -> u64 {
        let result = (self.s[0].wrapping_add(self.s[3]))
            .rotate_left(23)
            .wrapping_add(self.s[0]);

        let t = self.s[1] << 17;

        self.s[2] ^= self.s[0];
        self.s[3] ^= self.s[1];
        self.s[1] ^= self.s[2];
        self.s[0] ^= self.s[3];

        self.s[2] ^= t;
        self.s[3] = self.s[3].rotate_left(45);

        result
    }

    /// Generate a `u32` by taking the upper 32 bits of a `u64`.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Generate a uniform `f32` in [0, 1).
    ///
    /// Uses the upper 24 bits of a `u64` to fill the mantissa of an f32.
    pub fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    /// Generate a uniform `f64` in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Generate a uniform random integer in `[low, high)`.
    ///
    /// Uses rejection sampling to avoid modulo bias.
    /// Panics if `low >= high`.
    pub fn range_u64(&mut self, low: u64, high: u64) -> u64 {
        assert!(low < high, "range_u64: low must be less than high");
        let range = high - low;
        if range.is_power_of_two() {
            return low + (self.next_u64() & (range - 1));
        }
        let threshold = range.wrapping_neg() % range; // = (2^64 - range) % range
        loop {
            let r = self.next_u64();
            if r >= threshold {
                return low + (r % range);
            }
        }
    }

    /// Generate a uniform random `usize` in `[low, high)`.
    ///
    /// Panics if `low >= high`.
    pub fn range_usize(&mut self, low: usize, high: usize) -> usize {
        self.range_u64(low as u64, high as u64) as usize
    }

    /// Return `true` with probability `p`.
    ///
    /// `p <= 0.0` always returns false, `p >= 1.0` always returns true.
    pub fn random_bool(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Shuffle a slice in place (Fisher–Yates, back to front).
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.range_usize(0, i + 1);
            items.swap(i, j);
        }
    }
}

/// Hash free-form seed text to a `u64`.
///
/// The CRC32 of the bytes fills the low half; the length fills the high half
/// so that short seeds with colliding checksums still diverge.
pub fn seed_hash(seed: &str) -> u64 {
    let crc = crc32fast::hash(seed.as_bytes()) as u64;
    crc | ((seed.len() as u64) << 32)
}

/// SplitMix64, used only for seeding xoshiro256++ from a single `u64`.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn determinism_same_seed_same_output() {
        let mut a = GameRng::new(42);
        let mut b = GameRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn text_seed_is_stable() {
        let mut a = GameRng::from_seed_str("woolly", 0);
        let mut b = GameRng::from_seed_str("woolly", 0);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn text_seed_streams_diverge() {
        let mut terrain = GameRng::from_seed_str("woolly", 0);
        let mut agents = GameRng::from_seed_str("woolly", 1);
        assert_ne!(terrain.next_u64(), agents.next_u64());
    }

    #[test]
    fn different_text_seeds_differ() {
        assert_ne!(seed_hash("island"), seed_hash("islands"));
        assert_ne!(seed_hash(""), seed_hash("a"));
    }

    #[test]
    fn f32_in_unit_range() {
        let mut rng = GameRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_f32();
            assert!((0.0..1.0).contains(&v), "f32 out of range: {v}");
        }
    }

    #[test]
    fn range_usize_within_bounds() {
        let mut rng = GameRng::new(555);
        for _ in 0..10_000 {
            let v = rng.range_usize(5, 15);
            assert!((5..15).contains(&v), "range_usize out of range: {v}");
        }
    }

    #[test]
    fn random_bool_extremes() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            assert!(!rng.random_bool(0.0));
            assert!(rng.random_bool(1.0));
        }
    }

    #[test]
    fn random_bool_rare_event_rate() {
        let mut rng = GameRng::new(7);
        let n = 200_000;
        let hits = (0..n).filter(|_| rng.random_bool(0.005)).count();
        let pct = hits as f64 / n as f64;
        assert!(
            (0.003..0.007).contains(&pct),
            "random_bool(0.005) should be ~0.5%, got {:.3}%",
            pct * 100.0
        );
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = GameRng::new(99);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_handles_tiny_slices() {
        let mut rng = GameRng::new(1);
        let mut empty: [u8; 0] = [];
        rng.shuffle(&mut empty);
        let mut one = [7u8];
        rng.shuffle(&mut one);
        assert_eq!(one, [7]);
    }

    #[test]
    fn serialization_roundtrip() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.next_u64();
        }
        let json = serde_json::to_string(&rng).unwrap();
        let mut restored: GameRng = serde_json::from_str(&json).unwrap();
        for _ in 0..100 {
            assert_eq!(rng.next_u64(), restored.next_u64());
        }
    }
}
