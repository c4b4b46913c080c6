//! Deterministic hop sequence generation.
//!
//! The sequence table must be reproducible bit-for-bit between the
//! transmitter and this receiver, so the shuffle PRNG below is part of the
//! wire-compatibility contract, not an implementation detail — it must not
//! be swapped out even for a "better" PRNG.

use heapless::Vec;

/// Number of slots in a hop sequence table.
pub const SEQUENCE_LEN: usize = 256;

/// Largest channel count this crate's tables support. 256 covers every band
/// plan described in the external band table; raising it costs stack space
/// proportional to [`generate_sequence`]'s scratch buffer.
pub const MAX_CHANNEL_COUNT: usize = 256;

/// A 256-slot hop sequence: channel indices in `[0, channel_count)`.
pub type Sequence = [u8; SEQUENCE_LEN];

/// xorshift32, seeded non-zero. Chosen for the sequence generator because
/// it is a single 32-bit word of state and three shifts — easy to
/// re-implement bit-for-bit on the transmitter's firmware.
struct Xorshift32(u32);

impl Xorshift32 {
    fn new(seed: u32) -> Self {
        // xorshift is undefined for a zero state (it's a fixed point).
        Xorshift32(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }
}

/// In-place Fisher-Yates shuffle driven by the sequence PRNG.
fn shuffle(pool: &mut [u8], rng: &mut Xorshift32) {
    let mut i = pool.len();
    while i > 1 {
        i -= 1;
        let j = (rng.next_u32() as usize) % (i + 1);
        pool.swap(i, j);
    }
}

/// Generate a deterministic 256-entry hop sequence.
///
/// Every `channel_count`-th slot (starting at 0) is forced to
/// `sync_channel`. The remaining slots in each block are filled, in
/// increasing slot order, from a fresh Fisher-Yates shuffle of
/// `{0..channel_count} \ {sync_channel}` — one full shuffled permutation per
/// block, so every non-sync channel appears in a block exactly once and
/// across the whole table at most once more often than any other (±1).
///
/// `channel_count` is clamped to `[1, MAX_CHANNEL_COUNT]` and `sync_channel`
/// is clamped into `[0, channel_count)`; both are caller-controlled
/// compatibility parameters, not attacker input, so clamping rather than
/// erroring keeps the signature infallible.
pub fn generate_sequence(seed: u32, channel_count: u16, sync_channel: u8) -> Sequence {
    let channel_count = (channel_count as usize).clamp(1, MAX_CHANNEL_COUNT);
    let sync_channel = sync_channel.min((channel_count - 1) as u8);

    let mut rng = Xorshift32::new(seed);
    let mut seq = [0u8; SEQUENCE_LEN];

    let mut pool: Vec<u8, MAX_CHANNEL_COUNT> =
        (0..channel_count as u16).map(|c| c as u8).filter(|&c| c != sync_channel).collect();

    let mut pos = 0usize;
    while pos < SEQUENCE_LEN {
        let block_end = (pos + channel_count).min(SEQUENCE_LEN);
        seq[pos] = sync_channel;

        shuffle(&mut pool, &mut rng);
        let mut drawn = pool.iter();
        for slot in seq.iter_mut().take(block_end).skip(pos + 1) {
            *slot = *drawn.next().unwrap_or(&sync_channel);
        }
        pos += channel_count;
    }
    seq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_nth_slot_is_sync() {
        let seq = generate_sequence(0xDEAD_BEEF, 50, 0);
        for (i, &c) in seq.iter().enumerate() {
            if i % 50 == 0 {
                assert_eq!(c, 0);
            }
        }
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let a = generate_sequence(12345, 40, 7);
        let b = generate_sequence(12345, 40, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let a = generate_sequence(1, 40, 7);
        let b = generate_sequence(2, 40, 7);
        assert_ne!(a, b);
    }

    #[test]
    fn non_sync_channels_are_balanced() {
        let n: u16 = 16;
        let sync = 3u8;
        let seq = generate_sequence(0x1234_5678, n, sync);

        let blocks = SEQUENCE_LEN / n as usize;
        let mut counts = [0u32; MAX_CHANNEL_COUNT];
        for &c in seq.iter() {
            if c != sync {
                counts[c as usize] += 1;
            }
        }
        for c in 0..n as usize {
            if c == sync as usize {
                continue;
            }
            let count = counts[c];
            assert!(
                count == blocks as u32 || count == blocks as u32 + 1 || count + 1 == blocks as u32,
                "channel {c} appeared {count} times, expected close to {blocks}"
            );
        }
    }

    #[test]
    fn handles_channel_count_not_dividing_256() {
        // 50 does not divide 256 evenly; the last block is short.
        let seq = generate_sequence(42, 50, 1);
        assert_eq!(seq[0], 1);
        assert_eq!(seq[250], 1);
    }
}
