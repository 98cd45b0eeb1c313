//! The Fletcher-sum rolling window: the byte-sum / Fletcher-sum state that
//! [`Segmenter`](crate::Segmenter) advances one byte at a time to decide
//! segment boundaries.
//!
//! Unlike `rsync`'s Adler-32-style rolling checksum (see
//! [`RollingSum`](crate::rolling) sibling crates in the wider ecosystem),
//! this window reduces modulo a prime `P` chosen close to the minimum
//! segment size, which maximizes the probability of a zero fingerprint and
//! keeps the mean segment length near `4 * MINSEGSIZE`.

use crate::config::ChunkerConfig;

/// Byte-sum and Fletcher-sum state for the trailing `W`-byte window.
///
/// Mirrors the original's `char_sum` / `fletch_sum` / `remove_old_byte`
/// fields: a running byte sum, a Fletcher sum reduced modulo `P`, and a
/// 256-entry table that removes the contribution of an outgoing byte in
/// O(1) without a subtraction that could go negative.
#[derive(Clone, Debug)]
pub struct RollingWindow {
    prime: u64,
    char_sum: u64,
    fletch_sum: u64,
    remove_old_byte: [u64; 256],
}

impl RollingWindow {
    /// Builds a window for the given config, with both sums at zero.
    ///
    /// Call [`fill_from_scratch`](Self::fill_from_scratch) once the first
    /// window's worth of bytes is available.
    pub fn new(config: &ChunkerConfig) -> Self {
        let prime = config.prime();
        let window = config.window() as u64;

        let mut remove_old_byte = [0u64; 256];
        for (x, slot) in remove_old_byte.iter_mut().enumerate() {
            *slot = (prime - (window * x as u64) % prime) % prime;
        }

        Self {
            prime,
            char_sum: 0,
            fletch_sum: 0,
            remove_old_byte,
        }
    }

    /// Current Fletcher sum, already reduced modulo `P`.
    #[must_use]
    pub const fn fletch_sum(&self) -> u64 {
        self.fletch_sum
    }

    /// Current byte sum over the window.
    #[must_use]
    pub const fn char_sum(&self) -> u64 {
        self.char_sum
    }

    /// Whether the current fingerprint is zero (a "hit", spec.md section
    /// 4.1).
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        self.fletch_sum == 0
    }

    /// Computes both sums from scratch over a full `window`-byte buffer.
    ///
    /// Used once, at cold start, to seed the state after the first block is
    /// read (spec.md section 4.2, "Cold-start").
    pub fn fill_from_scratch(&mut self, window_bytes: &[u8]) {
        let mut char_sum: u64 = 0;
        let mut fletch_sum: u64 = 0;
        for &byte in window_bytes {
            char_sum += u64::from(byte);
            fletch_sum += char_sum;
        }
        self.char_sum = char_sum;
        self.fletch_sum = fletch_sum % self.prime;
    }

    /// Advances the window by one byte: `x` leaves, `y` enters.
    ///
    /// This is the O(1) update from spec.md section 4.2: `char_sum` is
    /// updated by plain wrapping add/subtract, and `fletch_sum` is updated
    /// by adding the new `char_sum` plus a precomputed residue that removes
    /// `x`'s contribution, avoiding a subtraction that could underflow.
    pub fn roll(&mut self, x: u8, y: u8) {
        self.char_sum = self
            .char_sum
            .wrapping_sub(u64::from(x))
            .wrapping_add(u64::from(y));
        self.fletch_sum =
            (self.fletch_sum + self.char_sum + self.remove_old_byte[x as usize]) % self.prime;
    }
}
