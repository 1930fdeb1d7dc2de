//! Adaptive per-symbol probability model over a fixed 256-symbol alphabet.

use crate::error::{RcError, Result};
use crate::fenwick::FenwickTree;

/// Upper bound on `ProbabilityModel::total()`. Once reached, further
/// `update` calls are silently ignored — the 64-bit arithmetic in the
/// range coder is only guaranteed not to overflow while `total() <=
/// PM_MAX_FREQ` (see spec §9, "Integer overflow").
pub const PM_MAX_FREQ: u64 = 1u64 << (64 - 8);

/// Number of symbol slots the model always allocates. The model may
/// restrict the *usable* alphabet to `k < 256` via `init`, but the
/// underlying tree is always full width so `symbol_of`/`update` never
/// need bounds-adjustment.
const SLOTS: usize = 256;

/// An adaptive frequency table: a Fenwick tree over cumulative counts plus
/// a raw per-symbol mirror, supporting the three operations the range
/// coder needs every step — total weight, a symbol's cumulative
/// prefix, and "which symbol owns this cumulative position".
pub struct ProbabilityModel {
    tree: FenwickTree,
    freq: [u64; SLOTS],
    frozen: bool,
}

impl ProbabilityModel {
    /// Create a model over an alphabet of size `k` (`2 <= k <= 256`),
    /// giving each of the first `k` symbols a frequency of 1 and the rest
    /// 0. Symbols `>= k` must never be encoded or decoded against this
    /// model (spec §6, "Alphabet reservation") — doing so divides by zero
    /// at the next range-coder step.
    pub fn init(k: usize) -> Result<Self> {
        if !(2..=SLOTS).contains(&k) {
            return Err(RcError::Invalid(format!(
                "alphabet size must be in 2..=256, got {k}"
            )));
        }
        let mut freq = [0u64; SLOTS];
        for slot in freq.iter_mut().take(k) {
            *slot = 1;
        }
        Ok(ProbabilityModel {
            tree: FenwickTree::from_counts(&freq),
            freq,
            frozen: false,
        })
    }

    /// Total weight across all symbols.
    pub fn total(&self) -> u64 {
        self.tree.total()
    }

    /// Raw frequency of `sym`.
    pub fn freq(&self, sym: u8) -> u64 {
        self.freq[sym as usize]
    }

    /// Sum of frequencies for symbols strictly less than `sym`.
    pub fn prefix_sum_of(&self, sym: u8) -> u64 {
        self.tree.prefix_sum(sym as isize - 1)
    }

    /// The symbol `s` such that `prefix_sum_of(s) <= cum <
    /// prefix_sum_of(s) + freq(s)`, or `None` if `cum` lands outside any
    /// symbol's span (a corrupt-stream condition the decoder must
    /// surface as `RcError::Data`).
    pub fn symbol_of(&self, cum: u64) -> Option<u8> {
        // FT.find returns the zero-based "slot before this one"; +1
        // converts it to the owning symbol (spec §4.2). Combined with our
        // FT::find choice of returning `n - 1` (not `-1`) when
        // `cum >= total`, a too-large `cum` lands on `idx == SLOTS`,
        // correctly falling out of range below rather than aliasing onto
        // symbol 0 (see DESIGN.md, FT `find` divergence).
        let idx = self.tree.find(cum) + 1;
        if idx < 0 || idx >= SLOTS as isize {
            return None;
        }
        let sym = idx as u8;
        if self.freq[sym as usize] == 0 {
            return None;
        }
        Some(sym)
    }

    /// Observe `sym` occurring `inc` more times. A no-op once
    /// `total() >= PM_MAX_FREQ` (see `PM_MAX_FREQ`); the coder always
    /// calls this with `inc = 1`.
    pub fn update(&mut self, sym: u8, inc: u64) {
        if self.tree.total() >= PM_MAX_FREQ {
            if !self.frozen {
                log::debug!(
                    "probability model reached PM_MAX_FREQ ({PM_MAX_FREQ}); further updates ignored"
                );
                self.frozen = true;
            }
            return;
        }
        self.freq[sym as usize] = self.freq[sym as usize].saturating_add(inc);
        self.tree.update(sym as usize, inc);
    }
}
