//! Adaptive binary range coder.
//!
//! Maintains a 64-bit `[low, low+range)` interval that is narrowed by each
//! symbol's `(start, size, total)` triple from a `ProbabilityModel`, with
//! byte-at-a-time renormalization and a two-byte underflow rebase when
//! `range` falls below the model's total weight (spec §4.3).

use crate::error::{RcError, Result};
use crate::io::{ByteSink, ByteSource};
use crate::model::ProbabilityModel;

/// Number of bits in `low`/`range`/`code`.
const CODE_BITS: u32 = 64;
/// Shift to read the top byte of `low`/`code`.
const TOP_SHIFT: u32 = CODE_BITS - 8;
/// Widest representable range, `2^64 - 1`.
const RANGE_MAX: u64 = u64::MAX;

#[inline]
fn top_byte(x: u64) -> u8 {
    (x >> TOP_SHIFT) as u8
}

/// Encodes a sequence of symbols into bytes pushed to a `ByteSink`.
///
/// Created with `Encoder::new`, driven with repeated `encode` calls (one
/// per symbol against whichever `ProbabilityModel` is live for that
/// symbol — spec §4.3.6 permits interleaving independent models over one
/// coder), and finished with exactly one `flush` call.
pub struct Encoder<'a, S: ByteSink> {
    sink: &'a mut S,
    low: u64,
    range: u64,
    error: Option<RcError>,
}

impl<'a, S: ByteSink> Encoder<'a, S> {
    /// `low = 0`, `range = RANGE_MAX` (spec §4.3.1).
    pub fn new(sink: &'a mut S) -> Self {
        Encoder {
            sink,
            low: 0,
            range: RANGE_MAX,
            error: None,
        }
    }

    /// First error observed, if any. Sticky: once set, `encode`/`flush`
    /// become no-ops that keep returning this error.
    pub fn error(&self) -> Option<&RcError> {
        self.error.as_ref()
    }

    fn emit(&mut self, byte: u8) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.sink.write_byte(byte) {
            self.error = Some(RcError::Io(e));
        }
    }

    /// Encode one symbol against `pm`, then update `pm` (spec §4.3.2).
    ///
    /// Precondition: `pm.freq(sym) > 0`. Violating it is a caller bug
    /// (spec §7) — checked with a debug assertion; in release builds it
    /// would corrupt the stream rather than panic.
    pub fn encode(&mut self, pm: &mut ProbabilityModel, sym: u8) -> Result<()> {
        if let Some(e) = &self.error {
            return Err(clone_sticky(e));
        }
        debug_assert!(pm.freq(sym) > 0, "encoding a zero-frequency symbol");

        let total = pm.total();
        if total < 1 {
            let e = RcError::Invalid("probability model total is zero".into());
            self.error = Some(clone_sticky(&e));
            return Err(e);
        }
        debug_assert!(self.range >= total, "range fell below model total before encode step");
        let start = pm.prefix_sum_of(sym);
        let size = pm.freq(sym);

        log::trace!("encode sym={sym} start={start} size={size} total={total}");

        self.range /= total;
        self.low = self.low.wrapping_add(start.wrapping_mul(self.range));
        self.range = self.range.wrapping_mul(size);

        pm.update(sym, 1);

        while top_byte(self.low) == top_byte(self.low.wrapping_add(self.range)) {
            self.emit(top_byte(self.low));
            self.low <<= 8;
            self.range <<= 8;
        }

        if self.range < total + 1 {
            self.emit(top_byte(self.low));
            self.low <<= 8;
            self.emit(top_byte(self.low));
            self.low <<= 8;
            self.range = RANGE_MAX - self.low;
        }

        match &self.error {
            Some(e) => Err(clone_sticky(e)),
            None => Ok(()),
        }
    }

    /// Emit the 8 trailing bytes of `low`, MSB-first, so the decoder's
    /// bootstrap (spec §6) can reconstruct enough state to finish decoding
    /// the last symbol. Must be called exactly once, after the last
    /// `encode` call.
    pub fn flush(&mut self) -> Result<()> {
        if let Some(e) = &self.error {
            return Err(clone_sticky(e));
        }
        for _ in 0..(CODE_BITS / 8) {
            self.range = RANGE_MAX;
            self.emit(top_byte(self.low));
            self.low <<= 8;
        }
        match &self.error {
            Some(e) => Err(clone_sticky(e)),
            None => Ok(()),
        }
    }
}

/// Decodes a sequence of symbols from bytes pulled from a `ByteSource`.
///
/// `Decoder::new` pulls the 8 bootstrap bytes the encoder's `flush`
/// produced; each `decode` call yields one symbol and updates `pm`
/// identically to how the encoder updated it.
pub struct Decoder<'a, R: ByteSource> {
    source: &'a mut R,
    low: u64,
    range: u64,
    code: u64,
    error: Option<RcError>,
}

impl<'a, R: ByteSource> Decoder<'a, R> {
    /// Pull 8 bytes MSB-first into `code`, then set `low = 0`,
    /// `range = RANGE_MAX` (spec §4.3.1, §6 "Decoder bootstrap").
    pub fn new(source: &'a mut R) -> Result<Self> {
        let mut dec = Decoder {
            source,
            low: 0,
            range: RANGE_MAX,
            code: 0,
            error: None,
        };
        for _ in 0..(CODE_BITS / 8) {
            let byte = dec.consume();
            dec.code = (dec.code << 8) | byte as u64;
        }
        match &dec.error {
            Some(e) => Err(clone_sticky(e)),
            None => Ok(dec),
        }
    }

    /// First error observed, if any.
    pub fn error(&self) -> Option<&RcError> {
        self.error.as_ref()
    }

    fn consume(&mut self) -> u8 {
        if self.error.is_some() {
            return 0;
        }
        match self.source.read_byte() {
            Ok(b) => b,
            Err(e) => {
                self.error = Some(RcError::Io(e));
                0
            }
        }
    }

    /// Decode one symbol from `pm`, then update `pm` identically to the
    /// encoder (spec §4.3.4). Returns `RcError::Data` on any of the
    /// malformed-stream conditions in spec §4.3.5.
    pub fn decode(&mut self, pm: &mut ProbabilityModel) -> Result<u8> {
        if let Some(e) = &self.error {
            return Err(clone_sticky(e));
        }

        let total = pm.total();
        if total < 1 {
            return Err(self.fail_data("probability model total is zero".into()));
        }

        if self.range < total {
            self.consume_underflow_recovery();
            if self.error.is_some() {
                return Err(clone_sticky(self.error.as_ref().unwrap()));
            }
            if self.range < total {
                return Err(self.fail_data("range underflowed after recovery".into()));
            }
        }

        let step = self.range / total;
        let cum = self.code.wrapping_sub(self.low) / step;
        let sym = match pm.symbol_of(cum) {
            Some(s) => s,
            None => return Err(self.fail_data(format!("cumulative value {cum} maps to no symbol"))),
        };
        let start = pm.prefix_sum_of(sym);
        let size = pm.freq(sym);
        if size == 0 {
            return Err(self.fail_data(format!("symbol {sym} has zero frequency")));
        }

        log::trace!("decode sym={sym} start={start} size={size} total={total}");

        self.range = step;
        self.low = self.low.wrapping_add(start.wrapping_mul(self.range));
        self.range = self.range.wrapping_mul(size);

        pm.update(sym, 1);

        while top_byte(self.low) == top_byte(self.low.wrapping_add(self.range)) {
            let byte = self.consume();
            self.code = (self.code << 8).wrapping_add(byte as u64);
            self.low <<= 8;
            self.range <<= 8;
        }

        match &self.error {
            Some(e) => Err(clone_sticky(e)),
            None => Ok(sym),
        }
    }

    fn fail_data(&mut self, msg: String) -> RcError {
        let e = RcError::Data(msg);
        log::warn!("decode: {e}");
        self.error = Some(clone_sticky(&e));
        e
    }

    /// Mirror the encoder's forced two-byte emission, consuming instead of
    /// emitting, then rebasing `range` the same way (spec §4.3.2/§4.3.4).
    fn consume_underflow_recovery(&mut self) {
        for _ in 0..2 {
            let byte = self.consume();
            self.code = (self.code << 8).wrapping_add(byte as u64);
            self.low <<= 8;
        }
        self.range = RANGE_MAX - self.low;
    }
}

fn clone_sticky(e: &RcError) -> RcError {
    match e {
        RcError::Io(io_err) => RcError::Io(std::io::Error::new(io_err.kind(), io_err.to_string())),
        RcError::TooBig(s) => RcError::TooBig(s.clone()),
        RcError::Invalid(s) => RcError::Invalid(s.clone()),
        RcError::Data(s) => RcError::Data(s.clone()),
    }
}
