//! An adaptive binary range coder over a byte alphabet, backed by a
//! Fenwick-tree probability model.
//!
//! The coder narrows a 64-bit `[low, low+range)` interval one symbol at a
//! time, emitting or consuming bytes as the interval's top byte
//! stabilizes, and keeps encoder and decoder in lockstep by updating
//! identical [`ProbabilityModel`]s after every symbol. There is no framing:
//! callers either know the number of symbols in advance or reserve one
//! alphabet symbol as an end-of-message sentinel.
//!
//! # Example
//!
//! ```
//! use rangecode::{decode_with_eom, encode_with_eom};
//!
//! let input = b"the quick brown fox jumps over the lazy dog";
//! let eom = 255u8;
//! let compressed = encode_with_eom(input, 256, eom).unwrap();
//! let output = decode_with_eom(&compressed, 256, eom).unwrap();
//! assert_eq!(output, input);
//! ```

pub mod error;
mod fenwick;
pub mod io;
mod model;
mod range_coder;

pub use error::{RcError, Result};
pub use io::{ByteSink, ByteSource, SliceSource};
pub use model::{ProbabilityModel, PM_MAX_FREQ};
pub use range_coder::{Decoder, Encoder};

/// Encode `data` against a freshly initialized `ProbabilityModel::init(k)`,
/// appending `eom` as a final sentinel symbol so the decoder knows where
/// to stop (spec §6, "EOM sentinel").
///
/// `data` must not contain `eom`, and every byte must be `< k`
/// (spec §6, "Alphabet reservation").
pub fn encode_with_eom(data: &[u8], k: u16, eom: u8) -> Result<Vec<u8>> {
    let mut pm = model::ProbabilityModel::init(k as usize)?;
    check_alphabet(data, k, Some(eom))?;

    let mut out = Vec::new();
    {
        let mut enc = range_coder::Encoder::new(&mut out);
        for &b in data {
            enc.encode(&mut pm, b)?;
        }
        enc.encode(&mut pm, eom)?;
        enc.flush()?;
    }
    Ok(out)
}

/// Decode a stream produced by [`encode_with_eom`] with the same `k` and
/// `eom`, stopping after the sentinel is read.
pub fn decode_with_eom(data: &[u8], k: u16, eom: u8) -> Result<Vec<u8>> {
    let mut pm = model::ProbabilityModel::init(k as usize)?;
    let mut src = io::SliceSource::new(data);
    let mut dec = range_coder::Decoder::new(&mut src)?;

    let mut out = Vec::new();
    loop {
        let sym = dec.decode(&mut pm)?;
        if sym == eom {
            break;
        }
        out.push(sym);
    }
    Ok(out)
}

/// Encode `data` against a freshly initialized `ProbabilityModel::init(k)`
/// with no end-of-stream marker; the caller must remember `data.len()` to
/// decode it back (spec §6, "Known length").
pub fn encode_known_length(data: &[u8], k: u16) -> Result<Vec<u8>> {
    let mut pm = model::ProbabilityModel::init(k as usize)?;
    check_alphabet(data, k, None)?;

    let mut out = Vec::new();
    {
        let mut enc = range_coder::Encoder::new(&mut out);
        for &b in data {
            enc.encode(&mut pm, b)?;
        }
        enc.flush()?;
    }
    Ok(out)
}

/// Decode exactly `n` symbols from a stream produced by
/// [`encode_known_length`] with the same `k`.
pub fn decode_known_length(data: &[u8], k: u16, n: usize) -> Result<Vec<u8>> {
    let mut pm = model::ProbabilityModel::init(k as usize)?;
    let mut src = io::SliceSource::new(data);
    let mut dec = range_coder::Decoder::new(&mut src)?;

    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(dec.decode(&mut pm)?);
    }
    Ok(out)
}

fn check_alphabet(data: &[u8], k: u16, eom: Option<u8>) -> Result<()> {
    if let Some(eom) = eom {
        if eom as u16 >= k {
            return Err(RcError::Invalid(format!(
                "eom symbol {eom} is outside the {k}-symbol alphabet"
            )));
        }
    }
    if let Some(&bad) = data.iter().find(|&&b| (b as u16) >= k) {
        return Err(RcError::Invalid(format!(
            "symbol {bad} is outside the {k}-symbol alphabet"
        )));
    }
    Ok(())
}
